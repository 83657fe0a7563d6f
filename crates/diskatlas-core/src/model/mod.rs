/// Data model for DiskAtlas.
///
/// The scan tree ([`Node`]), the per-scan aggregate ([`ScanResult`]) and
/// display helpers for sizes.
pub mod node;
pub mod result;
pub mod size;

pub use node::{display_name, Node, NodeKind, MULTI_ROOT_NAME, ROOT_PATH_SEPARATOR};
pub use result::{ExtStat, ScanResult, TopFile, NO_EXTENSION};

/// The immutable snapshot produced by one completed scan.
use super::node::Node;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Histogram key for files without an extension.
pub const NO_EXTENSION: &str = "<no extension>";

/// Total bytes and file count for one extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtStat {
    pub bytes: u64,
    pub count: u64,
}

/// One entry of the global largest-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopFile {
    pub size: u64,
    pub path: PathBuf,
}

/// Everything a scan learned about its roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// The tree. For a single root this is the root directory itself; for
    /// several roots it is a synthetic [`NodeKind::ScanRoot`](super::NodeKind).
    pub root: Node,

    /// Lower-cased extension (without the dot) → totals.
    pub ext_stats: HashMap<String, ExtStat>,

    /// Largest files anywhere under the roots, largest first.
    pub top_files: Vec<TopFile>,

    /// Normalised (absolute) root paths in the order they were scanned.
    pub scanned_paths: Vec<PathBuf>,

    /// Files whose metadata was read successfully.
    pub files: u64,

    /// Directories discovered beneath the roots (roots themselves excluded).
    pub dirs: u64,

    /// Sum of all file sizes seen.
    pub bytes_scanned: u64,

    pub elapsed: Duration,

    /// Wall-clock time the scan finished.
    pub finished_at: DateTime<Local>,
}

impl ScanResult {
    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Total bytes represented by the tree (equals `bytes_scanned` for a
    /// scan that completed).
    pub fn total_size(&self) -> u64 {
        self.root.size
    }
}

/// Analysis modules: summaries derived from a finished [`ScanResult`](crate::model::ScanResult).
///
/// Everything here works on the scan's aggregates, never on the file
/// system, so it is cheap to recompute whenever a view changes.
pub mod extensions;
pub mod file_types;
pub mod top_files;

pub use extensions::{ranked_extensions, ExtensionShare};
pub use file_types::{categorise_extension, category_breakdown, CategoryStats, FileCategory};
pub use top_files::largest_files;

/// Largest files anywhere under the scanned roots.
///
/// The scan keeps this list already ordered, largest first, so this is a
/// view rather than a search.
use crate::model::{ScanResult, TopFile};

/// The first `n` entries of the global largest-files list.
pub fn largest_files(result: &ScanResult, n: usize) -> &[TopFile] {
    &result.top_files[..n.min(result.top_files.len())]
}

/// Tunables for a scan.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest immediate files kept as individual children of each directory.
pub const DEFAULT_TOP_FILES_PER_DIR: usize = 80;

/// Size of the global largest-files list.
pub const DEFAULT_GLOBAL_TOP_FILES: usize = 400;

/// Minimum wall-clock gap between two progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Descend through symbolic links. Off by default; when on, directories
    /// already visited under the same root are skipped.
    pub follow_symlinks: bool,

    /// Per-directory retention cap. 0 folds every file into the overflow
    /// entry.
    pub top_files_per_dir: usize,

    /// Global largest-files cap. 0 disables the list.
    pub global_top_files: usize,

    pub progress_interval: Duration,

    /// Walk sibling roots on separate worker threads.
    pub parallel_roots: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            top_files_per_dir: DEFAULT_TOP_FILES_PER_DIR,
            global_top_files: DEFAULT_GLOBAL_TOP_FILES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            parallel_roots: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_caps() {
        let o = ScanOptions::default();
        assert_eq!(o.top_files_per_dir, 80);
        assert_eq!(o.global_top_files, 400);
        assert_eq!(o.progress_interval, Duration::from_millis(100));
        assert!(!o.follow_symlinks);
        assert!(!o.parallel_roots);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let o: ScanOptions = serde_json::from_str(r#"{"top_files_per_dir": 5}"#).unwrap();
        assert_eq!(o.top_files_per_dir, 5);
        assert_eq!(o.global_top_files, DEFAULT_GLOBAL_TOP_FILES);
    }
}

use std::path::PathBuf;

/// Reasons a scan could not run.
///
/// Only invalid input and worker failures surface here. Unreadable entries
/// and directories are absorbed inside the walk, and cancellation is a
/// regular [`ScanOutcome`](super::ScanOutcome).
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("no root paths to scan")]
    NoRoots,

    #[error("root path does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("root path is not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("cannot access root path {}: {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build the root worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn the scanner thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("the scanner thread panicked")]
    WorkerPanicked,
}

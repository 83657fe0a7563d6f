/// Scan progress reporting: the callback payload, the messages sent from
/// the scan thread to its owner, and the time-based throttle shared by every
/// branch of a walk.
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running totals handed to the progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Directory being processed when the update was taken.
    pub current_path: PathBuf,
    pub files: u64,
    pub dirs: u64,
    pub bytes_scanned: u64,
}

/// Messages sent from the scan thread to whoever holds the
/// [`ScanHandle`](super::ScanHandle).
///
/// Exactly one of `Complete`, `Cancelled` or `Failed` is sent, and it is
/// always the last message.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update(ProgressUpdate),
    /// The scan finished; the result is returned by `ScanHandle::wait`.
    Complete { duration: Duration },
    /// The scan observed a cancellation request and unwound.
    Cancelled,
    Failed { message: String },
}

/// Lets a call through at most once per `interval` of wall-clock time.
/// The very first call always passes.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// `true` if a report is due now; arms the next window when it is.
    pub fn ready(&mut self) -> bool {
        self.ready_at(Instant::now())
    }

    pub fn ready_at(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

/// Callback type for progress sinks.
pub type ProgressFn = dyn Fn(&ProgressUpdate) + Send + Sync;

/// A progress sink borrowed for the duration of one scan.
pub(crate) type ProgressSink<'a> = dyn Fn(&ProgressUpdate) + Send + Sync + 'a;

/// Global counters plus the single throttle all branches report through.
pub(crate) struct Reporter<'a> {
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
    throttle: Mutex<ProgressThrottle>,
    sink: Option<&'a ProgressSink<'a>>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(interval: Duration, sink: Option<&'a ProgressSink<'a>>) -> Self {
        Self {
            files: AtomicU64::new(0),
            dirs: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            throttle: Mutex::new(ProgressThrottle::new(interval)),
            sink,
        }
    }

    pub(crate) fn add_file(&self, size: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub(crate) fn add_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    /// (files, dirs, bytes)
    pub(crate) fn totals(&self) -> (u64, u64, u64) {
        (
            self.files.load(Ordering::Relaxed),
            self.dirs.load(Ordering::Relaxed),
            self.bytes.load(Ordering::Relaxed),
        )
    }

    /// Forward a snapshot to the sink if the throttle window has elapsed.
    pub(crate) fn tick(&self, current: &Path) {
        let Some(sink) = self.sink else {
            return;
        };
        if !self.throttle.lock().ready() {
            return;
        }
        let (files, dirs, bytes_scanned) = self.totals();
        sink(&ProgressUpdate {
            current_path: current.to_path_buf(),
            files,
            dirs,
            bytes_scanned,
        });
    }
}

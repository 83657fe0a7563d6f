/// Scanner module: turns one or more root directories into a [`ScanResult`].
///
/// Two entry points are provided:
/// - [`Scanner::scan`] runs on the calling thread with optional progress and
///   cancellation callbacks.
/// - [`start_scan`] runs the same scan on a dedicated background thread and
///   reports through a bounded channel, for front-ends that must stay
///   responsive while the walk is in flight.
///
/// Sibling roots may be walked concurrently on a `rayon` pool sized from
/// `num_cpus`. Each root keeps its own aggregates, which are merged once all
/// roots are done, so the result is identical to a sequential scan.
pub mod error;
pub mod files;
pub mod options;
pub mod progress;
pub mod top_k;
mod walker;

pub use error::ScanError;
pub use files::{iter_files, FileIter};
pub use options::ScanOptions;
pub use progress::{ProgressFn, ProgressThrottle, ProgressUpdate, ScanProgress};

use crate::model::{Node, ScanResult, TopFile};
use progress::Reporter;
use walker::{Aggregates, RootScan, WalkContext};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Cancellation predicate polled by the walk.
pub type CancelFn = dyn Fn() -> bool + Send + Sync;

/// A cancellation predicate borrowed for the duration of one scan.
pub(crate) type CancelCheck<'a> = dyn Fn() -> bool + Send + Sync + 'a;

/// How a scan ended when it did not fail.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(Box<ScanResult>),
    /// Cancellation was observed; partial data is discarded.
    Cancelled,
}

impl ScanOutcome {
    pub fn completed(self) -> Option<ScanResult> {
        match self {
            ScanOutcome::Completed(result) => Some(*result),
            ScanOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanOutcome::Cancelled)
    }
}

/// Shared flag used to request cancellation across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Wraps the caller's predicate and remembers once it has fired, so every
/// branch of the walk unwinds and the scan reports `Cancelled`.
pub(crate) struct Cancellation<'a> {
    check: Option<&'a CancelCheck<'a>>,
    tripped: AtomicBool,
}

impl<'a> Cancellation<'a> {
    pub(crate) fn new(check: Option<&'a CancelCheck<'a>>) -> Self {
        Self {
            check,
            tripped: AtomicBool::new(false),
        }
    }

    pub(crate) fn poll(&self) -> bool {
        if self.tripped.load(Ordering::Relaxed) {
            return true;
        }
        match self.check {
            Some(check) if check() => {
                self.tripped.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn was_requested(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }
}

/// Validate the requested roots and make them absolute.
///
/// Empty entries are ignored. Order is preserved and duplicates are kept:
/// scanning the same root twice is the caller's choice.
pub fn normalize_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut normalized = Vec::with_capacity(roots.len());
    for root in roots.iter().filter(|p| !p.as_os_str().is_empty()) {
        let absolute = std::path::absolute(root).map_err(|source| ScanError::RootInaccessible {
            path: root.clone(),
            source,
        })?;
        match std::fs::metadata(&absolute) {
            Ok(meta) if meta.is_dir() => normalized.push(absolute),
            Ok(_) => return Err(ScanError::RootNotDirectory { path: absolute }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::RootNotFound { path: absolute })
            }
            Err(source) => {
                return Err(ScanError::RootInaccessible {
                    path: absolute,
                    source,
                })
            }
        }
    }
    if normalized.is_empty() {
        return Err(ScanError::NoRoots);
    }
    Ok(normalized)
}

/// Synchronous scanner with optional progress and cancellation hooks.
///
/// ```no_run
/// use diskatlas_core::scanner::{ScanOptions, Scanner};
/// use std::path::PathBuf;
///
/// let outcome = Scanner::new(ScanOptions::default())
///     .on_progress(|u| eprintln!("{} files", u.files))
///     .scan(&[PathBuf::from(".")])?;
/// # Ok::<(), diskatlas_core::scanner::ScanError>(())
/// ```
#[derive(Default)]
pub struct Scanner {
    options: ScanOptions,
    progress: Option<Box<ProgressFn>>,
    cancel: Option<Box<CancelFn>>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            progress: None,
            cancel: None,
        }
    }

    /// Receive throttled running totals while the walk is in progress.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(f));
        self
    }

    /// Stop the scan as soon as `f` returns `true`.
    pub fn cancel_when<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.cancel = Some(Box::new(f));
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walk every root and build the result.
    ///
    /// Errors are limited to invalid roots and worker setup; unreadable
    /// entries inside the roots are skipped.
    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanOutcome, ScanError> {
        let roots = normalize_roots(roots)?;
        let start = Instant::now();
        info!(
            roots = roots.len(),
            parallel = self.options.parallel_roots,
            follow_symlinks = self.options.follow_symlinks,
            "Starting scan"
        );

        let reporter = Reporter::new(self.options.progress_interval, self.progress.as_deref());
        let cancel = Cancellation::new(self.cancel.as_deref());
        let ctx = WalkContext {
            options: &self.options,
            reporter: &reporter,
            cancel: &cancel,
        };

        let scans = if self.options.parallel_roots && roots.len() > 1 {
            let threads = num_cpus::get().clamp(1, roots.len());
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("diskatlas-root-{i}"))
                .build()?;
            debug!(threads, "Walking roots in parallel");
            pool.install(|| {
                roots
                    .par_iter()
                    .enumerate()
                    .map(|(i, root)| walker::scan_root(&ctx, i, root))
                    .collect::<Vec<RootScan>>()
            })
        } else {
            roots
                .iter()
                .enumerate()
                .map(|(i, root)| walker::scan_root(&ctx, i, root))
                .collect::<Vec<RootScan>>()
        };

        if cancel.was_requested() {
            info!(elapsed_ms = start.elapsed().as_millis() as u64, "Scan cancelled");
            return Ok(ScanOutcome::Cancelled);
        }

        let mut aggregates = Aggregates::new(self.options.global_top_files);
        let mut children = Vec::with_capacity(scans.len());
        for scan in scans {
            aggregates.merge(scan.aggregates);
            children.push(scan.node);
        }
        let root = match <[Node; 1]>::try_from(children) {
            Ok([single]) => single,
            Err(children) => Node::scan_root(&roots, children),
        };

        let top_files = aggregates
            .top_files
            .into_sorted_vec()
            .into_iter()
            .map(|r| TopFile {
                size: r.rank.size,
                path: r.item,
            })
            .collect();

        let (files, dirs, bytes_scanned) = reporter.totals();
        let elapsed = start.elapsed();
        info!(
            files,
            dirs,
            bytes = bytes_scanned,
            elapsed_ms = elapsed.as_millis() as u64,
            "Scan complete"
        );

        Ok(ScanOutcome::Completed(Box::new(ScanResult {
            root,
            ext_stats: aggregates.ext_stats,
            top_files,
            scanned_paths: roots,
            files,
            dirs,
            bytes_scanned,
            elapsed,
            finished_at: chrono::Local::now(),
        })))
    }
}

/// Convenience wrapper: scan `roots` with `options` and no hooks.
pub fn scan(roots: &[PathBuf], options: ScanOptions) -> Result<ScanOutcome, ScanError> {
    Scanner::new(options).scan(roots)
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// Updates are throttled to one per `progress_interval`, so this is many
/// minutes of headroom. When the receiver falls behind, updates are dropped
/// rather than stalling the walk; the terminal message is never dropped.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Progress updates followed by exactly one terminal message.
    pub progress_rx: Receiver<ScanProgress>,
    cancel: CancelFlag,
    thread: Option<thread::JoinHandle<Result<ScanOutcome, ScanError>>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the flag, for cancelling from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Block until the scan thread exits and return its outcome.
    ///
    /// Undrained progress messages are discarded.
    pub fn wait(mut self) -> Result<ScanOutcome, ScanError> {
        let Some(thread) = self.thread.take() else {
            return Err(ScanError::WorkerPanicked);
        };
        drop(self.progress_rx);
        thread.join().map_err(|_| ScanError::WorkerPanicked)?
    }
}

/// Validate `roots`, then scan them on a background thread.
///
/// Root errors are returned here rather than through the channel, so a
/// handle always corresponds to a scan that actually started.
pub fn start_scan(roots: Vec<PathBuf>, options: ScanOptions) -> Result<ScanHandle, ScanError> {
    let roots = normalize_roots(&roots)?;
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelFlag::new();

    let update_tx = progress_tx.clone();
    let stale_rx = progress_rx.clone();
    let cancel_check = cancel.clone();
    let scanner = Scanner::new(options)
        .on_progress(move |update| {
            let _ = update_tx.try_send(ScanProgress::Update(update.clone()));
        })
        .cancel_when(move || cancel_check.is_cancelled());

    let thread = thread::Builder::new()
        .name("diskatlas-scanner".into())
        .spawn(move || {
            let start = Instant::now();
            let outcome = scanner.scan(&roots);
            let terminal = match &outcome {
                Ok(ScanOutcome::Completed(_)) => ScanProgress::Complete {
                    duration: start.elapsed(),
                },
                Ok(ScanOutcome::Cancelled) => ScanProgress::Cancelled,
                Err(err) => {
                    warn!(error = %err, "Scan failed");
                    ScanProgress::Failed {
                        message: err.to_string(),
                    }
                }
            };
            send_terminal(&progress_tx, &stale_rx, terminal);
            outcome
        })
        .map_err(ScanError::WorkerSpawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel,
        thread: Some(thread),
    })
}

/// Queue the terminal message without blocking. A full channel gives up
/// its oldest updates to make room; updates are droppable, the terminal
/// message is not.
fn send_terminal(
    tx: &Sender<ScanProgress>,
    stale_rx: &Receiver<ScanProgress>,
    terminal: ScanProgress,
) {
    let mut msg = terminal;
    loop {
        match tx.try_send(msg) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => return,
            Err(TrySendError::Full(back)) => {
                let _ = stale_rx.try_recv();
                msg = back;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_latches_once_tripped() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let check = || calls.fetch_add(1, Ordering::Relaxed) >= 1;
        let cancel = Cancellation::new(Some(&check));
        assert!(!cancel.poll());
        assert!(!cancel.was_requested());
        assert!(cancel.poll());
        assert!(cancel.poll());
        assert!(cancel.was_requested());
        // Once latched, the predicate is no longer consulted.
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn no_predicate_never_cancels() {
        let cancel = Cancellation::new(None);
        assert!(!cancel.poll());
        assert!(!cancel.was_requested());
    }

    #[test]
    fn cancel_flag_clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        other.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn normalize_rejects_empty_input() {
        assert!(matches!(normalize_roots(&[]), Err(ScanError::NoRoots)));
        assert!(matches!(
            normalize_roots(&[PathBuf::new()]),
            Err(ScanError::NoRoots)
        ));
    }

    fn update(files: u64) -> ScanProgress {
        ScanProgress::Update(ProgressUpdate {
            current_path: PathBuf::from("/x"),
            files,
            dirs: 0,
            bytes_scanned: 0,
        })
    }

    #[test]
    fn terminal_message_evicts_the_oldest_update_when_full() {
        let (tx, rx) = crossbeam_channel::bounded(2);
        tx.try_send(update(1)).unwrap();
        tx.try_send(update(2)).unwrap();

        send_terminal(&tx, &rx, ScanProgress::Cancelled);

        let msgs: Vec<ScanProgress> = rx.try_iter().collect();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(&msgs[0], ScanProgress::Update(u) if u.files == 2));
        assert!(matches!(msgs[1], ScanProgress::Cancelled));
    }

    #[test]
    fn terminal_message_to_a_dropped_owner_returns() {
        let (tx, rx) = crossbeam_channel::bounded::<ScanProgress>(1);
        let (_keep, unrelated_rx) = crossbeam_channel::bounded::<ScanProgress>(1);
        drop(rx);
        send_terminal(&tx, &unrelated_rx, ScanProgress::Cancelled);
        assert!(unrelated_rx.is_empty());
    }
}

/// Scan session state.
///
/// Owns the background scan handle, mirrors its progress messages into
/// plain counters, and once the scan is over holds the result together
/// with a navigable "focus" (the directory the reports and the treemap are
/// drawn for). The front-end polls [`ScanSession::process_scan_messages`]
/// from its own loop; nothing here blocks except the final join.
use diskatlas_core::model::{Node, ScanResult};
use diskatlas_core::platform::{estimate_total_bytes, progress_percent};
use diskatlas_core::scanner::{start_scan, ScanError, ScanHandle, ScanOptions, ScanOutcome, ScanProgress};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Where the session is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No scan started yet.
    Idle,
    Scanning,
    /// The scan completed; `result` is set.
    Done,
    /// The scan was cancelled; partial data was discarded.
    Cancelled,
    /// The scan thread reported a failure; see `error`.
    Failed,
}

/// Maximum number of progress messages handled per poll.
///
/// Keeps a single poll short even if the caller fell far behind.
const MAX_MESSAGES_PER_POLL: usize = 300;

/// Maximum entries in the focus back/forward history stacks.
const MAX_NAV_HISTORY: usize = 50;

pub struct ScanSession {
    pub phase: Phase,
    handle: Option<ScanHandle>,

    // ── Live counters ──────────────────────────────────
    pub files: u64,
    pub dirs: u64,
    pub bytes_scanned: u64,
    pub current_path: PathBuf,
    /// Sum of the capacities of the volumes being scanned, if known.
    pub total_estimate: Option<u64>,
    /// Highest percentage reported so far.
    percent: f64,

    // ── Outcome ────────────────────────────────────────
    pub duration: Option<Duration>,
    pub error: Option<String>,
    pub result: Option<ScanResult>,

    // ── Focus navigation ───────────────────────────────
    focus: Option<PathBuf>,
    back: Vec<PathBuf>,
    forward: Vec<PathBuf>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            handle: None,
            files: 0,
            dirs: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            total_estimate: None,
            percent: 0.0,
            duration: None,
            error: None,
            result: None,
            focus: None,
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    /// Start scanning `roots`. Any previous result is dropped.
    ///
    /// Invalid roots are reported here and leave the session idle.
    pub fn start(&mut self, roots: Vec<PathBuf>, options: ScanOptions) -> Result<(), ScanError> {
        self.cancel();
        let total_estimate = estimate_total_bytes(&roots);
        let handle = start_scan(roots, options)?;

        *self = Self::new();
        self.phase = Phase::Scanning;
        self.total_estimate = total_estimate;
        self.handle = Some(handle);
        Ok(())
    }

    /// Ask a running scan to stop. The phase changes once the scan thread
    /// confirms, on a later [`process_scan_messages`](Self::process_scan_messages).
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.cancel();
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == Phase::Scanning
    }

    /// Apply pending progress messages. Returns `true` if anything changed.
    pub fn process_scan_messages(&mut self) -> bool {
        let Some(handle) = &self.handle else {
            return false;
        };

        let mut changed = false;
        let mut terminal = None;
        for _ in 0..MAX_MESSAGES_PER_POLL {
            let Ok(msg) = handle.progress_rx.try_recv() else {
                break;
            };
            changed = true;
            match msg {
                ScanProgress::Update(update) => {
                    self.files = update.files;
                    self.dirs = update.dirs;
                    self.bytes_scanned = update.bytes_scanned;
                    self.current_path = update.current_path;
                    if let Some(total) = self.total_estimate {
                        self.percent = self.percent.max(progress_percent(self.bytes_scanned, total));
                    }
                }
                other => {
                    terminal = Some(other);
                    break;
                }
            }
        }

        if let Some(terminal) = terminal {
            self.finish(terminal);
        }
        changed
    }

    /// Join the scan thread and record how it ended.
    fn finish(&mut self, terminal: ScanProgress) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let ScanProgress::Complete { duration } = terminal {
            self.duration = Some(duration);
        }

        match handle.wait() {
            Ok(ScanOutcome::Completed(result)) => {
                debug!(files = result.files, "Session received scan result");
                self.files = result.files;
                self.dirs = result.dirs;
                self.bytes_scanned = result.bytes_scanned;
                self.percent = 100.0;
                self.result = Some(*result);
                self.phase = Phase::Done;
            }
            Ok(ScanOutcome::Cancelled) => {
                self.phase = Phase::Cancelled;
            }
            Err(err) => {
                warn!(error = %err, "Scan failed");
                self.error = Some(match terminal {
                    ScanProgress::Failed { message } => message,
                    _ => err.to_string(),
                });
                self.phase = Phase::Failed;
            }
        }
    }

    /// Progress in percent of the estimated total; never decreases.
    pub fn percent(&self) -> Option<f64> {
        match self.phase {
            Phase::Done => Some(100.0),
            _ => self.total_estimate.map(|_| self.percent),
        }
    }

    // ── Focus navigation ───────────────────────────────

    /// The node reports are drawn for: the focused directory, or the root.
    pub fn focused_node(&self) -> Option<&Node> {
        let root = &self.result.as_ref()?.root;
        match &self.focus {
            Some(path) => root.find(path),
            None => Some(root),
        }
    }

    /// Focus a directory of the result. Returns `false` (and changes
    /// nothing) if `path` is not a directory in the tree.
    pub fn focus_on(&mut self, path: &Path) -> bool {
        let current = match self.focused_node() {
            Some(node) => node.path.clone(),
            None => return false,
        };
        let Some(target) = self.find_dir(path) else {
            return false;
        };
        if target != current {
            push_capped(&mut self.back, current);
        }
        self.forward.clear();
        self.focus = Some(target);
        true
    }

    pub fn go_back(&mut self) -> bool {
        let Some(prev) = self.back.pop() else {
            return false;
        };
        if let Some(cur) = self.focused_node().map(|n| n.path.clone()) {
            push_capped(&mut self.forward, cur);
        }
        self.focus = Some(prev);
        true
    }

    pub fn go_forward(&mut self) -> bool {
        let Some(next) = self.forward.pop() else {
            return false;
        };
        if let Some(cur) = self.focused_node().map(|n| n.path.clone()) {
            push_capped(&mut self.back, cur);
        }
        self.focus = Some(next);
        true
    }

    /// Focus the directory containing the current focus.
    pub fn go_up(&mut self) -> bool {
        let Some(result) = &self.result else {
            return false;
        };
        let Some(current) = self.focused_node() else {
            return false;
        };
        let Some(parent) = parent_of(&result.root, &current.path).map(|p| p.path.clone()) else {
            return false;
        };
        let current = current.path.clone();
        push_capped(&mut self.back, current);
        self.forward.clear();
        self.focus = Some(parent);
        true
    }

    fn find_dir(&self, path: &Path) -> Option<PathBuf> {
        let root = &self.result.as_ref()?.root;
        root.find(path).filter(|n| n.is_dir).map(|n| n.path.clone())
    }
}

/// The directory whose children include the directory at `path`.
fn parent_of<'a>(root: &'a Node, path: &Path) -> Option<&'a Node> {
    root.descendants()
        .find(|n| n.children.iter().any(|c| c.is_dir && c.path == path))
}

fn push_capped(stack: &mut Vec<PathBuf>, path: PathBuf) {
    if stack.len() >= MAX_NAV_HISTORY {
        stack.remove(0);
    }
    stack.push(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::collections::HashMap;

    fn session_with_tree() -> ScanSession {
        let leaf = Node::directory(
            "leaf",
            PathBuf::from("/r/mid/leaf"),
            vec![Node::file("x", PathBuf::from("/r/mid/leaf/x"), 5)],
        );
        let mid = Node::directory("mid", PathBuf::from("/r/mid"), vec![leaf]);
        let root = Node::directory(
            "r",
            PathBuf::from("/r"),
            vec![mid, Node::file("y", PathBuf::from("/r/y"), 1)],
        );
        let mut s = ScanSession::new();
        s.result = Some(ScanResult {
            root,
            ext_stats: HashMap::new(),
            top_files: Vec::new(),
            scanned_paths: vec![PathBuf::from("/r")],
            files: 2,
            dirs: 2,
            bytes_scanned: 6,
            elapsed: Duration::ZERO,
            finished_at: Local::now(),
        });
        s.phase = Phase::Done;
        s
    }

    #[test]
    fn focus_defaults_to_root() {
        let s = session_with_tree();
        assert_eq!(s.focused_node().unwrap().path, PathBuf::from("/r"));
    }

    #[test]
    fn focus_only_accepts_directories() {
        let mut s = session_with_tree();
        assert!(!s.focus_on(Path::new("/r/y")));
        assert!(!s.focus_on(Path::new("/elsewhere")));
        assert!(s.focus_on(Path::new("/r/mid/leaf")));
        assert_eq!(s.focused_node().unwrap().name, "leaf");
    }

    #[test]
    fn back_forward_and_up() {
        let mut s = session_with_tree();
        assert!(s.focus_on(Path::new("/r/mid")));
        assert!(s.focus_on(Path::new("/r/mid/leaf")));

        assert!(s.go_back());
        assert_eq!(s.focused_node().unwrap().path, PathBuf::from("/r/mid"));
        assert!(s.go_forward());
        assert_eq!(s.focused_node().unwrap().path, PathBuf::from("/r/mid/leaf"));
        assert!(!s.go_forward());

        assert!(s.go_up());
        assert_eq!(s.focused_node().unwrap().path, PathBuf::from("/r/mid"));
        assert!(s.go_up());
        assert_eq!(s.focused_node().unwrap().path, PathBuf::from("/r"));
        assert!(!s.go_up());
    }

    #[test]
    fn history_is_capped() {
        let mut s = session_with_tree();
        for _ in 0..(MAX_NAV_HISTORY + 10) {
            s.focus_on(Path::new("/r/mid"));
            s.focus_on(Path::new("/r/mid/leaf"));
        }
        assert_eq!(s.back.len(), MAX_NAV_HISTORY);
    }

    #[test]
    fn idle_session_has_nothing_to_show() {
        let mut s = ScanSession::new();
        assert!(s.focused_node().is_none());
        assert!(!s.process_scan_messages());
        assert!(!s.go_up());
        assert_eq!(s.percent(), None);
    }
}

/// Recursive, bounded-retention directory walker.
///
/// Each root is walked depth-first by one [`Walker`]. A directory is only
/// finished once every sub-directory below it has been finished, so its
/// size and its overflow entry are computed from final child sizes.
///
/// # Retention
///
/// Every directory keeps a [`TopK`] of its largest immediate files. Files
/// that do not make the cut, or get evicted later, are tallied into a single
/// overflow entry, so `dir.size == sum(children)` holds at every level while
/// fan-out stays bounded by `top_files_per_dir + subdirs + 1`.
///
/// # Aggregates
///
/// The extension histogram and the global largest-files selection are kept
/// per walker and merged by the caller, so parallel roots never share a heap.
use super::options::ScanOptions;
use super::progress::Reporter;
use super::top_k::{Rank, Ranked, TopK};
use super::Cancellation;
use crate::model::{display_name, ExtStat, Node, NO_EXTENSION};
use compact_str::CompactString;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Scan-wide state every walker reports into.
pub(crate) struct WalkContext<'a> {
    pub options: &'a ScanOptions,
    pub reporter: &'a Reporter<'a>,
    pub cancel: &'a Cancellation<'a>,
}

/// Per-branch aggregates, merged once all roots are done.
pub(crate) struct Aggregates {
    pub ext_stats: HashMap<String, ExtStat>,
    pub top_files: TopK<PathBuf>,
}

impl Aggregates {
    pub(crate) fn new(global_cap: usize) -> Self {
        Self {
            ext_stats: HashMap::new(),
            top_files: TopK::new(global_cap),
        }
    }

    pub(crate) fn merge(&mut self, other: Aggregates) {
        for (ext, stat) in other.ext_stats {
            let entry = self.ext_stats.entry(ext).or_default();
            entry.bytes += stat.bytes;
            entry.count += stat.count;
        }
        self.top_files.merge(other.top_files);
    }
}

/// Output of walking one root.
pub(crate) struct RootScan {
    pub node: Node,
    pub aggregates: Aggregates,
}

/// Walk `root` to completion (or until cancellation is observed).
pub(crate) fn scan_root(ctx: &WalkContext<'_>, root_index: usize, root: &Path) -> RootScan {
    let mut walker = Walker {
        ctx,
        root_index,
        seq: 0,
        aggregates: Aggregates::new(ctx.options.global_top_files),
        visited: HashSet::new(),
    };
    if ctx.options.follow_symlinks {
        if let Ok(canonical) = fs::canonicalize(root) {
            walker.visited.insert(canonical);
        }
    }

    let node = walker.scan_dir(root.to_path_buf());
    debug!(
        root = %root.display(),
        size = node.size,
        files_seen = walker.seq,
        "Root walk finished"
    );
    RootScan {
        node,
        aggregates: walker.aggregates,
    }
}

/// A file retained by its directory's selection.
struct LocalFile {
    name: CompactString,
    path: PathBuf,
}

enum Entry {
    Dir,
    File(u64),
    Skip,
}

struct Walker<'c, 'a> {
    ctx: &'c WalkContext<'a>,
    root_index: usize,
    /// Files seen so far in this root; doubles as the tie-break sequence.
    seq: u64,
    aggregates: Aggregates,
    /// Canonical directories already entered (symlink-following only).
    visited: HashSet<PathBuf>,
}

impl Walker<'_, '_> {
    fn scan_dir(&mut self, dir: PathBuf) -> Node {
        if self.ctx.cancel.poll() {
            return Node::empty_directory(dir);
        }

        let names = match list_dir(&dir) {
            Ok(names) => names,
            Err(err) => {
                debug!(path = %dir.display(), error = %err, "Cannot list directory");
                return Node::empty_directory(dir);
            }
        };

        let mut subdirs: Vec<Node> = Vec::new();
        let mut local: TopK<LocalFile> = TopK::new(self.ctx.options.top_files_per_dir);
        let mut folded_files: u64 = 0;
        let mut folded_bytes: u64 = 0;

        for name in names {
            if self.ctx.cancel.poll() {
                break;
            }
            let path = dir.join(&name);

            match self.classify(&path) {
                Entry::Skip => {}
                Entry::Dir => {
                    self.ctx.reporter.add_dir();
                    subdirs.push(self.scan_dir(path));
                }
                Entry::File(size) => {
                    let rank = self.record_file(&name, &path, size);
                    let entry = Ranked {
                        rank,
                        item: LocalFile {
                            name: CompactString::new(name.to_string_lossy()),
                            path,
                        },
                    };
                    if let Some(dropped) = local.push(entry) {
                        folded_files += 1;
                        folded_bytes += dropped.rank.size;
                    }
                }
            }

            self.ctx.reporter.tick(&dir);
        }

        let mut children = subdirs;
        children.extend(
            local
                .into_sorted_vec()
                .into_iter()
                .map(|r| Node::file(r.item.name, r.item.path, r.rank.size)),
        );
        if folded_files > 0 && folded_bytes > 0 {
            children.push(Node::overflow(&dir, folded_files, folded_bytes));
        }

        Node::directory(display_name(&dir), dir, children)
    }

    /// Stat one entry. Anything that cannot be stat-ed is skipped silently.
    fn classify(&mut self, path: &Path) -> Entry {
        let follow = self.ctx.options.follow_symlinks;
        let metadata = if follow {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        };
        let metadata = match metadata {
            Ok(m) => m,
            Err(err) => {
                trace!(path = %path.display(), error = %err, "Skipping entry");
                return Entry::Skip;
            }
        };

        if metadata.file_type().is_symlink() {
            return Entry::Skip;
        }
        if !metadata.is_dir() {
            return Entry::File(metadata.len());
        }
        if follow {
            match fs::canonicalize(path) {
                Ok(canonical) => {
                    if !self.visited.insert(canonical) {
                        debug!(path = %path.display(), "Directory already visited, skipping");
                        return Entry::Skip;
                    }
                }
                Err(err) => {
                    trace!(path = %path.display(), error = %err, "Skipping entry");
                    return Entry::Skip;
                }
            }
        }
        Entry::Dir
    }

    /// Count a file into the scan-wide totals and this root's aggregates.
    fn record_file(&mut self, name: &OsString, path: &Path, size: u64) -> Rank {
        let rank = Rank {
            size,
            root: self.root_index,
            seq: self.seq,
        };
        self.seq += 1;

        self.ctx.reporter.add_file(size);

        let stat = self.aggregates.ext_stats.entry(extension_key(name)).or_default();
        stat.bytes += size;
        stat.count += 1;

        if self.aggregates.top_files.admits(&rank) {
            self.aggregates.top_files.push(Ranked {
                rank,
                item: path.to_path_buf(),
            });
        }
        rank
    }
}

/// Entry names of `dir`, sorted so the walk order does not depend on the
/// filesystem's listing order. Entries that fail mid-listing are dropped.
fn list_dir(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names: Vec<OsString> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    names.sort_unstable();
    Ok(names)
}

/// Lower-cased extension without the dot, or [`NO_EXTENSION`].
pub(crate) fn extension_key(name: &OsString) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_key_lowercases_and_strips_dot() {
        assert_eq!(extension_key(&OsString::from("Photo.JPG")), "jpg");
        assert_eq!(extension_key(&OsString::from("archive.tar.gz")), "gz");
    }

    #[test]
    fn extension_key_sentinel_for_missing_extension() {
        assert_eq!(extension_key(&OsString::from("Makefile")), NO_EXTENSION);
        assert_eq!(extension_key(&OsString::from(".bashrc")), NO_EXTENSION);
        assert_eq!(extension_key(&OsString::from("trailing.")), NO_EXTENSION);
    }

    #[test]
    fn aggregates_merge_sums_histograms() {
        let mut a = Aggregates::new(2);
        a.ext_stats.insert("rs".into(), ExtStat { bytes: 10, count: 1 });
        let mut b = Aggregates::new(2);
        b.ext_stats.insert("rs".into(), ExtStat { bytes: 5, count: 2 });
        b.ext_stats.insert("md".into(), ExtStat { bytes: 1, count: 1 });
        a.merge(b);
        assert_eq!(a.ext_stats["rs"], ExtStat { bytes: 15, count: 3 });
        assert_eq!(a.ext_stats["md"], ExtStat { bytes: 1, count: 1 });
    }
}

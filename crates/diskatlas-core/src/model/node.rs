/// A single node in the owned scan tree.
///
/// Every directory owns its children outright; there are no parent links,
/// no shared nodes and no arena. The tree is assembled bottom-up by the
/// scanner and never mutated once handed to the caller.
use compact_str::{format_compact, CompactString};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Separator used to join root paths in the synthetic multi-root node.
pub const ROOT_PATH_SEPARATOR: &str = ";";

/// Display name of the synthetic node wrapping several scan roots.
pub const MULTI_ROOT_NAME: &str = "This computer";

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A regular file that was retained individually.
    File,
    /// A directory (possibly unreadable, in which case it is empty).
    Directory,
    /// Files of one directory that did not make the per-directory cut,
    /// folded into a single entry. Holds the number of folded files.
    Overflow { files: u64 },
    /// The synthetic parent of a multi-root scan.
    ScanRoot,
}

/// A file, a directory, or one of the two synthetic aggregate entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Base name, or a synthetic label for aggregate entries.
    pub name: CompactString,

    /// Absolute path. Overflow nodes carry their directory's path; the
    /// multi-root node carries the `;`-joined list of roots.
    pub path: PathBuf,

    /// `true` for directories and the multi-root node.
    pub is_dir: bool,

    /// Logical size in bytes. For directories this is always the sum of
    /// `children` sizes.
    pub size: u64,

    /// Owned children. Always empty for files and overflow entries.
    pub children: Vec<Node>,

    pub kind: NodeKind,
}

impl Node {
    /// Create a leaf for a retained file.
    pub fn file(name: impl Into<CompactString>, path: PathBuf, size: u64) -> Self {
        Self {
            name: name.into(),
            path,
            is_dir: false,
            size,
            children: Vec::new(),
            kind: NodeKind::File,
        }
    }

    /// Create a directory node whose size is the sum of its children.
    pub fn directory(name: impl Into<CompactString>, path: PathBuf, children: Vec<Node>) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            path,
            is_dir: true,
            size,
            children,
            kind: NodeKind::Directory,
        }
    }

    /// Directory that could not be listed, or whose scan was abandoned
    /// before it started.
    pub fn empty_directory(path: PathBuf) -> Self {
        Self::directory(display_name(&path), path, Vec::new())
    }

    /// The aggregate entry standing in for `files` unretained files of the
    /// directory at `dir_path`, totalling `bytes`.
    pub fn overflow(dir_path: &Path, files: u64, bytes: u64) -> Self {
        Self {
            name: format_compact!("{files} other files"),
            path: dir_path.to_path_buf(),
            is_dir: false,
            size: bytes,
            children: Vec::new(),
            kind: NodeKind::Overflow { files },
        }
    }

    /// The synthetic parent of several independently scanned roots.
    pub fn scan_root(roots: &[PathBuf], children: Vec<Node>) -> Self {
        let mut joined = OsString::new();
        for (i, root) in roots.iter().enumerate() {
            if i > 0 {
                joined.push(ROOT_PATH_SEPARATOR);
            }
            joined.push(root.as_os_str());
        }
        let mut node = Self::directory(MULTI_ROOT_NAME, PathBuf::from(joined), children);
        node.kind = NodeKind::ScanRoot;
        node
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self.kind, NodeKind::Overflow { .. })
    }

    pub fn is_scan_root(&self) -> bool {
        self.kind == NodeKind::ScanRoot
    }

    /// Number of files represented by this subtree, including the files
    /// folded into overflow entries.
    pub fn file_count(&self) -> u64 {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Overflow { files } => files,
            NodeKind::Directory | NodeKind::ScanRoot => {
                self.children.iter().map(Node::file_count).sum()
            }
        }
    }

    /// Percentage of `total` occupied by this node (0.0 when `total` is 0).
    pub fn percent_of(&self, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.size as f64 / total as f64 * 100.0
    }

    /// Children sorted by size descending; equal sizes keep directories
    /// ahead of files and otherwise keep the stored order.
    pub fn children_by_size(&self) -> Vec<&Node> {
        let mut children: Vec<&Node> = self.children.iter().collect();
        children.sort_by(|a, b| b.size.cmp(&a.size).then(b.is_dir.cmp(&a.is_dir)));
        children
    }

    /// The positive-size children worth showing in a view, largest first,
    /// capped at `limit`.
    pub fn top_children(&self, limit: usize) -> Vec<&Node> {
        let mut children = self.children_by_size();
        children.retain(|c| c.size > 0);
        children.truncate(limit);
        children
    }

    /// Locate the node with the given path in this subtree.
    ///
    /// Overflow entries share their directory's path, so the directory
    /// itself is the one returned.
    pub fn find(&self, path: &Path) -> Option<&Node> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Depth-first pre-order iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Identity is the path plus the node kind, so an overflow entry never
/// compares equal to the directory it belongs to.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }
}

impl Eq for Node {}

/// Pre-order walk returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Base name of a path, falling back to the whole path for roots like `/`.
pub fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let sub = Node::directory(
            "sub",
            PathBuf::from("/t/sub"),
            vec![Node::file("c.txt", PathBuf::from("/t/sub/c.txt"), 500)],
        );
        Node::directory(
            "t",
            PathBuf::from("/t"),
            vec![
                sub,
                Node::file("a.txt", PathBuf::from("/t/a.txt"), 1000),
                Node::file("b.txt", PathBuf::from("/t/b.txt"), 2000),
                Node::overflow(Path::new("/t"), 3, 30),
            ],
        )
    }

    #[test]
    fn directory_size_is_sum_of_children() {
        let root = sample();
        assert_eq!(root.size, 3530);
        assert_eq!(root.children[0].size, 500);
    }

    #[test]
    fn file_count_includes_folded_files() {
        assert_eq!(sample().file_count(), 6);
    }

    #[test]
    fn overflow_is_named_and_not_a_directory() {
        let o = Node::overflow(Path::new("/x"), 20, 210);
        assert_eq!(o.name, "20 other files");
        assert!(!o.is_dir);
        assert!(o.is_overflow());
        assert!(o.children.is_empty());
    }

    #[test]
    fn overflow_never_equals_its_directory() {
        let dir = Node::empty_directory(PathBuf::from("/x"));
        let o = Node::overflow(Path::new("/x"), 1, 1);
        assert_ne!(dir, o);
        assert_eq!(dir, Node::empty_directory(PathBuf::from("/x")));
    }

    #[test]
    fn scan_root_joins_paths_and_sums_sizes() {
        let a = Node::directory(
            "a",
            PathBuf::from("/a"),
            vec![Node::file("f", PathBuf::from("/a/f"), 7)],
        );
        let b = Node::directory(
            "b",
            PathBuf::from("/b"),
            vec![Node::file("g", PathBuf::from("/b/g"), 5)],
        );
        let root = Node::scan_root(&[PathBuf::from("/a"), PathBuf::from("/b")], vec![a, b]);
        assert!(root.is_scan_root());
        assert!(root.is_dir);
        assert_eq!(root.size, 12);
        assert_eq!(root.path, PathBuf::from("/a;/b"));
        assert_eq!(root.name, MULTI_ROOT_NAME);
    }

    #[test]
    fn top_children_skips_empty_and_caps() {
        let mut root = sample();
        root.children.push(Node::file("zero", PathBuf::from("/t/zero"), 0));
        let top = root.top_children(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b.txt");
        assert_eq!(top[1].name, "a.txt");
        assert!(root.top_children(100).iter().all(|c| c.size > 0));
    }

    #[test]
    fn find_descends_into_directories() {
        let root = sample();
        let c = root.find(Path::new("/t/sub/c.txt")).map(|n| n.size);
        assert_eq!(c, Some(500));
        assert!(root.find(Path::new("/nope")).is_none());
        assert_eq!(root.find(Path::new("/t")).map(|n| n.kind), Some(NodeKind::Directory));
    }

    #[test]
    fn find_returns_files_at_any_level() {
        let root = sample();
        let a = root.find(Path::new("/t/a.txt")).unwrap();
        assert_eq!(a.kind, NodeKind::File);
        assert_eq!(a.size, 1000);
        let c = root.find(Path::new("/t/sub/c.txt")).unwrap();
        assert_eq!(c.kind, NodeKind::File);
    }

    #[test]
    fn find_prefers_a_directory_over_its_overflow_entry() {
        let sub = Node::directory(
            "sub",
            PathBuf::from("/t/sub"),
            vec![Node::overflow(Path::new("/t/sub"), 2, 9)],
        );
        let root = Node::directory("t", PathBuf::from("/t"), vec![sub]);
        let found = root.find(Path::new("/t/sub")).unwrap();
        assert_eq!(found.kind, NodeKind::Directory);
        assert_eq!(found.size, 9);
    }

    #[test]
    fn descendants_visits_every_node_once() {
        let root = sample();
        let names: Vec<&str> = root.descendants().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["t", "sub", "c.txt", "a.txt", "b.txt", "3 other files"]);
    }

    #[test]
    fn display_name_falls_back_to_full_path() {
        assert_eq!(display_name(Path::new("/usr/lib")), "lib");
        assert_eq!(display_name(Path::new("/")), "/");
    }
}

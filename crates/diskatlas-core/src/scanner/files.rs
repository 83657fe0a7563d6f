/// Lazy enumeration of every regular file under a set of roots.
///
/// Unlike [`Scanner`](super::Scanner) this builds no tree and keeps no
/// aggregates; it simply yields paths as `jwalk` finds them, for callers
/// that want to stream files into their own processing.
use std::iter::FusedIterator;
use std::path::PathBuf;

type PathStream = Box<dyn Iterator<Item = PathBuf>>;

/// Iterator returned by [`iter_files`].
pub struct FileIter<C> {
    inner: PathStream,
    cancel: C,
    stopped: bool,
}

/// Walk `roots` in order and yield the path of every regular file found.
///
/// `cancel` is polled before each item; once it returns `true` the iterator
/// is exhausted for good. Unreadable entries are skipped. Symbolic links are
/// neither followed nor yielded.
pub fn iter_files<C>(roots: &[PathBuf], cancel: C) -> FileIter<C>
where
    C: Fn() -> bool,
{
    let roots: Vec<PathBuf> = roots
        .iter()
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
        .collect();

    let inner = roots.into_iter().flat_map(|root| {
        jwalk::WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .parallelism(jwalk::Parallelism::Serial)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path())
    });

    FileIter {
        inner: Box::new(inner),
        cancel,
        stopped: false,
    }
}

impl<C: Fn() -> bool> Iterator for FileIter<C> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if self.stopped {
            return None;
        }
        if (self.cancel)() {
            self.stopped = true;
            return None;
        }
        let next = self.inner.next();
        if next.is_none() {
            self.stopped = true;
        }
        next
    }
}

impl<C: Fn() -> bool> FusedIterator for FileIter<C> {}

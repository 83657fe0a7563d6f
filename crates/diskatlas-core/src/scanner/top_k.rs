/// Bounded "largest K" selection backed by a min-heap.
///
/// The heap root is always the weakest retained entry, so each offer costs
/// one comparison against the root and, on acceptance, one `O(log K)`
/// replacement. Memory stays at `K` entries however many files are seen.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Ordering key: bigger files rank higher; for equal sizes the file seen
/// first ranks higher, which keeps selection deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub size: u64,
    /// Index of the scan root the file came from.
    pub root: usize,
    /// Encounter position within that root's walk.
    pub seq: u64,
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| (other.root, other.seq).cmp(&(self.root, self.seq)))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A payload tagged with its [`Rank`]. Comparisons only look at the rank.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub rank: Rank,
    pub item: T,
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl<T> Eq for Ranked<T> {}

impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct TopK<T> {
    cap: usize,
    heap: BinaryHeap<Reverse<Ranked<T>>>,
}

impl<T> TopK<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap.min(1024)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether an entry with `rank` would currently be retained.
    ///
    /// Lets callers skip building an expensive payload for entries that
    /// would be rejected anyway.
    pub fn admits(&self, rank: &Rank) -> bool {
        if self.heap.len() < self.cap {
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(weakest)) => *rank > weakest.rank,
            None => false,
        }
    }

    /// Offer an entry. Returns whichever entry did not make the cut: the
    /// offered one if it was rejected, or the evicted weakest one.
    pub fn push(&mut self, entry: Ranked<T>) -> Option<Ranked<T>> {
        if !self.admits(&entry.rank) {
            return Some(entry);
        }
        self.heap.push(Reverse(entry));
        if self.heap.len() > self.cap {
            return self.heap.pop().map(|Reverse(evicted)| evicted);
        }
        None
    }

    /// Fold another selection into this one, keeping the best `cap`.
    pub fn merge(&mut self, other: TopK<T>) {
        for Reverse(entry) in other.heap {
            self.push(entry);
        }
    }

    /// Retained entries, best first.
    pub fn into_sorted_vec(self) -> Vec<Ranked<T>> {
        let mut entries: Vec<Ranked<T>> = self.heap.into_iter().map(|Reverse(e)| e).collect();
        entries.sort_unstable_by(|a, b| b.cmp(a));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(size: u64, seq: u64) -> Ranked<u64> {
        Ranked {
            rank: Rank { size, root: 0, seq },
            item: seq,
        }
    }

    #[test]
    fn keeps_the_largest_entries() {
        let mut top = TopK::new(3);
        for (seq, size) in [5, 1, 9, 3, 7, 2].into_iter().enumerate() {
            top.push(ranked(size, seq as u64));
        }
        let sizes: Vec<u64> = top.into_sorted_vec().iter().map(|r| r.rank.size).collect();
        assert_eq!(sizes, [9, 7, 5]);
    }

    #[test]
    fn push_reports_what_was_dropped() {
        let mut top = TopK::new(2);
        assert!(top.push(ranked(10, 0)).is_none());
        assert!(top.push(ranked(20, 1)).is_none());
        // Rejected outright.
        assert_eq!(top.push(ranked(5, 2)).map(|r| r.rank.size), Some(5));
        // Accepted, evicting the 10.
        assert_eq!(top.push(ranked(30, 3)).map(|r| r.rank.size), Some(10));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn ties_prefer_earlier_entries() {
        let mut top = TopK::new(2);
        for seq in 0..5 {
            top.push(ranked(100, seq));
        }
        let seqs: Vec<u64> = top.into_sorted_vec().iter().map(|r| r.item).collect();
        assert_eq!(seqs, [0, 1]);
    }

    #[test]
    fn ties_across_roots_prefer_the_earlier_root() {
        let mut a = TopK::new(1);
        a.push(Ranked {
            rank: Rank { size: 8, root: 1, seq: 0 },
            item: "second-root",
        });
        let mut b = TopK::new(1);
        b.push(Ranked {
            rank: Rank { size: 8, root: 0, seq: 99 },
            item: "first-root",
        });
        a.merge(b);
        let kept: Vec<&str> = a.into_sorted_vec().iter().map(|r| r.item).collect();
        assert_eq!(kept, ["first-root"]);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut top = TopK::new(0);
        assert!(!top.admits(&Rank { size: u64::MAX, root: 0, seq: 0 }));
        assert_eq!(top.push(ranked(1, 0)).map(|r| r.rank.size), Some(1));
        assert!(top.is_empty());
    }

    #[test]
    fn merge_keeps_global_best() {
        let mut a = TopK::new(3);
        let mut b = TopK::new(3);
        for (seq, size) in [1, 50, 3].into_iter().enumerate() {
            a.push(ranked(size, seq as u64));
        }
        for (seq, size) in [40, 2, 60].into_iter().enumerate() {
            b.push(ranked(size, 10 + seq as u64));
        }
        a.merge(b);
        let sizes: Vec<u64> = a.into_sorted_vec().iter().map(|r| r.rank.size).collect();
        assert_eq!(sizes, [60, 50, 40]);
    }
}

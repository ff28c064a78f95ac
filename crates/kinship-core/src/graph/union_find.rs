//! Growable union-find over dense node indices.
//!
//! Slots are appended as nodes join the graph; unions happen at edge
//! insertion. Path compression runs on the mutable `union` path only, so
//! read-only queries walk parent links without rewriting them. Union by rank
//! keeps those walks logarithmic.

use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

// Indexing is safe here: callers only pass indices handed out by `push`.
#[allow(clippy::indexing_slicing)]
impl UnionFind {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    /// Add a new singleton set and return its index.
    pub fn push(&mut self) -> usize {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.rank.push(0);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `x` without compressing the path.
    #[must_use]
    pub fn root(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    /// Root of `x`, compressing the path behind it.
    pub fn find(&mut self, x: usize) -> usize {
        let root = self.root(x);
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`. Returns `false` if they were
    /// already joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);

        if rx == ry {
            return false;
        }

        match self.rank[rx].cmp(&self.rank[ry]) {
            Ordering::Less => self.parent[rx] = ry,
            Ordering::Greater => self.parent[ry] = rx,
            Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] = self.rank[rx].saturating_add(1);
            }
        }
        true
    }

    #[must_use]
    pub fn same_set(&self, x: usize, y: usize) -> bool {
        self.root(x) == self.root(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slots_are_singletons() {
        let mut uf = UnionFind::new();
        let a = uf.push();
        let b = uf.push();
        assert_eq!(uf.len(), 2);
        assert!(!uf.same_set(a, b));
        assert_eq!(uf.root(a), a);
    }

    #[test]
    fn union_is_transitive() {
        let mut uf = UnionFind::new();
        let ids: Vec<usize> = (0..4).map(|_| uf.push()).collect();
        assert!(uf.union(ids[0], ids[1]));
        assert!(uf.union(ids[2], ids[3]));
        assert!(!uf.same_set(ids[1], ids[2]));
        assert!(uf.union(ids[1], ids[2]));
        assert!(uf.same_set(ids[0], ids[3]));
    }

    #[test]
    fn repeated_union_reports_no_change() {
        let mut uf = UnionFind::new();
        let a = uf.push();
        let b = uf.push();
        assert!(uf.union(a, b));
        assert!(!uf.union(b, a));
        assert!(!uf.union(a, a));
    }

    #[test]
    fn find_compresses_to_root() {
        let mut uf = UnionFind::new();
        let ids: Vec<usize> = (0..8).map(|_| uf.push()).collect();
        for pair in ids.windows(2) {
            uf.union(pair[0], pair[1]);
        }
        let root = uf.find(ids[7]);
        for &id in &ids {
            assert_eq!(uf.root(id), root);
        }
    }
}

//! Undirected social graph with incremental connectivity.
//!
//! # Overview
//!
//! A [`Graph`] maps opaque string labels to a set of neighbour labels. It is
//! backed by a petgraph [`UnGraph`] so that adjacency is symmetric by
//! construction: a single undirected edge is visible from both endpoints.
//!
//! Duplicate edges are collapsed at insertion time, and a self-loop makes a
//! node its own neighbour exactly once, so neighbour lists always have set
//! semantics.
//!
//! ## Connectivity
//!
//! A [`UnionFind`] runs parallel to the node set, one slot per node, and is
//! updated on every [`Graph::add_edge`]. Component queries read the union-find
//! directly and are never stale with respect to inserted edges.
//!
//! ## Cache Invalidation
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the node and edge sets.
//! Analyses computed from a graph remember this hash so they can detect being
//! applied to a different graph.
//!
//! ## Typical Usage
//!
//! ```rust
//! use kinship_core::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_edge("alice", "bob");
//! graph.add_edge("bob", "carol");
//! graph.add_node("dave");
//!
//! assert_eq!(graph.get_neighbors("bob").unwrap(), vec!["alice", "carol"]);
//! assert_eq!(graph.connected_components().len(), 2);
//! ```

pub mod union_find;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, trace};

use crate::error::GraphError;
pub use union_find::UnionFind;

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected, unweighted social graph keyed by string labels.
///
/// Node indices are dense and stable: nodes are never removed, so the
/// `NodeIndex` handed out for a label stays valid for the life of the graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: UnGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    components: UnionFind,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node with no neighbours if `label` is not present yet.
    ///
    /// Returns the node's index whether or not it was newly created.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(label) {
            return idx;
        }

        let idx = self.inner.add_node(label.to_string());
        let slot = self.components.push();
        debug_assert_eq!(slot, idx.index(), "union-find slots track node indices");
        self.node_map.insert(label.to_string(), idx);
        trace!(label, index = idx.index(), "node added");
        idx
    }

    /// Connect `u` and `v`, creating either endpoint if needed.
    ///
    /// Adding an edge that already exists is a no-op. `u == v` records a
    /// self-loop, which makes the node its own neighbour but leaves the
    /// component structure untouched.
    pub fn add_edge(&mut self, u: &str, v: &str) {
        // Resolve both endpoints before touching adjacency.
        let a = self.add_node(u);
        let b = self.add_node(v);

        if self.inner.find_edge(a, b).is_none() {
            self.inner.add_edge(a, b, ());
            trace!(u, v, "edge added");
        }

        if a != b {
            self.components.union(a.index(), b.index());
        }
    }

    /// Return `true` if `label` has been added.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.node_map.contains_key(label)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of distinct undirected edges. A self-loop counts once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Return `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Look up the `NodeIndex` for a label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    /// Return the label stored at `idx`.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.inner.node_weight(idx).map(String::as_str)
    }

    /// All labels in lexicographic order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.inner.node_weights().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Borrow the underlying petgraph graph for read-only traversal.
    #[must_use]
    pub const fn as_petgraph(&self) -> &UnGraph<String, ()> {
        &self.inner
    }

    /// Neighbours of `label`, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `label` was never added.
    pub fn get_neighbors(&self, label: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.require(label)?;
        let set: BTreeSet<&str> = self
            .inner
            .neighbors(idx)
            .filter_map(|n| self.label(n))
            .collect();
        Ok(set.into_iter().map(str::to_string).collect())
    }

    /// Number of distinct neighbours of `label`. A self-loop counts once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `label` was never added.
    pub fn degree(&self, label: &str) -> Result<usize, GraphError> {
        let idx = self.require(label)?;
        Ok(self.inner.neighbors(idx).count())
    }

    // -----------------------------------------------------------------------
    // Connectivity
    // -----------------------------------------------------------------------

    /// Partition the node set into connected components.
    ///
    /// One set per union-find root. Sets are ordered by their smallest
    /// label so the output is deterministic.
    #[must_use]
    #[instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn connected_components(&self) -> Vec<BTreeSet<String>> {
        let mut by_root: HashMap<usize, BTreeSet<String>> = HashMap::new();
        for idx in self.inner.node_indices() {
            let root = self.components.root(idx.index());
            by_root
                .entry(root)
                .or_default()
                .insert(self.inner[idx].clone());
        }

        let mut components: Vec<BTreeSet<String>> = by_root.into_values().collect();
        components.sort_unstable_by(|a, b| a.first().cmp(&b.first()));
        debug!(count = components.len(), "connected components");
        components
    }

    /// Number of connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.inner
            .node_indices()
            .filter(|idx| self.components.root(idx.index()) == idx.index())
            .count()
    }

    /// Return `true` if a path of edges joins `u` and `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either label was never added.
    pub fn same_component(&self, u: &str, v: &str) -> Result<bool, GraphError> {
        let a = self.require(u)?;
        let b = self.require(v)?;
        Ok(self.components.same_set(a.index(), b.index()))
    }

    /// The component containing `label`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `label` was never added.
    pub fn component_of(&self, label: &str) -> Result<BTreeSet<String>, GraphError> {
        let idx = self.require(label)?;
        let root = self.components.root(idx.index());
        Ok(self
            .inner
            .node_indices()
            .filter(|other| self.components.root(other.index()) == root)
            .map(|other| self.inner[other].clone())
            .collect())
    }

    // -----------------------------------------------------------------------
    // Hashing
    // -----------------------------------------------------------------------

    /// BLAKE3 hash of the node and edge sets, independent of insertion order.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut edges: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in self.inner.edge_references() {
            let a = self.inner[edge.source()].as_str();
            let b = self.inner[edge.target()].as_str();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            edges.entry(lo).or_default().insert(hi);
        }

        let mut hasher = blake3::Hasher::new();
        for label in self.labels() {
            hasher.update(b"n\x00");
            hasher.update(label.as_bytes());
            hasher.update(b"\x00");
        }
        for (lo, his) in edges {
            for hi in his {
                hasher.update(b"e\x00");
                hasher.update(lo.as_bytes());
                hasher.update(b"\x00");
                hasher.update(hi.as_bytes());
                hasher.update(b"\x00");
            }
        }
        format!("blake3:{}", hasher.finalize())
    }

    fn require(&self, label: &str) -> Result<NodeIndex, GraphError> {
        self.node_index(label)
            .ok_or_else(|| GraphError::UnknownNode(label.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

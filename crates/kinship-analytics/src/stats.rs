//! Summary statistics for a friendship graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Total number of people (nodes).
//! - **edge_count**: Distinct undirected friendships, self-loops included.
//! - **self_loop_count**: Nodes listed as their own friend.
//! - **density**: `friendships / (n * (n - 1) / 2)`, counting only edges
//!   between distinct nodes. Zero for graphs with fewer than two nodes.
//! - **component_count**: Connected components, read from the graph's
//!   union-find.
//! - **largest_component**: Size of the biggest component.
//! - **isolated_count**: Nodes with no neighbours at all.
//! - **max_degree**: Highest number of distinct neighbours on one node.

use std::collections::BTreeSet;

use kinship_core::Graph;
use petgraph::visit::EdgeRef;
use serde::Serialize;

/// Summary statistics for a friendship graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loop_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub largest_component: usize,
    pub isolated_count: usize,
    pub max_degree: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let g = graph.as_petgraph();
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let self_loop_count = g
            .edge_references()
            .filter(|e| e.source() == e.target())
            .count();

        let components = graph.connected_components();
        let largest_component = components.iter().map(BTreeSet::len).max().unwrap_or(0);

        let isolated_count = g
            .node_indices()
            .filter(|&idx| g.neighbors(idx).next().is_none())
            .count();

        let max_degree = g
            .node_indices()
            .map(|idx| g.neighbors(idx).count())
            .max()
            .unwrap_or(0);

        Self {
            node_count,
            edge_count,
            self_loop_count,
            density: compute_density(node_count, edge_count - self_loop_count),
            component_count: components.len(),
            largest_component,
            isolated_count,
            max_degree,
        }
    }
}

fn compute_density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    let max_edges = (nodes * (nodes - 1)) as f64 / 2.0;
    edges as f64 / max_edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_stats() {
        let stats = GraphStats::from_graph(&Graph::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.component_count, 0);
        assert_eq!(stats.largest_component, 0);
        assert_eq!(stats.max_degree, 0);
    }

    #[test]
    fn triangle_with_tail_and_isolated() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        g.add_edge("B", "C");
        g.add_edge("A", "C");
        g.add_edge("C", "D");
        g.add_node("E");

        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.self_loop_count, 0);
        assert!((stats.density - 0.4).abs() < 1e-12); // 4 / 10
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.largest_component, 4);
        assert_eq!(stats.isolated_count, 1);
        assert_eq!(stats.max_degree, 3);
    }

    #[test]
    fn self_loops_do_not_count_toward_density() {
        let mut g = Graph::new();
        g.add_edge("A", "A");
        g.add_edge("A", "B");

        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.self_loop_count, 1);
        assert!((stats.density - 1.0).abs() < 1e-12);
        assert_eq!(stats.isolated_count, 0);
    }
}

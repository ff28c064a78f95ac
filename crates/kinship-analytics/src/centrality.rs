//! Degree and closeness centrality.
//!
//! # Overview
//!
//! Both metrics answer "how central is this person?" from a different angle:
//!
//! - **Degree centrality**: the fraction of everyone else a node is directly
//!   connected to, `|neighbours \ {self}| / (N - 1)`. A self-loop does not
//!   connect a node to anyone else, so it is left out and the score stays
//!   within `[0, 1]`.
//! - **Closeness centrality**: the inverse average hop distance from a node
//!   to everyone it can reach, `(|R| - 1) / Σ dist(u, v)`.
//!
//! Closeness is deliberately local to the node's component. A node in a tiny
//! isolated clique can score as highly as a node in the main component, since
//! unreachable nodes contribute nothing to the sum.
//!
//! Both functions return an empty map for an empty graph.

use std::collections::{HashMap, VecDeque};

use kinship_core::{Graph, GraphError};
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Degree Centrality
// ---------------------------------------------------------------------------

/// Degree centrality for every node.
///
/// Defined as `0.0` for every node when the graph has at most one node.
/// A self-loop is not counted.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn degree_centrality(graph: &Graph) -> HashMap<String, f64> {
    let g = graph.as_petgraph();
    let n = g.node_count();
    let denom = n.saturating_sub(1) as f64;

    g.node_indices()
        .map(|idx| {
            let score = if n <= 1 {
                0.0
            } else {
                g.neighbors(idx).filter(|&other| other != idx).count() as f64 / denom
            };
            (g[idx].clone(), score)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Closeness Centrality
// ---------------------------------------------------------------------------

/// Closeness centrality for every node, restricted to its reachable set.
///
/// Nodes that reach nobody else score `0.0`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn closeness_centrality(graph: &Graph) -> HashMap<String, f64> {
    let g = graph.as_petgraph();
    let mut scores = HashMap::with_capacity(g.node_count());
    let mut dist = vec![usize::MAX; g.node_count()];

    for source in g.node_indices() {
        let (reached, total) = bfs_distances(graph, source, &mut dist);
        let score = if reached <= 1 || total == 0 {
            0.0
        } else {
            (reached - 1) as f64 / total as f64
        };
        scores.insert(g[source].clone(), score);
    }

    debug!(scored = scores.len(), "closeness centrality computed");
    scores
}

/// BFS from `source`, returning `(reachable count including source, Σ dist)`.
///
/// `dist` is scratch space sized to the node count; it is reset on entry.
fn bfs_distances(graph: &Graph, source: NodeIndex, dist: &mut [usize]) -> (usize, usize) {
    let g = graph.as_petgraph();
    dist.fill(usize::MAX);
    dist[source.index()] = 0;

    let mut queue = VecDeque::from([source]);
    let mut reached = 0usize;
    let mut total = 0usize;

    while let Some(node) = queue.pop_front() {
        reached += 1;
        let d = dist[node.index()];
        total += d;
        for next in g.neighbors(node) {
            if dist[next.index()] == usize::MAX {
                dist[next.index()] = d + 1;
                queue.push_back(next);
            }
        }
    }

    (reached, total)
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Score for `label`, failing if the graph never contained it.
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] when `label` has no entry.
pub fn score_of(scores: &HashMap<String, f64>, label: &str) -> Result<f64, GraphError> {
    scores
        .get(label)
        .copied()
        .ok_or_else(|| GraphError::UnknownNode(label.to_string()))
}

/// Score for `label`, or `0.0` when it has no entry.
#[must_use]
pub fn score_or_zero(scores: &HashMap<String, f64>, label: &str) -> f64 {
    scores.get(label).copied().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-10;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    fn graph(edges: &[(&str, &str)]) -> Graph {
        let mut g = Graph::new();
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    #[test]
    fn empty_graph_yields_empty_maps() {
        let g = Graph::new();
        assert!(degree_centrality(&g).is_empty());
        assert!(closeness_centrality(&g).is_empty());
    }

    #[test]
    fn single_node_scores_zero() {
        let mut g = Graph::new();
        g.add_node("solo");
        assert_eq!(degree_centrality(&g)["solo"], 0.0);
        assert_eq!(closeness_centrality(&g)["solo"], 0.0);
    }

    #[test]
    fn single_self_loop_node_scores_zero() {
        let g = graph(&[("solo", "solo")]);
        assert_eq!(degree_centrality(&g)["solo"], 0.0);
        assert_eq!(closeness_centrality(&g)["solo"], 0.0);
    }

    #[test]
    fn degree_on_triangle_with_tail() {
        let g = graph(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "D")]);
        let dc = degree_centrality(&g);
        assert_approx_eq(dc["A"], 2.0 / 3.0);
        assert_approx_eq(dc["B"], 2.0 / 3.0);
        assert_approx_eq(dc["C"], 1.0);
        assert_approx_eq(dc["D"], 1.0 / 3.0);
    }

    #[test]
    fn self_loop_is_left_out_of_degree() {
        let g = graph(&[("A", "A"), ("A", "B")]);
        let dc = degree_centrality(&g);
        assert_approx_eq(dc["A"], 1.0);
        assert_approx_eq(dc["B"], 1.0);

        // Repeating the loop changes nothing.
        let g = graph(&[("A", "A"), ("A", "A"), ("A", "B"), ("B", "C")]);
        let dc = degree_centrality(&g);
        assert_approx_eq(dc["A"], 0.5);
        assert_approx_eq(dc["B"], 1.0);
    }

    #[test]
    fn closeness_on_path() {
        // A - B - C
        let g = graph(&[("A", "B"), ("B", "C")]);
        let cc = closeness_centrality(&g);
        assert_approx_eq(cc["B"], 1.0); // 2 / (1 + 1)
        assert_approx_eq(cc["A"], 2.0 / 3.0); // 2 / (1 + 2)
        assert_approx_eq(cc["C"], 2.0 / 3.0);
    }

    #[test]
    fn closeness_ignores_unreachable_nodes() {
        // Two disjoint edges: every node reaches exactly one other at distance 1.
        let g = graph(&[("A", "B"), ("C", "D")]);
        let cc = closeness_centrality(&g);
        for label in ["A", "B", "C", "D"] {
            assert_approx_eq(cc[label], 1.0);
        }
    }

    #[test]
    fn isolated_node_has_zero_closeness() {
        let mut g = graph(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "D")]);
        g.add_node("E");
        let cc = closeness_centrality(&g);
        assert_eq!(cc["E"], 0.0);
        // C reaches A, B, D at distance 1
        assert_approx_eq(cc["C"], 1.0);
        // D: C at 1, A and B at 2 → 3 / 5
        assert_approx_eq(cc["D"], 0.6);
    }

    #[test]
    fn lookups_distinguish_missing_from_zero() {
        let g = graph(&[("A", "B")]);
        let dc = degree_centrality(&g);
        assert_approx_eq(score_of(&dc, "A").expect("A is scored"), 1.0);
        assert_eq!(
            score_of(&dc, "Z"),
            Err(GraphError::UnknownNode("Z".to_string()))
        );
        assert_eq!(score_or_zero(&dc, "Z"), 0.0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("A", "C")]);
        assert_eq!(degree_centrality(&g), degree_centrality(&g));
        assert_eq!(closeness_centrality(&g), closeness_centrality(&g));
    }
}

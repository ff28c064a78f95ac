//! Community detection by synchronous label propagation.
//!
//! # Algorithm
//!
//! 1. Every node starts with its own label (N singleton communities).
//! 2. Each round, every node looks at the labels its neighbours held at the
//!    end of the previous round and adopts the plurality label. All nodes
//!    update at once, so the visiting order cannot affect the outcome.
//! 3. Nodes with no neighbours keep their own label.
//! 4. Stop when a round changes nothing, or after `max_rounds` rounds.
//!
//! ## Tie-break
//!
//! When several labels share the plurality, the node takes the label whose
//! originating node label is smallest in byte-wise string order. Since every
//! label starts life as a node label, this is a total order and the output
//! is fully reproducible.
//!
//! ## Oscillation
//!
//! Synchronous updates can flip-flop on bipartite structures (a lone edge
//! `A - B` swaps its two labels forever). When a round reproduces the
//! labelling from two rounds earlier, iteration stops right after that round
//! with `converged = false` and keeps its labels. The result therefore does
//! not depend on `max_rounds` once the cap is past the detection round.

use std::collections::{BTreeSet, HashMap};

use kinship_core::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Configuration for label propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPropagationConfig {
    /// Maximum number of synchronous rounds.
    /// Default: 100.
    pub max_rounds: usize,
}

impl Default for LabelPropagationConfig {
    fn default() -> Self {
        Self { max_rounds: 100 }
    }
}

/// Result of a label-propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityResult {
    /// Disjoint communities covering every node, ordered by smallest member.
    pub communities: Vec<BTreeSet<String>>,
    /// Number of rounds performed.
    pub rounds: usize,
    /// Whether a full round passed with no label change.
    pub converged: bool,
}

/// Partition the graph into communities.
///
/// An empty graph yields no communities, zero rounds, and `converged = true`.
#[must_use]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn detect_communities(graph: &Graph, config: &LabelPropagationConfig) -> CommunityResult {
    let g = graph.as_petgraph();
    let n = g.node_count();

    // Position of each node in label order; labels are compared by rank.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&a, &b| g.raw_nodes()[a].weight.cmp(&g.raw_nodes()[b].weight));
    let mut rank = vec![0usize; n];
    for (position, &idx) in order.iter().enumerate() {
        rank[idx] = position;
    }

    let mut labels: Vec<usize> = rank.clone();
    let mut previous: Option<Vec<usize>> = None;
    let mut rounds = 0;
    let mut converged = n == 0;
    let mut counts: HashMap<usize, usize> = HashMap::new();

    while !converged && rounds < config.max_rounds {
        rounds += 1;

        let next: Vec<usize> = g
            .node_indices()
            .map(|node| {
                counts.clear();
                for neighbor in g.neighbors(node) {
                    *counts.entry(labels[neighbor.index()]).or_insert(0) += 1;
                }
                plurality(&counts).unwrap_or(labels[node.index()])
            })
            .collect();

        if next == labels {
            converged = true;
            break;
        }

        if previous.as_ref() == Some(&next) {
            debug!(rounds, "label propagation oscillating, stopping early");
            labels = next;
            break;
        }

        previous = Some(std::mem::replace(&mut labels, next));
    }

    if !converged && rounds >= config.max_rounds {
        debug!(rounds, "label propagation reached the round cap");
    }

    let mut groups: HashMap<usize, BTreeSet<String>> = HashMap::new();
    for node in g.node_indices() {
        groups
            .entry(labels[node.index()])
            .or_default()
            .insert(g[node].clone());
    }

    let mut communities: Vec<BTreeSet<String>> = groups.into_values().collect();
    communities.sort_unstable_by(|a, b| a.first().cmp(&b.first()));
    debug!(count = communities.len(), rounds, converged, "communities detected");

    CommunityResult {
        communities,
        rounds,
        converged,
    }
}

/// Communities with the default configuration.
#[must_use]
pub fn label_propagation(graph: &Graph) -> Vec<BTreeSet<String>> {
    detect_communities(graph, &LabelPropagationConfig::default()).communities
}

/// Map every node label to the index of its community.
#[must_use]
pub fn membership(communities: &[BTreeSet<String>]) -> HashMap<String, usize> {
    communities
        .iter()
        .enumerate()
        .flat_map(|(idx, community)| community.iter().map(move |label| (label.clone(), idx)))
        .collect()
}

/// Most frequent label, ties broken by smallest label rank.
fn plurality(counts: &HashMap<usize, usize>) -> Option<usize> {
    counts
        .iter()
        .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
        .map(|(&label, _)| label)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

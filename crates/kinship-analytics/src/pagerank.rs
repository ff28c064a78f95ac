//! PageRank over the undirected friendship graph.
//!
//! # Overview
//!
//! PageRank measures influence: a person is influential when influential
//! people are friends with them. Each undirected edge is treated as a pair of
//! reciprocal directed edges, so a node's out-degree equals its degree.
//!
//! # Algorithm
//!
//! Damped power iteration:
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / degree(u)   for each neighbour u of v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Every node starts at `1/N`.
//!
//! ## Dangling Nodes
//!
//! A node with no neighbours would otherwise leak its rank. Its damped mass
//! `d * PR(u)` is spread uniformly across all `N` nodes instead, so the
//! vector keeps summing to one.
//!
//! ## Termination
//!
//! Iteration stops once the L1 norm of the rank delta drops below the
//! tolerance, or after `max_iter` rounds. Hitting the cap is not an error:
//! the last vector is returned with `converged = false`.
//!
//! # Output
//!
//! Returns a [`PageRankResult`] with per-node scores renormalised to sum to
//! exactly one, plus iteration metadata.

use std::collections::HashMap;

use kinship_core::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Tuning knobs for [`pagerank`], read from the `[pagerank]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Chance of walking to a friend rather than jumping anywhere (0.85).
    pub damping: f64,
    /// Stop once the summed absolute change per round falls below this (1e-6).
    pub tolerance: f64,
    /// Round cap (100).
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 100,
        }
    }
}

/// Scores plus how the power iteration ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRankResult {
    pub scores: HashMap<String, f64>,
    pub iterations: usize,
    /// `false` when `max_iter` ran out first.
    pub converged: bool,
}

/// Rank every node of `graph`.
///
/// An empty graph gives no scores, zero iterations and `converged = true`.
#[must_use]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn pagerank(graph: &Graph, config: &PageRankConfig) -> PageRankResult {
    let g = graph.as_petgraph();
    let n = g.node_count();

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let size = n as f64;
    let jump = (1.0 - config.damping) / size;

    // Degrees never change during iteration; resolve them once.
    let degrees: Vec<usize> = g.node_indices().map(|idx| g.neighbors(idx).count()).collect();

    let mut ranks = vec![size.recip(); n];
    let mut next = vec![0.0; n];

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        // Mass held by dangling nodes is shared by everyone this round.
        let dangling: f64 = degrees
            .iter()
            .zip(ranks.iter())
            .filter(|(deg, _)| **deg == 0)
            .map(|(_, rank)| rank)
            .sum();
        let teleport = config.damping.mul_add(dangling / size, jump);

        next.fill(teleport);

        for node in g.node_indices() {
            let idx = node.index();
            let degree = degrees[idx];
            if degree == 0 {
                continue;
            }
            let share = config.damping * ranks[idx] / degree as f64;
            for neighbor in g.neighbors(node) {
                next[neighbor.index()] += share;
            }
        }

        let moved: f64 = ranks.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut ranks, &mut next);

        if moved < config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(iterations, "PageRank converged");
    } else {
        warn!(
            iterations,
            tolerance = config.tolerance,
            "PageRank hit the iteration cap before converging"
        );
    }

    renormalize(&mut ranks);

    let scores = g
        .node_indices()
        .map(|idx| (g[idx].clone(), ranks[idx.index()]))
        .collect();

    PageRankResult {
        scores,
        iterations,
        converged,
    }
}

/// PageRank scores with the default configuration.
#[must_use]
pub fn pagerank_scores(graph: &Graph) -> HashMap<String, f64> {
    pagerank(graph, &PageRankConfig::default()).scores
}

/// Rescale `ranks` to sum to one, absorbing floating-point drift.
fn renormalize(ranks: &mut [f64]) {
    let total: f64 = ranks.iter().sum();
    if total.is_finite() && total > 0.0 {
        for r in ranks.iter_mut() {
            *r /= total;
        }
    }
}

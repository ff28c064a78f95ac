//! Friend recommendation by multi-signal score fusion.
//!
//! # Overview
//!
//! Candidates for a node are its friends-of-friends: nodes reachable through
//! exactly one intermediate friend, excluding the node itself and anyone it
//! is already connected to. Each candidate `c` is scored as
//!
//! ```text
//! score(c) = mutual   * |N(node) ∩ N(c)|
//!          + degree   * degree_centrality(c)
//!          + pagerank * pagerank(c)
//!          + community_bonus   if c shares node's community
//! ```
//!
//! Results are sorted by score descending; equal scores are ordered by
//! candidate label ascending.
//!
//! # Precomputed signals
//!
//! [`recommend_friends`] recomputes degree centrality, PageRank and
//! communities on every call. When recommending for many nodes, compute a
//! [`GraphAnalysis`] once and pass it to [`recommend_friends_with`]. The
//! analysis remembers the graph's content hash and is rejected if the graph
//! has changed since.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use kinship_core::Graph;
use kinship_core::error::ErrorCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::centrality::{degree_centrality, score_or_zero};
use crate::community::{CommunityResult, LabelPropagationConfig, detect_communities, membership};
use crate::pagerank::{PageRankConfig, PageRankResult, pagerank};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Weights for the recommendation formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendWeights {
    /// Per mutual friend. Default: 1.0.
    pub mutual: f64,
    /// Multiplier on the candidate's degree centrality. Default: 0.2.
    pub degree: f64,
    /// Multiplier on the candidate's PageRank. Default: 0.5.
    pub pagerank: f64,
    /// Flat bonus for sharing the query node's community. Default: 1.0.
    pub community_bonus: f64,
}

impl Default for RecommendWeights {
    fn default() -> Self {
        Self {
            mutual: 1.0,
            degree: 0.2,
            pagerank: 0.5,
            community_bonus: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Raw signal values behind a recommendation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub mutual_friends: usize,
    pub degree: f64,
    pub pagerank: f64,
    pub same_community: bool,
}

impl ScoreBreakdown {
    /// Weighted total of the signals.
    #[must_use]
    pub fn score(&self, weights: &RecommendWeights) -> f64 {
        let mut score = weights.mutual * self.mutual_friends as f64;
        score += weights.degree * self.degree;
        score += weights.pagerank * self.pagerank;
        if self.same_community {
            score += weights.community_bonus;
        }
        score
    }
}

/// One recommended friend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub candidate: String,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl From<Recommendation> for (String, f64) {
    fn from(rec: Recommendation) -> Self {
        (rec.candidate, rec.score)
    }
}

/// Errors from applying a precomputed analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The analysis was computed from a different graph.
    #[error("analysis is stale: computed for {expected}, graph is now {actual}")]
    Stale { expected: String, actual: String },
}

impl AnalysisError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Stale { .. } => ErrorCode::StaleAnalysis,
        }
    }
}

// ---------------------------------------------------------------------------
// GraphAnalysis
// ---------------------------------------------------------------------------

/// Global signals shared by every recommendation on one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphAnalysis {
    /// Degree centrality per node.
    pub degree: HashMap<String, f64>,
    /// PageRank per node.
    pub pagerank: HashMap<String, f64>,
    /// Community index per node.
    pub community: HashMap<String, usize>,
    /// Content hash of the graph these signals were computed from.
    pub content_hash: String,
}

impl GraphAnalysis {
    /// Compute all signals for `graph`.
    #[must_use]
    #[instrument(skip_all, fields(nodes = graph.node_count()))]
    pub fn compute(
        graph: &Graph,
        pagerank_config: &PageRankConfig,
        communities_config: &LabelPropagationConfig,
    ) -> Self {
        Self::from_results(
            graph,
            &pagerank(graph, pagerank_config),
            &detect_communities(graph, communities_config),
        )
    }

    /// Build the signals from PageRank and community runs already done on
    /// `graph`, so callers that also report those runs need not repeat them.
    #[must_use]
    pub fn from_results(
        graph: &Graph,
        ranks: &PageRankResult,
        groups: &CommunityResult,
    ) -> Self {
        Self {
            degree: degree_centrality(graph),
            pagerank: ranks.scores.clone(),
            community: membership(&groups.communities),
            content_hash: graph.content_hash(),
        }
    }

    /// Compute all signals with default configuration.
    #[must_use]
    pub fn with_defaults(graph: &Graph) -> Self {
        Self::compute(
            graph,
            &PageRankConfig::default(),
            &LabelPropagationConfig::default(),
        )
    }

    /// Check if this analysis was computed from `graph`.
    #[must_use]
    pub fn is_valid_for(&self, graph: &Graph) -> bool {
        self.content_hash == graph.content_hash()
    }

    fn same_community(&self, a: &str, b: &str) -> bool {
        match (self.community.get(a), self.community.get(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Recommend friends for `node`, recomputing every signal.
///
/// Returns an empty list when `node` is not in the graph or has no
/// friends-of-friends.
#[must_use]
pub fn recommend_friends(
    graph: &Graph,
    node: &str,
    weights: &RecommendWeights,
) -> Vec<Recommendation> {
    let mutual = mutual_friend_counts(graph, node);
    if mutual.is_empty() {
        return Vec::new();
    }

    let analysis = GraphAnalysis::with_defaults(graph);
    rank_candidates(&analysis, node, mutual, weights)
}

/// Recommend friends for `node` using precomputed signals.
///
/// # Errors
///
/// Returns [`AnalysisError::Stale`] if `analysis` was computed from a graph
/// with different content.
pub fn recommend_friends_with(
    analysis: &GraphAnalysis,
    graph: &Graph,
    node: &str,
    weights: &RecommendWeights,
) -> Result<Vec<Recommendation>, AnalysisError> {
    let actual = graph.content_hash();
    if analysis.content_hash != actual {
        return Err(AnalysisError::Stale {
            expected: analysis.content_hash.clone(),
            actual,
        });
    }

    let mutual = mutual_friend_counts(graph, node);
    if mutual.is_empty() {
        return Ok(Vec::new());
    }
    Ok(rank_candidates(analysis, node, mutual, weights))
}

/// Recommendations for every node, keyed by node label.
///
/// Signals are computed once and shared across all nodes.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn recommend_all(
    graph: &Graph,
    analysis: &GraphAnalysis,
    weights: &RecommendWeights,
) -> BTreeMap<String, Vec<Recommendation>> {
    graph
        .labels()
        .into_iter()
        .map(|node| {
            let mutual = mutual_friend_counts(graph, node);
            let recs = if mutual.is_empty() {
                Vec::new()
            } else {
                rank_candidates(analysis, node, mutual, weights)
            };
            (node.to_string(), recs)
        })
        .collect()
}

/// Friends-of-friends of `node` with their mutual-friend counts.
///
/// Empty when `node` is unknown or has no second-degree neighbours.
#[must_use]
pub fn mutual_friend_counts(graph: &Graph, node: &str) -> BTreeMap<String, usize> {
    let g = graph.as_petgraph();
    let Some(idx) = graph.node_index(node) else {
        return BTreeMap::new();
    };

    let friends: BTreeSet<_> = g.neighbors(idx).collect();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for &friend in &friends {
        for fof in g.neighbors(friend) {
            if fof == idx || friends.contains(&fof) {
                continue;
            }
            *counts.entry(g[fof].clone()).or_insert(0) += 1;
        }
    }

    counts
}

fn rank_candidates(
    analysis: &GraphAnalysis,
    node: &str,
    mutual: BTreeMap<String, usize>,
    weights: &RecommendWeights,
) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = mutual
        .into_iter()
        .map(|(candidate, mutual_friends)| {
            let breakdown = ScoreBreakdown {
                mutual_friends,
                degree: score_or_zero(&analysis.degree, &candidate),
                pagerank: score_or_zero(&analysis.pagerank, &candidate),
                same_community: analysis.same_community(node, &candidate),
            };
            Recommendation {
                score: breakdown.score(weights),
                candidate,
                breakdown,
            }
        })
        .collect();

    recs.sort_by(compare_recommendations);
    debug!(node, candidates = recs.len(), "recommendations ranked");
    recs
}

/// Score descending, then candidate label ascending.
fn compare_recommendations(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.candidate.cmp(&b.candidate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

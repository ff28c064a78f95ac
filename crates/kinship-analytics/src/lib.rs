#![forbid(unsafe_code)]
//! kinship-analytics library.
//!
//! Structural signals over a [`kinship_core::Graph`] and the recommender that
//! fuses them:
//!
//! - [`centrality`]: degree and closeness centrality.
//! - [`pagerank`]: damped power-iteration PageRank.
//! - [`community`]: synchronous label propagation.
//! - [`recommend`]: friend-of-friend scoring.
//! - [`stats`]: summary statistics.
//! - [`config`]: TOML-loadable parameters for all of the above.
//!
//! Every analyzer takes `&Graph` and is a pure function of it, so independent
//! analyzers (or recommendations for different nodes) can run on separate
//! threads against the same graph.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library errors, `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod centrality;
pub mod community;
pub mod config;
pub mod pagerank;
pub mod recommend;
pub mod stats;

pub use centrality::{closeness_centrality, degree_centrality};
pub use community::{detect_communities, label_propagation};
pub use config::AnalysisConfig;
pub use pagerank::{pagerank, pagerank_scores};
pub use recommend::{GraphAnalysis, Recommendation, RecommendWeights, recommend_friends};
pub use stats::GraphStats;

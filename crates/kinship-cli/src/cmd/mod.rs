pub mod centrality;
pub mod communities;
pub mod components;
pub mod neighbors;
pub mod pagerank;
pub mod recommend;
pub mod report;

use std::path::PathBuf;

use clap::Args;

/// Graph input shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Edge-list file (`node` or `node node` per line), or `-` for stdin.
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,
}

/// Label-sorted `(label, score)` rows.
pub(crate) fn sorted_rows(scores: &std::collections::HashMap<String, f64>) -> Vec<(&str, f64)> {
    let mut rows: Vec<(&str, f64)> = scores.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows
}

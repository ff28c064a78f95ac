//! `kin recommend`: friend-of-friend recommendations.
//!
//! - `kin recommend <graph> --node <N>`: ranked candidates for one node
//! - `kin recommend <graph>`: candidates for every node

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::anyhow;
use clap::Args;
use kinship_analytics::config::AnalysisConfig;
use kinship_analytics::recommend::{
    GraphAnalysis, Recommendation, recommend_all, recommend_friends_with,
};
use kinship_core::Graph;
use kinship_core::error::ErrorCode;
use serde::Serialize;

use super::InputArgs;
use crate::output::{OutputMode, fmt_score, pretty_section, render_mode, report};

/// Arguments for `kin recommend`.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only recommend for this node.
    #[arg(long)]
    pub node: Option<String>,

    /// Keep at most this many recommendations per node (overrides config).
    #[arg(long)]
    pub top: Option<usize>,
}

/// Recommendations for one node.
#[derive(Debug, Serialize)]
pub struct NodeRecommendations {
    pub node: String,
    pub recommendations: Vec<Recommendation>,
}

/// Recommendations for every node, keyed by label.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AllRecommendations {
    pub by_node: BTreeMap<String, Vec<Recommendation>>,
}

impl AllRecommendations {
    pub fn compute(
        graph: &Graph,
        analysis: &GraphAnalysis,
        config: &AnalysisConfig,
        top: Option<usize>,
    ) -> Self {
        let mut by_node = recommend_all(graph, analysis, &config.recommend.weights);
        if let Some(limit) = top {
            for recs in by_node.values_mut() {
                recs.truncate(limit);
            }
        }
        Self { by_node }
    }
}

fn summary(recs: &[Recommendation]) -> String {
    recs.iter()
        .map(|r| format!("{} ({})", r.candidate, fmt_score(r.score)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_all_text(all: &AllRecommendations, w: &mut dyn Write) -> io::Result<()> {
    for (node, recs) in &all.by_node {
        for rec in recs {
            writeln!(w, "{node} {} {}", rec.candidate, rec.score)?;
        }
    }
    Ok(())
}

pub fn write_all_pretty(all: &AllRecommendations, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Friend recommendations")?;
    for (node, recs) in &all.by_node {
        if recs.is_empty() {
            writeln!(w, "{node} → (none)")?;
        } else {
            writeln!(w, "{node} → {}", summary(recs))?;
        }
    }
    Ok(())
}

fn write_node_text(payload: &NodeRecommendations, w: &mut dyn Write) -> io::Result<()> {
    for rec in &payload.recommendations {
        writeln!(w, "{} {}", rec.candidate, rec.score)?;
    }
    Ok(())
}

fn write_node_pretty(payload: &NodeRecommendations, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Recommendations for {}", payload.node))?;
    if payload.recommendations.is_empty() {
        return writeln!(w, "(none)");
    }
    writeln!(
        w,
        "{:<4} {:<20} {:>8} {:>7} {:>8} {:>8} {:>5}",
        "#", "CANDIDATE", "SCORE", "MUTUAL", "DEGREE", "PAGERANK", "COMM"
    )?;
    for (i, rec) in payload.recommendations.iter().enumerate() {
        let b = &rec.breakdown;
        writeln!(
            w,
            "{:<4} {:<20} {:>8} {:>7} {:>8} {:>8} {:>5}",
            i + 1,
            rec.candidate,
            fmt_score(rec.score),
            b.mutual_friends,
            fmt_score(b.degree),
            fmt_score(b.pagerank),
            if b.same_community { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

/// Execute `kin recommend`.
pub fn run_recommend(
    args: &RecommendArgs,
    graph: &Graph,
    config: &AnalysisConfig,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let top = args.top.or(config.recommend.top);
    let analysis = GraphAnalysis::compute(graph, &config.pagerank, &config.communities);

    let Some(node) = args.node.as_deref() else {
        let all = AllRecommendations::compute(graph, &analysis, config, top);
        return render_mode(out, output, &all, write_all_text, write_all_pretty);
    };

    if !graph.contains(node) {
        return Err(report(
            output,
            ErrorCode::UnknownNode,
            anyhow!("unknown node: {node}"),
        ));
    }

    let mut recommendations =
        recommend_friends_with(&analysis, graph, node, &config.recommend.weights)
            .map_err(|e| report(output, e.code(), e.into()))?;
    if let Some(limit) = top {
        recommendations.truncate(limit);
    }

    let payload = NodeRecommendations {
        node: node.to_string(),
        recommendations,
    };
    render_mode(out, output, &payload, write_node_text, write_node_pretty)
}

//! `kin pagerank`: damped PageRank scores.

use std::io::{self, Write};

use kinship_analytics::pagerank::{PageRankConfig, PageRankResult, pagerank};
use kinship_core::Graph;
use serde::Serialize;

use super::sorted_rows;
use crate::output::{OutputMode, fmt_score, pretty_kv, pretty_section, render_mode};

#[derive(Debug, Serialize)]
pub struct ScoreRow {
    pub node: String,
    pub score: f64,
}

/// Report payload for `kin pagerank`.
#[derive(Debug, Serialize)]
pub struct PageRankReport {
    pub damping: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Highest score first, ties by label.
    pub scores: Vec<ScoreRow>,
}

impl PageRankReport {
    pub fn compute(graph: &Graph, config: &PageRankConfig) -> Self {
        Self::from_result(config.damping, &pagerank(graph, config))
    }

    pub fn from_result(damping: f64, result: &PageRankResult) -> Self {
        let mut scores: Vec<ScoreRow> = sorted_rows(&result.scores)
            .into_iter()
            .map(|(node, score)| ScoreRow {
                node: node.to_string(),
                score,
            })
            .collect();
        // Stable sort keeps label order among equal scores.
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            damping,
            iterations: result.iterations,
            converged: result.converged,
            scores,
        }
    }
}

pub fn write_pagerank_text(report: &PageRankReport, w: &mut dyn Write) -> io::Result<()> {
    for row in &report.scores {
        writeln!(w, "{} {}", row.node, row.score)?;
    }
    Ok(())
}

pub fn write_pagerank_pretty(report: &PageRankReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "PageRank")?;
    pretty_kv(w, "Damping", report.damping.to_string())?;
    pretty_kv(
        w,
        "Iterations",
        if report.converged {
            format!("{} (converged)", report.iterations)
        } else {
            format!("{} (cap reached)", report.iterations)
        },
    )?;
    writeln!(w)?;
    writeln!(w, "{:<4} {:<20} {:>10}", "#", "NODE", "SCORE")?;
    for (i, row) in report.scores.iter().enumerate() {
        writeln!(w, "{:<4} {:<20} {:>10}", i + 1, row.node, fmt_score(row.score))?;
    }
    Ok(())
}

/// Execute `kin pagerank`.
pub fn run_pagerank(
    graph: &Graph,
    config: &PageRankConfig,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let report = PageRankReport::compute(graph, config);
    render_mode(out, output, &report, write_pagerank_text, write_pagerank_pretty)
}

//! `kin communities`: label-propagation communities.

use std::io::{self, Write};

use kinship_analytics::community::{CommunityResult, LabelPropagationConfig, detect_communities};
use kinship_core::Graph;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Report payload for `kin communities`.
#[derive(Debug, Serialize)]
pub struct CommunitiesReport {
    pub rounds: usize,
    pub converged: bool,
    pub communities: Vec<Vec<String>>,
}

impl CommunitiesReport {
    pub fn compute(graph: &Graph, config: &LabelPropagationConfig) -> Self {
        Self::from_result(detect_communities(graph, config))
    }

    pub fn from_result(result: CommunityResult) -> Self {
        Self {
            rounds: result.rounds,
            converged: result.converged,
            communities: result
                .communities
                .into_iter()
                .map(|c| c.into_iter().collect())
                .collect(),
        }
    }
}

pub fn write_communities_text(report: &CommunitiesReport, w: &mut dyn Write) -> io::Result<()> {
    for community in &report.communities {
        writeln!(w, "{}", community.join(" "))?;
    }
    Ok(())
}

pub fn write_communities_pretty(report: &CommunitiesReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Communities (label propagation)")?;
    pretty_kv(w, "Communities", report.communities.len().to_string())?;
    pretty_kv(
        w,
        "Rounds",
        if report.converged {
            format!("{} (stable)", report.rounds)
        } else {
            format!("{} (not stable)", report.rounds)
        },
    )?;
    for (i, community) in report.communities.iter().enumerate() {
        writeln!(
            w,
            "  #{:<3} ({:>3}) {}",
            i + 1,
            community.len(),
            community.join(", ")
        )?;
    }
    Ok(())
}

/// Execute `kin communities`.
pub fn run_communities(
    graph: &Graph,
    config: &LabelPropagationConfig,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let report = CommunitiesReport::compute(graph, config);
    render_mode(
        out,
        output,
        &report,
        write_communities_text,
        write_communities_pretty,
    )
}

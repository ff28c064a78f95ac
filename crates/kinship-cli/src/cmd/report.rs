//! `kin report`: every analysis over one graph.
//!
//! Sections appear in a fixed order: summary, adjacency, components,
//! centrality, PageRank, communities, then recommendations for all nodes.

use std::collections::BTreeMap;
use std::io::{self, Write};

use kinship_analytics::community::detect_communities;
use kinship_analytics::config::AnalysisConfig;
use kinship_analytics::pagerank::pagerank;
use kinship_analytics::recommend::GraphAnalysis;
use kinship_analytics::stats::GraphStats;
use kinship_core::Graph;
use serde::Serialize;
use tracing::instrument;

use super::centrality::{
    CentralityTable, centrality_table, write_centrality_pretty, write_centrality_text,
};
use super::communities::{CommunitiesReport, write_communities_pretty, write_communities_text};
use super::components::{ComponentsReport, write_components_pretty, write_components_text};
use super::neighbors::{adjacency, write_adjacency_pretty, write_adjacency_text};
use super::pagerank::{PageRankReport, write_pagerank_pretty, write_pagerank_text};
use super::recommend::{AllRecommendations, write_all_pretty, write_all_text};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Report payload for `kin report`.
#[derive(Debug, Serialize)]
pub struct FullReport {
    pub content_hash: String,
    pub stats: GraphStats,
    pub adjacency: BTreeMap<String, Vec<String>>,
    pub components: ComponentsReport,
    pub centrality: CentralityTable,
    pub pagerank: PageRankReport,
    pub communities: CommunitiesReport,
    pub recommendations: AllRecommendations,
}

impl FullReport {
    #[instrument(skip_all, fields(nodes = graph.node_count()))]
    pub fn compute(graph: &Graph, config: &AnalysisConfig) -> Self {
        let ranks = pagerank(graph, &config.pagerank);
        let groups = detect_communities(graph, &config.communities);
        let analysis = GraphAnalysis::from_results(graph, &ranks, &groups);
        Self {
            content_hash: graph.content_hash(),
            stats: GraphStats::from_graph(graph),
            adjacency: adjacency(graph),
            components: ComponentsReport::from_graph(graph),
            centrality: centrality_table(graph),
            pagerank: PageRankReport::from_result(config.pagerank.damping, &ranks),
            communities: CommunitiesReport::from_result(groups),
            recommendations: AllRecommendations::compute(
                graph,
                &analysis,
                config,
                config.recommend.top,
            ),
        }
    }
}

fn write_stats_pretty(stats: &GraphStats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Summary")?;
    pretty_kv(w, "Nodes", stats.node_count.to_string())?;
    pretty_kv(w, "Edges", stats.edge_count.to_string())?;
    pretty_kv(w, "Self-loops", stats.self_loop_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", stats.density))?;
    pretty_kv(w, "Components", stats.component_count.to_string())?;
    pretty_kv(w, "Largest component", stats.largest_component.to_string())?;
    pretty_kv(w, "Isolated nodes", stats.isolated_count.to_string())?;
    pretty_kv(w, "Max degree", stats.max_degree.to_string())
}

fn write_report_pretty(report: &FullReport, w: &mut dyn Write) -> io::Result<()> {
    write_stats_pretty(&report.stats, w)?;
    writeln!(w)?;
    write_adjacency_pretty(&report.adjacency, w)?;
    writeln!(w)?;
    write_components_pretty(&report.components, w)?;
    writeln!(w)?;
    write_centrality_pretty(&report.centrality, w)?;
    writeln!(w)?;
    write_pagerank_pretty(&report.pagerank, w)?;
    writeln!(w)?;
    write_communities_pretty(&report.communities, w)?;
    writeln!(w)?;
    write_all_pretty(&report.recommendations, w)
}

fn write_report_text(report: &FullReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    writeln!(w, "# summary")?;
    writeln!(
        w,
        "nodes={} edges={} components={} isolated={} density={}",
        s.node_count, s.edge_count, s.component_count, s.isolated_count, s.density
    )?;
    writeln!(w, "# adjacency")?;
    write_adjacency_text(&report.adjacency, w)?;
    writeln!(w, "# components")?;
    write_components_text(&report.components, w)?;
    writeln!(w, "# centrality")?;
    write_centrality_text(&report.centrality, w)?;
    writeln!(w, "# pagerank")?;
    write_pagerank_text(&report.pagerank, w)?;
    writeln!(w, "# communities")?;
    write_communities_text(&report.communities, w)?;
    writeln!(w, "# recommendations")?;
    write_all_text(&report.recommendations, w)
}

/// Execute `kin report`.
pub fn run_report(
    graph: &Graph,
    config: &AnalysisConfig,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let report = FullReport::compute(graph, config);
    render_mode(out, output, &report, write_report_text, write_report_pretty)
}

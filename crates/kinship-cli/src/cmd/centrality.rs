//! `kin centrality`: degree and closeness centrality per node.

use std::io::{self, Write};

use kinship_analytics::centrality::{closeness_centrality, degree_centrality, score_or_zero};
use kinship_core::Graph;
use serde::Serialize;

use super::sorted_rows;
use crate::output::{OutputMode, fmt_score, pretty_section, render_mode};

/// One row of the centrality table.
#[derive(Debug, Serialize)]
pub struct CentralityRow {
    pub node: String,
    pub degree: f64,
    pub closeness: f64,
}

/// Label-sorted centrality table.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CentralityTable {
    pub rows: Vec<CentralityRow>,
}

pub fn centrality_table(graph: &Graph) -> CentralityTable {
    let degree = degree_centrality(graph);
    let closeness = closeness_centrality(graph);

    let rows = sorted_rows(&degree)
        .into_iter()
        .map(|(node, d)| CentralityRow {
            node: node.to_string(),
            degree: d,
            closeness: score_or_zero(&closeness, node),
        })
        .collect();
    CentralityTable { rows }
}

pub fn write_centrality_text(table: &CentralityTable, w: &mut dyn Write) -> io::Result<()> {
    for row in &table.rows {
        writeln!(w, "{} {} {}", row.node, row.degree, row.closeness)?;
    }
    Ok(())
}

pub fn write_centrality_pretty(table: &CentralityTable, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Centrality")?;
    writeln!(w, "{:<20} {:>10} {:>10}", "NODE", "DEGREE", "CLOSENESS")?;
    for row in &table.rows {
        writeln!(
            w,
            "{:<20} {:>10} {:>10}",
            row.node,
            fmt_score(row.degree),
            fmt_score(row.closeness)
        )?;
    }
    Ok(())
}

/// Execute `kin centrality`.
pub fn run_centrality(graph: &Graph, output: OutputMode, out: &mut dyn Write) -> anyhow::Result<()> {
    render_mode(
        out,
        output,
        &centrality_table(graph),
        write_centrality_text,
        write_centrality_pretty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_cover_every_node_in_label_order() {
        let mut g = Graph::new();
        g.add_edge("C", "A");
        g.add_edge("A", "B");
        g.add_node("E");

        let rows = centrality_table(&g).rows;
        let labels: Vec<&str> = rows.iter().map(|r| r.node.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "E"]);

        let a = &rows[0];
        assert!((a.degree - 2.0 / 3.0).abs() < 1e-12);
        assert!((a.closeness - 1.0).abs() < 1e-12);
        assert_eq!(rows[3].degree, 0.0);
        assert_eq!(rows[3].closeness, 0.0);
    }

    #[test]
    fn json_is_an_array_of_rows() {
        let mut g = Graph::new();
        g.add_edge("A", "B");

        let mut buf = Vec::new();
        run_centrality(&g, OutputMode::Json, &mut buf).expect("run");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(json[0]["node"], "A");
        assert_eq!(json[0]["degree"], 1.0);
        assert_eq!(json[1]["closeness"], 1.0);
    }
}

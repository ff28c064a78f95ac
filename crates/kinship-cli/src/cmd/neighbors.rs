//! `kin neighbors`: adjacency listing.
//!
//! - `kin neighbors <graph> <node>`: the neighbours of one node
//! - `kin neighbors <graph>`: the full adjacency list

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::Args;
use kinship_core::Graph;
use kinship_core::error::ErrorCode;
use serde::Serialize;

use super::InputArgs;
use crate::output::{OutputMode, pretty_section, render_mode, report};

/// Arguments for `kin neighbors`.
#[derive(Args, Debug)]
pub struct NeighborsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Node to list. If omitted, lists every node's neighbours.
    pub node: Option<String>,
}

/// Neighbours of a single node.
#[derive(Debug, Serialize)]
pub struct NodeNeighbors {
    pub node: String,
    pub neighbors: Vec<String>,
}

/// Sorted neighbour list for every node, keyed by label.
pub fn adjacency(graph: &Graph) -> BTreeMap<String, Vec<String>> {
    graph
        .labels()
        .into_iter()
        .map(|label| {
            let neighbors = graph.get_neighbors(label).unwrap_or_default();
            (label.to_string(), neighbors)
        })
        .collect()
}

pub fn write_adjacency_text(
    adjacency: &BTreeMap<String, Vec<String>>,
    w: &mut dyn Write,
) -> io::Result<()> {
    for (node, neighbors) in adjacency {
        if neighbors.is_empty() {
            writeln!(w, "{node}")?;
        } else {
            writeln!(w, "{node} {}", neighbors.join(" "))?;
        }
    }
    Ok(())
}

pub fn write_adjacency_pretty(
    adjacency: &BTreeMap<String, Vec<String>>,
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, "Adjacency")?;
    if adjacency.is_empty() {
        writeln!(w, "(empty graph)")?;
    }
    for (node, neighbors) in adjacency {
        if neighbors.is_empty() {
            writeln!(w, "{node} → (none)")?;
        } else {
            writeln!(w, "{node} → {}", neighbors.join(", "))?;
        }
    }
    Ok(())
}

/// Execute `kin neighbors`.
pub fn run_neighbors(
    args: &NeighborsArgs,
    graph: &Graph,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some(node) = args.node.as_deref() else {
        return render_mode(
            out,
            output,
            &adjacency(graph),
            write_adjacency_text,
            write_adjacency_pretty,
        );
    };

    let neighbors = graph
        .get_neighbors(node)
        .map_err(|e| report(output, ErrorCode::UnknownNode, e.into()))?;

    let payload = NodeNeighbors {
        node: node.to_string(),
        neighbors,
    };

    render_mode(
        out,
        output,
        &payload,
        |p, w| {
            for n in &p.neighbors {
                writeln!(w, "{n}")?;
            }
            Ok(())
        },
        |p, w| {
            pretty_section(w, &format!("Neighbors of {}", p.node))?;
            if p.neighbors.is_empty() {
                writeln!(w, "(none)")
            } else {
                writeln!(w, "{}", p.neighbors.join(", "))
            }
        },
    )
}

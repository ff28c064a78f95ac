//! Edge-list input.
//!
//! One record per line:
//!
//! ```text
//! # comment
//! alice bob      # friendship between alice and bob
//! carol          # carol, with no friends yet
//! ```
//!
//! Tokens are whitespace-separated. Blank lines and `#` comments (whole-line
//! or trailing) are ignored. A line with more than two tokens is rejected.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use kinship_core::Graph;
use tracing::{debug, instrument};

/// Parse an edge list into a graph.
///
/// # Errors
///
/// Returns an error naming the 1-based line number of the first malformed
/// line, or any read error from `reader`.
pub fn parse_edge_list(reader: impl BufRead) -> Result<Graph> {
    let mut graph = Graph::new();

    for (idx, line) in reader.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("failed to read line {lineno}"))?;
        let content = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();

        match tokens.as_slice() {
            [] => {}
            [node] => {
                graph.add_node(node);
            }
            [u, v] => graph.add_edge(u, v),
            _ => bail!(
                "line {lineno}: expected `node` or `node node`, found {} tokens",
                tokens.len()
            ),
        }
    }

    Ok(graph)
}

/// Read a graph from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or contains a malformed line.
#[instrument]
pub fn read_graph(path: &Path) -> Result<Graph> {
    let graph = if path.as_os_str() == "-" {
        parse_edge_list(io::stdin().lock()).context("failed to parse edge list from stdin")?
    } else {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        parse_edge_list(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?
    };

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

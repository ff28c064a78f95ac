//! `kin components`: connected components from the union-find.

use std::io::{self, Write};

use kinship_core::Graph;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Report payload for `kin components`.
#[derive(Debug, Serialize)]
pub struct ComponentsReport {
    pub count: usize,
    pub components: Vec<Vec<String>>,
}

impl ComponentsReport {
    pub fn from_graph(graph: &Graph) -> Self {
        let components: Vec<Vec<String>> = graph
            .connected_components()
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect();
        Self {
            count: components.len(),
            components,
        }
    }
}

pub fn write_components_text(report: &ComponentsReport, w: &mut dyn Write) -> io::Result<()> {
    for component in &report.components {
        writeln!(w, "{}", component.join(" "))?;
    }
    Ok(())
}

pub fn write_components_pretty(report: &ComponentsReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Connected components")?;
    pretty_kv(w, "Components", report.count.to_string())?;
    for (i, component) in report.components.iter().enumerate() {
        writeln!(
            w,
            "  #{:<3} ({:>3}) {}",
            i + 1,
            component.len(),
            component.join(", ")
        )?;
    }
    Ok(())
}

/// Execute `kin components`.
pub fn run_components(graph: &Graph, output: OutputMode, out: &mut dyn Write) -> anyhow::Result<()> {
    let report = ComponentsReport::from_graph(graph);
    render_mode(
        out,
        output,
        &report,
        write_components_text,
        write_components_pretty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_ordered_by_smallest_member() {
        let mut g = Graph::new();
        g.add_edge("x", "y");
        g.add_edge("a", "b");
        g.add_node("m");

        let report = ComponentsReport::from_graph(&g);
        assert_eq!(report.count, 3);
        assert_eq!(
            report.components,
            vec![vec!["a", "b"], vec!["m"], vec!["x", "y"]]
        );
    }

    #[test]
    fn text_is_one_component_per_line() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        g.add_edge("B", "C");
        g.add_node("E");

        let mut buf = Vec::new();
        run_components(&g, OutputMode::Text, &mut buf).expect("run");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "A B C\nE\n");
    }
}

//! Diagram of the loop graph: Mermaid and Graphviz text, optional PNG export.
//!
//! The graph is fixed, so rendering needs no loop instance. PNG export shells
//! out to Graphviz `dot` (see [`render`]); a missing binary is reported as an
//! error the caller is expected to log and ignore.

mod render;

pub use render::{
    detect_command, export_png, export_png_with, CommandRunner, DefaultCommandRunner,
    DetectResult, DiagramError, DEFAULT_DIAGRAM_FILE,
};

use std::fmt::Write;

/// Entry pseudo-node.
pub const START: &str = "__start__";
/// Exit pseudo-node.
pub const END: &str = "__end__";

/// One edge of the loop graph; `label` is set on conditional edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: &'static str,
    pub to: &'static str,
    pub label: Option<&'static str>,
}

/// Edges of the loop graph, entry edge first.
pub fn edges() -> [Edge; 4] {
    [
        Edge {
            from: START,
            to: "llm",
            label: None,
        },
        Edge {
            from: "llm",
            to: "tool",
            label: Some("continue"),
        },
        Edge {
            from: "llm",
            to: END,
            label: Some("end"),
        },
        Edge {
            from: "tool",
            to: "llm",
            label: None,
        },
    ]
}

/// Mermaid flowchart; conditional edges are dotted.
pub fn to_mermaid() -> String {
    let mut out = String::from("graph TD;\n");
    for e in edges() {
        let _ = match e.label {
            Some(label) => writeln!(out, "    {} -.->|{}| {};", e.from, label, e.to),
            None => writeln!(out, "    {} --> {};", e.from, e.to),
        };
    }
    out
}

/// Graphviz DOT; conditional edges are dashed and labelled.
pub fn to_dot() -> String {
    let mut out = String::from("digraph conversation_loop {\n    rankdir=TB;\n");
    for e in edges() {
        let _ = match e.label {
            Some(label) => writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\", style=dashed];",
                e.from, e.to, label
            ),
            None => writeln!(out, "    \"{}\" -> \"{}\";", e.from, e.to),
        };
    }
    out.push_str("}\n");
    out
}

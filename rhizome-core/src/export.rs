use crate::engine::GraphSnapshot;
use rhizome_probe::{Edge, Node, NodeKind};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;

/// Graphviz fill color for a node kind.
pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Domain => "lightblue",
        NodeKind::IpV4 => "gold",
        NodeKind::IpV6 => "orange",
        NodeKind::Tld => "lightgrey",
        NodeKind::Service => "pink",
        NodeKind::Text => "palegreen",
    }
}

/// Statement identifier derived from the node's identity. `DefaultHasher`
/// is fixed-key, so repeated exports of the same graph use the same ids.
pub fn node_id(node: &Node) -> String {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    format!("n{:016x}", hasher.finish())
}

fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the snapshot as a Graphviz digraph. Nodes and edges are
/// emitted in sorted order so the output is byte-stable.
pub fn render_dot(snapshot: &GraphSnapshot) -> String {
    let mut nodes: Vec<&Node> = snapshot.nodes.iter().collect();
    nodes.sort();
    let mut edges: Vec<&Edge> = snapshot.edges.iter().collect();
    edges.sort();

    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [style=filled, fontname=\"Helvetica\"];\n");

    for node in nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\", shape=box];\n",
            node_id(node),
            escape_label(&node.value),
            node_color(node.kind)
        ));
    }

    for edge in edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            node_id(&edge.source),
            node_id(&edge.target),
            edge.kind.as_str()
        ));
    }

    out.push_str("}\n");
    out
}

/// Write the DOT rendering of the snapshot to a file.
pub fn write_dot(snapshot: &GraphSnapshot, path: &Path) -> io::Result<()> {
    std::fs::write(path, render_dot(snapshot))
}

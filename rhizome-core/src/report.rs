use crate::engine::{EngineStats, GraphSnapshot};
use colored::{ColoredString, Colorize};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rhizome_probe::{EdgeKind, Node, NodeKind};
use std::collections::{HashMap, HashSet};

fn styled_value(node: &Node) -> ColoredString {
    match node.kind {
        NodeKind::Domain => node.value.bold().blue(),
        NodeKind::IpV4 => node.value.bold().yellow(),
        NodeKind::IpV6 => node.value.bold().red(),
        NodeKind::Tld => node.value.bold().magenta(),
        NodeKind::Service => node.value.bold().cyan(),
        NodeKind::Text => node.value.normal(),
    }
}

/// Render the discovered graph as an indented spanning tree rooted at
/// `root`. Targets already shown elsewhere appear as dim references and
/// are not recursed into, so cycles terminate.
pub fn render_tree(snapshot: &GraphSnapshot, root: &Node) -> String {
    let mut graph = DiGraph::<&Node, EdgeKind>::new();
    let mut indices: HashMap<&Node, NodeIndex> = HashMap::new();

    for node in &snapshot.nodes {
        indices.insert(node, graph.add_node(node));
    }
    for edge in &snapshot.edges {
        if let (Some(&source), Some(&target)) =
            (indices.get(&edge.source), indices.get(&edge.target))
        {
            graph.add_edge(source, target, edge.kind);
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", root.value.bold().blue()));

    if let Some(&root_index) = indices.get(root) {
        let mut seen = HashSet::new();
        seen.insert(root_index);
        walk(&graph, root_index, 1, &mut seen, &mut out);
    }

    out
}

fn walk(
    graph: &DiGraph<&Node, EdgeKind>,
    from: NodeIndex,
    depth: usize,
    seen: &mut HashSet<NodeIndex>,
    out: &mut String,
) {
    let mut outgoing: Vec<_> = graph.edges_directed(from, Direction::Outgoing).collect();
    outgoing.sort_by(|a, b| {
        (a.weight(), graph[a.target()]).cmp(&(b.weight(), graph[b.target()]))
    });

    let indent = "  ".repeat(depth);
    for edge in outgoing {
        let target_index = edge.target();
        let target = graph[target_index];
        let line = format!(
            "{}-- {} --> {} ({})",
            indent,
            edge.weight().as_str(),
            styled_value(target),
            target.kind.as_str()
        );

        if seen.contains(&target_index) {
            // Reference to a branch already shown; no recursion.
            out.push_str(&format!("{}\n", line.dimmed()));
        } else {
            seen.insert(target_index);
            out.push_str(&line);
            out.push('\n');
            walk(graph, target_index, depth + 1, seen, out);
        }
    }
}

/// One-line count summary for the end of a scan.
pub fn render_summary(stats: &EngineStats) -> String {
    format!(
        "Nodes: {} | Edges: {} | Expanded: {}",
        stats.nodes.to_string().bold(),
        stats.edges.to_string().bold(),
        stats.visited.to_string().bold()
    )
}

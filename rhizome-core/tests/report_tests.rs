use rhizome_core::report::{render_summary, render_tree};
use rhizome_core::{EngineStats, GraphSnapshot};
use rhizome_probe::{Edge, EdgeKind, Node, NodeKind};

fn plain() {
    colored::control::set_override(false);
}

#[test]
fn tree_lists_children_under_the_root() {
    plain();
    let root = Node::domain("example.com");
    let addr = Node::new("192.0.2.10", NodeKind::IpV4);
    let mail = Node::domain("mail.example.com");

    let snapshot = GraphSnapshot {
        nodes: vec![root.clone(), addr.clone(), mail.clone()],
        edges: vec![
            Edge::new(root.clone(), addr, EdgeKind::A),
            Edge::new(root.clone(), mail, EdgeKind::Mx),
        ],
    };

    let tree = render_tree(&snapshot, &root);
    let lines: Vec<&str> = tree.lines().collect();

    assert_eq!(lines[0], "example.com");
    assert!(lines.contains(&"  -- A --> 192.0.2.10 (IP_V4)"));
    assert!(lines.contains(&"  -- MX --> mail.example.com (DOMAIN)"));
}

#[test]
fn nested_targets_are_indented() {
    plain();
    let root = Node::domain("example.com");
    let mail = Node::domain("mail.example.com");
    let addr = Node::new("192.0.2.25", NodeKind::IpV4);

    let snapshot = GraphSnapshot {
        nodes: vec![root.clone(), mail.clone(), addr.clone()],
        edges: vec![
            Edge::new(root.clone(), mail.clone(), EdgeKind::Mx),
            Edge::new(mail, addr, EdgeKind::A),
        ],
    };

    let tree = render_tree(&snapshot, &root);
    assert!(tree.contains("  -- MX --> mail.example.com (DOMAIN)"));
    assert!(tree.contains("    -- A --> 192.0.2.25 (IP_V4)"));
}

#[test]
fn cycles_terminate() {
    plain();
    let a = Node::domain("a.example.com");
    let b = Node::domain("b.example.com");

    let snapshot = GraphSnapshot {
        nodes: vec![a.clone(), b.clone()],
        edges: vec![
            Edge::new(a.clone(), b.clone(), EdgeKind::Cname),
            Edge::new(b.clone(), a.clone(), EdgeKind::Cname),
        ],
    };

    let tree = render_tree(&snapshot, &a);
    // The back-reference is shown once and not recursed into.
    assert_eq!(tree.matches("a.example.com").count(), 2);
    assert_eq!(tree.matches("b.example.com").count(), 1);
}

#[test]
fn unknown_root_renders_bare() {
    plain();
    let snapshot = GraphSnapshot::default();
    let tree = render_tree(&snapshot, &Node::domain("ghost.example"));
    assert_eq!(tree, "ghost.example\n");
}

#[test]
fn summary_reports_counts() {
    plain();
    let stats = EngineStats {
        nodes: 12,
        edges: 18,
        visited: 9,
        pending: 0,
        in_flight: 0,
    };
    let summary = render_summary(&stats);
    assert!(summary.contains("Nodes: 12"));
    assert!(summary.contains("Edges: 18"));
    assert!(summary.contains("Expanded: 9"));
}

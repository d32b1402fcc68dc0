use rhizome_core::GraphSnapshot;
use rhizome_core::export::{node_color, node_id, render_dot};
use rhizome_probe::{Edge, EdgeKind, Node, NodeKind};

fn sample_snapshot() -> GraphSnapshot {
    let root = Node::domain("example.com");
    let addr = Node::new("192.0.2.10", NodeKind::IpV4);
    let mail = Node::domain("mail.example.com");

    GraphSnapshot {
        nodes: vec![root.clone(), addr.clone(), mail.clone()],
        edges: vec![
            Edge::new(root.clone(), addr, EdgeKind::A),
            Edge::new(root, mail, EdgeKind::Mx),
        ],
    }
}

#[test]
fn dot_lists_every_node_and_edge() {
    let dot = render_dot(&sample_snapshot());

    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains("rankdir=LR"));
    assert!(dot.contains("node [style=filled, fontname=\"Helvetica\"]"));

    assert!(dot.contains("label=\"example.com\""));
    assert!(dot.contains("label=\"192.0.2.10\""));
    assert!(dot.contains("label=\"mail.example.com\""));
    assert!(dot.contains("[label=\"A\"]"));
    assert!(dot.contains("[label=\"MX\"]"));
    assert!(dot.matches("shape=box").count() == 3);
    assert!(dot.matches(" -> ").count() == 2);
    assert!(dot.ends_with("}\n"));
}

#[test]
fn fill_colors_follow_node_kind() {
    let dot = render_dot(&sample_snapshot());

    assert!(dot.contains("fillcolor=\"lightblue\""));
    assert!(dot.contains("fillcolor=\"gold\""));

    assert_eq!(node_color(NodeKind::IpV6), "orange");
    assert_eq!(node_color(NodeKind::Tld), "lightgrey");
    assert_eq!(node_color(NodeKind::Service), "pink");
}

#[test]
fn exports_are_stable_across_insertion_orders() {
    let snapshot = sample_snapshot();
    let mut shuffled = snapshot.clone();
    shuffled.nodes.reverse();
    shuffled.edges.reverse();

    assert_eq!(render_dot(&snapshot), render_dot(&shuffled));
}

#[test]
fn node_ids_derive_from_identity() {
    let a = Node::domain("example.com");
    assert_eq!(node_id(&a), node_id(&a.clone()));

    // Same value, different kind: different statement id.
    let b = Node::new("example.com", NodeKind::Text);
    assert_ne!(node_id(&a), node_id(&b));
}

#[test]
fn labels_are_escaped() {
    let node = Node::new("v=spf1 \"quoted\"", NodeKind::Text);
    let snapshot = GraphSnapshot {
        nodes: vec![node],
        edges: Vec::new(),
    };

    let dot = render_dot(&snapshot);
    assert!(dot.contains("label=\"v=spf1 \\\"quoted\\\"\""));
}

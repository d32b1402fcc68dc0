use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a discovered entity. Together with the value it forms the
/// node's identity; two nodes with the same value but different kinds are
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Domain,
    IpV4,
    IpV6,
    Tld,
    Service,
    Text,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Domain => "DOMAIN",
            NodeKind::IpV4 => "IP_V4",
            NodeKind::IpV6 => "IP_V6",
            NodeKind::Tld => "TLD",
            NodeKind::Service => "SERVICE",
            NodeKind::Text => "TXT",
        }
    }
}

/// Relation that produced an edge, named after the record or derivation
/// behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    A,
    Aaaa,
    Cname,
    Ns,
    Mx,
    Ptr,
    Txt,
    Srv,
    Parent,
    Neighbor,
    Subdomain,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::A => "A",
            EdgeKind::Aaaa => "AAAA",
            EdgeKind::Cname => "CNAME",
            EdgeKind::Ns => "NS",
            EdgeKind::Mx => "MX",
            EdgeKind::Ptr => "PTR",
            EdgeKind::Txt => "TXT",
            EdgeKind::Srv => "SRV",
            EdgeKind::Parent => "PARENT",
            EdgeKind::Neighbor => "NEIGHBOR",
            EdgeKind::Subdomain => "SUBDOMAIN",
        }
    }
}

/// A discovered entity: a hostname, an address literal, or raw record
/// text. Construction never fails; strategies validate values before
/// building one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    pub value: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(value: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn domain(value: impl Into<String>) -> Self {
        Self::new(value, NodeKind::Domain)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.value)
    }
}

/// A typed, directed relation between two nodes. Compared by the full
/// triple; the engine records a given triple at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: Node,
    pub target: Node,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: Node, target: Node, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --[{}]--> {}",
            self.source,
            self.kind.as_str(),
            self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_identity_is_value_and_kind() {
        let a = Node::domain("example.com");
        let b = Node::domain("example.com");
        let c = Node::new("example.com", NodeKind::Text);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn edge_identity_is_full_triple() {
        let root = Node::domain("root");
        let child = Node::domain("child");

        let e1 = Edge::new(root.clone(), child.clone(), EdgeKind::A);
        let e2 = Edge::new(root.clone(), child.clone(), EdgeKind::A);
        let e3 = Edge::new(root, child, EdgeKind::Cname);

        let mut set = HashSet::new();
        set.insert(e1);
        set.insert(e2);
        set.insert(e3);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_formats() {
        let node = Node::new("1.2.3.4", NodeKind::IpV4);
        assert_eq!(node.to_string(), "IP_V4:1.2.3.4");

        let edge = Edge::new(Node::domain("a"), Node::domain("b"), EdgeKind::Ns);
        assert_eq!(edge.to_string(), "DOMAIN:a --[NS]--> DOMAIN:b");
    }
}

use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;

/// The one-label-up parent of a domain, or `None` once the registrable
/// domain is reached. The public suffix itself is never produced; probing
/// a bare TLD is pointless.
pub fn parent_of(domain: &str) -> Option<String> {
    let registrable = psl::domain_str(domain)?;
    if domain == registrable || !domain.ends_with(registrable) {
        return None;
    }
    let (_, parent) = domain.split_once('.')?;
    if parent.is_empty() {
        return None;
    }
    Some(parent.to_string())
}

/// Derives parent domains one label at a time, stopping at the public
/// suffix boundary. Purely computational; no lookups.
pub struct ParentStrategy;

impl ParentStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParentStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Strategy for ParentStrategy {
    fn name(&self) -> &'static str {
        "parents"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::Domain {
            return Ok(Vec::new());
        }

        Ok(parent_of(&node.value)
            .map(|parent| vec![propose(node, Node::domain(parent), EdgeKind::Parent)])
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_label() {
        assert_eq!(
            parent_of("a.b.example.com"),
            Some("b.example.com".to_string())
        );
        assert_eq!(parent_of("www.example.com"), Some("example.com".to_string()));
    }

    #[test]
    fn stops_at_registrable_domain() {
        assert_eq!(parent_of("example.com"), None);
    }

    #[test]
    fn respects_multi_label_public_suffixes() {
        assert_eq!(
            parent_of("www.example.co.uk"),
            Some("example.co.uk".to_string())
        );
        assert_eq!(parent_of("example.co.uk"), None);
    }

    #[test]
    fn rejects_bare_suffixes() {
        assert_eq!(parent_of("com"), None);
        assert_eq!(parent_of("co.uk"), None);
    }

    #[tokio::test]
    async fn emits_parent_edge() {
        let strategy = ParentStrategy::new();
        let node = Node::domain("www.example.com");
        let found = strategy.execute(&node).await.unwrap();

        assert_eq!(found.len(), 1);
        let (target, edge) = &found[0];
        assert_eq!(target, &Node::domain("example.com"));
        assert_eq!(edge.source, node);
        assert_eq!(edge.kind, EdgeKind::Parent);
    }
}

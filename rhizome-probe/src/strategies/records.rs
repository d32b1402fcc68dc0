use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Resolves the standard record set of a domain: A, AAAA, CNAME, NS, MX
/// and TXT. Each record type that fails to resolve simply contributes
/// nothing.
pub struct RecordStrategy {
    dns: DnsClient,
}

impl RecordStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dns: DnsClient::with_timeout(Duration::from_secs(1))?,
        })
    }
}

#[async_trait]
impl Strategy for RecordStrategy {
    fn name(&self) -> &'static str {
        "records"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::Domain {
            return Ok(Vec::new());
        }

        let name = node.value.as_str();
        let mut found = Vec::new();

        if let Ok(addrs) = self.dns.ipv4(name).await {
            for addr in addrs {
                found.push(propose(
                    node,
                    Node::new(addr.to_string(), NodeKind::IpV4),
                    EdgeKind::A,
                ));
            }
        }

        if let Ok(addrs) = self.dns.ipv6(name).await {
            for addr in addrs {
                found.push(propose(
                    node,
                    Node::new(addr.to_string(), NodeKind::IpV6),
                    EdgeKind::Aaaa,
                ));
            }
        }

        if let Ok(targets) = self.dns.cname(name).await {
            for target in targets {
                found.push(propose(node, Node::domain(target), EdgeKind::Cname));
            }
        }

        if let Ok(servers) = self.dns.ns(name).await {
            for server in servers {
                found.push(propose(node, Node::domain(server), EdgeKind::Ns));
            }
        }

        if let Ok(exchanges) = self.dns.mx(name).await {
            for exchange in exchanges {
                found.push(propose(node, Node::domain(exchange), EdgeKind::Mx));
            }
        }

        if let Ok(texts) = self.dns.txt(name).await {
            for text in texts {
                found.push(propose(
                    node,
                    Node::new(text, NodeKind::Text),
                    EdgeKind::Txt,
                ));
            }
        }

        debug!("records: {} -> {} proposals", name, found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_non_domain_nodes() {
        let strategy = RecordStrategy::new().unwrap();
        let node = Node::new("1.2.3.4", NodeKind::IpV4);
        let found = strategy.execute(&node).await.unwrap();
        assert!(found.is_empty());
    }
}

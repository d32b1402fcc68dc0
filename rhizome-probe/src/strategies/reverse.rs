use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// Reverse (PTR) resolution of address nodes back to hostnames.
pub struct ReverseStrategy {
    dns: DnsClient,
}

impl ReverseStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dns: DnsClient::with_timeout(Duration::from_secs(2))?,
        })
    }
}

#[async_trait]
impl Strategy for ReverseStrategy {
    fn name(&self) -> &'static str {
        "reverse"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::IpV4 && node.kind != NodeKind::IpV6 {
            return Ok(Vec::new());
        }

        let addr: IpAddr = match node.value.parse() {
            Ok(addr) => addr,
            Err(_) => {
                debug!("reverse: {} is not an address literal", node.value);
                return Ok(Vec::new());
            }
        };

        let mut found = Vec::new();
        if let Ok(names) = self.dns.reverse(addr).await {
            for name in names {
                found.push(propose(node, Node::domain(name), EdgeKind::Ptr));
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_domain_nodes() {
        let strategy = ReverseStrategy::new().unwrap();
        let found = strategy.execute(&Node::domain("example.com")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn tolerates_malformed_address_values() {
        let strategy = ReverseStrategy::new().unwrap();
        let node = Node::new("not-an-ip", NodeKind::IpV4);
        let found = strategy.execute(&node).await.unwrap();
        assert!(found.is_empty());
    }
}

use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::debug;

/// The +1/-1 neighbors of an address, clamped so neither end of the
/// address space wraps.
pub fn adjacent(addr: Ipv4Addr) -> Vec<Ipv4Addr> {
    let n = u32::from(addr);
    let mut neighbors = Vec::with_capacity(2);
    if n > u32::MIN {
        neighbors.push(Ipv4Addr::from(n - 1));
    }
    if n < u32::MAX {
        neighbors.push(Ipv4Addr::from(n + 1));
    }
    neighbors
}

/// Probes the numerically adjacent IPv4 addresses of an address node. A
/// neighbor is only accepted when a PTR lookup confirms something lives
/// there.
pub struct NeighborStrategy {
    dns: DnsClient,
}

impl NeighborStrategy {
    pub fn new() -> Result<Self> {
        // Short timeout; most neighbors have nothing to say.
        Ok(Self {
            dns: DnsClient::with_timeout(Duration::from_secs(1))?,
        })
    }
}

#[async_trait]
impl Strategy for NeighborStrategy {
    fn name(&self) -> &'static str {
        "neighbors"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::IpV4 {
            return Ok(Vec::new());
        }

        let addr: Ipv4Addr = match node.value.parse() {
            Ok(addr) => addr,
            Err(_) => {
                debug!("neighbors: {} is not an IPv4 literal", node.value);
                return Ok(Vec::new());
            }
        };

        let mut found = Vec::new();
        for neighbor in adjacent(addr) {
            match self.dns.reverse(IpAddr::V4(neighbor)).await {
                Ok(names) if !names.is_empty() => {
                    found.push(propose(
                        node,
                        Node::new(neighbor.to_string(), NodeKind::IpV4),
                        EdgeKind::Neighbor,
                    ));
                }
                // No PTR or timeout: not interesting.
                _ => continue,
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_addresses_have_two_neighbors() {
        let neighbors = adjacent(Ipv4Addr::new(192, 0, 2, 10));
        assert_eq!(
            neighbors,
            vec![Ipv4Addr::new(192, 0, 2, 9), Ipv4Addr::new(192, 0, 2, 11)]
        );
    }

    #[test]
    fn address_space_does_not_wrap() {
        assert_eq!(
            adjacent(Ipv4Addr::new(0, 0, 0, 0)),
            vec![Ipv4Addr::new(0, 0, 0, 1)]
        );
        assert_eq!(
            adjacent(Ipv4Addr::new(255, 255, 255, 255)),
            vec![Ipv4Addr::new(255, 255, 255, 254)]
        );
    }

    #[tokio::test]
    async fn skips_ipv6_nodes() {
        let strategy = NeighborStrategy::new().unwrap();
        let node = Node::new("2001:db8::1", NodeKind::IpV6);
        assert!(strategy.execute(&node).await.unwrap().is_empty());
    }
}

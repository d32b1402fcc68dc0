use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use tracing::debug;

/// Well-known `_service._proto` SRV prefixes worth probing blind.
pub const COMMON_SERVICES: &[&str] = &[
    "_xmpp-server._tcp",
    "_xmpp-client._tcp",
    "_sip._tcp",
    "_sip._udp",
    "_ldap._tcp",
    "_kerberos._tcp",
    "_kerberos._udp",
    "_minecraft._tcp",
    "_autodiscover._tcp",
    "_caldav._tcp",
    "_carddav._tcp",
];

/// Brute-forces common SRV names under a domain and yields the service
/// target hosts. The service nodes themselves are not emitted; the graph
/// would get cluttered for little gain.
pub struct ServiceStrategy {
    dns: DnsClient,
}

impl ServiceStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dns: DnsClient::new()?,
        })
    }
}

#[async_trait]
impl Strategy for ServiceStrategy {
    fn name(&self) -> &'static str {
        "services"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::Domain {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for service in COMMON_SERVICES {
            let name = format!("{}.{}", service, node.value);
            if let Ok(targets) = self.dns.srv(&name).await {
                for (host, port) in targets {
                    debug!("services: {} -> {}:{}", name, host, port);
                    found.push(propose(node, Node::domain(host), EdgeKind::Srv));
                }
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_address_nodes() {
        let strategy = ServiceStrategy::new().unwrap();
        let node = Node::new("192.0.2.1", NodeKind::IpV4);
        assert!(strategy.execute(&node).await.unwrap().is_empty());
    }
}

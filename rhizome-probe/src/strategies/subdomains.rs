use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Common prefixes tried by default; override with a wordlist via
/// `with_prefixes`.
pub const COMMON_PREFIXES: &[&str] = &[
    "www", "api", "dev", "test", "staging", "mail", "vpn", "remote", "gateway", "admin", "portal",
    "ns1", "ns2", "smtp", "pop", "imap", "secure", "blog", "shop", "store", "app", "m",
];

const CONCURRENT_LOOKUPS: usize = 16;

/// Brute-forces common subdomain prefixes; a prefix counts as discovered
/// when an A lookup for it succeeds.
pub struct SubdomainStrategy {
    dns: DnsClient,
    prefixes: Vec<String>,
}

impl SubdomainStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dns: DnsClient::with_timeout(Duration::from_millis(1500))?,
            prefixes: COMMON_PREFIXES.iter().map(|p| p.to_string()).collect(),
        })
    }

    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }
}

#[async_trait]
impl Strategy for SubdomainStrategy {
    fn name(&self) -> &'static str {
        "subdomains"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::Domain {
            return Ok(Vec::new());
        }

        let dns = &self.dns;
        let subdomains: Vec<String> = self
            .prefixes
            .iter()
            .map(|prefix| format!("{}.{}", prefix, node.value))
            .collect();
        let candidates = stream::iter(subdomains)
            .map(|subdomain| async move {
                match dns.ipv4(&subdomain).await {
                    Ok(addrs) if !addrs.is_empty() => Some(subdomain),
                    _ => None,
                }
            })
            .buffer_unordered(CONCURRENT_LOOKUPS)
            .collect::<Vec<_>>()
            .await;

        Ok(candidates
            .into_iter()
            .flatten()
            .map(|subdomain| propose(node, Node::domain(subdomain), EdgeKind::Subdomain))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_text_nodes() {
        let strategy = SubdomainStrategy::new().unwrap();
        let node = Node::new("v=spf1 ~all", NodeKind::Text);
        assert!(strategy.execute(&node).await.unwrap().is_empty());
    }

    #[test]
    fn wordlist_override_replaces_defaults() {
        let strategy = SubdomainStrategy::new()
            .unwrap()
            .with_prefixes(vec!["grafana".to_string(), "jenkins".to_string()]);
        assert_eq!(strategy.prefixes, vec!["grafana", "jenkins"]);
    }
}

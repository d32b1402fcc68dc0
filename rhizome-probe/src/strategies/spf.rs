use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node, NodeKind};
use crate::resolver::DnsClient;
use crate::strategy::{Strategy, propose};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

// Structural SPF mechanisms only; a broad domain regex would match too
// much garbage inside base64 blobs.
static RE_IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ip4:(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").unwrap());
static RE_IPV6: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ip6:([a-fA-F0-9:]+)").unwrap());
static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"include:([a-zA-Z0-9.-]+)").unwrap());
static RE_REDIRECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"redirect=([a-zA-Z0-9.-]+)").unwrap());

/// Extract the addresses and domains referenced by one TXT record's
/// content (SPF `ip4:`/`ip6:`/`include:`/`redirect=` mechanisms).
pub fn targets_in_txt(content: &str) -> Vec<Node> {
    let mut targets = Vec::new();

    for cap in RE_IPV4.captures_iter(content) {
        targets.push(Node::new(&cap[1], NodeKind::IpV4));
    }
    for cap in RE_IPV6.captures_iter(content) {
        targets.push(Node::new(&cap[1], NodeKind::IpV6));
    }
    for cap in RE_INCLUDE.captures_iter(content) {
        targets.push(Node::domain(&cap[1]));
    }
    for cap in RE_REDIRECT.captures_iter(content) {
        targets.push(Node::domain(&cap[1]));
    }

    targets
}

/// Parses TXT records (SPF, DMARC and friends) to surface the addresses
/// and domains hidden inside them.
pub struct SpfStrategy {
    dns: DnsClient,
}

impl SpfStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dns: DnsClient::new()?,
        })
    }
}

#[async_trait]
impl Strategy for SpfStrategy {
    fn name(&self) -> &'static str {
        "spf"
    }

    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>> {
        if node.kind != NodeKind::Domain {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        if let Ok(records) = self.dns.txt(&node.value).await {
            for content in records {
                for target in targets_in_txt(&content) {
                    found.push(propose(node, target, EdgeKind::Txt));
                }
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_spf_includes() {
        let targets = targets_in_txt("v=spf1 include:_spf.google.com ~all");
        assert_eq!(targets, vec![Node::domain("_spf.google.com")]);
    }

    #[test]
    fn extracts_addresses_and_redirects() {
        let content = "v=spf1 ip4:192.0.2.10 ip6:2001:db8::1 redirect=spf.example.net";
        let targets = targets_in_txt(content);

        assert!(targets.contains(&Node::new("192.0.2.10", NodeKind::IpV4)));
        assert!(targets.contains(&Node::new("2001:db8::1", NodeKind::IpV6)));
        assert!(targets.contains(&Node::domain("spf.example.net")));
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn ignores_unstructured_content() {
        assert!(targets_in_txt("google-site-verification=abc123").is_empty());
    }
}

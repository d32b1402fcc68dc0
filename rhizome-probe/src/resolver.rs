use crate::error::Result;
use hickory_resolver::TokioResolver;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Strip the trailing root separator from a fully qualified name.
pub fn trim_fqdn(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Thin wrapper around the system-configured resolver. Each strategy owns
/// its own client so per-probe timeouts can differ.
pub struct DnsClient {
    resolver: TokioResolver,
}

impl DnsClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut builder = TokioResolver::builder(TokioConnectionProvider::default())?;
        builder.options_mut().timeout = timeout;
        Ok(Self {
            resolver: builder.build(),
        })
    }

    pub async fn ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        let lookup = self.resolver.ipv4_lookup(name).await?;
        Ok(lookup.iter().map(|r| r.0).collect())
    }

    pub async fn ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>> {
        let lookup = self.resolver.ipv6_lookup(name).await?;
        Ok(lookup.iter().map(|r| r.0).collect())
    }

    pub async fn cname(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self.resolver.lookup(name, RecordType::CNAME).await?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| rdata.as_cname().map(|c| trim_fqdn(&c.0.to_utf8())))
            .collect())
    }

    pub async fn ns(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self.resolver.ns_lookup(name).await?;
        Ok(lookup.iter().map(|r| trim_fqdn(&r.0.to_utf8())).collect())
    }

    pub async fn mx(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self.resolver.mx_lookup(name).await?;
        Ok(lookup
            .iter()
            .map(|r| trim_fqdn(&r.exchange().to_utf8()))
            .collect())
    }

    pub async fn txt(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self.resolver.txt_lookup(name).await?;
        Ok(lookup
            .iter()
            .map(|r| {
                r.txt_data()
                    .iter()
                    .map(|part| String::from_utf8_lossy(part).into_owned())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect())
    }

    /// SRV targets as `(host, port)` pairs.
    pub async fn srv(&self, name: &str) -> Result<Vec<(String, u16)>> {
        let lookup = self.resolver.srv_lookup(name).await?;
        Ok(lookup
            .iter()
            .map(|r| (trim_fqdn(&r.target().to_utf8()), r.port()))
            .collect())
    }

    pub async fn reverse(&self, addr: IpAddr) -> Result<Vec<String>> {
        let lookup = self.resolver.reverse_lookup(addr).await?;
        Ok(lookup.iter().map(|r| trim_fqdn(&r.0.to_utf8())).collect())
    }

    /// Generic lookup returning the records' text form, for the one-shot
    /// summary where the caller iterates over record types by name.
    pub async fn raw(&self, name: &str, record_type: RecordType) -> Result<Vec<String>> {
        debug!("Resolving {} {}", name, record_type);
        let lookup = self.resolver.lookup(name, record_type).await?;
        Ok(lookup.iter().map(|rdata| rdata.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_root_separator() {
        assert_eq!(trim_fqdn("mail.example.com."), "mail.example.com");
        assert_eq!(trim_fqdn("mail.example.com"), "mail.example.com");
        assert_eq!(trim_fqdn("."), "");
    }
}

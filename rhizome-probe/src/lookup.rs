use crate::error::Result;
use crate::resolver::DnsClient;
use hickory_resolver::proto::rr::RecordType;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "rhizome/0.1";
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_RDAP_BASE: &str = "https://rdap.org";

/// Record types covered by the one-shot summary.
pub const SUMMARY_RECORD_TYPES: [RecordType; 7] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::MX,
    RecordType::NS,
    RecordType::TXT,
    RecordType::SOA,
    RecordType::CNAME,
];

/// Registration data distilled from an RDAP response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RdapSummary {
    pub handle: Option<String>,
    pub status: Vec<String>,
    pub nameservers: Vec<String>,
    pub events: Vec<(String, String)>,
}

impl RdapSummary {
    fn from_value(value: &Value) -> Self {
        let strings = |v: Option<&Value>| -> Vec<String> {
            v.and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let nameservers = value
            .get("nameservers")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|ns| ns.get("ldhName").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let events = value
            .get("events")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|event| {
                        let action = event.get("eventAction").and_then(Value::as_str)?;
                        let date = event.get("eventDate").and_then(Value::as_str)?;
                        Some((action.to_string(), date.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            handle: value
                .get("handle")
                .and_then(Value::as_str)
                .map(str::to_string),
            status: strings(value.get("status")),
            nameservers,
            events,
        }
    }
}

/// Everything a full one-shot reconnaissance of a domain produced.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub domain: String,
    pub records: BTreeMap<String, Vec<String>>,
    pub rdap: Option<RdapSummary>,
    pub robots: Option<String>,
}

/// One-shot reconnaissance client: record summary, registration data over
/// RDAP, and robots.txt retrieval.
pub struct LookupClient {
    dns: DnsClient,
    http: reqwest::Client,
    rdap_base: String,
}

impl LookupClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            dns: DnsClient::with_timeout(Duration::from_secs(5))?,
            http,
            rdap_base: DEFAULT_RDAP_BASE.to_string(),
        })
    }

    /// Point RDAP queries at a different service root.
    pub fn with_rdap_base(mut self, base: impl Into<String>) -> Self {
        self.rdap_base = base.into();
        self
    }

    /// Every supported record type mapped to its values. A type that has
    /// no records, or whose lookup fails, maps to an empty list.
    pub async fn record_summary(&self, domain: &str) -> BTreeMap<String, Vec<String>> {
        let mut records = BTreeMap::new();
        for record_type in SUMMARY_RECORD_TYPES {
            let values = match self.dns.raw(domain, record_type).await {
                Ok(values) => values,
                Err(err) => {
                    debug!("lookup: {} {} failed: {}", domain, record_type, err);
                    Vec::new()
                }
            };
            records.insert(record_type.to_string(), values);
        }
        records
    }

    /// Registration data for a domain via the RDAP bootstrap service.
    pub async fn rdap(&self, domain: &str) -> Result<RdapSummary> {
        let url = format!("{}/domain/{}", self.rdap_base.trim_end_matches('/'), domain);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: Value = response.json().await?;
        Ok(RdapSummary::from_value(&body))
    }

    /// The robots.txt body served under `base`, or `None` for anything
    /// but a 200.
    pub async fn robots(&self, base: &str) -> Result<Option<String>> {
        let url = format!("{}/robots.txt", base.trim_end_matches('/'));
        let response = self.http.get(&url).send().await?;
        if response.status().is_success() {
            Ok(Some(response.text().await?))
        } else {
            Ok(None)
        }
    }

    /// Full reconnaissance: records + RDAP + robots.txt. Partial failures
    /// degrade to absent sections, never to an error.
    pub async fn scan_all(&self, domain: &str) -> LookupReport {
        let records = self.record_summary(domain).await;

        let rdap = match self.rdap(domain).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!("lookup: RDAP query for {} failed: {}", domain, err);
                None
            }
        };

        let robots = match self.robots(&format!("http://{}", domain)).await {
            Ok(body) => body,
            Err(err) => {
                warn!("lookup: robots.txt fetch for {} failed: {}", domain, err);
                None
            }
        };

        LookupReport {
            domain: domain.to_string(),
            records,
            rdap,
            robots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn rdap_summary_is_parsed() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "handle": "EXAMPLE-1",
            "status": ["active", "client transfer prohibited"],
            "nameservers": [
                {"ldhName": "ns1.example.com"},
                {"ldhName": "ns2.example.com"}
            ],
            "events": [
                {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/domain/example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = LookupClient::new()
            .unwrap()
            .with_rdap_base(mock_server.uri());
        let summary = client.rdap("example.com").await.unwrap();

        assert_eq!(summary.handle.as_deref(), Some("EXAMPLE-1"));
        assert_eq!(summary.status.len(), 2);
        assert_eq!(
            summary.nameservers,
            vec!["ns1.example.com", "ns2.example.com"]
        );
        assert_eq!(summary.events[0].0, "registration");
    }

    #[tokio::test]
    async fn rdap_error_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/domain/missing.example"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = LookupClient::new()
            .unwrap()
            .with_rdap_base(mock_server.uri());
        assert!(client.rdap("missing.example").await.is_err());
    }

    #[tokio::test]
    async fn robots_returns_body_on_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow:"))
            .mount(&mock_server)
            .await;

        let client = LookupClient::new().unwrap();
        let body = client.robots(&mock_server.uri()).await.unwrap();
        assert_eq!(body.as_deref(), Some("User-agent: *\nDisallow:"));
    }

    #[tokio::test]
    async fn robots_returns_none_on_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = LookupClient::new().unwrap();
        assert!(client.robots(&mock_server.uri()).await.unwrap().is_none());
    }
}

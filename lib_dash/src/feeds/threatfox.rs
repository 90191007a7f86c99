//! ThreatFox (abuse.ch) indicator-of-compromise feed.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::retrieve::api_http::{ApiClient, ApiClientOptions};

const BASE_URL: &str = "https://threatfox.abuse.ch/";

/// One IOC entry as the query API returns it. Unknown fields are ignored,
/// missing ones default, so schema drift cannot break the card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indicator {
    #[serde(default)]
    pub ioc: String,
    #[serde(default)]
    pub ioc_type: String,
    #[serde(default)]
    pub threat_type: String,
    #[serde(default)]
    pub malware_printable: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Vec<Indicator>,
}

pub struct ThreatFox {
    client: ApiClient,
}

impl ThreatFox {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base(BASE_URL, None)
    }

    pub fn with_base(base_url: &str, options: Option<ApiClientOptions>) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(base_url, options)?,
        })
    }

    /// Most recent IOCs, at most `limit`. Empty on any failure.
    pub async fn recent_iocs(&self, limit: usize) -> Vec<Indicator> {
        let body = json!({ "query": "get_iocs", "limit": limit });
        match self
            .client
            .request::<QueryResponse, Value>(Method::POST, "api/v1/", None, Some(body))
            .await
        {
            Ok(resp) if resp.success => {
                let mut iocs = resp.data.map(|r| r.data).unwrap_or_default();
                iocs.truncate(limit);
                iocs
            }
            Ok(resp) => {
                warn!(status = resp.status, "threatfox query rejected");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "threatfox query failed");
                Vec::new()
            }
        }
    }
}

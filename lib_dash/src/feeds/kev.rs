//! CISA Known Exploited Vulnerabilities catalog.
//!
//! Unlike the query-style abuse.ch feeds, this one is a static JSON file
//! republished on a schedule.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::retrieve::api_http::{ApiClient, ApiClientOptions};

const BASE_URL: &str = "https://www.cisa.gov/";
const CATALOG_PATH: &str = "sites/default/files/feeds/known_exploited_vulnerabilities.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownExploited {
    #[serde(rename = "cveID", default)]
    pub cve_id: String,
    #[serde(default)]
    pub vendor_project: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub vulnerability_name: String,
    #[serde(default)]
    pub date_added: String,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(default)]
    vulnerabilities: Vec<KnownExploited>,
}

pub struct CisaKev {
    client: ApiClient,
}

impl CisaKev {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base(BASE_URL, None)
    }

    pub fn with_base(base_url: &str, options: Option<ApiClientOptions>) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(base_url, options)?,
        })
    }

    /// Catalog head, at most `limit` entries. Empty on any failure.
    pub async fn recent_vulnerabilities(&self, limit: usize) -> Vec<KnownExploited> {
        match self
            .client
            .request::<Catalog, ()>(Method::GET, CATALOG_PATH, None, None)
            .await
        {
            Ok(resp) if resp.success => {
                let mut entries = resp.data.map(|c| c.vulnerabilities).unwrap_or_default();
                entries.truncate(limit);
                entries
            }
            Ok(resp) => {
                warn!(status = resp.status, "kev catalog fetch rejected");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "kev catalog fetch failed");
                Vec::new()
            }
        }
    }
}

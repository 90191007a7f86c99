//! URLhaus (abuse.ch) recent malicious URL feed.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::retrieve::api_http::{ApiClient, ApiClientOptions};

const BASE_URL: &str = "https://urlhaus-api.abuse.ch/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaliciousUrl {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_status: String,
    #[serde(default)]
    pub threat: String,
    #[serde(default)]
    pub date_added: String,
}

#[derive(Debug, Deserialize)]
struct RecentResponse {
    #[serde(default)]
    urls: Vec<MaliciousUrl>,
}

pub struct Urlhaus {
    client: ApiClient,
}

impl Urlhaus {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base(BASE_URL, None)
    }

    pub fn with_base(base_url: &str, options: Option<ApiClientOptions>) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(base_url, options)?,
        })
    }

    /// Most recently reported URLs, at most `limit`. Empty on any failure.
    pub async fn recent_urls(&self, limit: usize) -> Vec<MaliciousUrl> {
        match self
            .client
            .request::<RecentResponse, ()>(Method::GET, "v1/urls/recent/", None, None)
            .await
        {
            Ok(resp) if resp.success => {
                let mut urls = resp.data.map(|r| r.urls).unwrap_or_default();
                urls.truncate(limit);
                urls
            }
            Ok(resp) => {
                warn!(status = resp.status, "urlhaus query rejected");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "urlhaus query failed");
                Vec::new()
            }
        }
    }
}

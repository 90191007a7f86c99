//! MalwareBazaar (abuse.ch) recent sample-hash feed.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::retrieve::api_http::{ApiClient, ApiClientOptions};

const BASE_URL: &str = "https://mb-api.abuse.ch/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleHash {
    #[serde(default)]
    pub sha256_hash: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RecentResponse {
    #[serde(default)]
    data: Vec<SampleHash>,
}

pub struct MalwareBazaar {
    client: ApiClient,
}

impl MalwareBazaar {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base(BASE_URL, None)
    }

    pub fn with_base(base_url: &str, options: Option<ApiClientOptions>) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(base_url, options)?,
        })
    }

    /// Most recently submitted sample hashes, at most `limit`. Empty on any
    /// failure.
    pub async fn recent_samples(&self, limit: usize) -> Vec<SampleHash> {
        let body = json!({ "query": "get_recent", "selector": "time" });
        match self
            .client
            .request::<RecentResponse, Value>(Method::POST, "api/v1/", None, Some(body))
            .await
        {
            Ok(resp) if resp.success => {
                let mut samples = resp.data.map(|r| r.data).unwrap_or_default();
                samples.truncate(limit);
                samples
            }
            Ok(resp) => {
                warn!(status = resp.status, "malwarebazaar query rejected");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "malwarebazaar query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http;
    use std::time::Duration;

    fn test_options() -> Option<ApiClientOptions> {
        Some(ApiClientOptions {
            timeout: Duration::from_millis(300),
            max_retries: 0,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn parses_recent_samples() {
        let body = json!({
            "query_status": "ok",
            "data": [
                { "sha256_hash": "a".repeat(64), "file_type": "exe", "tags": ["agenttesla"] },
                { "sha256_hash": "b".repeat(64), "file_type": "dll" }
            ]
        })
        .to_string();
        let base = test_http::serve(vec![test_http::json_ok(&body)]);

        let feed = MalwareBazaar::with_base(&base, test_options()).unwrap();
        let samples = feed.recent_samples(10).await;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].file_type, "dll");
        assert!(samples[1].tags.is_none());
    }

    #[tokio::test]
    async fn refused_connection_degrades_to_empty() {
        let base = test_http::refused_base();
        let feed = MalwareBazaar::with_base(&base, test_options()).unwrap();
        assert!(feed.recent_samples(10).await.is_empty());
    }
}

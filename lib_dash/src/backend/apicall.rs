//! Typed access to the dashboard aggregation endpoint.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::engine::connectivity::StatusProbe;
use crate::engine::resource::ResourceKind;
use crate::retrieve::api_http::{ApiClient, ApiClientOptions};

/// Failure modes of one backend fetch, normalized for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, client timeout, or an undecodable body.
    #[error("request for '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    /// The server answered outside the 2xx range.
    #[error("'{path}' returned HTTP {status}")]
    Status { path: String, status: u16 },
}

/// Client for the backend aggregation API.
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(base_url: &str, options: Option<ApiClientOptions>) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(base_url, options)?,
        })
    }

    /// Fetches one aggregation sub-resource as raw JSON.
    pub async fn fetch_resource(&self, resource: ResourceKind) -> Result<Value, FetchError> {
        self.get_json(resource.path()).await
    }

    /// One lightweight reachability check against the statistics
    /// sub-resource. Any response body is fine; only "did the backend
    /// answer 2xx" matters.
    pub async fn probe_statistics(&self) -> bool {
        match self.get_json("statistics").await {
            Ok(_) => true,
            Err(error) => {
                debug!(%error, "status probe failed");
                false
            }
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .request::<Value, ()>(Method::GET, path, None, None)
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        if !response.success {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status,
            });
        }
        response.data.ok_or_else(|| FetchError::Transport {
            path: path.to_string(),
            source: anyhow::anyhow!("response had no body"),
        })
    }
}

/// [`StatusProbe`] over the aggregation endpoint.
pub struct HttpStatusProbe {
    api: DashboardApi,
}

impl HttpStatusProbe {
    /// A probe is a single shot per cycle; transient retries inside it would
    /// blur the consecutive-failure count, so the retry layer stays off.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let options = ApiClientOptions {
            timeout,
            max_retries: 0,
            ..Default::default()
        };
        Ok(Self {
            api: DashboardApi::new(base_url, Some(options))?,
        })
    }
}

impl StatusProbe for HttpStatusProbe {
    async fn check(&self) -> bool {
        self.api.probe_statistics().await
    }
}

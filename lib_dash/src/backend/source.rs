//! Cache-checked, never-raising data source over the aggregation endpoint.

use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use super::apicall::DashboardApi;
use crate::engine::cache::TtlCache;
use crate::engine::fallback::FallbackProvider;
use crate::engine::resource::{ResourceKind, ResourceValue};
use crate::engine::scheduler::DataSource;

/// Adapter that turns fallible HTTP fetches into the engine's infallible
/// [`DataSource`] contract.
///
/// Order of operations per fetch: cache consult (a hit short-circuits the
/// network and keeps its original provenance and timestamp), then the live
/// request, then fallback substitution. Centralizing the failure handling
/// here leaves the scheduler free to treat every fetch as pure coordination.
pub struct BackendSource {
    api: DashboardApi,
    cache: Mutex<TtlCache>,
    fallback: FallbackProvider,
}

impl BackendSource {
    pub fn new(api: DashboardApi, cache_ttl: Duration) -> Self {
        Self {
            api,
            cache: Mutex::new(TtlCache::new(cache_ttl)),
            fallback: FallbackProvider,
        }
    }
}

impl DataSource for BackendSource {
    async fn fetch(&self, resource: ResourceKind) -> ResourceValue {
        if let Some(hit) = self
            .cache
            .lock()
            .expect("cache lock poisoned")
            .get(resource.key())
        {
            debug!(resource = %resource, "serving cached value");
            return hit;
        }

        match self.api.fetch_resource(resource).await {
            Ok(payload) => {
                let value = ResourceValue::live(resource, payload);
                self.cache
                    .lock()
                    .expect("cache lock poisoned")
                    .set(resource.key(), value.clone());
                value
            }
            Err(error) => {
                warn!(resource = %resource, %error, "live fetch failed, substituting fallback");
                self.fallback.value(resource)
            }
        }
    }
}

//! Time-boxed key/value store for slow-changing lookups.
//!
//! Staleness is checked only at read time against a monotonic clock; there is
//! no eviction task. A stale entry is dropped when its key is next written.
//! Last write wins, which is acceptable because values are idempotent
//! re-fetches of the same external resource.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::engine::resource::ResourceValue;

struct CacheEntry {
    value: ResourceValue,
    stored_at: Instant,
}

/// In-process TTL cache keyed by resource name.
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    /// A `ttl` of zero disables caching entirely: every read is absent.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the stored value if its age is strictly below the TTL.
    pub fn get(&self, key: &str) -> Option<ResourceValue> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Stores or overwrites the value for `key`, stamped now. Overwriting is
    /// also how a stale entry for the key leaves the map.
    pub fn set(&mut self, key: &str, value: ResourceValue) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

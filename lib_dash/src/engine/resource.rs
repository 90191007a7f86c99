//! Resource identity and the timestamped, provenance-tagged values that flow
//! from the data source to the render sink.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named unit of dashboard data.
///
/// Identity is stable for the life of the process; only the *value* behind a
/// resource is refreshed over time. The declaration order of the variants is
/// the render order of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Kpis,
    Charts,
    Lists,
    ThreatLevel,
    Countries,
}

impl ResourceKind {
    /// Every resource, in render order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Kpis,
        ResourceKind::Charts,
        ResourceKind::Lists,
        ResourceKind::ThreatLevel,
        ResourceKind::Countries,
    ];

    /// Stable string key, also used as the cache key.
    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Kpis => "kpis",
            ResourceKind::Charts => "charts",
            ResourceKind::Lists => "lists",
            ResourceKind::ThreatLevel => "threat-level",
            ResourceKind::Countries => "countries",
        }
    }

    /// Sub-path of the backend aggregation endpoint for this resource.
    pub fn path(self) -> &'static str {
        // The backend routes mirror the resource keys one-to-one.
        self.key()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a [`ResourceValue`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fetched from the backend during this or a recent cycle.
    Live,
    /// Substituted from the static fallback datasets.
    Fallback,
}

/// The structured payload for a resource at a point in time.
///
/// Payloads travel as raw JSON; the engine never depends on any
/// resource-specific shape beyond "it is a JSON document".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceValue {
    pub resource: ResourceKind,
    pub payload: Value,
    pub provenance: Provenance,
    pub fetched_at: DateTime<Utc>,
}

impl ResourceValue {
    /// Wraps a freshly fetched payload, stamped with the current time.
    pub fn live(resource: ResourceKind, payload: Value) -> Self {
        Self {
            resource,
            payload,
            provenance: Provenance::Live,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.provenance == Provenance::Live
    }
}

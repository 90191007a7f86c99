//! Deterministic static datasets served when live data is unavailable.
//!
//! Pure and infallible: the same resource name always yields the same
//! payload content, tagged `fallback` and stamped at call time. The numbers
//! are a plausible snapshot, good enough to keep every widget populated
//! while the backend is away.

use chrono::Utc;
use serde_json::{Value, json};

use crate::engine::resource::{Provenance, ResourceKind, ResourceValue};

/// Supplier of the static per-resource datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    /// Builds the fallback [`ResourceValue`] for `resource`.
    pub fn value(&self, resource: ResourceKind) -> ResourceValue {
        ResourceValue {
            resource,
            payload: self.payload(resource),
            provenance: Provenance::Fallback,
            fetched_at: Utc::now(),
        }
    }

    /// The raw static payload, without provenance wrapping.
    pub fn payload(&self, resource: ResourceKind) -> Value {
        match resource {
            ResourceKind::Kpis => json!({
                "critical_cves": { "total": 47, "change": "+3", "period": "last 24h" },
                "cisa_alerts": { "total": 12, "change": "+2", "period": "this week" },
                "cert_incidents": { "total": 4127, "change": "+31", "period": "incidents" },
                "malware_samples": { "total": 3540, "change": "+89", "period": "last 24h" }
            }),
            ResourceKind::Charts => json!({
                "severity": [
                    { "label": "Critical", "value": 156, "color": "#ef4444" },
                    { "label": "High", "value": 234, "color": "#f97316" },
                    { "label": "Medium", "value": 189, "color": "#eab308" },
                    { "label": "Low", "value": 98, "color": "#22c55e" }
                ],
                "malware": [
                    { "label": "Trojan", "value": 342, "color": "#8b5cf6" },
                    { "label": "Ransomware", "value": 156, "color": "#ef4444" },
                    { "label": "Backdoor", "value": 234, "color": "#f97316" },
                    { "label": "Spyware", "value": 189, "color": "#eab308" },
                    { "label": "Other", "value": 987, "color": "#6b7280" }
                ],
                "countries": [
                    { "label": "United States", "value": 423, "color": "#3b82f6" },
                    { "label": "China", "value": 387, "color": "#ef4444" },
                    { "label": "Russia", "value": 298, "color": "#f97316" },
                    { "label": "Brazil", "value": 156, "color": "#22c55e" },
                    { "label": "Other", "value": 283, "color": "#6b7280" }
                ],
                "trends": {
                    "labels": ["09-18", "09-19", "09-20", "09-21", "09-22", "09-23", "09-24"],
                    "datasets": [
                        { "label": "CVEs", "data": [120, 135, 128, 142, 156, 149, 163], "color": "#ef4444" },
                        { "label": "Malware", "data": [1200, 1250, 1180, 1320, 1450, 1380, 1520], "color": "#8b5cf6" },
                        { "label": "Alerts", "data": [80, 85, 78, 92, 98, 94, 105], "color": "#f97316" }
                    ]
                },
                "sectors": [
                    { "label": "Healthcare", "value": 28, "color": "#ef4444" },
                    { "label": "Finance", "value": 24, "color": "#f97316" },
                    { "label": "Government", "value": 18, "color": "#eab308" },
                    { "label": "Education", "value": 15, "color": "#22c55e" },
                    { "label": "Energy", "value": 10, "color": "#3b82f6" },
                    { "label": "Other", "value": 5, "color": "#6b7280" }
                ]
            }),
            ResourceKind::Lists => json!({
                "threat_groups": [],
                "cves": [],
                "cisa_alerts": [],
                "malware_analysis": [],
                "cyber_news": []
            }),
            ResourceKind::ThreatLevel => json!({
                "level": "MODERATE",
                "description": "Continuous monitoring",
                "metrics": {
                    "critical_cves": "47",
                    "active_exploits": "12",
                    "new_malware": "89"
                }
            }),
            ResourceKind::Countries => json!([
                { "name": "United States", "threats": 423, "percentage": 28 },
                { "name": "China", "threats": 387, "percentage": 25 },
                { "name": "Russia", "threats": 298, "percentage": 19 },
                { "name": "Brazil", "threats": 156, "percentage": 10 },
                { "name": "Other", "threats": 283, "percentage": 18 }
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_are_deterministic() {
        let provider = FallbackProvider;
        for resource in ResourceKind::ALL {
            let first = provider.value(resource);
            let second = provider.value(resource);
            assert_eq!(first.payload, second.payload, "{resource} payload drifted");
            assert_eq!(first.provenance, Provenance::Fallback);
        }
    }

    #[test]
    fn every_resource_has_a_payload() {
        let provider = FallbackProvider;
        for resource in ResourceKind::ALL {
            assert!(!provider.payload(resource).is_null());
        }
    }
}

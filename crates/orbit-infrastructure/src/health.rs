//! Health check aggregation
//!
//! Aggregates per-datasource liveness probes into a single response for
//! the health endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::registry::DatasourceRegistry;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational
    Up,
    /// Operational with failing dependencies
    Degraded,
    /// Not operational
    Down,
}

impl HealthStatus {
    /// Whether the status indicates full health
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Name of the probed component (datasource cache key)
    pub name: String,
    /// Probe result
    pub status: HealthStatus,
    /// Probe duration in milliseconds
    pub response_time_ms: u64,
}

/// Overall health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: down when every check failed, degraded when some
    /// did, up otherwise
    pub status: HealthStatus,
    /// Timestamp of the health check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Individual results keyed by component name
    pub checks: HashMap<String, HealthCheck>,
}

/// Probe every pooled datasource and aggregate the results
pub async fn check_datasources(registry: &DatasourceRegistry) -> HealthResponse {
    let started = Instant::now();
    let results = registry.health_check_all().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let mut checks = HashMap::new();
    let mut healthy = 0usize;
    for (name, ok) in &results {
        checks.insert(
            name.clone(),
            HealthCheck {
                name: name.clone(),
                status: if *ok { HealthStatus::Up } else { HealthStatus::Down },
                response_time_ms: elapsed_ms,
            },
        );
        if *ok {
            healthy += 1;
        }
    }

    let status = if results.is_empty() || healthy == results.len() {
        HealthStatus::Up
    } else if healthy == 0 {
        HealthStatus::Down
    } else {
        HealthStatus::Degraded
    };

    HealthResponse {
        status,
        timestamp: chrono::Utc::now(),
        checks,
    }
}

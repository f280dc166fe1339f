//! Health, readiness and liveness reporting

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A downstream component whose availability gates readiness.
#[async_trait]
pub trait ComponentCheck: Send + Sync {
    /// Key reported in readiness details
    fn name(&self) -> &str;

    /// Whether the component can serve traffic right now
    async fn check(&self) -> bool;
}

/// Database connectivity check.
///
/// Persistence is not wired in yet, so this always reports available.
#[derive(Debug, Default, Clone)]
pub struct DatabaseCheck;

pub const DATABASE_COMPONENT: &str = "database";

#[async_trait]
impl ComponentCheck for DatabaseCheck {
    fn name(&self) -> &str {
        DATABASE_COMPONENT
    }

    async fn check(&self) -> bool {
        true
    }
}

/// Overall service status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// The service keeps answering without its database, so a failed
    /// database check degrades rather than fails it.
    pub fn from_database(database_ok: bool) -> Self {
        if database_ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub database: bool,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(default)]
    pub details: BTreeMap<String, bool>,
}

impl ReadinessResponse {
    /// Ready only when every component is.
    pub fn from_details(details: BTreeMap<String, bool>) -> Self {
        let ready = details.values().all(|ok| *ok);
        Self { ready, details }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub alive: bool,
}

impl LivenessResponse {
    pub fn alive() -> Self {
        Self { alive: true }
    }
}

/// Run every check and collect results by component name.
pub async fn run_checks(checks: &[Arc<dyn ComponentCheck>]) -> BTreeMap<String, bool> {
    let mut details = BTreeMap::new();
    for check in checks {
        let ok = check.check().await;
        if !ok {
            tracing::warn!(component = check.name(), "Component check failed");
        }
        details.insert(check.name().to_string(), ok);
    }
    details
}

//! In-memory incident store

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, IncidentId, PortError};
use domain_incident::{HistoryEntry, Incident, IncidentStatus, IncidentStore};

use crate::error::SimError;
use crate::seed;

/// Keeps incidents in a map for the life of the process
#[derive(Debug, Default)]
pub struct InMemoryIncidentStore {
    incidents: RwLock<HashMap<IncidentId, Incident>>,
    archive: Vec<HistoryEntry>,
    latency: Duration,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose archive holds the demo history
    pub fn seeded() -> Self {
        Self {
            archive: seed::archived_history(),
            ..Self::default()
        }
    }

    /// Delays every save by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn len(&self) -> usize {
        self.incidents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl DomainPort for InMemoryIncidentStore {}

#[async_trait]
impl HealthCheckable for InMemoryIncidentStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let count = self.incidents.read().await.len();
        HealthCheckResult {
            latency_ms: start.elapsed().as_millis() as u64,
            message: Some(format!("{count} incidents in memory")),
            ..HealthCheckResult::healthy("in-memory-incident-store")
        }
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    #[instrument(skip(self, incident), fields(incident_id = %incident.id))]
    async fn save(&self, incident: &Incident) -> Result<(), PortError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.incidents
            .write()
            .await
            .insert(incident.id, incident.clone());
        debug!(status = %incident.status, "Incident saved");
        Ok(())
    }

    async fn get(&self, id: IncidentId) -> Result<Incident, PortError> {
        self.incidents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| SimError::IncidentNotFound(id.to_string()).into())
    }

    async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, PortError> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .read()
            .await
            .values()
            .filter(|incident| status.map_or(true, |s| incident.status == s))
            .cloned()
            .collect();
        incidents.sort_by_key(|incident| incident.created_at);
        Ok(incidents)
    }

    async fn archived(&self) -> Result<Vec<HistoryEntry>, PortError> {
        Ok(self.archive.clone())
    }
}

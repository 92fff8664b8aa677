//! Simulated assignment desk

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use core_kernel::{
    AdapterHealth, AdjusterId, DomainPort, HealthCheckResult, HealthCheckable, IncidentId, OperationMetadata,
    PortError,
};
use domain_dispatch::AssignmentDesk;

use crate::error::SimError;

/// Accepts assignments after a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedAssignmentDesk {
    latency: Duration,
    fail: bool,
}

impl SimulatedAssignmentDesk {
    pub fn new(latency: Duration) -> Self {
        Self { latency, fail: false }
    }

    /// Refuse every confirmation
    pub fn failing(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }
}

impl DomainPort for SimulatedAssignmentDesk {}

#[async_trait]
impl HealthCheckable for SimulatedAssignmentDesk {
    async fn health_check(&self) -> HealthCheckResult {
        let mut result = HealthCheckResult::healthy("simulated-assignment-desk");
        if self.fail {
            result.status = AdapterHealth::Degraded;
            result.message = Some("refusing assignments".to_string());
        }
        result
    }
}

#[async_trait]
impl AssignmentDesk for SimulatedAssignmentDesk {
    #[instrument(skip_all, fields(adjuster_id = %adjuster_id))]
    async fn confirm(
        &self,
        incident_id: IncidentId,
        adjuster_id: &AdjusterId,
        metadata: &OperationMetadata,
    ) -> Result<(), PortError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail {
            return Err(SimError::injected("assignment desk").into());
        }
        info!(%incident_id, correlation_id = ?metadata.correlation_id, "Assignment confirmed");
        Ok(())
    }
}

//! Simulation error types

use thiserror::Error;

use core_kernel::PortError;

/// Failures raised by the simulated adapters
#[derive(Debug, Error)]
pub enum SimError {
    /// Failure switched on through configuration
    #[error("Simulated failure: {0}")]
    Injected(String),

    #[error("Incident not found: {0}")]
    IncidentNotFound(String),

    /// A scheduled response did not fit in the session
    #[error("Could not schedule response: {0}")]
    Scheduling(String),
}

impl SimError {
    pub fn injected(what: impl Into<String>) -> Self {
        SimError::Injected(what.into())
    }
}

impl From<SimError> for PortError {
    fn from(error: SimError) -> Self {
        match error {
            SimError::Injected(service) => PortError::ServiceUnavailable { service },
            SimError::IncidentNotFound(id) => PortError::not_found("Incident", id),
            SimError::Scheduling(message) => PortError::internal(message),
        }
    }
}

//! Incident domain errors

use thiserror::Error;

use core_kernel::{AdjusterId, PortError};

/// Errors that can occur in the incident domain
#[derive(Debug, Error)]
pub enum IncidentError {
    #[error("Please fill in all required fields: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Incident not found: {0}")]
    NotFound(String),

    #[error("Incident already has adjuster {0} assigned")]
    AdjusterAlreadyAssigned(AdjusterId),

    #[error("Incident is closed")]
    Closed,

    #[error(transparent)]
    Port(#[from] PortError),
}

impl IncidentError {
    /// Names of the missing required fields, if this is a validation failure
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            IncidentError::Validation { missing } => missing,
            _ => &[],
        }
    }
}

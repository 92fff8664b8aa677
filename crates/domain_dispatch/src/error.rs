//! Dispatch domain errors

use thiserror::Error;

use core_kernel::{AdjusterId, IncidentId, PortError};
use domain_incident::IncidentError;

/// Errors that can occur in the dispatch domain
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Adjuster {adjuster_id} is {state}, only available adjusters can be assigned")]
    InvalidState { adjuster_id: AdjusterId, state: String },

    #[error("Incident already has adjuster {existing} assigned")]
    AlreadyAssigned { existing: AdjusterId },

    #[error("An assignment is already in progress for this incident")]
    AssignmentInFlight,

    #[error("No tentative assignment for adjuster {0}")]
    NoTentativeAssignment(AdjusterId),

    #[error("Adjuster not on roster: {0}")]
    UnknownAdjuster(AdjusterId),

    #[error("No dispatch session for incident {0}")]
    IncidentNotFound(IncidentId),

    #[error("This incident is already being submitted")]
    SubmissionInFlight,

    #[error("Dispatch session has been closed")]
    SessionClosed,

    #[error(transparent)]
    Incident(#[from] IncidentError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl DispatchError {
    /// True for errors caused by the request conflicting with current state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidState { .. }
                | DispatchError::AlreadyAssigned { .. }
                | DispatchError::AssignmentInFlight
                | DispatchError::NoTentativeAssignment(_)
                | DispatchError::SubmissionInFlight
                | DispatchError::SessionClosed
        )
    }
}

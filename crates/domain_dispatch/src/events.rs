//! Domain events emitted by the roster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AdjusterId, AssignmentId, IncidentId};
use crate::adjuster::ResponseOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEvent {
    /// A pending adjuster answered
    ResponseRecorded {
        incident_id: IncidentId,
        adjuster_id: AdjusterId,
        outcome: ResponseOutcome,
        eta_minutes: Option<u32>,
        timestamp: DateTime<Utc>,
    },

    AssignmentRequested {
        incident_id: IncidentId,
        adjuster_id: AdjusterId,
        timestamp: DateTime<Utc>,
    },

    AssignmentConfirmed {
        incident_id: IncidentId,
        adjuster_id: AdjusterId,
        assignment_id: AssignmentId,
        timestamp: DateTime<Utc>,
    },

    AssignmentRolledBack {
        incident_id: IncidentId,
        adjuster_id: AdjusterId,
        timestamp: DateTime<Utc>,
    },
}

impl RosterEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            RosterEvent::ResponseRecorded { .. } => "roster.response_recorded",
            RosterEvent::AssignmentRequested { .. } => "roster.assignment_requested",
            RosterEvent::AssignmentConfirmed { .. } => "roster.assignment_confirmed",
            RosterEvent::AssignmentRolledBack { .. } => "roster.assignment_rolled_back",
        }
    }

    pub fn adjuster_id(&self) -> &AdjusterId {
        match self {
            RosterEvent::ResponseRecorded { adjuster_id, .. }
            | RosterEvent::AssignmentRequested { adjuster_id, .. }
            | RosterEvent::AssignmentConfirmed { adjuster_id, .. }
            | RosterEvent::AssignmentRolledBack { adjuster_id, .. } => adjuster_id,
        }
    }
}

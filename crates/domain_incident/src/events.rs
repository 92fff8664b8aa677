//! Domain events emitted by the Incident record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AdjusterId, IncidentId};
use crate::incident::IncidentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentEvent {
    /// Intake accepted the report
    Reported {
        incident_id: IncidentId,
        loss_location: String,
        timestamp: DateTime<Utc>,
    },

    StatusChanged {
        incident_id: IncidentId,
        from: IncidentStatus,
        to: IncidentStatus,
        timestamp: DateTime<Utc>,
    },

    /// An adjuster assignment was confirmed
    AdjusterAssigned {
        incident_id: IncidentId,
        adjuster_id: AdjusterId,
        timestamp: DateTime<Utc>,
    },
}

impl IncidentEvent {
    pub fn incident_id(&self) -> IncidentId {
        match self {
            IncidentEvent::Reported { incident_id, .. }
            | IncidentEvent::StatusChanged { incident_id, .. }
            | IncidentEvent::AdjusterAssigned { incident_id, .. } => *incident_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            IncidentEvent::Reported { .. } => "incident.reported",
            IncidentEvent::StatusChanged { .. } => "incident.status_changed",
            IncidentEvent::AdjusterAssigned { .. } => "incident.adjuster_assigned",
        }
    }
}

//! Assignment of an adjuster to an incident

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AdjusterId, AssignmentId, IncidentId};

/// Binding of one incident to one available adjuster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub incident_id: IncidentId,
    pub adjuster_id: AdjusterId,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(incident_id: IncidentId, adjuster_id: AdjusterId, assigned_at: DateTime<Utc>) -> Self {
        Self {
            id: AssignmentId::new_v7(),
            incident_id,
            adjuster_id,
            assigned_at,
        }
    }
}

/// Where a roster stands on assignment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum AssignmentSlot {
    #[default]
    Open,
    /// Marked locally, waiting for the assignment desk
    Tentative(AdjusterId),
    Confirmed(Assignment),
}

//! Incident record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use core_kernel::{AdjusterId, IncidentId};
use crate::error::IncidentError;
use crate::events::IncidentEvent;
use crate::intake::IncidentReport;

/// Incident status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Adjusters are being contacted or are en route
    Active,
    /// Waiting on resolution
    Pending,
    /// Closed
    Closed,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IncidentStatus::Active => "active",
            IncidentStatus::Pending => "pending",
            IncidentStatus::Closed => "closed",
        })
    }
}

/// A reported incident requiring adjuster dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Unique identifier
    pub id: IncidentId,
    /// Human-facing incident number
    pub incident_number: String,
    /// Customer / client
    pub customer_name: String,
    pub caller_name: Option<String>,
    pub caller_number: String,
    pub driver_name: Option<String>,
    pub driver_number: Option<String>,
    /// Where the loss happened
    pub loss_location: String,
    /// Free-text description of the accident
    pub description: String,
    pub status: IncidentStatus,
    /// Adjuster bound to this incident, by roster key
    pub assigned_adjuster: Option<AdjusterId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<IncidentEvent>,
}

impl Incident {
    pub(crate) fn from_report(report: IncidentReport, reported_at: DateTime<Utc>) -> Self {
        let id = IncidentId::new_v7();
        let loss_location = report.loss_location.trim().to_string();

        Self {
            id,
            incident_number: generate_incident_number(reported_at),
            customer_name: report.customer_name.trim().to_string(),
            caller_name: non_blank(report.caller_name),
            caller_number: report.caller_number.trim().to_string(),
            driver_name: non_blank(report.driver_name),
            driver_number: non_blank(report.driver_number),
            loss_location: loss_location.clone(),
            description: report.accident_description.trim().to_string(),
            status: IncidentStatus::Active,
            assigned_adjuster: None,
            created_at: reported_at,
            updated_at: reported_at,
            events: vec![IncidentEvent::Reported {
                incident_id: id,
                loss_location,
                timestamp: reported_at,
            }],
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<IncidentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Short title used in outbound alerts
    pub fn title(&self) -> String {
        let first_line = self.description.lines().next().unwrap_or_default();
        let mut title: String = first_line.chars().take(60).collect();
        if first_line.chars().count() > 60 {
            title.push('…');
        }
        title
    }

    pub fn is_closed(&self) -> bool {
        self.status == IncidentStatus::Closed
    }

    /// Updates the status
    pub fn update_status(
        &mut self,
        status: IncidentStatus,
        at: DateTime<Utc>,
    ) -> Result<(), IncidentError> {
        if !self.can_transition_to(status) {
            return Err(IncidentError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        let from = self.status;
        self.status = status;
        self.updated_at = at;
        self.events.push(IncidentEvent::StatusChanged {
            incident_id: self.id,
            from,
            to: status,
            timestamp: at,
        });
        Ok(())
    }

    /// Records the confirmed adjuster
    ///
    /// Recording the same adjuster twice is accepted and changes nothing.
    pub fn record_assignment(
        &mut self,
        adjuster_id: AdjusterId,
        at: DateTime<Utc>,
    ) -> Result<(), IncidentError> {
        if self.is_closed() {
            return Err(IncidentError::Closed);
        }
        match &self.assigned_adjuster {
            Some(existing) if *existing == adjuster_id => return Ok(()),
            Some(existing) => {
                return Err(IncidentError::AdjusterAlreadyAssigned(existing.clone()));
            }
            None => {}
        }
        self.assigned_adjuster = Some(adjuster_id.clone());
        self.updated_at = at;
        self.events.push(IncidentEvent::AdjusterAssigned {
            incident_id: self.id,
            adjuster_id,
            timestamp: at,
        });
        Ok(())
    }

    fn can_transition_to(&self, target: IncidentStatus) -> bool {
        use IncidentStatus::*;
        matches!(
            (self.status, target),
            (Active, Pending) |
            (Pending, Active) |
            (Active, Closed) |
            (Pending, Closed)
        )
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Last number handed out; numbers strictly increase within a process
static LAST_INCIDENT_NUMBER: AtomicI64 = AtomicI64::new(0);

fn generate_incident_number(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().rem_euclid(10_000_000_000);
    let previous = LAST_INCIDENT_NUMBER
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    format!("INC-{}", millis.max(previous + 1))
}

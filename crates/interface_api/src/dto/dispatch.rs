//! Roster, response and assignment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{AssignmentId, IncidentId, MessageId, Timezone};
use domain_dispatch::communication::StatusTone;
use domain_dispatch::{
    Adjuster, Assignment, Channel, CommunicationSummary, Direction, IncidentDetails, Message,
    MessageStatus, ReportOutcome, ResponseOutcome, RosterView,
};

use crate::dto::incident::IncidentResponse;

/// Inbound adjuster answer
#[derive(Debug, Deserialize, Validate)]
pub struct ReportResponseRequest {
    #[validate(length(min = 1, max = 64))]
    pub adjuster_id: String,
    pub outcome: ResponseOutcome,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignRequest {
    #[validate(length(min = 1, max = 64))]
    pub adjuster_id: String,
}

#[derive(Debug, Serialize)]
pub struct AdjusterResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// e.g. "15 miles"
    pub distance: String,
    pub distance_miles: Decimal,
    pub response: String,
    pub eta_minutes: Option<u32>,
    /// e.g. "just now"
    pub response_time: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl AdjusterResponse {
    pub fn new(adjuster: &Adjuster, now: DateTime<Utc>) -> Self {
        Self {
            id: adjuster.id.to_string(),
            name: adjuster.name.clone(),
            phone: adjuster.phone.clone(),
            distance: adjuster.distance.to_string(),
            distance_miles: adjuster.distance.as_miles(),
            response: adjuster.state().to_string(),
            eta_minutes: adjuster.eta_minutes(),
            response_time: adjuster.response_time(now),
            responded_at: adjuster.responded_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub available: Vec<AdjusterResponse>,
    pub pending: Vec<AdjusterResponse>,
    pub unavailable: Vec<AdjusterResponse>,
    pub assigned_adjuster_id: Option<String>,
    /// Adjuster whose assignment is being confirmed
    pub confirming_adjuster_id: Option<String>,
}

impl RosterResponse {
    pub fn new(view: &RosterView, now: DateTime<Utc>) -> Self {
        let render = |list: &[Adjuster]| -> Vec<AdjusterResponse> {
            list.iter().map(|a| AdjusterResponse::new(a, now)).collect()
        };
        Self {
            available: render(&view.available),
            pending: render(&view.pending),
            unavailable: render(&view.unavailable),
            assigned_adjuster_id: view.assigned.as_ref().map(|id| id.to_string()),
            confirming_adjuster_id: view.tentative.as_ref().map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponseResponse {
    pub outcome: ReportOutcome,
    pub roster: RosterResponse,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    pub incident_id: IncidentId,
    pub adjuster_id: String,
    pub assigned_at: DateTime<Utc>,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            incident_id: assignment.incident_id,
            adjuster_id: assignment.adjuster_id.to_string(),
            assigned_at: assignment.assigned_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: MessageId,
    pub adjuster_id: String,
    pub adjuster_name: String,
    pub adjuster_phone: String,
    pub channel: Channel,
    pub direction: Direction,
    pub status: MessageStatus,
    pub tone: StatusTone,
    pub timestamp: DateTime<Utc>,
    pub timestamp_local: String,
    pub content: Option<String>,
    pub duration_secs: Option<u32>,
}

impl MessageResponse {
    pub fn new(message: Message, tz: &Timezone) -> Self {
        Self {
            id: message.id,
            adjuster_id: message.adjuster_id.to_string(),
            adjuster_name: message.adjuster_name,
            adjuster_phone: message.adjuster_phone,
            channel: message.channel,
            direction: message.direction,
            tone: message.status.tone(),
            status: message.status,
            timestamp_local: tz.format_short(message.timestamp),
            timestamp: message.timestamp,
            content: message.content,
            duration_secs: message.duration_secs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IncidentDetailResponse {
    pub incident: IncidentResponse,
    pub assigned_adjuster: Option<AdjusterResponse>,
    pub roster: RosterResponse,
    pub messages: Vec<MessageResponse>,
    pub summary: CommunicationSummary,
}

impl IncidentDetailResponse {
    pub fn new(details: IncidentDetails, tz: &Timezone, now: DateTime<Utc>) -> Self {
        Self {
            assigned_adjuster: details
                .assigned_adjuster
                .as_ref()
                .map(|a| AdjusterResponse::new(a, now)),
            roster: RosterResponse::new(&details.roster, now),
            messages: details
                .messages
                .into_iter()
                .map(|m| MessageResponse::new(m, tz))
                .collect(),
            summary: details.summary,
            incident: IncidentResponse::new(details.incident, tz),
        }
    }
}

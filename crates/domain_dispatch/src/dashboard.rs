//! Dashboard projection

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{IncidentId, Timezone};
use domain_incident::{Incident, IncidentStatus};

use crate::communication::{Channel, MessageStatus};
use crate::session::SessionSnapshot;

/// Urgency badge shown on a dashboard row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardBadge {
    AdjusterAssigned,
    WaitingForResponses,
    UrgentNoResponses,
}

impl DashboardBadge {
    /// Assigned wins; otherwise a row with no answers at all is urgent
    pub fn classify(assigned: bool, responses: usize) -> Self {
        match (assigned, responses) {
            (true, _) => DashboardBadge::AdjusterAssigned,
            (false, 0) => DashboardBadge::UrgentNoResponses,
            (false, _) => DashboardBadge::WaitingForResponses,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardBadge::AdjusterAssigned => "Adjuster Assigned",
            DashboardBadge::WaitingForResponses => "Waiting for responses",
            DashboardBadge::UrgentNoResponses => "Urgent - No responses",
        }
    }
}

/// One incident row on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardIncident {
    pub incident_id: IncidentId,
    pub incident_number: String,
    pub customer_name: String,
    pub loss_location: String,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    pub assigned_adjuster: Option<String>,
    pub responses: usize,
    pub pending: usize,
    pub badge: DashboardBadge,
    pub badge_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_incidents: usize,
    /// Active incidents nobody has been assigned to yet
    pub awaiting_adjuster: usize,
    pub calls_today: usize,
    /// Calls today that an adjuster picked up
    pub calls_connected_today: usize,
    pub sms_today: usize,
    pub sms_delivered_today: usize,
    /// Most recent first
    pub recent: Vec<DashboardIncident>,
}

impl DashboardStats {
    pub const RECENT_LIMIT: usize = 10;

    /// Compiles the dashboard from incidents paired with their session, if any
    ///
    /// "Today" is `today` as seen in `tz`.
    pub fn compile(
        incidents: &[(Incident, Option<SessionSnapshot>)],
        today: NaiveDate,
        tz: &Timezone,
    ) -> Self {
        let mut stats = DashboardStats::default();
        for (incident, snapshot) in incidents {
            if incident.status == IncidentStatus::Active {
                stats.active_incidents += 1;
                if incident.assigned_adjuster.is_none() {
                    stats.awaiting_adjuster += 1;
                }
            }
            if let Some(snapshot) = snapshot {
                let log = &snapshot.log;
                stats.calls_today += log.count_on(Channel::Call, today, tz);
                stats.calls_connected_today += log.count_on_where(Channel::Call, today, tz, |m| {
                    matches!(m.status, MessageStatus::Sent | MessageStatus::Delivered)
                });
                stats.sms_today += log.count_on(Channel::Sms, today, tz);
                stats.sms_delivered_today += log.count_on_where(Channel::Sms, today, tz, |m| {
                    m.status == MessageStatus::Delivered
                });
            }
        }

        let mut recent: Vec<&(Incident, Option<SessionSnapshot>)> = incidents.iter().collect();
        recent.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        stats.recent = recent
            .into_iter()
            .take(Self::RECENT_LIMIT)
            .map(|(incident, snapshot)| {
                let responses = snapshot.as_ref().map_or(0, |s| s.view.responded());
                let badge =
                    DashboardBadge::classify(incident.assigned_adjuster.is_some(), responses);
                DashboardIncident {
                    incident_id: incident.id,
                    incident_number: incident.incident_number.clone(),
                    customer_name: incident.customer_name.clone(),
                    loss_location: incident.loss_location.clone(),
                    status: incident.status,
                    created_at: incident.created_at,
                    assigned_adjuster: snapshot
                        .as_ref()
                        .and_then(|s| s.assigned_adjuster())
                        .map(|a| a.name.clone()),
                    responses,
                    pending: snapshot.as_ref().map_or(0, |s| s.view.pending.len()),
                    badge,
                    badge_label: badge.label().to_string(),
                }
            })
            .collect();
        stats
    }
}

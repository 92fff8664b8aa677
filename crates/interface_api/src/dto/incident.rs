//! Incident DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{IncidentId, Timezone};
use domain_incident::{Incident, IncidentReport, IncidentStatus};

/// Intake form
///
/// Absent fields deserialize as empty so the intake validator can name
/// every missing one at once.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateIncidentRequest {
    #[validate(length(max = 200))]
    pub customer_name: String,
    #[validate(length(max = 200))]
    pub caller_name: String,
    #[validate(length(max = 40))]
    pub caller_number: String,
    #[validate(length(max = 200))]
    pub driver_name: String,
    #[validate(length(max = 40))]
    pub driver_number: String,
    #[validate(length(max = 500))]
    pub loss_location: String,
    #[validate(length(max = 5000))]
    pub accident_description: String,
}

impl From<CreateIncidentRequest> for IncidentReport {
    fn from(request: CreateIncidentRequest) -> Self {
        IncidentReport {
            customer_name: request.customer_name,
            caller_name: request.caller_name,
            caller_number: request.caller_number,
            driver_name: request.driver_name,
            driver_number: request.driver_number,
            loss_location: request.loss_location,
            accident_description: request.accident_description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: IncidentStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListIncidentsParams {
    /// Without a status, closed incidents are left out
    pub status: Option<IncidentStatus>,
}

#[derive(Debug, Serialize)]
pub struct IncidentResponse {
    pub id: IncidentId,
    pub incident_number: String,
    pub title: String,
    pub customer_name: String,
    pub caller_name: Option<String>,
    pub caller_number: String,
    pub driver_name: Option<String>,
    pub driver_number: Option<String>,
    pub loss_location: String,
    pub description: String,
    pub status: IncidentStatus,
    pub assigned_adjuster_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// `created_at` in the configured zone, e.g. "Oct 15, 3:42 PM"
    pub created_at_local: String,
    pub updated_at: DateTime<Utc>,
}

impl IncidentResponse {
    pub fn new(incident: Incident, tz: &Timezone) -> Self {
        Self {
            title: incident.title(),
            created_at_local: tz.format_short(incident.created_at),
            id: incident.id,
            incident_number: incident.incident_number,
            customer_name: incident.customer_name,
            caller_name: incident.caller_name,
            caller_number: incident.caller_number,
            driver_name: incident.driver_name,
            driver_number: incident.driver_number,
            loss_location: incident.loss_location,
            description: incident.description,
            status: incident.status,
            assigned_adjuster_id: incident.assigned_adjuster.map(|id| id.to_string()),
            created_at: incident.created_at,
            updated_at: incident.updated_at,
        }
    }
}

//! Demo data
//!
//! The roster, response script and archive the simulated world starts with.

use chrono::NaiveDate;
use std::time::Duration;

use core_kernel::{AdjusterId, Distance, IncidentId};
use domain_dispatch::{Adjuster, ResponseOutcome};
use domain_incident::{HistoryEntry, IncidentStatus};

/// Adjusters known to the directory
pub fn demo_roster() -> Vec<Adjuster> {
    vec![
        Adjuster::new("1", "John Smith", "(555) 123-4567", Distance::whole_miles(15)),
        Adjuster::new("2", "Sarah Johnson", "(555) 234-5678", Distance::whole_miles(8)),
        Adjuster::new("3", "Michael Davis", "(555) 345-6789", Distance::whole_miles(22)),
        Adjuster::new("4", "Jessica Williams", "(555) 456-7890", Distance::whole_miles(35)),
        Adjuster::new("5", "Robert Brown", "(555) 567-8901", Distance::whole_miles(12)),
    ]
}

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponse {
    pub adjuster_id: AdjusterId,
    pub outcome: ResponseOutcome,
    pub delay: Duration,
}

impl ScriptedResponse {
    pub fn new(adjuster_id: &str, outcome: ResponseOutcome, delay_ms: u64) -> Self {
        Self {
            adjuster_id: AdjusterId::from(adjuster_id),
            outcome,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// How the demo roster answers a new incident
pub fn demo_script() -> Vec<ScriptedResponse> {
    use ResponseOutcome::*;
    vec![
        ScriptedResponse::new("2", Available, 1000),
        ScriptedResponse::new("1", Available, 2000),
        ScriptedResponse::new("4", Unavailable, 2500),
        ScriptedResponse::new("3", Available, 3000),
        ScriptedResponse::new("5", Available, 5000),
    ]
}

/// Completed incidents that predate the process
pub fn archived_history() -> Vec<HistoryEntry> {
    let rows = [
        ((2023, 10, 15), "Acme Corp", "Los Angeles, CA", "Vehicle collision on highway", "ADJ-1023", "John Smith", (8, 5, 3)),
        ((2023, 10, 12), "TechStart Inc", "San Francisco, CA", "Water damage in office", "ADJ-985", "Sarah Johnson", (5, 4, 2)),
        ((2023, 10, 10), "Global Logistics", "Seattle, WA", "Truck accident - cargo damage", "ADJ-1045", "Michael Davis", (10, 7, 4)),
        ((2023, 10, 8), "Retail Solutions", "Portland, OR", "Storm damage to retail location", "ADJ-876", "Jessica Williams", (6, 5, 3)),
        ((2023, 10, 5), "City Hospital", "Denver, CO", "Plumbing failure - water damage", "ADJ-1102", "Robert Brown", (12, 8, 6)),
    ];

    rows.into_iter()
        .filter_map(|((y, m, d), customer, location, description, adjuster_id, adjuster, (texts, calls, responses))| {
            Some(HistoryEntry {
                incident_id: IncidentId::new(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                customer_name: customer.to_string(),
                location: location.to_string(),
                description: description.to_string(),
                adjuster_id: Some(AdjusterId::from(adjuster_id)),
                adjuster_name: Some(adjuster.to_string()),
                texts_sent: texts,
                calls_made: calls,
                responses,
                status: IncidentStatus::Closed,
            })
        })
        .collect()
}

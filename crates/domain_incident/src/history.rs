//! Incident history and search
//!
//! History rows summarize an incident together with its outreach counters.
//! Search is a case-insensitive substring match over customer, location,
//! description and adjuster name, optionally narrowed by status and date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AdjusterId, IncidentId};
use crate::incident::IncidentStatus;

/// One row of the incident history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub incident_id: IncidentId,
    pub date: NaiveDate,
    pub customer_name: String,
    pub location: String,
    pub description: String,
    pub adjuster_id: Option<AdjusterId>,
    pub adjuster_name: Option<String>,
    pub texts_sent: u32,
    pub calls_made: u32,
    pub responses: u32,
    pub status: IncidentStatus,
}

/// Filter for history searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Free-text term
    pub term: Option<String>,
    pub status: Option<IncidentStatus>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
}

impl HistoryQuery {
    /// Creates a free-text query
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Default::default()
        }
    }

    /// Restricts to a date range
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Restricts to a status
    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the entry satisfies every set criterion
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if self.from.is_some_and(|from| entry.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| entry.date > to) {
            return false;
        }

        let term = match self.term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        let haystacks = [
            Some(entry.customer_name.as_str()),
            Some(entry.location.as_str()),
            Some(entry.description.as_str()),
            entry.adjuster_name.as_deref(),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Filters entries, newest first
pub fn search(entries: &[HistoryEntry], query: &HistoryQuery) -> Vec<HistoryEntry> {
    let mut found: Vec<HistoryEntry> = entries
        .iter()
        .filter(|entry| query.matches(entry))
        .cloned()
        .collect();
    found.sort_by(|a, b| b.date.cmp(&a.date));
    found
}

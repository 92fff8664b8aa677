//! Dashboard and history DTOs

use chrono::NaiveDate;
use serde::Deserialize;

use domain_incident::{HistoryQuery, IncidentStatus};

/// `GET /history` query string
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// Free-text search term
    pub q: Option<String>,
    pub status: Option<IncidentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<HistoryParams> for HistoryQuery {
    fn from(params: HistoryParams) -> Self {
        HistoryQuery {
            term: params.q,
            status: params.status,
            from: params.from,
            to: params.to,
        }
    }
}

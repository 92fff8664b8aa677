//! Dashboard and history handlers

use axum::{
    extract::{Query, State},
    Json,
};

use domain_dispatch::DashboardStats;
use domain_incident::{HistoryEntry, HistoryQuery};

use crate::dto::reports::HistoryParams;
use crate::{error::ApiError, AppState};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.service.dashboard().await?))
}

/// Searches live and archived incidents
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let query: HistoryQuery = params.into();
    Ok(Json(state.service.history(&query).await?))
}

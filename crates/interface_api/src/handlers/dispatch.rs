//! Roster, response and assignment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use core_kernel::AdjusterId;
use domain_dispatch::ReportOutcome;

use crate::dto::dispatch::*;
use crate::{error::ApiError, parse_incident_id, AppState};

/// Categorized roster for an incident
pub async fn get_roster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RosterResponse>, ApiError> {
    let id = parse_incident_id(&id)?;
    let view = state.service.roster(id).await?;
    Ok(Json(RosterResponse::new(&view, state.service.clock().now())))
}

/// Inbound adjuster answer
///
/// Repeated answers are accepted and reported as `already_resolved`.
pub async fn report_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReportResponseRequest>,
) -> Result<Json<ReportResponseResponse>, ApiError> {
    request.validate()?;
    let id = parse_incident_id(&id)?;
    let adjuster_id = AdjusterId::new(request.adjuster_id);

    let outcome = state
        .service
        .report_response(id, &adjuster_id, request.outcome)
        .await?;
    if outcome == ReportOutcome::UnknownAdjuster {
        return Err(ApiError::NotFound(format!(
            "Adjuster {adjuster_id} is not on the roster"
        )));
    }

    let view = state.service.roster(id).await?;
    Ok(Json(ReportResponseResponse {
        outcome,
        roster: RosterResponse::new(&view, state.service.clock().now()),
    }))
}

/// Assigns an available adjuster
pub async fn assign_adjuster(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    request.validate()?;
    let id = parse_incident_id(&id)?;
    let assignment = state
        .service
        .assign(id, &AdjusterId::new(request.adjuster_id))
        .await?;
    Ok(Json(assignment.into()))
}

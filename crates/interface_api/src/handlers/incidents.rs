//! Incident handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::dispatch::IncidentDetailResponse;
use crate::dto::incident::*;
use crate::{error::ApiError, parse_incident_id, AppState};

/// Records a new incident and starts outreach
pub async fn create_incident(
    State(state): State<AppState>,
    Json(request): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    request.validate()?;
    let incident = state.service.submit_incident(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(IncidentResponse::new(incident, &state.timezone)),
    ))
}

/// Lists incidents, open ones unless a status is given
pub async fn list_incidents(
    State(state): State<AppState>,
    Query(params): Query<ListIncidentsParams>,
) -> Result<Json<Vec<IncidentResponse>>, ApiError> {
    let mut incidents = state.service.list_incidents(params.status).await?;
    if params.status.is_none() {
        incidents.retain(|incident| !incident.is_closed());
    }
    Ok(Json(
        incidents
            .into_iter()
            .map(|incident| IncidentResponse::new(incident, &state.timezone))
            .collect(),
    ))
}

/// Incident with roster, assignment and communication log
pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IncidentDetailResponse>, ApiError> {
    let id = parse_incident_id(&id)?;
    let details = state.service.details(id).await?;
    let now = state.service.clock().now();
    Ok(Json(IncidentDetailResponse::new(details, &state.timezone, now)))
}

/// Changes incident status; closing stops the dispatch session
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let id = parse_incident_id(&id)?;
    let incident = state.service.update_status(id, request.status).await?;
    Ok(Json(IncidentResponse::new(incident, &state.timezone)))
}

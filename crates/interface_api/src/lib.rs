//! HTTP API Layer
//!
//! This crate provides the REST API for adjuster dispatch using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for intake, dispatch and reporting
//! - **Middleware**: Tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::simulated(config, Arc::new(SystemClock))?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use core_kernel::{Clock, CoreError, HealthCheckable, IncidentId, Timezone};
use domain_dispatch::{DispatchService, TracingNotifier};
use infra_sim::SimulatedWorld;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::middleware::audit_middleware;
use crate::handlers::{dispatch, health, incidents, reports};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DispatchService>,
    pub config: ApiConfig,
    pub timezone: Timezone,
    pub health_checks: Arc<Vec<Arc<dyn HealthCheckable>>>,
}

impl AppState {
    /// Wires the service over the simulated adapters described by `config`
    pub fn simulated(config: ApiConfig, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        let settings = config.dispatch_settings()?;
        let world = SimulatedWorld::new(&config.simulation(), Arc::clone(&clock));

        let mut service = DispatchService::new(
            world.ports(),
            Arc::new(TracingNotifier),
            clock,
            settings.clone(),
        );
        if let Some(simulator) = world.simulator() {
            service = service.with_simulator(simulator);
        }

        Ok(Self {
            service: Arc::new(service),
            timezone: settings.timezone,
            health_checks: Arc::new(world.health_checks()),
            config,
        })
    }
}

/// Parses an incident id with or without its `INC-` prefix
pub(crate) fn parse_incident_id(raw: &str) -> Result<IncidentId, ApiError> {
    IncidentId::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("Invalid incident id: {raw}")))
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Service, configuration and health checks
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Incident routes
    let incident_routes = Router::new()
        .route("/", post(incidents::create_incident))
        .route("/", get(incidents::list_incidents))
        .route("/:id", get(incidents::get_incident))
        .route("/:id/status", put(incidents::update_status))
        .route("/:id/adjusters", get(dispatch::get_roster))
        .route("/:id/responses", post(dispatch::report_response))
        .route("/:id/assignment", post(dispatch::assign_adjuster));

    let api_routes = Router::new()
        .nest("/incidents", incident_routes)
        .route("/dashboard", get(reports::dashboard))
        .route("/history", get(reports::history))
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

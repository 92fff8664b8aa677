//! Adjuster Dispatch - API Server Binary
//!
//! This binary starts the HTTP API server over the simulated adapters.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin dispatch-api
//!
//! # Run with environment variables
//! DISPATCH_PORT=9090 DISPATCH_SIMULATE_RESPONSES=false cargo run --bin dispatch-api
//! ```
//!
//! # Environment Variables
//!
//! * `DISPATCH_HOST` - Server host (default: 0.0.0.0)
//! * `DISPATCH_PORT` - Server port (default: 8080)
//! * `DISPATCH_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `DISPATCH_TIMEZONE` - IANA zone for local timestamps (default: UTC)
//! * `DISPATCH_SEARCH_RADIUS_MILES` - Notification radius (default: 100)
//! * `DISPATCH_CALL_ADJUSTERS` - Call adjusters after texting (default: true)
//! * `DISPATCH_INTAKE_LATENCY_MS` - Simulated save delay (default: 1000)
//! * `DISPATCH_ASSIGNMENT_LATENCY_MS` - Simulated assignment delay (default: 1500)
//! * `DISPATCH_SIMULATE_RESPONSES` - Scripted adjuster answers (default: true)
//! * `DISPATCH_FAIL_ASSIGNMENTS` - Simulated desk refuses assignments (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use core_kernel::SystemClock;
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, wires the dispatch service
/// and starts the HTTP server. On shutdown every dispatch session is torn
/// down so no scheduled response outlives the server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid DISPATCH_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        simulate_responses = config.simulate_responses,
        "Starting adjuster dispatch API server"
    );

    let state = AppState::simulated(config.clone(), Arc::new(SystemClock))
        .context("Failed to build dispatch service")?;
    let service = Arc::clone(&state.service);

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.shutdown().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

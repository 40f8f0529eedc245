//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the
//! REST server (with OpenAPI/Swagger UI). The workspace's main `wardflow-run`
//! binary is the production entry point.

use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use wardflow_core::{roster, ClinicalStore};

/// Main entry point for the standalone wardflow REST API server
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000). Provides HTTP endpoints for clinical action operations
/// with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `WARDFLOW_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `WARDFLOW_ROSTER`: Path to the patient roster JSON file; when unset the
///   store starts with an empty roster
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the roster file cannot be read or parsed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("wardflow_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("WARDFLOW_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting wardflow REST API on {}", addr);

    let patients = match std::env::var("WARDFLOW_ROSTER") {
        Ok(path) => roster::load_roster(Path::new(&path))?,
        Err(_) => {
            tracing::warn!("WARDFLOW_ROSTER not set; starting with an empty roster");
            Vec::new()
        }
    };

    let store = ClinicalStore::new(patients)?;
    let state = AppState::new(store);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

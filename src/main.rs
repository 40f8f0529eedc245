use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use wardflow_core::{roster, ClinicalStore};

/// Main entry point for the wardflow service
///
/// Loads the patient roster, initialises the clinical store, and serves the
/// REST API (with OpenAPI/Swagger UI) until shutdown. The store lives for
/// the lifetime of the process: state is in-memory for the session and is
/// not persisted on exit.
///
/// # Environment Variables
/// - `WARDFLOW_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `WARDFLOW_ROSTER`: Path to the patient roster JSON file
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wardflow_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("wardflow_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("WARDFLOW_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting wardflow REST on {}", rest_addr);

    let patients = match std::env::var("WARDFLOW_ROSTER") {
        Ok(path) => {
            let roster_path = Path::new(&path);
            if !roster_path.exists() {
                anyhow::bail!("Roster file does not exist: {}", roster_path.display());
            }
            roster::load_roster(roster_path)?
        }
        Err(_) => {
            tracing::warn!("WARDFLOW_ROSTER not set; starting with an empty roster");
            Vec::new()
        }
    };

    let store = ClinicalStore::new(patients)?;
    let state = AppState::new(store);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

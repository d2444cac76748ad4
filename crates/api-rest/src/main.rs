//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when only the HTTP surface is needed. The workspace's main
//! `consult-run` binary serves the same router.

use api_rest::{router, AppState};
use consult_core::config::{
    admin_username_from_env_value, data_dir_from_env_value, logo_path_from_env_value,
};
use consult_core::CoreConfig;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the consultation REST API server.
///
/// # Environment Variables
/// - `CONSULT_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CONSULT_DATA_DIR`: Consultation and credential storage (default: "consult_data")
/// - `CONSULT_ADMIN_USER`: User who can see every consultation (default: "admin")
/// - `CONSULT_LOGO_PATH`: Optional report logo
/// - `API_KEY`: Key required on `/consultations`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the data directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("consult_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CONSULT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("CONSULT_DATA_DIR").ok()),
        &admin_username_from_env_value(std::env::var("CONSULT_ADMIN_USER").ok()),
        logo_path_from_env_value(std::env::var("CONSULT_LOGO_PATH").ok()),
    )?;
    cfg.ensure_data_dir()?;

    let api_key = std::env::var("API_KEY").ok().filter(|k| !k.is_empty());
    if api_key.is_none() {
        tracing::warn!("API_KEY not set; /consultations will reject every request");
    }

    let app = router(AppState {
        cfg: Arc::new(cfg),
        api_key,
    });

    tracing::info!("-- Starting consultation REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

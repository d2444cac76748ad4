use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use consult_core::CoreConfig;
use consult_core::config::{
    admin_username_from_env_value, data_dir_from_env_value, logo_path_from_env_value,
};

/// Main entry point for the consultation service.
///
/// Resolves configuration once, makes sure the data directory exists and serves the REST API
/// with Swagger UI.
///
/// # Environment Variables
/// - `CONSULT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CONSULT_DATA_DIR`: Directory for consultations and credentials (default: "consult_data")
/// - `CONSULT_ADMIN_USER`: User who can see every consultation (default: "admin")
/// - `CONSULT_LOGO_PATH`: Optional logo for reports
/// - `API_KEY`: API key for the consultation endpoints
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("consult=info".parse()?)
                .add_directive("consult_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CONSULT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("CONSULT_DATA_DIR").ok()),
        &admin_username_from_env_value(std::env::var("CONSULT_ADMIN_USER").ok()),
        logo_path_from_env_value(std::env::var("CONSULT_LOGO_PATH").ok()),
    )?;
    cfg.ensure_data_dir()?;
    tracing::info!("++ Data directory: {}", cfg.data_dir().display());

    let api_key = std::env::var("API_KEY").ok().filter(|k| !k.is_empty());
    if api_key.is_none() {
        tracing::warn!("API_KEY not set; consultation endpoints will reject every request");
    }

    let app = router(AppState {
        cfg: Arc::new(cfg),
        api_key,
    });

    tracing::info!("++ Starting consultation REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

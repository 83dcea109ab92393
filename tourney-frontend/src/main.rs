use client_core::observability::logging::init_tracing;
use dotenvy::dotenv;
use std::sync::Arc;
use tourney_frontend::config::get_configuration;
use tourney_frontend::services::api_client::ApiClient;
use tourney_frontend::startup::build_router;
use tourney_frontend::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("tourney-frontend", "info");

    tourney_frontend::services::metrics::init_metrics();

    let api = Arc::new(ApiClient::new(configuration.api.clone())?);
    let state = AppState::new(api);

    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting tourney-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}

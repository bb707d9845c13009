//! Server binary

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use krishi_agent_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = krishi_agent_config::load_settings(None)?;
    // a missing dataset API key is a startup failure, not a per-request one
    settings.validate()?;

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let scan_interval = settings.alerts.scan_interval_secs;

    let state = AppState::from_settings(settings);

    // hourly (by default) alert scan, independent of request handling
    let _alert_shutdown = state
        .alerts
        .start_scan_task(state.market.clone(), scan_interval);

    let router = create_router(state);

    tracing::info!(address = address.as_str(), "Krishi Mitra agent listening");
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("cannot bind {address}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tour_pricing::config::AppConfig;
use tour_pricing::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::new(config.tax_rate)?;
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, tax_rate = %config.tax_rate, "Tour pricing service listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

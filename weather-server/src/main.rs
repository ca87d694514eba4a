//! Weather proxy: attaches the OpenWeather credential server-side and relays
//! current-weather lookups for the widget.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use weather_core::Config;
use weather_server::{AppState, router};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_server=info,weather_core=info,tower_http=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::load()?;
    let app = router(AppState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;
    tracing::info!(addr = %listener.local_addr()?, "Weather proxy listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

//! Whereami - find out which country you are in, and who lives next door.
//!
//! # API Endpoints
//!
//! - `GET /` - Page with the "Where am I?" button
//! - `GET /whereami` - Render the country for a browser-reported position
//! - `GET /country/:name` - Render a named country and one neighbour
//! - `GET /health` - Health check

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use whereami::api::{AppState, router};
use whereami::finder::{CountryFinder, FinderConfig};

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("whereami=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("WHEREAMI_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let mut config = FinderConfig::default();
    if let Ok(url) = env::var("WHEREAMI_COUNTRIES_URL") {
        config.countries_base_url = url;
    }
    if let Ok(url) = env::var("WHEREAMI_GEOCODE_URL") {
        config.geocode_base_url = url;
    }
    if let Some(secs) = env::var("WHEREAMI_NEIGHBOUR_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.neighbour_timeout = Duration::from_secs(secs);
    }

    info!(
        port,
        countries_url = %config.countries_base_url,
        geocode_url = %config.geocode_base_url,
        neighbour_timeout = ?config.neighbour_timeout,
        "Starting whereami"
    );

    let state = AppState {
        finder: CountryFinder::new(config),
    };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Whereami is listening");

    axum::serve(listener, app).await?;

    Ok(())
}

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use delay_server::simrail::{MockSimRailClient, SimRailClient, SimRailConfig, SimRailFeed};
use delay_server::tracking::TrackingConfig;
use delay_server::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("delay_server=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let tracking = tracking_config_from_env();

    // Serve canned data when a mock directory is given
    if let Ok(dir) = std::env::var("SIMRAIL_MOCK_DIR") {
        info!(dir = dir.as_str(), "using mock SimRail feed");
        let feed = MockSimRailClient::from_dir(&dir)?;
        return serve(feed, &tracking, addr).await;
    }

    let config = simrail_config_from_env();
    info!(
        server = config.server_code.as_str(),
        panel = config.panel_url.as_str(),
        api = config.api_url.as_str(),
        "using live SimRail feed"
    );
    let feed = SimRailClient::new(config)?;
    serve(feed, &tracking, addr).await
}

fn simrail_config_from_env() -> SimRailConfig {
    let mut config = match std::env::var("SIMRAIL_SERVER_CODE") {
        Ok(code) => SimRailConfig::new(code),
        Err(_) => SimRailConfig::default(),
    };

    if let Ok(url) = std::env::var("SIMRAIL_PANEL_URL") {
        config = config.with_panel_url(url);
    }
    if let Ok(url) = std::env::var("SIMRAIL_API_URL") {
        config = config.with_api_url(url);
    }
    if let Some(secs) = env_number("SIMRAIL_TIMEOUT_SECS") {
        config = config.with_timeout(secs);
    }
    if let Some(n) = env_number("SIMRAIL_MAX_CONCURRENT") {
        config = config.with_max_concurrent(n);
    }

    config
}

fn tracking_config_from_env() -> TrackingConfig {
    let mut config = TrackingConfig::default();

    if let Some(secs) = env_number("STATION_TTL_SECS") {
        config.station_ttl_secs = secs;
    }
    if let Some(meters) = env_number("MAX_MATCH_DISTANCE_M") {
        config.max_match_distance_m = meters;
    }
    if let Some(mins) = env_number("TREND_WINDOW_MINS") {
        config.trend_window_mins = mins;
    }
    if let Some(mins) = env_number("TREND_THRESHOLD_MINUTES") {
        config.trend_threshold_minutes = mins;
    }

    config.validated()
}

/// Parse an optional numeric environment variable, warning on bad values.
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(name, value = value.as_str(), "ignoring invalid setting");
            None
        }
    }
}

async fn serve<F: SimRailFeed>(
    feed: F,
    tracking: &TrackingConfig,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(feed, tracking);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("SimRail delay server listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET /health");
    info!("  GET /api/stations");
    info!("  GET /api/stations/resolve?lat=&lng=&maxDistance=");
    info!("  GET /api/trains?q=");
    info!("  GET /api/trains/:train/timetable");
    info!("  GET /api/trains/:train/position");
    info!("  GET /api/trains/:train/delay");
    info!("  GET /api/trains/:train/delay/details");

    axum::serve(listener, app).await?;
    Ok(())
}

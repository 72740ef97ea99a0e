use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trip_server::cache::{CacheConfig, CachedDirections};
use trip_server::config::Config;
use trip_server::directions::{
    DirectionsBackend, DirectionsClient, DirectionsConfig, MockDirectionsClient,
};
use trip_server::fixtures::{FixtureSet, load_places};
use trip_server::web::{AppState, SessionStore, create_router};

/// Maximum number of live sessions.
const MAX_SESSIONS: u64 = 10_000;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trip_server=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Load fixtures (fail fast if unusable)
    let fixtures = FixtureSet::load(&config.data_dir)?;

    let backend: DirectionsBackend = match &config.maps_api_key {
        Some(key) => DirectionsClient::new(DirectionsConfig::new(key))?.into(),
        None => {
            let mock = MockDirectionsClient::new(load_places(&config.data_dir)?);
            warn!(
                places = mock.places().len(),
                "MAPS_API_KEY not set; using mock directions"
            );
            mock.into()
        }
    };

    let directions =
        CachedDirections::new(backend, fixtures.region.clone(), &CacheConfig::default());
    let sessions = SessionStore::new(config.session_idle, MAX_SESSIONS);

    let state = AppState::new(directions, fixtures, sessions, config.schedule.clone())
        .with_auto_search(config.auto_search);

    let static_dir = config.static_dir.to_string_lossy();
    let app = create_router(state, &static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "trip planner listening");
    info!("open http://{} in your browser", config.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tour_api::{app, spawn_session_sweeper, AppState, SessionStore};
use tour_store::{Config, HttpTourSupplier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tour_api=debug,tour_offer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting tour API on port {}", config.server.port);

    let supplier = HttpTourSupplier::new(&config.supplier)?;
    tracing::info!("Tour supplier at {}", config.supplier.base_url);

    let sessions = Arc::new(SessionStore::new(config.sessions.idle_ttl()?));
    spawn_session_sweeper(
        sessions.clone(),
        Duration::from_secs(config.sessions.sweep_interval_seconds.max(1)),
    );

    let app_state = AppState {
        supplier: Arc::new(supplier),
        sessions,
        booking: config.booking.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

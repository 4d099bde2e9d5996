//! Transit Quest HTTP Server Binary
//!
//! Loads configuration, builds the catalog and search pipeline, and serves
//! the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin transit-server
//!
//! # Reproducible light curves and candidate picks
//! TRANSIT_SEED=42 cargo run --bin transit-server
//! ```
//!
//! # Environment Variables
//!
//! - `TRANSIT_CONFIG`: explicit path to a `transit.toml`
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `TRANSIT_SEED`: fixed random seed
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use transit_quest::config::AppConfig;
use transit_quest::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Transit Quest server");

    let config = AppConfig::load()?;
    let state = AppState::from_config(&config)?;
    info!(
        "Catalog ready: {} systems, {} selection, search takes {:?}",
        state.search.catalog.len(),
        state.search.policy.name(),
        state.search.plan.total_duration()
    );

    if let Some(max_idle) = config.server.session_idle_timeout() {
        info!("Sessions expire after {:?} idle", max_idle);
        state.spawn_session_sweeper(max_idle);
    }

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Waitlist resolver HTTP server.
//!
//! Loads the configuration, builds the repository and engine, and serves the
//! REST API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults, empty in-memory repository
//! cargo run --bin waitlist-server
//!
//! # With a configuration file and seed data
//! WAITLIST_CONFIG=backend/waitlist.toml cargo run --bin waitlist-server
//! ```
//!
//! # Environment Variables
//!
//! - `WAITLIST_CONFIG`: Path to the TOML configuration file
//! - `WAITLIST_SEED`: JSON seed file for the local repository
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use waitlist_resolver::config::AppConfig;
use waitlist_resolver::db::RepositoryFactory;
use waitlist_resolver::engine::WaitlistEngine;
use waitlist_resolver::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
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

    info!("Starting waitlist resolver");

    let config = AppConfig::load()?;
    info!(
        "Grid: {:?} {}-{} every {} min, K = {}, policy = {:?}, timeout = {} ms",
        config.engine.grid.weekdays,
        config.engine.grid.day_start.format("%H:%M"),
        config.engine.grid.day_end.format("%H:%M"),
        config.engine.grid.quantization_minutes,
        config.engine.selector.max_proposals,
        config.engine.student_issue_policy,
        config.engine.timeout_ms
    );

    let repository = RepositoryFactory::from_settings(&config.repository)?;
    info!("Repository initialized ({})", config.repository.repo_type);

    let state = AppState::new(repository, WaitlistEngine::new(config.engine.clone()));
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

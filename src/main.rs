// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach-Summary API Server
//!
//! Serves weekly training summaries built from tracker exports and owns the
//! persisted athlete profile.

use coach_summary::{config::Config, services::ProfileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        window_days = config.window_days,
        "Starting Coach-Summary API"
    );

    // Load athlete profile
    tracing::info!(path = %config.profile_path.display(), "Loading athlete profile");
    let profiles = ProfileStore::open(&config.profile_path).await?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        profiles,
    });

    // Build router
    let app = coach_summary::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coach_summary=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hike-Tracker sync daemon and API server
//!
//! Pulls Strava hikes every few minutes into local snapshots and serves
//! them on `/activities` and `/raw-activities`.

use hike_tracker::{
    config::Config,
    routes::create_router,
    services::{
        ActivityFetcher, AuthClient, Clock, ConsoleCodeProvider, Scheduler, SnapshotStore,
        StravaClient, SystemClock,
    },
    AppState,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        activity_type = %config.activity_type,
        "Starting Hike-Tracker"
    );

    let client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    )
    .with_base_url(config.strava_api_url.clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let auth = AuthClient::from_config(&config, client.clone(), Arc::new(ConsoleCodeProvider));
    let fetcher = ActivityFetcher::new(
        client,
        auth.clone(),
        clock.clone(),
        config.activity_type.clone(),
    );
    let snapshots = SnapshotStore::from_config(&config);
    let scheduler = Scheduler::new(&config, auth, fetcher, snapshots.clone(), clock);

    let state = Arc::new(AppState { snapshots });
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    // The server runs for the life of the process; the sync loop only
    // returns on a fatal authorization failure.
    tokio::select! {
        served = axum::serve(listener, app).into_future() => served?,
        synced = scheduler.run() => synced?,
    }
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hike_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

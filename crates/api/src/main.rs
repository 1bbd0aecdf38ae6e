//! Studiobook API server binary

use std::sync::Arc;

use studiobook_api::{create_router, AppState};
use studiobook_core::{generate_slots, AvailabilityService, CommitSequencer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "studiobook=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting studiobook api v{}", env!("CARGO_PKG_VERSION"));

    let config = studiobook_infra::config::load_from_env()?;
    let http = reqwest::Client::new();

    let timezone = config.calendar.timezone;
    let busy_source = studiobook_infra::wiring::build_busy_calendar(&http, &config)?;
    let calendar_writer = studiobook_infra::wiring::build_calendar_writer(&http, &config)?;
    let lead_writer = studiobook_infra::wiring::build_lead_writer(&http, &config);

    let availability = Arc::new(AvailabilityService::new(busy_source, timezone));
    let sequencer = calendar_writer.map(|writer| {
        Arc::new(CommitSequencer::new(writer, lead_writer, timezone, config.booking))
    });
    if sequencer.is_none() {
        tracing::warn!("no calendar write path configured; bookings will be rejected");
    }

    let state = AppState {
        availability,
        sequencer,
        slots: Arc::new(generate_slots()),
        config: Arc::new(config),
    };

    let app = create_router(state);

    let bind = std::env::var("STUDIOBOOK_BIND").unwrap_or_else(|_| "127.0.0.1:8080".into());
    tracing::info!("listening on http://{bind}");

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

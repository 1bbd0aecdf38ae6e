//! # Studiobook API
//!
//! Thin HTTP surface over the booking core: availability lookup, the slot
//! grid, and the checkout commit. All booking logic lives in
//! `studiobook-core`; handlers translate between HTTP and the core types.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use studiobook_core::{AvailabilityService, CommitSequencer};
use studiobook_domain::{Config, Slot};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub availability: Arc<AvailabilityService>,
    /// `None` when no calendar write path is configured; booking requests
    /// are then rejected with 503 instead of silently dropped.
    pub sequencer: Option<Arc<CommitSequencer>>,
    pub slots: Arc<Vec<Slot>>,
    pub config: Arc<Config>,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/availability", get(routes::availability::get_availability))
        .route("/api/slots", get(routes::slots::get_slots))
        .route("/api/bookings", post(routes::bookings::create_booking))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

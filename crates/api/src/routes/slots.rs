//! Slot grid endpoint
//!
//! The grid is fixed per process; clients render the day view from it and
//! overlay the busy intervals returned by the availability endpoint.

use axum::extract::State;
use axum::Json;
use studiobook_domain::Slot;

use crate::AppState;

pub async fn get_slots(State(state): State<AppState>) -> Json<Vec<Slot>> {
    Json(state.slots.as_ref().clone())
}

//! Health probe
//!
//! Doubles as a lightweight diagnostics surface: reports the operating
//! timezone and which integrations the configuration enables, so a
//! degraded deployment is visible without reading logs.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timezone: String,
    pub calendar_read: bool,
    pub calendar_write: bool,
    pub crm: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timezone: config.calendar.timezone.name().to_string(),
        calendar_read: config.calendar.can_read(),
        calendar_write: config.calendar.can_write(),
        crm: config.crm.is_configured(),
    })
}

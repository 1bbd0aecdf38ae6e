//! Availability endpoint
//!
//! Returns the busy intervals for one local calendar day. A missing or
//! malformed date is the caller's fault (400); everything upstream of the
//! date is fail-open and comes back as 200 with a warning.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use studiobook_domain::{BusyInterval, StudiobookError};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub busy: Vec<BusyInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let raw = query
        .date
        .ok_or_else(|| StudiobookError::InvalidInput("date query parameter is required".into()))?;
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| StudiobookError::InvalidInput(format!("invalid date: {raw}")))?;

    let availability = state.availability.fetch_day(date).await;
    Ok(Json(AvailabilityResponse {
        busy: availability.intervals,
        warning: availability.warning,
    }))
}

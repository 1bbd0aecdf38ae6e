//! Booking commit endpoint

use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use studiobook_domain::{
    BookingDraft, CommitResult, Consents, ContactDetails, ServiceKind, StudiobookError,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::AppState;

/// Draft payload as submitted by the booking page.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: String,
    pub service: ServiceKind,
    pub duration_hours: Option<u8>,
    pub contact: ContactDetails,
    pub consents: Consents,
    /// Client-generated token tying retries of the same checkout together.
    pub commit_token: Option<Uuid>,
}

impl BookingRequest {
    fn into_draft(self) -> Result<BookingDraft, StudiobookError> {
        let time = parse_wall_clock(&self.time)?;
        let mut draft = BookingDraft::new(self.service);
        draft.selected_date = Some(self.date);
        draft.selected_time = Some(time);
        if let Some(hours) = self.duration_hours {
            draft.duration_hours = BookingDraft::clamp_duration(hours);
        }
        draft.contact = self.contact;
        draft.consents = self.consents;
        if let Some(token) = self.commit_token {
            draft.commit_token = token;
        }
        Ok(draft)
    }
}

/// Accepts "HH:MM" as sent by the slot grid, or a full "HH:MM:SS".
fn parse_wall_clock(raw: &str) -> Result<NaiveTime, StudiobookError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| StudiobookError::InvalidInput(format!("invalid time: {raw}")))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<Json<CommitResult>> {
    let Some(sequencer) = &state.sequencer else {
        return Err(StudiobookError::Config(
            "calendar write integration is not configured".into(),
        )
        .into());
    };

    let draft = request.into_draft()?;
    let result = sequencer.commit(&draft).await?;
    Ok(Json(result))
}

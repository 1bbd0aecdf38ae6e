//! Structured calendar API client (Google-style events API)
//!
//! Implements both halves of the calendar contract: `BusyCalendar` over
//! `events.list` and `CalendarWriter` over `events.insert`. Upstream events
//! carry their start/end either as an RFC 3339 `dateTime` or as an all-day
//! `date`; both are normalized into the canonical [`TimeInterval`] at this
//! boundary so nothing downstream branches on source shape. Events missing
//! a usable start or end are skipped, not defaulted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use studiobook_core::checkout::ports::{CalendarEventRequest, CalendarWriter, CreatedEvent};
use studiobook_core::BusyCalendar;
use studiobook_domain::{BusyCategory, BusyInterval, Result, StudiobookError, TimeInterval};
use tracing::{debug, warn};

use super::auth::AccessTokenProvider;
use crate::errors::InfraError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Client for one configured calendar.
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    calendar_id: String,
    tokens: Arc<dyn AccessTokenProvider>,
    timezone: Tz,
}

impl GoogleCalendarClient {
    pub fn new(
        http: Client,
        calendar_id: String,
        tokens: Arc<dyn AccessTokenProvider>,
        timezone: Tz,
    ) -> Self {
        Self { http, base_url: CALENDAR_API_BASE.to_string(), calendar_id, tokens, timezone }
    }

    /// Override the API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    /// Normalize one upstream event boundary into an instant, or `None`
    /// when neither field parses.
    fn parse_boundary(&self, boundary: &EventBoundary) -> Option<DateTime<Utc>> {
        if let Some(raw) = &boundary.date_time {
            return DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc));
        }
        let raw = boundary.date.as_deref()?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        self.timezone
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn normalize(&self, event: UpstreamEvent) -> Option<BusyInterval> {
        let start = self.parse_boundary(&event.start);
        let end = self.parse_boundary(&event.end);
        let (Some(start), Some(end)) = (start, end) else {
            warn!(event_id = %event.id, "skipping event without usable start/end");
            return None;
        };
        let interval = match TimeInterval::new(start, end) {
            Ok(interval) => interval,
            Err(err) => {
                warn!(event_id = %event.id, error = %err, "skipping event with inverted range");
                return None;
            }
        };
        Some(BusyInterval {
            interval,
            category: BusyCategory::from_color_id(event.color_id.as_deref()),
            summary: event.summary,
        })
    }
}

#[async_trait]
impl BusyCalendar for GoogleCalendarClient {
    async fn fetch_busy(&self, window: TimeInterval) -> Result<Vec<BusyInterval>> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(token)
            .query(&[
                ("timeMin", window.start.to_rfc3339()),
                ("timeMax", window.end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(StudiobookError::Upstream(format!(
                "calendar API error ({status}): {error_text}"
            )))
            .into());
        }

        let listing: EventListing = response.json().await.map_err(|e| {
            StudiobookError::Upstream(format!("failed to parse calendar response: {e}"))
        })?;

        let intervals: Vec<BusyInterval> =
            listing.items.into_iter().filter_map(|event| self.normalize(event)).collect();
        debug!(count = intervals.len(), "fetched busy intervals");
        Ok(intervals)
    }
}

#[async_trait]
impl CalendarWriter for GoogleCalendarClient {
    async fn create_event(&self, request: &CalendarEventRequest) -> Result<CreatedEvent> {
        let token = self.tokens.access_token().await?;

        let body = InsertEventBody {
            summary: request.title.clone(),
            description: request.description.clone(),
            start: InsertBoundary {
                date_time: request.window.start.to_rfc3339(),
                time_zone: self.timezone.name().to_string(),
            },
            end: InsertBoundary {
                date_time: request.window.end.to_rfc3339(),
                time_zone: self.timezone.name().to_string(),
            },
            color_id: request.category.color_id().to_string(),
        };

        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(StudiobookError::Upstream(format!(
                "event creation failed ({status}): {error_text}"
            )))
            .into());
        }

        let created: InsertedEvent = response.json().await.map_err(|e| {
            StudiobookError::Upstream(format!("failed to parse created event: {e}"))
        })?;

        Ok(CreatedEvent { id: created.id, link: created.html_link })
    }
}

#[derive(Debug, Deserialize)]
struct EventListing {
    #[serde(default)]
    items: Vec<UpstreamEvent>,
}

#[derive(Debug, Deserialize)]
struct UpstreamEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    #[serde(rename = "colorId")]
    color_id: Option<String>,
    start: EventBoundary,
    end: EventBoundary,
}

#[derive(Debug, Default, Deserialize)]
struct EventBoundary {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct InsertEventBody {
    summary: String,
    description: String,
    start: InsertBoundary,
    end: InsertBoundary,
    #[serde(rename = "colorId")]
    color_id: String,
}

#[derive(Debug, Serialize)]
struct InsertBoundary {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

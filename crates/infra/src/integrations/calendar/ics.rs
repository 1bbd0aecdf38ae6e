//! ICS feed reader
//!
//! Read-only availability source for deployments without structured API
//! credentials: fetches an iCal address and extracts the VEVENT ranges that
//! overlap the requested window. The feed carries no colour information, so
//! every interval is tagged `Unknown` and the UI falls back to the rent
//! colour.
//!
//! Only the small slice of RFC 5545 this system relies on is handled:
//! line unfolding, `DTSTART`/`DTEND` in UTC (`...Z`), floating local time
//! (interpreted in the operating timezone) and all-day `DATE` values
//! (expanded to local midnight-to-midnight). Property parameters,
//! including `TZID=`, are dropped: a zoned timestamp is treated as
//! floating and read in the operating timezone, which only holds for
//! single-zone feeds. Events missing a parsable start or end are skipped,
//! not defaulted.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use studiobook_core::{overlaps, BusyCalendar};
use studiobook_domain::{BusyCategory, BusyInterval, Result, StudiobookError, TimeInterval};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Busy-interval source backed by an ICS feed URL.
pub struct IcsFeed {
    http: Client,
    url: String,
    timezone: Tz,
}

impl IcsFeed {
    pub fn new(http: Client, url: String, timezone: Tz) -> Self {
        Self { http, url, timezone }
    }
}

#[async_trait]
impl BusyCalendar for IcsFeed {
    async fn fetch_busy(&self, window: TimeInterval) -> Result<Vec<BusyInterval>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            return Err(InfraError(StudiobookError::Upstream(format!(
                "ICS fetch failed: {}",
                response.status()
            )))
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| StudiobookError::Upstream(format!("failed to read ICS body: {e}")))?;

        let intervals = parse_busy_intervals(&text, &window, self.timezone);
        debug!(count = intervals.len(), "parsed busy intervals from ICS feed");
        Ok(intervals)
    }
}

/// Extract the VEVENT ranges overlapping `window`.
pub fn parse_busy_intervals(
    text: &str,
    window: &TimeInterval,
    tz: Tz,
) -> Vec<BusyInterval> {
    let mut intervals = Vec::new();
    let mut current: Option<RawVevent> = None;

    for line in unfold(text) {
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(RawVevent::default());
            continue;
        }
        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(event) = current.take() {
                match event.into_interval(tz) {
                    Some(interval) if overlaps(&interval.interval, window) => {
                        intervals.push(interval);
                    }
                    Some(_) => {}
                    None => warn!("skipping VEVENT without usable start/end"),
                }
            }
            continue;
        }
        let Some(event) = current.as_mut() else { continue };
        let Some((name, value)) = split_property(&line) else { continue };
        match name.as_str() {
            "DTSTART" => event.start = Some(value),
            "DTEND" => event.end = Some(value),
            "SUMMARY" => event.summary = Some(value),
            _ => {}
        }
    }

    intervals
}

/// One VEVENT's raw properties before normalization.
#[derive(Debug, Default)]
struct RawVevent {
    start: Option<String>,
    end: Option<String>,
    summary: Option<String>,
}

impl RawVevent {
    fn into_interval(self, tz: Tz) -> Option<BusyInterval> {
        let start = parse_ics_timestamp(self.start.as_deref()?, tz)?;
        let end = parse_ics_timestamp(self.end.as_deref()?, tz)?;
        let interval = TimeInterval::new(start, end).ok()?;
        Some(BusyInterval { interval, category: BusyCategory::Unknown, summary: self.summary })
    }
}

/// Join folded continuation lines (RFC 5545 §3.1) and drop line endings.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if let Some(continuation) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        lines.push(raw.trim_end().to_string());
    }
    lines
}

/// Split `NAME;PARAM=...:VALUE` into the bare name and the value.
fn split_property(line: &str) -> Option<(String, String)> {
    let (head, value) = line.split_once(':')?;
    let name = head.split(';').next().unwrap_or(head);
    Some((name.to_ascii_uppercase(), value.trim().to_string()))
}

/// Parse the three supported ICS timestamp forms into an instant.
fn parse_ics_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Some(stripped) = raw.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive));
    }
    if raw.contains('T') {
        // Floating local time; interpreted in the operating timezone.
        let naive = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S").ok()?;
        return tz.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc));
    }
    // All-day DATE value: local midnight.
    let date = NaiveDate::parse_from_str(raw, "%Y%m%d").ok()?;
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

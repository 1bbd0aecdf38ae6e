//! Availability service - fail-open busy-interval fetching
//!
//! Wraps the [`BusyCalendar`] port with the two policies the UI relies on:
//!
//! 1. **Fail-open**: an unreachable or misconfigured upstream never blocks
//!    the caller. The service degrades to "no known conflicts" and carries a
//!    visible warning instead of an error.
//! 2. **Superseded-fetch discard**: every fetch is tagged with the day
//!    selection it was issued for. A result whose ticket is no longer
//!    current is dropped rather than overwriting the busy list of the day
//!    the user has since switched to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use studiobook_domain::DayAvailability;
use tracing::warn;

use super::day_window;
use super::ports::BusyCalendar;

/// Warning shown when no calendar integration is configured at all. Slots
/// render as available either way; the distinct text keeps diagnostics
/// separate from transient upstream failures.
pub const NOT_CONFIGURED_WARNING: &str = "calendar integration not configured";

/// Warning shown when the upstream fetch failed; fail-open.
pub const FETCH_FAILED_WARNING: &str = "could not load busy slots, showing all times as free";

/// Tag identifying one day-selection fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Fetches busy intervals for a displayed day.
pub struct AvailabilityService {
    source: Option<Arc<dyn BusyCalendar>>,
    timezone: Tz,
    generation: AtomicU64,
}

impl AvailabilityService {
    /// Create a service over an optional read source. `None` means no
    /// calendar integration is configured; fetches then report the distinct
    /// not-configured warning.
    pub fn new(source: Option<Arc<dyn BusyCalendar>>, timezone: Tz) -> Self {
        Self { source, timezone, generation: AtomicU64::new(0) }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Start a new fetch, superseding any fetch still in flight.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the ticket still identifies the latest selection.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Fetch busy intervals for one local calendar day.
    ///
    /// Never fails: upstream or configuration problems degrade to an empty
    /// interval list with a non-empty warning.
    pub async fn fetch_day(&self, date: NaiveDate) -> DayAvailability {
        let Some(source) = &self.source else {
            warn!(%date, "availability check skipped: {NOT_CONFIGURED_WARNING}");
            return DayAvailability {
                intervals: Vec::new(),
                warning: Some(NOT_CONFIGURED_WARNING.to_string()),
            };
        };

        let window = match day_window(date, self.timezone) {
            Ok(window) => window,
            Err(err) => {
                warn!(%date, error = %err, "could not compute day window");
                return DayAvailability {
                    intervals: Vec::new(),
                    warning: Some(FETCH_FAILED_WARNING.to_string()),
                };
            }
        };

        match source.fetch_busy(window).await {
            Ok(intervals) => DayAvailability { intervals, warning: None },
            Err(err) => {
                // Raw upstream detail goes to the log, not the user.
                warn!(%date, error = %err, "busy-interval fetch failed, failing open");
                DayAvailability {
                    intervals: Vec::new(),
                    warning: Some(FETCH_FAILED_WARNING.to_string()),
                }
            }
        }
    }

    /// Fetch for a specific selection; returns `None` when the selection
    /// changed while the fetch was in flight and the result is stale.
    pub async fn fetch_day_tagged(
        &self,
        ticket: FetchTicket,
        date: NaiveDate,
    ) -> Option<DayAvailability> {
        let availability = self.fetch_day(date).await;
        if self.is_current(ticket) {
            Some(availability)
        } else {
            warn!(%date, "discarding stale availability result");
            None
        }
    }
}

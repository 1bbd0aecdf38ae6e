//! Calendar read port

use async_trait::async_trait;
use studiobook_domain::{BusyInterval, Result, TimeInterval};

/// Read-only source of busy intervals.
///
/// Implemented in infra by the structured calendar API client and by the
/// ICS feed reader; exactly one of them backs the availability service per
/// deployment, selected from configuration.
#[async_trait]
pub trait BusyCalendar: Send + Sync {
    /// Fetch the busy intervals overlapping the given window.
    async fn fetch_busy(&self, window: TimeInterval) -> Result<Vec<BusyInterval>>;
}

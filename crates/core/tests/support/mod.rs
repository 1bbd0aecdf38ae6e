//! In-memory port mocks shared by the core integration tests.
//!
//! Each integration test binary pulls in the whole module; helpers unused
//! by a particular binary are expected.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studiobook_core::{
    BusyCalendar, CalendarEventRequest, CalendarWriter, CreatedEvent, LeadOutcome, LeadRequest,
    LeadWriter,
};
use studiobook_domain::{BusyInterval, Result, StudiobookError, TimeInterval};

/// In-memory `BusyCalendar` returning a fixed interval list, or an error
/// when seeded with one.
#[derive(Default)]
pub struct MockBusyCalendar {
    intervals: Vec<BusyInterval>,
    fail_with: Option<String>,
    pub calls: AtomicUsize,
}

impl MockBusyCalendar {
    pub fn with_intervals(intervals: Vec<BusyInterval>) -> Self {
        Self { intervals, fail_with: None, calls: AtomicUsize::new(0) }
    }

    pub fn failing(message: &str) -> Self {
        Self { intervals: Vec::new(), fail_with: Some(message.to_string()), calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl BusyCalendar for MockBusyCalendar {
    async fn fetch_busy(&self, _window: TimeInterval) -> Result<Vec<BusyInterval>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(StudiobookError::Upstream(message.clone())),
            None => Ok(self.intervals.clone()),
        }
    }
}

/// Recording `CalendarWriter`; succeeds with a fixed event unless seeded to
/// fail.
#[derive(Default)]
pub struct MockCalendarWriter {
    fail_with: Option<String>,
    pub requests: Mutex<Vec<CalendarEventRequest>>,
}

impl MockCalendarWriter {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { fail_with: Some(message.to_string()), requests: Mutex::new(Vec::new()) })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarWriter for MockCalendarWriter {
    async fn create_event(&self, request: &CalendarEventRequest) -> Result<CreatedEvent> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(StudiobookError::Upstream(message.clone())),
            None => Ok(CreatedEvent {
                id: "evt-123".to_string(),
                link: Some("https://calendar.example.com/evt-123".to_string()),
            }),
        }
    }
}

/// Recording `LeadWriter` with success, failure and skip behaviours.
#[derive(Default)]
pub struct MockLeadWriter {
    fail_with: Option<String>,
    skip: bool,
    pub requests: Mutex<Vec<LeadRequest>>,
}

impl MockLeadWriter {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            skip: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn skipping() -> Arc<Self> {
        Arc::new(Self { fail_with: None, skip: true, requests: Mutex::new(Vec::new()) })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LeadWriter for MockLeadWriter {
    async fn create_lead(&self, request: &LeadRequest) -> Result<LeadOutcome> {
        self.requests.lock().unwrap().push(request.clone());
        if self.skip {
            return Ok(LeadOutcome::Skipped);
        }
        match &self.fail_with {
            Some(message) => Err(StudiobookError::Upstream(message.clone())),
            None => Ok(LeadOutcome::Created {
                id: "lead-7".to_string(),
                url: Some("https://crm.example.com/leads/7".to_string()),
            }),
        }
    }
}

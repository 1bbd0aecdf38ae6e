//! Calendar-write and CRM-lead-write ports

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use studiobook_domain::{BusyCategory, Result, TimeInterval};
use uuid::Uuid;

/// Payload for creating one calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventRequest {
    pub window: TimeInterval,
    pub title: String,
    pub description: String,
    pub category: BusyCategory,
    /// Client-generated token, embedded for manual duplicate reconciliation.
    pub commit_token: Uuid,
}

/// The created event as reported by the upstream calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub id: String,
    pub link: Option<String>,
}

/// Durable event creation; the authoritative half of the commit.
#[async_trait]
pub trait CalendarWriter: Send + Sync {
    async fn create_event(&self, request: &CalendarEventRequest) -> Result<CreatedEvent>;
}

/// Full booking summary for the CRM lead.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub business: Option<String>,
    pub business_number: Option<String>,
    pub service_label: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_hours: u8,
    pub total: i64,
    pub commit_token: Uuid,
}

/// Result of a lead-write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    Created { id: String, url: Option<String> },
    /// The CRM integration is not configured; skipped cleanly.
    Skipped,
}

/// Best-effort lead creation; failure never undoes the calendar event.
#[async_trait]
pub trait LeadWriter: Send + Sync {
    async fn create_lead(&self, request: &LeadRequest) -> Result<LeadOutcome>;
}

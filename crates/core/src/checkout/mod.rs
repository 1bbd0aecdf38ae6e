//! Checkout commit sequencer
//!
//! Two-phase, non-transactional commit: create the calendar event, then
//! create the CRM lead. There is no rollback; the calendar is the system of
//! record and a booking without a calendar event is considered worse than a
//! booking without a lead, so the calendar phase is fatal and the CRM phase
//! is best-effort.

pub mod ports;

use std::sync::Arc;

use chrono_tz::Tz;
use studiobook_domain::{
    BookingDraft, BookingConfig, CommitError, CommitPhase, CommitResult, Result, StudiobookError,
};
use tracing::{info, warn};

use crate::availability::candidate_window;
use crate::pricing::quote;
use ports::{CalendarEventRequest, CalendarWriter, LeadOutcome, LeadRequest, LeadWriter};

/// Orchestrates the calendar-then-CRM commit sequence.
pub struct CommitSequencer {
    calendar: Arc<dyn CalendarWriter>,
    crm: Option<Arc<dyn LeadWriter>>,
    timezone: Tz,
    pricing: BookingConfig,
}

impl CommitSequencer {
    /// `crm: None` means the lead phase is skipped cleanly, not failed.
    pub fn new(
        calendar: Arc<dyn CalendarWriter>,
        crm: Option<Arc<dyn LeadWriter>>,
        timezone: Tz,
        pricing: BookingConfig,
    ) -> Self {
        Self { calendar, crm, timezone, pricing }
    }

    /// Execute one checkout attempt for a completed draft.
    ///
    /// The sequence is intentionally sequential: the lead references the
    /// booking, so it is only attempted once the event exists. Calling this
    /// twice with the same draft creates two events and two leads; only the
    /// draft's commit token ties them together.
    ///
    /// # Errors
    /// Returns `StudiobookError::Validation` when the draft is incomplete;
    /// no external call is made in that case. External failures never
    /// surface as `Err`; they are folded into the returned
    /// [`CommitResult`].
    pub async fn commit(&self, draft: &BookingDraft) -> Result<CommitResult> {
        let (Some(date), Some(time)) = (draft.selected_date, draft.selected_time) else {
            return Err(StudiobookError::Validation("date and time must be selected".into()));
        };
        if !draft.contact.has_required_fields() {
            return Err(StudiobookError::Validation(
                "name, phone and email are required".into(),
            ));
        }
        if !draft.consents.all_given() {
            return Err(StudiobookError::Validation("both consents must be accepted".into()));
        }

        // Local calendar date plus wall-clock time in the operating
        // timezone; never UTC-shifted.
        let window = candidate_window(date, time, draft.duration_hours, self.timezone)?;
        let price = quote(draft.duration_hours, self.pricing.hourly_rate, self.pricing.vat_rate);

        let service_label = draft.service.label();
        let event_request = CalendarEventRequest {
            window,
            title: format!("Booking: {service_label}"),
            description: format!(
                "Service: {service_label}\nClient: {}\nPhone: {}\nEmail: {}\nRef: {}",
                draft.contact.name, draft.contact.phone, draft.contact.email, draft.commit_token
            ),
            category: draft.service.category(),
            commit_token: draft.commit_token,
        };

        let mut result = CommitResult::default();

        let created = match self.calendar.create_event(&event_request).await {
            Ok(created) => created,
            Err(err) => {
                // Fatal phase: nothing was created, the CRM is never tried.
                warn!(error = %err, "calendar event creation failed, aborting commit");
                result.errors.push(CommitError {
                    phase: CommitPhase::Calendar,
                    message: err.to_string(),
                });
                return Ok(result);
            }
        };
        info!(event_id = %created.id, "calendar event created");
        result.calendar_event_id = Some(created.id);
        result.calendar_event_link = created.link;

        let Some(crm) = &self.crm else {
            result.crm_skipped = true;
            return Ok(result);
        };

        let lead_request = LeadRequest {
            name: draft.contact.name.clone(),
            phone: draft.contact.phone.clone(),
            email: draft.contact.email.clone(),
            business: draft.contact.business.clone(),
            business_number: draft.contact.business_number.clone(),
            service_label: service_label.to_string(),
            date,
            time,
            duration_hours: draft.duration_hours,
            total: price.total,
            commit_token: draft.commit_token,
        };

        match crm.create_lead(&lead_request).await {
            Ok(LeadOutcome::Created { id, url }) => {
                info!(lead_id = %id, "crm lead created");
                result.crm_lead_id = Some(id);
                result.crm_lead_url = url;
            }
            Ok(LeadOutcome::Skipped) => {
                result.crm_skipped = true;
            }
            Err(err) => {
                // Non-fatal: the calendar event already exists, the booking
                // stands. The lead failure is reported alongside.
                warn!(error = %err, "crm lead creation failed after calendar success");
                result
                    .errors
                    .push(CommitError { phase: CommitPhase::Crm, message: err.to_string() });
            }
        }

        Ok(result)
    }
}

//! Booking draft state machine
//!
//! The draft is an explicit object threaded through transition methods, not
//! ambient session state. Each transition either applies or is rejected
//! with a reason and no state change; rejections are UI feedback, not
//! errors.
//!
//! States:
//! `Empty → DateChosen → ServiceDecisionPending → Ready →
//! Committing → Committed | Failed`
//!
//! The time-chosen step is transient: picking a slot resolves immediately
//! into `ServiceDecisionPending` (generic studio service) or `Ready`
//! (specific service), so it never appears as a distinct state.
//!
//! Changing the date while further along resets forward progress back to
//! `DateChosen`; re-picking a slot re-resolves the service decision.
//! Duration and service selection are not tied to a specific slot and
//! persist.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use studiobook_domain::{
    BookingDraft, BusyInterval, CommitResult, Consents, ContactDetails, ServiceKind,
};
use tracing::debug;

use crate::availability::{candidate_window, classify};

/// Current position in the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    DateChosen,
    /// A slot was picked with the generic studio service still selected;
    /// the user must explicitly continue as a rental or leave to browse
    /// service offerings.
    ServiceDecisionPending,
    Ready,
    Committing,
    Committed,
    Failed,
}

/// Outcome of a transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Applied,
    /// The transition was not legal; state is unchanged.
    Rejected(String),
}

impl Transition {
    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A draft plus its flow state.
#[derive(Debug, Clone)]
pub struct DraftFlow {
    state: DraftState,
    draft: BookingDraft,
    timezone: Tz,
}

impl DraftFlow {
    pub fn new(service: ServiceKind, timezone: Tz) -> Self {
        Self { state: DraftState::Empty, draft: BookingDraft::new(service), timezone }
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Pick a calendar day. Past dates are rejected; `today` is supplied by
    /// the caller so the machine stays clock-free.
    ///
    /// Re-picking a date invalidates the chosen time and any forward
    /// progress; service and duration persist.
    pub fn choose_date(&mut self, date: NaiveDate, today: NaiveDate) -> Transition {
        if matches!(self.state, DraftState::Committing | DraftState::Committed) {
            return Transition::Rejected("booking already being committed".into());
        }
        if date < today {
            return Transition::Rejected("date is in the past".into());
        }
        self.draft.selected_date = Some(date);
        self.draft.selected_time = None;
        self.state = DraftState::DateChosen;
        Transition::Applied
    }

    /// Pick a start time. A slot whose candidate window overlaps any
    /// currently fetched busy interval is disabled; choosing it is a no-op
    /// rejection, not an error.
    pub fn choose_slot(&mut self, time: NaiveTime, busy: &[BusyInterval]) -> Transition {
        let Some(date) = self.draft.selected_date else {
            return Transition::Rejected("choose a date first".into());
        };
        if matches!(self.state, DraftState::Committing | DraftState::Committed) {
            return Transition::Rejected("booking already being committed".into());
        }

        let candidate =
            match candidate_window(date, time, self.draft.duration_hours, self.timezone) {
                Ok(window) => window,
                Err(err) => return Transition::Rejected(err.to_string()),
            };
        if classify(&candidate, busy).is_some() {
            debug!(%date, %time, "ignoring selection of a busy slot");
            return Transition::Rejected("slot is unavailable".into());
        }

        self.draft.selected_time = Some(time);
        // A concrete non-studio service skips the decision step entirely.
        self.state = if self.draft.service == ServiceKind::Studio {
            DraftState::ServiceDecisionPending
        } else {
            DraftState::Ready
        };
        Transition::Applied
    }

    /// The user leaves the flow to browse service offerings; selections are
    /// dropped.
    pub fn view_services(&mut self) -> Transition {
        if self.state != DraftState::ServiceDecisionPending {
            return Transition::Rejected("no service decision pending".into());
        }
        let service = self.draft.service;
        self.draft = BookingDraft::new(service);
        self.state = DraftState::Empty;
        Transition::Applied
    }

    /// The user confirms a plain studio rental.
    pub fn continue_as_studio(&mut self) -> Transition {
        if self.state != DraftState::ServiceDecisionPending {
            return Transition::Rejected("no service decision pending".into());
        }
        self.state = DraftState::Ready;
        Transition::Applied
    }

    /// Change the booked duration; allowed any time before commit, clamped
    /// to the 1..=12 hour range. Does not reset the chosen date or time.
    pub fn set_duration(&mut self, hours: u8) -> Transition {
        if matches!(self.state, DraftState::Committing | DraftState::Committed) {
            return Transition::Rejected("booking already being committed".into());
        }
        self.draft.duration_hours = BookingDraft::clamp_duration(hours);
        Transition::Applied
    }

    /// Update contact details; no state change.
    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.draft.contact = contact;
    }

    /// Update consent flags; no state change.
    pub fn set_consents(&mut self, consents: Consents) {
        self.draft.consents = consents;
    }

    /// Attempt to enter the commit phase. Rejected with a validation
    /// message (and no state change) unless the draft is complete.
    pub fn begin_commit(&mut self) -> Transition {
        if self.state != DraftState::Ready {
            return Transition::Rejected("booking is not ready for checkout".into());
        }
        if !self.draft.contact.has_required_fields() {
            return Transition::Rejected("name, phone and email are required".into());
        }
        if !self.draft.consents.all_given() {
            return Transition::Rejected("both consents must be accepted".into());
        }
        self.state = DraftState::Committing;
        Transition::Applied
    }

    /// Record the sequencer outcome. A failed commit keeps the draft so the
    /// user can retry without re-entering anything.
    pub fn finish_commit(&mut self, result: &CommitResult) -> Transition {
        if self.state != DraftState::Committing {
            return Transition::Rejected("no commit in progress".into());
        }
        self.state =
            if result.booking_created() { DraftState::Committed } else { DraftState::Failed };
        Transition::Applied
    }

    /// Return a failed draft to `Ready` for another attempt.
    pub fn retry(&mut self) -> Transition {
        if self.state != DraftState::Failed {
            return Transition::Rejected("nothing to retry".into());
        }
        self.state = DraftState::Ready;
        Transition::Applied
    }
}

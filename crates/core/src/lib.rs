//! # Studiobook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Interval overlap evaluation and slot availability rendering
//! - The booking draft state machine
//! - The checkout commit sequencer
//! - Pricing
//! - Port/adapter interfaces (traits) for the external calendar and CRM
//!
//! ## Architecture Principles
//! - Only depends on `studiobook-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod checkout;
pub mod draft;
pub mod pricing;
pub mod slots;

// Re-export specific items to avoid ambiguity
pub use availability::ports::BusyCalendar;
pub use availability::service::{AvailabilityService, FetchTicket};
pub use availability::{classify, overlaps, slot_status, SlotStatus};
pub use checkout::ports::{
    CalendarEventRequest, CalendarWriter, CreatedEvent, LeadOutcome, LeadRequest, LeadWriter,
};
pub use checkout::CommitSequencer;
pub use draft::{DraftFlow, DraftState, Transition};
pub use pricing::quote;
pub use slots::generate_slots;

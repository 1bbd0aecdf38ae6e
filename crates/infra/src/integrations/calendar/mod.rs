//! Calendar integration adapters
//!
//! Three adapters cover the calendar contracts:
//! - [`google::GoogleCalendarClient`]: structured events API, read and
//!   write
//! - [`ics::IcsFeed`]: read-only availability from a public/private iCal
//!   address
//! - [`webhook::WebhookCalendarWriter`]: write fallback forwarding the
//!   event payload to a configured URL
//!
//! Selection between them is configuration-driven (see `wiring`), never
//! negotiated at runtime.

pub mod auth;
pub mod google;
pub mod ics;
pub mod webhook;

pub use auth::{AccessTokenProvider, ServiceAccountTokenProvider};
pub use google::GoogleCalendarClient;
pub use ics::IcsFeed;
pub use webhook::WebhookCalendarWriter;

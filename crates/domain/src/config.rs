//! Configuration structures
//!
//! Plain data holders; the environment loader lives in the infra crate.
//! Every integration setting is optional; the booking core degrades per
//! the fail-open policy when a piece is missing.

use chrono_tz::Tz;

use crate::constants::{DEFAULT_HOURLY_RATE, DEFAULT_VAT_RATE};

/// Service-account credential pair for the structured calendar API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

/// External calendar integration settings.
///
/// The ICS feed and the structured API are mutually exclusive read paths;
/// the ICS url wins when both are present. The webhook url is a write-path
/// fallback for deployments without service-account credentials.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub calendar_id: Option<String>,
    /// Raw service-account JSON blob; preferred over the split pair.
    pub service_account_json: Option<String>,
    pub service_account: Option<ServiceAccountKey>,
    pub ics_url: Option<String>,
    pub webhook_url: Option<String>,
    pub timezone: Tz,
}

impl CalendarConfig {
    /// Whether any credential form for the structured API is present.
    pub fn has_credentials(&self) -> bool {
        self.service_account_json.is_some() || self.service_account.is_some()
    }

    /// Read-only availability checks work with an ICS url alone, or with
    /// the structured API (id + credentials).
    pub fn can_read(&self) -> bool {
        self.ics_url.is_some() || (self.calendar_id.is_some() && self.has_credentials())
    }

    /// Event creation needs the structured API or the webhook fallback.
    pub fn can_write(&self) -> bool {
        (self.calendar_id.is_some() && self.has_credentials()) || self.webhook_url.is_some()
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: None,
            service_account_json: None,
            service_account: None,
            ics_url: None,
            webhook_url: None,
            timezone: crate::constants::DEFAULT_TIMEZONE
                .parse()
                .unwrap_or(chrono_tz::UTC),
        }
    }
}

/// CRM lead-creation settings; both fields required for the phase to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrmConfig {
    pub subdomain: Option<String>,
    pub access_token: Option<String>,
}

impl CrmConfig {
    pub fn is_configured(&self) -> bool {
        self.subdomain.is_some() && self.access_token.is_some()
    }
}

/// Pricing knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingConfig {
    pub hourly_rate: i64,
    pub vat_rate: f64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { hourly_rate: DEFAULT_HOURLY_RATE, vat_rate: DEFAULT_VAT_RATE }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub crm: CrmConfig,
    pub booking: BookingConfig,
}

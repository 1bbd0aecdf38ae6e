//! Configuration loader
//!
//! Loads the booking configuration from environment variables. Every
//! integration setting is optional: a missing piece disables the matching
//! integration and the core degrades per its fail-open policy instead of
//! refusing to start.
//!
//! ## Environment Variables
//! - `STUDIOBOOK_CALENDAR_ID`: calendar identifier for the structured API
//! - `STUDIOBOOK_SERVICE_ACCOUNT_EMAIL` / `STUDIOBOOK_SERVICE_ACCOUNT_KEY`:
//!   split service-account credential pair
//! - `STUDIOBOOK_SERVICE_ACCOUNT_JSON`: raw service-account JSON blob
//!   (preferred over the split pair when both are present)
//! - `STUDIOBOOK_CALENDAR_ICS_URL`: read-only ICS feed (wins over the
//!   structured API for availability checks)
//! - `STUDIOBOOK_CALENDAR_WEBHOOK_URL`: calendar-write fallback
//! - `STUDIOBOOK_TIMEZONE`: operating IANA timezone (default Asia/Jerusalem)
//! - `STUDIOBOOK_CRM_SUBDOMAIN` / `STUDIOBOOK_CRM_ACCESS_TOKEN`: CRM lead
//!   integration
//! - `STUDIOBOOK_HOURLY_RATE` / `STUDIOBOOK_VAT_RATE`: pricing overrides

use studiobook_domain::{
    BookingConfig, CalendarConfig, Config, CrmConfig, Result, ServiceAccountKey, StudiobookError,
};
use tracing::info;

/// Load configuration from environment variables.
///
/// # Errors
/// Returns `StudiobookError::Config` when a present variable has an invalid
/// value (unparsable timezone, rate or VAT). Absent variables are fine.
pub fn load_from_env() -> Result<Config> {
    let timezone = match std::env::var("STUDIOBOOK_TIMEZONE") {
        Ok(name) => name.parse().map_err(|_| {
            StudiobookError::Config(format!("invalid STUDIOBOOK_TIMEZONE: {name}"))
        })?,
        Err(_) => studiobook_domain::constants::DEFAULT_TIMEZONE
            .parse()
            .unwrap_or(chrono_tz::UTC),
    };

    let service_account = match (
        env_opt("STUDIOBOOK_SERVICE_ACCOUNT_EMAIL"),
        env_opt("STUDIOBOOK_SERVICE_ACCOUNT_KEY"),
    ) {
        (Some(client_email), Some(private_key)) => {
            Some(ServiceAccountKey { client_email, private_key })
        }
        _ => None,
    };

    let calendar = CalendarConfig {
        calendar_id: env_opt("STUDIOBOOK_CALENDAR_ID"),
        service_account_json: env_opt("STUDIOBOOK_SERVICE_ACCOUNT_JSON"),
        service_account,
        ics_url: env_opt("STUDIOBOOK_CALENDAR_ICS_URL"),
        webhook_url: env_opt("STUDIOBOOK_CALENDAR_WEBHOOK_URL"),
        timezone,
    };

    let crm = CrmConfig {
        subdomain: env_opt("STUDIOBOOK_CRM_SUBDOMAIN"),
        access_token: env_opt("STUDIOBOOK_CRM_ACCESS_TOKEN"),
    };

    let defaults = BookingConfig::default();
    let booking = BookingConfig {
        hourly_rate: env_parsed("STUDIOBOOK_HOURLY_RATE", defaults.hourly_rate)?,
        vat_rate: env_parsed("STUDIOBOOK_VAT_RATE", defaults.vat_rate)?,
    };

    info!(
        calendar_read = calendar.can_read(),
        calendar_write = calendar.can_write(),
        crm = crm.is_configured(),
        timezone = %calendar.timezone,
        "configuration loaded"
    );

    Ok(Config { calendar, crm, booking })
}

/// Optional environment variable; empty strings count as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Optional parsed environment variable with a default.
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env_opt(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| StudiobookError::Config(format!("invalid value for {key}: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "STUDIOBOOK_CALENDAR_ID",
        "STUDIOBOOK_SERVICE_ACCOUNT_EMAIL",
        "STUDIOBOOK_SERVICE_ACCOUNT_KEY",
        "STUDIOBOOK_SERVICE_ACCOUNT_JSON",
        "STUDIOBOOK_CALENDAR_ICS_URL",
        "STUDIOBOOK_CALENDAR_WEBHOOK_URL",
        "STUDIOBOOK_TIMEZONE",
        "STUDIOBOOK_CRM_SUBDOMAIN",
        "STUDIOBOOK_CRM_ACCESS_TOKEN",
        "STUDIOBOOK_HOURLY_RATE",
        "STUDIOBOOK_VAT_RATE",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_yields_degraded_but_valid_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = load_from_env().expect("empty env must load");
        assert!(!config.calendar.can_read());
        assert!(!config.calendar.can_write());
        assert!(!config.crm.is_configured());
        assert_eq!(config.booking.hourly_rate, 215);
        assert_eq!(config.calendar.timezone.name(), "Asia/Jerusalem");
    }

    #[test]
    fn ics_and_crm_settings_are_picked_up() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("STUDIOBOOK_CALENDAR_ICS_URL", "https://cal.example.com/feed.ics");
        std::env::set_var("STUDIOBOOK_CRM_SUBDOMAIN", "studio");
        std::env::set_var("STUDIOBOOK_CRM_ACCESS_TOKEN", "secret");
        std::env::set_var("STUDIOBOOK_HOURLY_RATE", "300");

        let config = load_from_env().expect("env must load");
        assert!(config.calendar.can_read());
        assert!(!config.calendar.can_write());
        assert!(config.crm.is_configured());
        assert_eq!(config.booking.hourly_rate, 300);

        clear_env();
    }

    #[test]
    fn invalid_timezone_is_rejected() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("STUDIOBOOK_TIMEZONE", "Mars/Olympus_Mons");
        let result = load_from_env();
        assert!(matches!(result, Err(StudiobookError::Config(_))));

        clear_env();
    }

    #[test]
    fn invalid_rate_is_rejected() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("STUDIOBOOK_HOURLY_RATE", "a-lot");
        let result = load_from_env();
        assert!(matches!(result, Err(StudiobookError::Config(_))));

        clear_env();
    }

    #[test]
    fn blank_values_count_as_absent() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("STUDIOBOOK_CALENDAR_ICS_URL", "   ");
        let config = load_from_env().expect("env must load");
        assert!(config.calendar.ics_url.is_none());

        clear_env();
    }
}

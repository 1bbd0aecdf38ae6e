//! Adapter wiring
//!
//! Turns the loaded configuration into the concrete port implementations
//! the booking core consumes. Selection rules:
//!
//! - availability reads: the ICS feed wins when both it and the structured
//!   API are configured; either alone works; neither yields `None` and the
//!   core runs fail-open
//! - calendar writes: the structured API when credentials are present,
//!   otherwise the webhook fallback, otherwise `None`
//! - CRM leads: only when both the subdomain and access token are set

use std::sync::Arc;

use reqwest::Client;
use studiobook_core::checkout::ports::{CalendarWriter, LeadWriter};
use studiobook_core::BusyCalendar;
use studiobook_domain::{CalendarConfig, Config, Result, ServiceAccountKey, StudiobookError};
use tracing::{info, warn};

use crate::integrations::calendar::auth::{
    ServiceAccountTokenProvider, SCOPE_READONLY, SCOPE_READWRITE,
};
use crate::integrations::calendar::{GoogleCalendarClient, IcsFeed, WebhookCalendarWriter};
use crate::integrations::crm::KommoClient;

/// Resolve the service-account credential, preferring the raw JSON blob
/// over the split email/key pair.
pub fn resolve_service_account(config: &CalendarConfig) -> Result<Option<ServiceAccountKey>> {
    if let Some(raw) = &config.service_account_json {
        let parsed: ServiceAccountJson = serde_json::from_str(raw).map_err(|e| {
            StudiobookError::Config(format!("invalid service-account JSON: {e}"))
        })?;
        return Ok(Some(ServiceAccountKey {
            client_email: parsed.client_email,
            private_key: parsed.private_key,
        }));
    }
    Ok(config.service_account.clone())
}

/// Build the availability source, if any read path is configured.
pub fn build_busy_calendar(
    http: &Client,
    config: &Config,
) -> Result<Option<Arc<dyn BusyCalendar>>> {
    let calendar = &config.calendar;

    if let Some(url) = &calendar.ics_url {
        info!("availability source: ICS feed");
        let feed = IcsFeed::new(http.clone(), url.clone(), calendar.timezone);
        return Ok(Some(Arc::new(feed)));
    }

    if let Some(calendar_id) = &calendar.calendar_id {
        if let Some(key) = resolve_service_account(calendar)? {
            info!("availability source: structured calendar API");
            let tokens = ServiceAccountTokenProvider::new(http.clone(), key, SCOPE_READONLY);
            let client = GoogleCalendarClient::new(
                http.clone(),
                calendar_id.clone(),
                Arc::new(tokens),
                calendar.timezone,
            );
            return Ok(Some(Arc::new(client)));
        }
    }

    warn!("no availability source configured; all slots will show as free");
    Ok(None)
}

/// Build the event writer, if any write path is configured.
pub fn build_calendar_writer(
    http: &Client,
    config: &Config,
) -> Result<Option<Arc<dyn CalendarWriter>>> {
    let calendar = &config.calendar;

    if let Some(calendar_id) = &calendar.calendar_id {
        if let Some(key) = resolve_service_account(calendar)? {
            info!("calendar writer: structured calendar API");
            let tokens = ServiceAccountTokenProvider::new(http.clone(), key, SCOPE_READWRITE);
            let client = GoogleCalendarClient::new(
                http.clone(),
                calendar_id.clone(),
                Arc::new(tokens),
                calendar.timezone,
            );
            return Ok(Some(Arc::new(client)));
        }
    }

    if let Some(url) = &calendar.webhook_url {
        info!("calendar writer: webhook fallback");
        let writer = WebhookCalendarWriter::new(http.clone(), url.clone(), calendar.timezone);
        return Ok(Some(Arc::new(writer)));
    }

    warn!("no calendar writer configured; checkout will be rejected");
    Ok(None)
}

/// Build the CRM lead writer, if the integration is configured.
pub fn build_lead_writer(http: &Client, config: &Config) -> Option<Arc<dyn LeadWriter>> {
    let crm = &config.crm;
    match (&crm.subdomain, &crm.access_token) {
        (Some(subdomain), Some(token)) => {
            info!("crm writer: lead API");
            Some(Arc::new(KommoClient::new(http.clone(), subdomain, token.clone())))
        }
        _ => {
            info!("crm integration not configured; leads will be skipped");
            None
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ServiceAccountJson {
    client_email: String,
    private_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::default()
    }

    #[test]
    fn empty_config_wires_nothing() {
        let http = Client::new();
        let config = base_config();
        assert!(build_busy_calendar(&http, &config).unwrap().is_none());
        assert!(build_calendar_writer(&http, &config).unwrap().is_none());
        assert!(build_lead_writer(&http, &config).is_none());
    }

    #[test]
    fn ics_url_wins_over_structured_api_for_reads() {
        let http = Client::new();
        let mut config = base_config();
        config.calendar.ics_url = Some("https://cal.example.com/feed.ics".into());
        config.calendar.calendar_id = Some("studio@group".into());
        config.calendar.service_account = Some(ServiceAccountKey {
            client_email: "svc@example.iam".into(),
            private_key: "not-a-real-key".into(),
        });

        // Wiring must not touch the credentials when the feed is chosen.
        assert!(build_busy_calendar(&http, &config).unwrap().is_some());
    }

    #[test]
    fn webhook_is_the_write_fallback() {
        let http = Client::new();
        let mut config = base_config();
        config.calendar.webhook_url = Some("https://hooks.example.com/booking".into());
        assert!(build_calendar_writer(&http, &config).unwrap().is_some());
        assert!(build_busy_calendar(&http, &config).unwrap().is_none());
    }

    #[test]
    fn crm_needs_both_settings() {
        let http = Client::new();
        let mut config = base_config();
        config.crm.subdomain = Some("studio".into());
        assert!(build_lead_writer(&http, &config).is_none());

        config.crm.access_token = Some("secret".into());
        assert!(build_lead_writer(&http, &config).is_some());
    }

    #[test]
    fn json_blob_is_preferred_over_split_pair() {
        let mut calendar = CalendarConfig::default();
        calendar.service_account = Some(ServiceAccountKey {
            client_email: "pair@example.iam".into(),
            private_key: "pair-key".into(),
        });
        calendar.service_account_json = Some(
            r#"{"client_email":"blob@example.iam","private_key":"blob-key"}"#.into(),
        );

        let key = resolve_service_account(&calendar).unwrap().unwrap();
        assert_eq!(key.client_email, "blob@example.iam");
    }

    #[test]
    fn malformed_json_blob_is_a_config_error() {
        let mut calendar = CalendarConfig::default();
        calendar.service_account_json = Some("{not json".into());
        let err = resolve_service_account(&calendar).unwrap_err();
        assert!(matches!(err, StudiobookError::Config(_)));
    }
}

//! Webhook fallback for calendar writes
//!
//! Deployments without service-account credentials can point a generic
//! webhook URL at an automation that creates the event on their behalf.
//! The forwarded payload mirrors the structured write contract, so the
//! receiving side can be swapped without touching this code.

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use studiobook_core::checkout::ports::{CalendarEventRequest, CalendarWriter, CreatedEvent};
use studiobook_domain::{BusyCategory, Result, StudiobookError};
use tracing::info;

use crate::errors::InfraError;

/// Calendar writer that forwards event payloads to a configured URL.
pub struct WebhookCalendarWriter {
    http: Client,
    url: String,
    timezone: Tz,
}

impl WebhookCalendarWriter {
    pub fn new(http: Client, url: String, timezone: Tz) -> Self {
        Self { http, url, timezone }
    }
}

#[async_trait]
impl CalendarWriter for WebhookCalendarWriter {
    async fn create_event(&self, request: &CalendarEventRequest) -> Result<CreatedEvent> {
        let payload = WebhookPayload {
            start: request.window.start.with_timezone(&self.timezone).to_rfc3339(),
            end: request.window.end.with_timezone(&self.timezone).to_rfc3339(),
            title: request.title.clone(),
            description: request.description.clone(),
            color: match request.category {
                BusyCategory::Service => "services",
                BusyCategory::External => "external",
                BusyCategory::Rent | BusyCategory::Unknown => "rent",
            }
            .to_string(),
        };

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(StudiobookError::Upstream(format!(
                "webhook error ({status}): {error_text}"
            )))
            .into());
        }

        // The webhook is free to omit identifiers; a synthetic id keeps the
        // commit result well-formed.
        let body: WebhookResponse = response.json().await.unwrap_or_default();
        let id = body.id.unwrap_or_else(|| format!("webhook-{}", request.commit_token));
        info!(event_id = %id, "calendar event forwarded via webhook");
        Ok(CreatedEvent { id, link: body.html_link })
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    start: String,
    end: String,
    title: String,
    description: String,
    color: String,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookResponse {
    id: Option<String>,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use studiobook_domain::constants::DEFAULT_TIMEZONE;
    use studiobook_domain::TimeInterval;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request() -> CalendarEventRequest {
        CalendarEventRequest {
            window: TimeInterval::new(
                Utc.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 6, 10, 13, 0, 0).unwrap(),
            )
            .unwrap(),
            title: "Booking: Studio rental".to_string(),
            description: "Client: Dana".to_string(),
            category: BusyCategory::Rent,
            commit_token: Uuid::new_v4(),
        }
    }

    fn writer(url: String) -> WebhookCalendarWriter {
        WebhookCalendarWriter::new(Client::new(), url, DEFAULT_TIMEZONE.parse().unwrap())
    }

    #[tokio::test]
    async fn forwards_the_write_payload_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "title": "Booking: Studio rental",
                "color": "rent"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "hook-1",
                "htmlLink": "https://calendar.example.com/hook-1"
            })))
            .mount(&server)
            .await;

        let created =
            writer(format!("{}/hook", server.uri())).create_event(&request()).await.unwrap();
        assert_eq!(created.id, "hook-1");
        assert_eq!(created.link.as_deref(), Some("https://calendar.example.com/hook-1"));
    }

    #[tokio::test]
    async fn missing_response_id_gets_a_synthetic_one() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let created = writer(server.uri()).create_event(&request()).await.unwrap();
        assert!(created.id.starts_with("webhook-"));
        assert!(created.link.is_none());
    }

    #[tokio::test]
    async fn webhook_failure_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = writer(server.uri()).create_event(&request()).await.unwrap_err();
        assert!(matches!(err, StudiobookError::Upstream(_)));
    }
}

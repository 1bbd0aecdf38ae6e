//! Kommo CRM lead client
//!
//! Implements the `LeadWriter` port against the Kommo v4 API: one lead per
//! booking, priced at the checkout total, followed by a note carrying the
//! full booking summary. The note write is best-effort; the lead stands
//! either way.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use studiobook_core::checkout::ports::{LeadOutcome, LeadRequest, LeadWriter};
use studiobook_domain::{Result, StudiobookError};
use tracing::{info, warn};

use crate::errors::InfraError;

/// Client for one Kommo account.
pub struct KommoClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl KommoClient {
    pub fn new(http: Client, subdomain: &str, access_token: String) -> Self {
        Self { http, base_url: format!("https://{subdomain}.kommo.com"), access_token }
    }

    /// Override the API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn note_text(request: &LeadRequest) -> String {
        let mut text = format!(
            "Studio booking\nService: {}\nDate: {}\nTime: {}\nDuration: {} h\nTotal: {}\n\n\
             Client: {}\nPhone: {}\nEmail: {}",
            request.service_label,
            request.date,
            request.time.format("%H:%M"),
            request.duration_hours,
            request.total,
            request.name,
            request.phone,
            request.email,
        );
        if let Some(business) = &request.business {
            text.push_str(&format!("\nBusiness: {business}"));
        }
        if let Some(number) = &request.business_number {
            text.push_str(&format!("\nBusiness number: {number}"));
        }
        text.push_str(&format!("\nRef: {}", request.commit_token));
        text
    }

    async fn add_note(&self, lead_id: i64, text: String) {
        let url = format!("{}/api/v4/leads/{lead_id}/notes", self.base_url);
        let payload = json!([{ "note_type": "common", "params": { "text": text } }]);

        let outcome = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await;
        match outcome {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(lead_id, status = %response.status(), "failed to attach note to lead");
            }
            Err(err) => warn!(lead_id, error = %err, "failed to attach note to lead"),
        }
    }
}

#[async_trait]
impl LeadWriter for KommoClient {
    async fn create_lead(&self, request: &LeadRequest) -> Result<LeadOutcome> {
        let url = format!("{}/api/v4/leads", self.base_url);
        let payload = json!([{
            "name": format!("Booking: {} - {}", request.service_label, request.date),
            "price": request.total,
        }]);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(StudiobookError::Upstream(format!(
                "CRM API error ({status}): {error_text}"
            )))
            .into());
        }

        let body: LeadsResponse = response
            .json()
            .await
            .map_err(|e| StudiobookError::Upstream(format!("failed to parse CRM response: {e}")))?;

        let Some(lead_id) = body.embedded.leads.first().map(|lead| lead.id) else {
            return Err(StudiobookError::Upstream("CRM response carried no lead id".into()));
        };
        info!(lead_id, "crm lead created");

        self.add_note(lead_id, Self::note_text(request)).await;

        Ok(LeadOutcome::Created {
            id: lead_id.to_string(),
            url: Some(format!("{}/leads/detail/{lead_id}", self.base_url)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LeadsResponse {
    #[serde(rename = "_embedded")]
    embedded: EmbeddedLeads,
}

#[derive(Debug, Deserialize)]
struct EmbeddedLeads {
    #[serde(default)]
    leads: Vec<LeadStub>,
}

#[derive(Debug, Deserialize)]
struct LeadStub {
    id: i64,
}

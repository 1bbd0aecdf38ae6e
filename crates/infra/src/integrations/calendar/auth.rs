//! Service-account authentication for the structured calendar API
//!
//! Implements the JWT-bearer grant: sign an RS256 assertion with the
//! service-account private key and exchange it for a short-lived access
//! token at the provider's token endpoint.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use studiobook_domain::{Result, ServiceAccountKey, StudiobookError};

use crate::errors::InfraError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Read-only calendar scope.
pub const SCOPE_READONLY: &str = "https://www.googleapis.com/auth/calendar.readonly";
/// Read-write calendar scope.
pub const SCOPE_READWRITE: &str = "https://www.googleapis.com/auth/calendar";

/// Source of bearer tokens for calendar API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Exchanges a signed service-account assertion for an access token.
pub struct ServiceAccountTokenProvider {
    http: Client,
    key: ServiceAccountKey,
    scope: String,
    token_url: String,
}

impl ServiceAccountTokenProvider {
    pub fn new(http: Client, key: ServiceAccountKey, scope: &str) -> Self {
        Self { http, key, scope: scope.to_string(), token_url: TOKEN_URL.to_string() }
    }

    /// Override the token endpoint (for testing).
    #[cfg(test)]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    fn signed_assertion(&self) -> Result<String> {
        // Keys arriving via environment variables often carry literal
        // backslash-n sequences instead of newlines.
        let pem = self.key.private_key.replace("\\n", "\n");
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            StudiobookError::Config(format!("invalid service-account private key: {e}"))
        })?;

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + 3600,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| StudiobookError::Config(format!("failed to sign assertion: {e}")))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let assertion = self.signed_assertion()?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| StudiobookError::from(InfraError::from(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(StudiobookError::Upstream(format!(
                "token grant failed ({status}): {error_text}"
            )))
            .into());
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            StudiobookError::Upstream(format!("failed to parse token response: {e}"))
        })?;

        Ok(token_response.access_token)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

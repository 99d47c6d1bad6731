//! HTTP client for the commerce API's URL signing endpoint.
//!
//! Provides a minimal client holding an optional bearer session credential.
//! Signed URLs are tied to an authenticated session, so the credential can be
//! attached after construction (sign-in) and dropped again (sign-out).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shopassets_core::{Settings, SignedUrl, SignerError, SignerResult, UrlSigner};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Wire envelope returned by the signing endpoint.
#[derive(Debug, Deserialize)]
struct SignedUrlEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SignedUrlPayload>,
}

#[derive(Debug, Deserialize)]
struct SignedUrlPayload {
    url: String,
    expires_at: DateTime<Utc>,
    expires_in_seconds: u64,
}

/// HTTP client for the signing endpoint with an optional session credential.
#[derive(Clone, Debug)]
pub struct SigningClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl SigningClient {
    pub fn new(base_url: String, session_token: Option<String>) -> SignerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SignerError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SigningClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token,
        })
    }

    /// Create a client pointed at the configured commerce API.
    pub fn from_settings(settings: &Settings, session_token: Option<String>) -> SignerResult<Self> {
        Self::new(settings.api_base_url.clone(), session_token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach or drop the session credential (sign-in / sign-out).
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    fn endpoint(&self, tenant: &str) -> String {
        format!("{}/{}/storage/signed-url", self.base_url, tenant)
    }
}

#[async_trait]
impl UrlSigner for SigningClient {
    async fn sign(
        &self,
        tenant: &str,
        key: &str,
        expiration_minutes: u32,
    ) -> SignerResult<SignedUrl> {
        let token = self
            .session_token
            .as_deref()
            .ok_or(SignerError::NoCredential)?;

        let expiration = expiration_minutes.to_string();
        let response = self
            .client
            .get(self.endpoint(tenant))
            .bearer_auth(token)
            .query(&[("key", key), ("expiration", expiration.as_str())])
            .send()
            .await
            .map_err(|e| SignerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SignerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: SignedUrlEnvelope = response
            .json()
            .await
            .map_err(|e| SignerError::MalformedResponse(e.to_string()))?;

        let payload = match envelope {
            SignedUrlEnvelope {
                success: true,
                data: Some(payload),
            } => payload,
            _ => {
                return Err(SignerError::MalformedResponse(
                    "response missing success/data fields".to_string(),
                ))
            }
        };

        tracing::debug!(key = %key, expires_at = %payload.expires_at, "Obtained signed URL");

        Ok(SignedUrl {
            url: payload.url,
            expires_at: payload.expires_at,
            expires_in_seconds: payload.expires_in_seconds,
        })
    }

    fn has_session(&self) -> bool {
        self.session_token.is_some()
    }
}

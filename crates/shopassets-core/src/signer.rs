//! URL signing abstraction
//!
//! This module defines the trait the resolver uses to obtain temporary signed
//! URLs. The production implementation (an HTTP client for the commerce API)
//! lives in `shopassets-client`; tests substitute their own implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Signing operation errors
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Signing request failed: {0}")]
    Request(String),

    #[error("Signing endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed signing response: {0}")]
    MalformedResponse(String),

    #[error("No session credential available")]
    NoCredential,
}

/// Result type for signing operations
pub type SignerResult<T> = Result<T, SignerError>;

/// A temporary signed URL returned by the remote signer.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: u64,
}

/// Remote URL signing abstraction.
///
/// Implementations perform one network round trip per call; the resolver owns
/// caching and fallback, so implementations should simply surface failures.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Request a signed URL for `key` scoped to `tenant`, valid for roughly
    /// `expiration_minutes`.
    async fn sign(
        &self,
        tenant: &str,
        key: &str,
        expiration_minutes: u32,
    ) -> SignerResult<SignedUrl>;

    /// Whether a session credential is available. Signed-URL resolution is
    /// skipped entirely without one.
    fn has_session(&self) -> bool;
}

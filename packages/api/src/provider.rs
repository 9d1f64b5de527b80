//! # Identity provider seam
//!
//! Everything the application needs from the hosted identity service, behind a
//! trait so handlers and guards receive it as an injected dependency.
//! `crate::supabase::SupabaseClient` is the production implementation; tests
//! use in-process doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a successful code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

/// Request for a one-time sign-in link.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicLinkRequest {
    pub email: String,
    /// Where the emailed link sends the browser.
    pub redirect_to: String,
    /// PKCE S256 challenge; the verifier stays in the server session.
    pub code_challenge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider answered and refused (bad email, expired code, revoked token).
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("unexpected identity provider response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Email a one-time sign-in link.
    async fn send_magic_link(&self, request: MagicLinkRequest) -> Result<(), ProviderError>;

    /// Trade the code from a followed link (plus PKCE verifier) for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderSession, ProviderError>;

    /// Resolve the user an access token belongs to. Fails for expired or revoked tokens.
    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError>;
}

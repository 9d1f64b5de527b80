//! Session data types and their persistence in the server session store.

use serde::{Deserialize, Serialize};
use store::Caller;

use crate::models::UserInfo;
use crate::provider::{ProviderSession, ProviderUser};

/// Key for storing the signed-in session.
pub const SESSION_AUTH_KEY: &str = "auth_session";

/// Key for the PKCE verifier between link request and callback.
pub const SESSION_PKCE_VERIFIER_KEY: &str = "pkce_verifier";

/// Provider tokens and user held in the server session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
    /// Unix seconds of the last confirmation by the provider.
    pub validated_at: i64,
}

impl AuthSession {
    pub fn from_provider(session: ProviderSession, now: i64) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: session.user,
            validated_at: now,
        }
    }

    pub fn caller(&self) -> Caller {
        Caller::new(self.user.id.clone(), self.access_token.clone())
    }

    pub fn user_info(&self) -> UserInfo {
        UserInfo::from(&self.user)
    }

    /// True once the last provider confirmation is `max_age_secs` or more in the past.
    pub fn needs_revalidation(&self, now: i64, max_age_secs: u64) -> bool {
        now.saturating_sub(self.validated_at) >= max_age_secs as i64
    }
}

#[cfg(feature = "server")]
mod persist {
    use tower_sessions::Session;

    use super::{AuthSession, SESSION_AUTH_KEY, SESSION_PKCE_VERIFIER_KEY};
    use crate::error::ApiError;

    fn session_error(e: tower_sessions::session::Error) -> ApiError {
        ApiError::Session(e.to_string())
    }

    pub async fn load(session: &Session) -> Result<Option<AuthSession>, ApiError> {
        session.get(SESSION_AUTH_KEY).await.map_err(session_error)
    }

    /// Persist a new sign-in. The session id is cycled to avoid fixation.
    pub async fn sign_in(session: &Session, auth: &AuthSession) -> Result<(), ApiError> {
        session.cycle_id().await.map_err(session_error)?;
        session.insert(SESSION_AUTH_KEY, auth).await.map_err(session_error)
    }

    /// Overwrite the stored session after re-validation.
    pub async fn refresh(session: &Session, auth: &AuthSession) -> Result<(), ApiError> {
        session.insert(SESSION_AUTH_KEY, auth).await.map_err(session_error)
    }

    pub async fn sign_out(session: &Session) -> Result<(), ApiError> {
        session.flush().await.map_err(session_error)
    }

    pub async fn store_verifier(session: &Session, verifier: &str) -> Result<(), ApiError> {
        session
            .insert(SESSION_PKCE_VERIFIER_KEY, verifier)
            .await
            .map_err(session_error)
    }

    /// Remove and return the verifier; a link can only be exchanged once.
    pub async fn take_verifier(session: &Session) -> Result<Option<String>, ApiError> {
        session
            .remove(SESSION_PKCE_VERIFIER_KEY)
            .await
            .map_err(session_error)
    }
}

#[cfg(feature = "server")]
pub use persist::{load, refresh, sign_in, sign_out, store_verifier, take_verifier};

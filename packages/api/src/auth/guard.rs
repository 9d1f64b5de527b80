//! Deciding whether a request carries a usable session.
//!
//! The axum middleware and the `get_current_user` server function both go
//! through [`SessionGuard::resolve`], so page loads and the client-side gate
//! agree on who is signed in. Anything unexpected resolves to anonymous.

use std::sync::Arc;

use super::session::AuthSession;
use crate::error::ApiError;
use crate::provider::{IdentityProvider, ProviderError};

/// Where unauthenticated page requests are sent.
pub const LOGIN_PATH: &str = "/login";

const PUBLIC_PREFIXES: &[&str] = &["/auth/", "/api/auth/", "/assets/", "/wasm/", "/_dioxus"];
const PUBLIC_PATHS: &[&str] = &["/login", "/auth-error", "/favicon.ico"];

/// Paths reachable without a session.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Server function and JSON endpoints; refused with 401 rather than redirected.
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Outcome of checking a stored session.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// `refreshed` is set when the provider re-confirmed the session just now.
    Authenticated { session: AuthSession, refreshed: bool },
    /// `clear` is set when the stored session must be removed.
    Anonymous { clear: bool },
}

impl Resolution {
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Resolution::Authenticated { session, .. } => Some(session),
            Resolution::Anonymous { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionGuard {
    identity: Arc<dyn IdentityProvider>,
    revalidate_after: u64,
}

impl SessionGuard {
    pub fn new(identity: Arc<dyn IdentityProvider>, revalidate_after: u64) -> Self {
        Self {
            identity,
            revalidate_after,
        }
    }

    /// Check `stored` (the result of reading the session store) at time `now`.
    pub async fn resolve(
        &self,
        stored: Result<Option<AuthSession>, ApiError>,
        now: i64,
    ) -> Resolution {
        let session = match stored {
            Ok(Some(session)) => session,
            Ok(None) => return Resolution::Anonymous { clear: false },
            Err(e) => {
                tracing::error!("Session store unavailable: {}", e);
                return Resolution::Anonymous { clear: false };
            }
        };

        if !session.needs_revalidation(now, self.revalidate_after) {
            return Resolution::Authenticated {
                session,
                refreshed: false,
            };
        }

        match self.identity.get_user(&session.access_token).await {
            Ok(user) if user.id == session.user.id => Resolution::Authenticated {
                session: AuthSession {
                    user,
                    validated_at: now,
                    ..session
                },
                refreshed: true,
            },
            Ok(user) => {
                tracing::warn!(
                    "Access token for {} now resolves to {}; dropping session",
                    session.user.id,
                    user.id
                );
                Resolution::Anonymous { clear: true }
            }
            Err(ProviderError::Rejected { message, .. }) => {
                tracing::info!("Session for {} expired: {}", session.user.id, message);
                Resolution::Anonymous { clear: true }
            }
            Err(e) => {
                tracing::error!("Could not re-validate session: {}", e);
                Resolution::Anonymous { clear: false }
            }
        }
    }
}

#[cfg(feature = "server")]
mod server {
    use tower_sessions::Session;

    use super::{Resolution, SessionGuard};
    use crate::auth::session::{self, AuthSession};
    use crate::error::ApiError;

    pub fn unix_now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    impl SessionGuard {
        /// Resolve the request's session and write back any refresh or removal.
        pub async fn current_session(
            &self,
            store: &Session,
        ) -> Result<Option<AuthSession>, ApiError> {
            let stored = session::load(store).await;
            match self.resolve(stored, unix_now()).await {
                Resolution::Authenticated { session, refreshed } => {
                    if refreshed {
                        session::refresh(store, &session).await?;
                    }
                    Ok(Some(session))
                }
                Resolution::Anonymous { clear } => {
                    if clear {
                        session::sign_out(store).await?;
                    }
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(feature = "server")]
pub use server::unix_now;

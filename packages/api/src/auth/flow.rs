//! # Magic-link sign-in as a state machine
//!
//! ```text
//! Anonymous ──link requested──▶ LinkRequested ──link followed──▶ CallbackPending
//!     ▲                                                              │
//!     └──────────── signed out ◀──── Authenticated ◀──exchange ok────┘
//! ```
//!
//! Any failure before `Authenticated` lands in `Failed`. Recovery is always a new
//! link request by the user; nothing retries on its own. The login form and the
//! callback handler drive the same machine so both report consistent states.

use thiserror::Error;

use crate::models::UserInfo;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    Anonymous,
    LinkRequested { email: String },
    CallbackPending,
    Authenticated { user: UserInfo },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    LinkRequested { email: String },
    LinkFollowed,
    ExchangeSucceeded { user: UserInfo },
    Failed { message: String },
    SignedOut,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot apply {event:?} while {phase:?}")]
pub struct InvalidTransition {
    pub phase: AuthPhase,
    pub event: AuthEvent,
}

impl Default for AuthPhase {
    fn default() -> Self {
        Self::Anonymous
    }
}

impl AuthPhase {
    pub fn apply(self, event: AuthEvent) -> Result<AuthPhase, InvalidTransition> {
        use AuthPhase as P;

        match (self, event) {
            (
                P::Anonymous | P::LinkRequested { .. } | P::Failed { .. },
                AuthEvent::LinkRequested { email },
            ) => Ok(P::LinkRequested { email }),

            // The link may be opened in a browser session that never requested it.
            (P::Anonymous | P::LinkRequested { .. } | P::Failed { .. }, AuthEvent::LinkFollowed) => {
                Ok(P::CallbackPending)
            }

            (P::CallbackPending, AuthEvent::ExchangeSucceeded { user }) => {
                Ok(P::Authenticated { user })
            }

            (phase, AuthEvent::Failed { message })
                if !matches!(phase, P::Authenticated { .. }) =>
            {
                Ok(P::Failed { message })
            }

            (P::Authenticated { .. }, AuthEvent::SignedOut) => Ok(P::Anonymous),

            (phase, event) => Err(InvalidTransition { phase, event }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPhase::Authenticated { .. })
    }

    /// Inline banner text for the login form, `(is_error, text)`.
    pub fn banner(&self) -> Option<(bool, String)> {
        match self {
            AuthPhase::LinkRequested { .. } => {
                Some((false, "Check your email for the login link!".to_string()))
            }
            AuthPhase::Failed { message } => Some((true, message.clone())),
            _ => None,
        }
    }
}

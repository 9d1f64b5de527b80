//! Magic-link authentication: link requests, callback exchange, session storage
//! and the session guard.

mod callback;
pub mod flow;
mod guard;
mod magic_link;
pub mod session;

pub use callback::{complete_callback, CallbackParams, AUTH_ERROR_PATH, HANDLE_TOKEN_PATH};
pub use flow::{AuthEvent, AuthPhase};
pub use guard::{is_api_path, is_public_path, Resolution, SessionGuard, LOGIN_PATH};
#[cfg(feature = "server")]
pub use guard::unix_now;
pub use magic_link::{callback_url, request_magic_link, CALLBACK_PATH, MAGIC_LINK_SENT};
pub use session::{AuthSession, SESSION_AUTH_KEY, SESSION_PKCE_VERIFIER_KEY};

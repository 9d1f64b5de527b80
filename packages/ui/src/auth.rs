//! Authentication context and hooks for the UI.

use std::time::Duration;

use api::UserInfo;
use dioxus::prelude::*;

use crate::query::use_query_cache;
use crate::timer::sleep;

const SESSION_POLL: Duration = Duration::from_secs(30);

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// What a protected view may do with the current auth state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthGate {
    /// The session check has not answered yet; render nothing.
    Loading,
    Allowed(UserInfo),
    /// Navigate to the login route.
    Denied,
}

impl AuthGate {
    pub fn from_state(state: &AuthState) -> Self {
        match (&state.user, state.loading) {
            (Some(user), _) => AuthGate::Allowed(user.clone()),
            (None, true) => AuthGate::Loading,
            (None, false) => AuthGate::Denied,
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Gate for protected views; call it first thing in the component.
pub fn use_require_auth() -> AuthGate {
    let auth = use_auth();
    let state = auth();
    AuthGate::from_state(&state)
}

/// Ask the server who is signed in. Errors count as signed out.
async fn fetch_user() -> Option<UserInfo> {
    match api::get_current_user().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Session check failed: {}", e);
            None
        }
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Fetch the current user on mount
    let _ = use_resource(move || async move {
        let user = fetch_user().await;
        auth_state.set(AuthState {
            user,
            loading: false,
        });
    });

    // Re-check the session periodically so an expired one locks the view
    use_effect(move || {
        spawn(async move {
            loop {
                sleep(SESSION_POLL).await;

                if auth_state.peek().loading {
                    continue;
                }
                let user = fetch_user().await;
                if auth_state.peek().user != user {
                    auth_state.set(AuthState {
                        user,
                        loading: false,
                    });
                }
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();
    let mut cache = use_query_cache();

    let onclick = move |_| async move {
        match api::logout().await {
            Ok(()) => {
                cache.write().clear();
                auth_state.set(AuthState {
                    user: None,
                    loading: false,
                });
                // Redirect to login
                #[cfg(target_arch = "wasm32")]
                {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(api::auth::LOGIN_PATH);
                    }
                }
            }
            Err(e) => tracing::error!("Logout failed: {}", e),
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

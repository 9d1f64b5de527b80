//! Where the callback sends the browser once the session cookie is set.

use std::time::Duration;

use dioxus::prelude::*;
use ui::timer::sleep;
use ui::{use_auth, AuthState};

use crate::Route;

/// Attempts at picking up the fresh session before giving up.
const CONFIRM_ATTEMPTS: u32 = 5;
const CONFIRM_INTERVAL: Duration = Duration::from_millis(400);

#[component]
pub fn HandleToken() -> Element {
    let mut auth = use_auth();
    let nav = use_navigator();

    use_future(move || async move {
        for attempt in 0..CONFIRM_ATTEMPTS {
            match api::get_current_user().await {
                Ok(Some(user)) => {
                    auth.set(AuthState {
                        user: Some(user),
                        loading: false,
                    });
                    nav.replace(Route::Home {});
                    return;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Session not ready: {}", e),
            }
            if attempt + 1 < CONFIRM_ATTEMPTS {
                sleep(CONFIRM_INTERVAL).await;
            }
        }
        nav.replace(Route::AuthError {});
    });

    rsx! {
        div {
            class: "login-container",
            p { class: "handle-token-message", "Logging you in..." }
        }
    }
}

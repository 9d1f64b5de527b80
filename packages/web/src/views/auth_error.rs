use dioxus::prelude::*;

use crate::Route;

/// Landing page for a magic link that could not be exchanged for a session.
#[component]
pub fn AuthError() -> Element {
    rsx! {
        div {
            class: "login-container",
            div {
                class: "login-card",
                h1 { class: "login-title", "Authentication Error" }
                p {
                    class: "auth-error-message",
                    "The login link is invalid or has expired. Please request a new one."
                }
                Link { class: "btn btn-primary login-submit", to: Route::Login {}, "Back to login" }
            }
        }
    }
}

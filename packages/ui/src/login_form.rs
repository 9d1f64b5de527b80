//! Email-only login form that requests a magic link.

use api::auth::{AuthEvent, AuthPhase};
use dioxus::prelude::*;
use serde::Deserialize;
use store::validate::validate_email;

use crate::components::{Banner, BannerKind, Button, Input, Label};

const MAGIC_LINK_ENDPOINT: &str = "/api/auth/magic-link";
const GENERIC_ERROR: &str = "Something went wrong";

/// Body of a refused magic-link request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Origin of the page the form runs in. Only a browser has one.
fn page_origin() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// The HTTP client needs an absolute URL, so the endpoint is joined to the page origin.
fn endpoint_url(origin: Option<&str>) -> Option<String> {
    origin
        .filter(|o| !o.is_empty())
        .map(|o| format!("{}{}", o.trim_end_matches('/'), MAGIC_LINK_ENDPOINT))
}

/// Error text to show for a refused request body.
fn refusal_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

async fn send_magic_link(email: &str) -> Result<(), String> {
    let Some(url) = endpoint_url(page_origin().as_deref()) else {
        tracing::warn!("Magic link request outside a browser page");
        return Err(GENERIC_ERROR.to_string());
    };
    let response = reqwest::Client::new()
        .post(url)
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("Magic link request failed: {}", e);
            GENERIC_ERROR.to_string()
        })?;

    if response.status().is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(refusal_message(&body))
}

/// Fold an event into the phase, keeping the phase on an impossible transition.
fn advance(mut phase: Signal<AuthPhase>, event: AuthEvent) {
    let current = phase.peek().clone();
    match current.apply(event) {
        Ok(next) => phase.set(next),
        Err(e) => tracing::warn!("Ignoring login event: {}", e),
    }
}

#[component]
pub fn LoginForm() -> Element {
    let mut email = use_signal(String::new);
    let phase = use_signal(AuthPhase::default);
    let mut pending = use_signal(|| false);
    let mut field_error = use_signal(|| None::<String>);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        if pending() {
            return;
        }
        let address = email().trim().to_string();
        if let Err(message) = validate_email(&address) {
            field_error.set(Some(message.to_string()));
            return;
        }
        field_error.set(None);

        pending.set(true);
        match send_magic_link(&address).await {
            Ok(()) => advance(phase, AuthEvent::LinkRequested { email: address }),
            Err(message) => advance(phase, AuthEvent::Failed { message }),
        }
        pending.set(false);
    };

    let banner = phase.read().banner().map(|(is_error, text)| {
        let kind = if is_error {
            BannerKind::Error
        } else {
            BannerKind::Success
        };
        (kind, text)
    });

    rsx! {
        div {
            class: "login-card",
            h1 { class: "login-title", "Welcome" }
            form {
                class: "form",
                onsubmit: handle_submit,
                div {
                    class: "field",
                    Label { html_for: "email", "Email" }
                    Input {
                        id: "email",
                        r#type: "email",
                        placeholder: "m@example.com",
                        value: email(),
                        error: field_error(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                Button {
                    r#type: "submit",
                    class: "login-submit",
                    disabled: pending(),
                    if pending() { "Logging in..." } else { "Login" }
                }
                if let Some((kind, text)) = banner {
                    Banner { kind, text }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_message_uses_error_field() {
        assert_eq!(
            refusal_message(r#"{"error":"Email rate limit exceeded"}"#),
            "Email rate limit exceeded"
        );
    }

    #[test]
    fn test_endpoint_follows_page_origin() {
        assert_eq!(
            endpoint_url(Some("https://homes.example.com")).as_deref(),
            Some("https://homes.example.com/api/auth/magic-link")
        );
        assert_eq!(
            endpoint_url(Some("http://127.0.0.1:3000/")).as_deref(),
            Some("http://127.0.0.1:3000/api/auth/magic-link")
        );
        assert_eq!(endpoint_url(None), None);
        assert_eq!(endpoint_url(Some("")), None);
    }

    #[test]
    fn test_refusal_message_falls_back() {
        assert_eq!(refusal_message(""), GENERIC_ERROR);
        assert_eq!(refusal_message(r#"{"message":"nope"}"#), GENERIC_ERROR);
        assert_eq!(refusal_message(r#"{"error":""}"#), GENERIC_ERROR);
    }
}

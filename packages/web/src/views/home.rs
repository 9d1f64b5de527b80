//! The map page, only reachable with a session.

use dioxus::prelude::*;
use ui::{use_auth, use_require_auth, AuthGate, ClickableMap, LogoutButton};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let gate = use_require_auth();

    use_effect(move || {
        if AuthGate::from_state(&auth()) == AuthGate::Denied {
            nav.replace(Route::Login {});
        }
    });

    let AuthGate::Allowed(user) = gate else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "page",
            header {
                class: "page-header",
                h1 { class: "page-title", "Explore Properties on the Map" }
                div {
                    class: "page-user",
                    if let Some(email) = user.email {
                        span { class: "page-email", "{email}" }
                    }
                    LogoutButton { class: "btn btn-outline btn-sm" }
                }
            }
            p {
                class: "page-hint",
                "Click anywhere on the map to add a property. Hover a marker to edit or delete it."
            }
            MapPanel {}
        }
    }
}

#[component]
fn MapPanel() -> Element {
    let settings = use_resource(|| async move { api::get_map_settings().await });

    let view = match &*settings.read() {
        Some(Ok(settings)) => rsx! {
            div {
                class: "map-frame",
                ClickableMap { settings: settings.clone() }
            }
        },
        Some(Err(e)) => rsx! {
            div { class: "map-frame map-message", "Map unavailable: {e}" }
        },
        None => rsx! {
            div { class: "map-frame map-message", "Loading map..." }
        },
    };
    view
}

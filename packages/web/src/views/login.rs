//! Login page with the magic-link form.

use dioxus::prelude::*;
use ui::{use_auth, LoginForm};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // If already logged in, go to the map
    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_some() {
            nav.replace(Route::Home {});
        }
    });

    rsx! {
        div {
            class: "login-container",
            LoginForm {}
        }
    }
}

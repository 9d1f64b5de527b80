//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const UI_CSS: Asset = asset!("/assets/ui.css");

mod auth;
pub use auth::{use_auth, use_require_auth, AuthGate, AuthProvider, AuthState, LogoutButton};

mod login_form;
pub use login_form::LoginForm;

pub mod map;
pub use map::ClickableMap;

mod modal;
pub use modal::Modal;

pub mod modals;

mod query;
pub use query::{use_invalidate_properties, use_properties, use_query_cache, QueryProvider};

pub mod timer;

//! Create, edit and delete dialogs for a property.
//!
//! All three share one lifecycle: submit, wait, then either show the success
//! banner, invalidate the property list and close after a short pause, or show
//! the error and stay open for another attempt.

mod create;
mod delete;
mod edit;

use std::future::Future;
use std::time::Duration;

use dioxus::prelude::*;

use crate::components::{Banner, BannerKind};
use crate::timer::sleep;

pub use create::CreatePropertyModal;
pub use delete::DeletePropertyModal;
pub use edit::EditPropertyModal;

/// How long the success banner stays before the dialog closes.
const CLOSE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded(&'static str),
    Failed(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    /// Action buttons disappear once the mutation went through.
    pub fn show_actions(&self) -> bool {
        !matches!(self, MutationStatus::Succeeded(_))
    }

    pub fn banner(&self) -> Option<(BannerKind, String)> {
        match self {
            MutationStatus::Succeeded(text) => Some((BannerKind::Success, text.to_string())),
            MutationStatus::Failed(text) => Some((BannerKind::Error, text.clone())),
            _ => None,
        }
    }
}

/// Drive `call` through the dialog lifecycle.
async fn run_mutation<T>(
    mut status: Signal<MutationStatus>,
    call: impl Future<Output = Result<T, ServerFnError>>,
    success: &'static str,
    invalidate: Callback<()>,
    on_close: EventHandler<()>,
) {
    if status.peek().is_pending() {
        return;
    }
    status.set(MutationStatus::Pending);

    match call.await {
        Ok(_) => {
            status.set(MutationStatus::Succeeded(success));
            invalidate.call(());
            sleep(CLOSE_DELAY).await;
            on_close.call(());
        }
        Err(e) => {
            tracing::warn!("Property mutation failed: {}", e);
            status.set(MutationStatus::Failed(e.to_string()));
        }
    }
}

#[component]
fn StatusBanner(status: MutationStatus) -> Element {
    match status.banner() {
        Some((kind, text)) => rsx! {
            Banner { kind, text }
        },
        None => rsx! {},
    }
}

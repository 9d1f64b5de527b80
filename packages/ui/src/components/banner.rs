use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Green or red status line under a form.
#[component]
pub fn Banner(kind: BannerKind, text: String) -> Element {
    let class = match kind {
        BannerKind::Success => "banner banner-success",
        BannerKind::Error => "banner banner-error",
    };

    rsx! {
        div { class, role: "status", "{text}" }
    }
}

use dioxus::prelude::*;

/// A full-screen backdrop with a centered card.
/// Clicking the backdrop triggers `on_close`; clicks inside the card do not.
#[component]
pub fn Modal(
    title: String,
    #[props(default)] description: Option<String>,
    on_close: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal-card",
                role: "dialog",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                div {
                    class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    if let Some(description) = description {
                        p { class: "modal-description", "{description}" }
                    }
                }
                div { class: "modal-content", {children} }
            }
        }
    }
}

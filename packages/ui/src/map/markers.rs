use api::Property;
use dioxus::prelude::*;

use crate::components::{Button, ButtonSize, ButtonVariant};
use crate::icons::{FaPen, FaTrash};
use crate::Icon;

/// Price pill at a property's position; hovering reveals image and actions.
#[component]
pub fn PropertyMarker(
    property: Property,
    left: f64,
    top: f64,
    on_edit: EventHandler<Property>,
    on_delete: EventHandler<Property>,
) -> Element {
    let mut hovered = use_signal(|| false);
    let label = property.price_label();
    let alt = format!("Property {}", property.id);
    let image_url = property.image_url.clone();
    let edit_target = property.clone();
    let delete_target = property.clone();

    rsx! {
        div {
            class: "marker",
            style: "left: {left}px; top: {top}px;",
            onmouseenter: move |_| hovered.set(true),
            onmouseleave: move |_| hovered.set(false),
            // Keep marker interaction from starting a map drag or click.
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            div { class: "marker-label", "{label}" }
            if hovered() {
                div {
                    class: "marker-card",
                    img { class: "marker-image", src: "{image_url}", alt: "{alt}" }
                    div { class: "marker-price", "{label}" }
                    div {
                        class: "marker-actions",
                        Button {
                            variant: ButtonVariant::Outline,
                            size: ButtonSize::Small,
                            onclick: move |evt: MouseEvent| {
                                evt.stop_propagation();
                                on_edit.call(edit_target.clone());
                            },
                            Icon { icon: FaPen, width: 12, height: 12 }
                            "Edit"
                        }
                        Button {
                            variant: ButtonVariant::Destructive,
                            size: ButtonSize::Small,
                            onclick: move |evt: MouseEvent| {
                                evt.stop_propagation();
                                on_delete.call(delete_target.clone());
                            },
                            Icon { icon: FaTrash, width: 12, height: 12 }
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

/// Pulsing dot where a new property is about to be created.
#[component]
pub fn TemporaryMarker(left: f64, top: f64) -> Element {
    rsx! {
        div {
            class: "temporary-marker",
            style: "left: {left}px; top: {top}px;",
            div { class: "temporary-marker-dot" }
            div { class: "temporary-marker-ping" }
        }
    }
}

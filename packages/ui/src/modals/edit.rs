use api::Property;
use dioxus::prelude::*;
use store::validate::{update_from_form, ValidationErrors};

use super::{run_mutation, MutationStatus, StatusBanner};
use crate::components::{Button, ButtonVariant, Input, Label};
use crate::modal::Modal;
use crate::query::use_invalidate_properties;

/// Edit price and image. Coordinates are not editable.
#[component]
pub fn EditPropertyModal(property: Property, on_close: EventHandler<()>) -> Element {
    let mut price = use_signal(|| property.price.to_string());
    let mut image_url = use_signal(|| property.image_url.clone());
    let mut errors = use_signal(ValidationErrors::default);
    let status = use_signal(MutationStatus::default);
    let invalidate = use_invalidate_properties();
    let id = property.id.clone();

    let handle_submit = move |evt: FormEvent| {
        let id = id.clone();
        async move {
            evt.prevent_default();
            match update_from_form(&price(), &image_url()) {
                Ok(update) => {
                    errors.set(ValidationErrors::default());
                    run_mutation(
                        status,
                        api::update_property(id, update),
                        "Property updated successfully!",
                        invalidate,
                        on_close,
                    )
                    .await;
                }
                Err(invalid) => errors.set(invalid),
            }
        }
    };

    let current = status();

    rsx! {
        Modal {
            title: "Edit Property",
            on_close,
            form {
                class: "form",
                onsubmit: handle_submit,
                div {
                    class: "field",
                    Label { html_for: "edit-price", "Price (Rp)" }
                    Input {
                        id: "edit-price",
                        r#type: "number",
                        placeholder: "Enter property price",
                        value: price(),
                        error: errors.read().message_for("price").map(str::to_string),
                        oninput: move |evt: FormEvent| price.set(evt.value()),
                    }
                }
                div {
                    class: "field",
                    Label { html_for: "edit-image-url", "Image URL" }
                    Input {
                        id: "edit-image-url",
                        r#type: "url",
                        placeholder: "https://example.com/image.jpg",
                        value: image_url(),
                        error: errors.read().message_for("image_url").map(str::to_string),
                        oninput: move |evt: FormEvent| image_url.set(evt.value()),
                    }
                }
                if current.show_actions() {
                    div {
                        class: "form-actions",
                        Button {
                            variant: ButtonVariant::Outline,
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        Button {
                            r#type: "submit",
                            disabled: current.is_pending(),
                            if current.is_pending() { "Updating..." } else { "Update Property" }
                        }
                    }
                }
                StatusBanner { status: current.clone() }
            }
        }
    }
}

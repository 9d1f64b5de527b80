use dioxus::prelude::*;
use store::models::format_coordinate;
use store::validate::{new_property_from_form, ValidationErrors};
use store::LatLng;

use super::{run_mutation, MutationStatus, StatusBanner};
use crate::components::{Button, ButtonVariant, Input, Label};
use crate::modal::Modal;
use crate::query::use_invalidate_properties;

#[component]
pub fn CreatePropertyModal(position: LatLng, on_close: EventHandler<()>) -> Element {
    let mut price = use_signal(String::new);
    let mut image_url = use_signal(String::new);
    let mut errors = use_signal(ValidationErrors::default);
    let status = use_signal(MutationStatus::default);
    let invalidate = use_invalidate_properties();

    let description = format!(
        "Location: {}, {}",
        format_coordinate(position.lat),
        format_coordinate(position.lng)
    );

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        match new_property_from_form(position, &price(), &image_url()) {
            Ok(input) => {
                errors.set(ValidationErrors::default());
                run_mutation(
                    status,
                    api::create_property(input),
                    "Property created successfully!",
                    invalidate,
                    on_close,
                )
                .await;
            }
            Err(invalid) => errors.set(invalid),
        }
    };

    let current = status();
    let location_error = {
        let errors = errors.read();
        errors
            .message_for("latitude")
            .or_else(|| errors.message_for("longitude"))
    };

    rsx! {
        Modal {
            title: "Create New Property",
            description,
            on_close,
            form {
                class: "form",
                onsubmit: handle_submit,
                div {
                    class: "field",
                    Label { html_for: "price", "Price (Rp)" }
                    Input {
                        id: "price",
                        r#type: "number",
                        placeholder: "Enter property price",
                        value: price(),
                        error: errors.read().message_for("price").map(str::to_string),
                        oninput: move |evt: FormEvent| price.set(evt.value()),
                    }
                }
                div {
                    class: "field",
                    Label { html_for: "image_url", "Image URL" }
                    Input {
                        id: "image_url",
                        r#type: "url",
                        placeholder: "https://example.com/image.jpg",
                        value: image_url(),
                        error: errors.read().message_for("image_url").map(str::to_string),
                        oninput: move |evt: FormEvent| image_url.set(evt.value()),
                    }
                }
                if let Some(message) = location_error {
                    p { class: "field-error", "{message}" }
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
                            if current.is_pending() { "Creating..." } else { "Create Property" }
                        }
                    }
                }
                StatusBanner { status: current.clone() }
            }
        }
    }
}

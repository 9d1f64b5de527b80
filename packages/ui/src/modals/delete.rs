use api::Property;
use dioxus::prelude::*;

use super::{run_mutation, MutationStatus, StatusBanner};
use crate::components::{Button, ButtonVariant};
use crate::modal::Modal;
use crate::query::use_invalidate_properties;

#[component]
pub fn DeletePropertyModal(property: Property, on_close: EventHandler<()>) -> Element {
    let status = use_signal(MutationStatus::default);
    let invalidate = use_invalidate_properties();
    let id = property.id.clone();

    let description = format!(
        "Are you sure you want to delete this property ({})? This action cannot be undone.",
        property.price_label()
    );

    let handle_delete = move |_| {
        let id = id.clone();
        async move {
            run_mutation(
                status,
                api::delete_property(id),
                "Property deleted successfully!",
                invalidate,
                on_close,
            )
            .await;
        }
    };

    let current = status();

    rsx! {
        Modal {
            title: "Delete Property",
            description,
            on_close,
            div {
                class: "form",
                if current.show_actions() {
                    div {
                        class: "form-actions",
                        Button {
                            variant: ButtonVariant::Outline,
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        Button {
                            variant: ButtonVariant::Destructive,
                            disabled: current.is_pending(),
                            onclick: handle_delete,
                            if current.is_pending() { "Deleting..." } else { "Delete Property" }
                        }
                    }
                }
                StatusBanner { status: current.clone() }
            }
        }
    }
}

use dioxus::prelude::*;

/// Text input with an optional inline validation message below it.
#[component]
pub fn Input(
    id: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] class: String,
    #[props(default)] error: Option<String>,
    #[props(default)] oninput: EventHandler<FormEvent>,
) -> Element {
    let invalid = error.is_some();

    rsx! {
        input {
            id: "{id}",
            name: "{id}",
            class: "input {class}",
            r#type: r#type,
            placeholder: "{placeholder}",
            value: "{value}",
            "aria-invalid": invalid,
            oninput: move |evt| oninput.call(evt),
        }
        if let Some(message) = error {
            p { class: "field-error", "{message}" }
        }
    }
}

use dioxus::prelude::*;

use super::status_banner::{flash, StatusBanner};
use super::{CHIP_CLASS, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::app_context::AppContext;
use crate::icons;
use crate::models::UserProfile;
use crate::status::SaveStatus;

#[component]
pub fn UserContextPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut profile = use_signal(UserProfile::default);
    let mut editing = use_signal(|| true);
    let mut new_signature = use_signal(String::new);
    let status = use_signal(|| None::<SaveStatus>);
    let dismiss_ms = ctx.status_dismiss_ms();

    let store = ctx.store();
    use_future(move || {
        let store = store.clone();
        async move {
            match store.has_profile().await {
                Ok(true) => match store.load_profile().await {
                    Ok(stored) => {
                        profile.set(stored);
                        editing.set(false);
                    }
                    Err(e) => flash(status, SaveStatus::error(e.banner_message()), dismiss_ms),
                },
                Ok(false) => {}
                Err(e) => flash(status, SaveStatus::error(e.banner_message()), dismiss_ms),
            }
        }
    });

    let store = ctx.store();
    let handle_save = move |_| {
        let store = store.clone();
        spawn(async move {
            let result = store.save_profile(&profile()).await;
            if result.is_ok() {
                editing.set(false);
            }
            flash(
                status,
                SaveStatus::from_result(&result, "Your context has been saved!"),
                dismiss_ms,
            );
        });
    };

    let mut add_signature = move || {
        if profile.write().add_signature(&new_signature()) {
            new_signature.set(String::new());
        }
    };

    let readonly = !editing();

    rsx! {
        div { class: "bg-white rounded-lg shadow p-6",
            div { class: "flex items-center justify-between mb-4",
                h2 { class: "text-xl font-bold text-gray-900", "Your Context" }
                if readonly {
                    button {
                        class: SECONDARY_BUTTON,
                        onclick: move |_| editing.set(true),
                        div { class: "flex items-center",
                            icons::Pencil { class: Some("w-4 h-4 mr-2".to_string()) }
                            span { "Edit" }
                        }
                    }
                } else {
                    button {
                        class: PRIMARY_BUTTON,
                        onclick: handle_save,
                        div { class: "flex items-center",
                            icons::Save { class: Some("w-4 h-4 mr-2".to_string()) }
                            span { "Save" }
                        }
                    }
                }
            }

            p { class: "text-gray-600 mb-6",
                "Tell the assistant who you are so drafts sound like you."
            }

            StatusBanner { status }

            div { class: "grid grid-cols-2 gap-4",
                div {
                    label { class: LABEL_CLASS, "Name" }
                    input {
                        class: INPUT_CLASS,
                        value: "{profile.read().name}",
                        disabled: readonly,
                        oninput: move |e| profile.write().name = e.value()
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Email" }
                    input {
                        class: INPUT_CLASS,
                        r#type: "email",
                        value: "{profile.read().email}",
                        disabled: readonly,
                        oninput: move |e| profile.write().email = e.value()
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Role" }
                    input {
                        class: INPUT_CLASS,
                        value: "{profile.read().role}",
                        disabled: readonly,
                        oninput: move |e| profile.write().role = e.value()
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Company" }
                    input {
                        class: INPUT_CLASS,
                        value: "{profile.read().company}",
                        disabled: readonly,
                        oninput: move |e| profile.write().company = e.value()
                    }
                }
            }

            div { class: "mt-4",
                label { class: LABEL_CLASS, "Professional Background" }
                textarea {
                    class: INPUT_CLASS,
                    rows: "3",
                    value: "{profile.read().background}",
                    disabled: readonly,
                    oninput: move |e| profile.write().background = e.value()
                }
            }
            div { class: "mt-4",
                label { class: LABEL_CLASS, "Communication Style" }
                textarea {
                    class: INPUT_CLASS,
                    rows: "2",
                    placeholder: "e.g. short paragraphs, bullet points for action items",
                    value: "{profile.read().communication_style}",
                    disabled: readonly,
                    oninput: move |e| profile.write().communication_style = e.value()
                }
            }
            div { class: "mt-4",
                label { class: LABEL_CLASS, "Tone Preference" }
                input {
                    class: INPUT_CLASS,
                    value: "{profile.read().tone_preference}",
                    disabled: readonly,
                    oninput: move |e| profile.write().tone_preference = e.value()
                }
            }

            div { class: "mt-6 pt-6 border-t border-gray-200",
                h3 { class: "text-sm font-medium text-gray-700 mb-2", "Common Signatures" }
                if !readonly {
                    div { class: "flex space-x-2 mb-3",
                        input {
                            class: INPUT_CLASS,
                            placeholder: "Add a sign-off",
                            value: "{new_signature}",
                            oninput: move |e| new_signature.set(e.value()),
                            onkeydown: move |e| {
                                if e.key() == Key::Enter {
                                    add_signature();
                                }
                            }
                        }
                        button {
                            class: SECONDARY_BUTTON,
                            onclick: move |_| add_signature(),
                            "Add"
                        }
                    }
                }
                div { class: "flex flex-wrap gap-2",
                    for (index, signature) in profile.read().common_signatures.iter().cloned().enumerate() {
                        span {
                            key: "{index}-{signature}",
                            class: CHIP_CLASS,
                            "{signature}"
                            if !readonly {
                                button {
                                    class: "ml-2 text-blue-400 hover:text-blue-700",
                                    onclick: move |_| {
                                        profile.write().remove_signature(index);
                                    },
                                    icons::X { class: Some("w-3 h-3".to_string()) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

use dioxus::prelude::*;

use super::status_banner::{flash, StatusBanner};
use super::{CHIP_CLASS, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::app_context::AppContext;
use crate::icons;
use crate::models::{Recipient, COMMUNICATION_STYLES, RELATIONSHIPS};
use crate::services::context_store::fresh_id;
use crate::status::SaveStatus;

/// Blank optional text fields are stored as absent
fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(super) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn RecipientsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut recipients = use_signal(Vec::<Recipient>::new);
    let mut editing = use_signal(|| None::<Recipient>);
    let status = use_signal(|| None::<SaveStatus>);
    let dismiss_ms = ctx.status_dismiss_ms();

    let store = ctx.store();
    use_future(move || {
        let store = store.clone();
        async move {
            match store.load_recipients().await {
                Ok(list) => recipients.set(list),
                Err(e) => flash(status, SaveStatus::error(e.banner_message()), dismiss_ms),
            }
        }
    });

    let store = ctx.store();
    let on_save = move |recipient: Recipient| {
        let store = store.clone();
        spawn(async move {
            let result = store.save_recipient(recipient).await;
            if let Ok(list) = &result {
                recipients.set(list.clone());
                editing.set(None);
            }
            flash(
                status,
                SaveStatus::from_result(&result, "Recipient saved successfully!"),
                dismiss_ms,
            );
        });
    };

    let store = ctx.store();
    let on_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this recipient?") {
            return;
        }
        let store = store.clone();
        spawn(async move {
            let result = store.delete_recipient(&id).await;
            if let Ok(list) = &result {
                recipients.set(list.clone());
            }
            flash(
                status,
                SaveStatus::from_result(&result, "Recipient deleted successfully!"),
                dismiss_ms,
            );
        });
    };

    rsx! {
        div { class: "bg-white rounded-lg shadow p-6",
            div { class: "flex items-center justify-between mb-4",
                h2 { class: "text-xl font-bold text-gray-900", "Recipients" }
                button {
                    class: PRIMARY_BUTTON,
                    onclick: move |_| {
                        let id = fresh_id::<Recipient>(&recipients.read());
                        editing.set(Some(Recipient::new(id)));
                    },
                    div { class: "flex items-center",
                        icons::Plus { class: Some("w-4 h-4 mr-2".to_string()) }
                        span { "Add Recipient" }
                    }
                }
            }

            StatusBanner { status }

            if recipients.read().is_empty() {
                div { class: "text-center py-12 text-gray-400",
                    icons::Users { class: Some("w-10 h-10 mx-auto mb-3".to_string()) }
                    p { "No recipients yet. Add the people you write to most." }
                }
            }

            div { class: "space-y-3",
                for recipient in recipients() {
                    RecipientCard {
                        key: "{recipient.id}",
                        recipient: recipient.clone(),
                        on_edit: move |r: Recipient| editing.set(Some(r)),
                        on_delete: on_delete.clone(),
                    }
                }
            }

            if let Some(draft) = editing() {
                RecipientDialog {
                    initial: draft,
                    on_save: on_save.clone(),
                    on_cancel: move |_| editing.set(None),
                }
            }
        }
    }
}

#[component]
fn RecipientCard(
    recipient: Recipient,
    on_edit: EventHandler<Recipient>,
    on_delete: EventHandler<String>,
) -> Element {
    let subtitle = [recipient.role.as_deref(), recipient.company.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" at ");
    let edit_target = recipient.clone();
    let delete_id = recipient.id.clone();

    rsx! {
        div { class: "border border-gray-200 rounded-lg p-4 flex items-start justify-between",
            div {
                div { class: "flex items-center space-x-2",
                    span { class: "font-medium text-gray-900", "{recipient.name}" }
                    if let Some(relationship) = &recipient.relationship {
                        span { class: "text-xs px-2 py-0.5 rounded bg-gray-100 text-gray-600", "{relationship}" }
                    }
                }
                p { class: "text-sm text-gray-500", "{recipient.email}" }
                if !subtitle.is_empty() {
                    p { class: "text-sm text-gray-500", "{subtitle}" }
                }
                if !recipient.topics.is_empty() {
                    div { class: "flex flex-wrap gap-1 mt-2",
                        for topic in recipient.topics.iter() {
                            span { class: "text-xs px-2 py-0.5 rounded-full bg-blue-50 text-blue-700", "{topic}" }
                        }
                    }
                }
            }
            div { class: "flex space-x-2",
                button {
                    class: "text-gray-400 hover:text-blue-600",
                    onclick: move |_| on_edit.call(edit_target.clone()),
                    icons::Pencil { class: Some("w-4 h-4".to_string()) }
                }
                button {
                    class: "text-gray-400 hover:text-red-600",
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    icons::Trash { class: Some("w-4 h-4".to_string()) }
                }
            }
        }
    }
}

#[component]
fn RecipientDialog(
    initial: Recipient,
    on_save: EventHandler<Recipient>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut draft = use_signal(|| initial.clone());
    let mut new_topic = use_signal(String::new);

    let mut add_topic = move || {
        if draft.write().add_topic(&new_topic()) {
            new_topic.set(String::new());
        }
    };

    let current = draft();
    let relationship = current.relationship.clone().unwrap_or_default();
    let style = current.preferred_communication.clone().unwrap_or_default();

    rsx! {
        div { class: "fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center z-50",
            div { class: "bg-white rounded-lg shadow-lg w-full max-w-lg p-6 max-h-screen overflow-y-auto",
                h3 { class: "text-lg font-bold text-gray-900 mb-4",
                    if current.name.is_empty() { "New Recipient" } else { "Edit Recipient" }
                }

                div { class: "grid grid-cols-2 gap-4",
                    div {
                        label { class: LABEL_CLASS, "Name *" }
                        input {
                            class: INPUT_CLASS,
                            value: "{current.name}",
                            oninput: move |e| draft.write().name = e.value()
                        }
                    }
                    div {
                        label { class: LABEL_CLASS, "Email *" }
                        input {
                            class: INPUT_CLASS,
                            r#type: "email",
                            value: "{current.email}",
                            oninput: move |e| draft.write().email = e.value()
                        }
                    }
                    div {
                        label { class: LABEL_CLASS, "Role" }
                        input {
                            class: INPUT_CLASS,
                            value: "{current.role.clone().unwrap_or_default()}",
                            oninput: move |e| draft.write().role = optional(e.value())
                        }
                    }
                    div {
                        label { class: LABEL_CLASS, "Company" }
                        input {
                            class: INPUT_CLASS,
                            value: "{current.company.clone().unwrap_or_default()}",
                            oninput: move |e| draft.write().company = optional(e.value())
                        }
                    }
                    div {
                        label { class: LABEL_CLASS, "Relationship" }
                        select {
                            class: INPUT_CLASS,
                            value: "{relationship}",
                            onchange: move |e| draft.write().relationship = optional(e.value()),
                            option { value: "", "Select..." }
                            for r in RELATIONSHIPS.iter() {
                                option { value: *r, selected: relationship == *r, "{r}" }
                            }
                        }
                    }
                    div {
                        label { class: LABEL_CLASS, "Preferred Communication" }
                        select {
                            class: INPUT_CLASS,
                            value: "{style}",
                            onchange: move |e| draft.write().preferred_communication = optional(e.value()),
                            for s in COMMUNICATION_STYLES.iter() {
                                option { value: *s, selected: style == *s, "{s}" }
                            }
                        }
                    }
                }

                div { class: "mt-4",
                    label { class: LABEL_CLASS, "Notes" }
                    textarea {
                        class: INPUT_CLASS,
                        rows: "3",
                        value: "{current.notes.clone().unwrap_or_default()}",
                        oninput: move |e| draft.write().notes = optional(e.value())
                    }
                }

                div { class: "mt-4",
                    label { class: LABEL_CLASS, "Topics" }
                    div { class: "flex space-x-2 mb-2",
                        input {
                            class: INPUT_CLASS,
                            placeholder: "Add a topic",
                            value: "{new_topic}",
                            oninput: move |e| new_topic.set(e.value()),
                            onkeydown: move |e| {
                                if e.key() == Key::Enter {
                                    add_topic();
                                }
                            }
                        }
                        button { class: SECONDARY_BUTTON, onclick: move |_| add_topic(), "Add" }
                    }
                    div { class: "flex flex-wrap gap-2",
                        for (index, topic) in current.topics.iter().cloned().enumerate() {
                            span { key: "{index}-{topic}", class: CHIP_CLASS,
                                "{topic}"
                                button {
                                    class: "ml-2 text-blue-400 hover:text-blue-700",
                                    onclick: move |_| {
                                        draft.write().remove_topic(index);
                                    },
                                    icons::X { class: Some("w-3 h-3".to_string()) }
                                }
                            }
                        }
                    }
                }

                div { class: "flex justify-end space-x-2 mt-6",
                    button { class: SECONDARY_BUTTON, onclick: move |_| on_cancel.call(()), "Cancel" }
                    button {
                        class: PRIMARY_BUTTON,
                        onclick: move |_| on_save.call(draft()),
                        "Save Recipient"
                    }
                }
            }
        }
    }
}

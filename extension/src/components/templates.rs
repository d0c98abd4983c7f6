use dioxus::prelude::*;

use super::recipients::confirm;
use super::status_banner::{flash, StatusBanner};
use super::{CHIP_CLASS, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::app_context::AppContext;
use crate::icons;
use crate::models::{group_by_category, Template, TEMPLATE_CATEGORIES};
use crate::services::context_store::fresh_id;
use crate::status::SaveStatus;

#[component]
pub fn TemplatesPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut templates = use_signal(Vec::<Template>::new);
    let mut editing = use_signal(|| None::<Template>);
    let status = use_signal(|| None::<SaveStatus>);
    let dismiss_ms = ctx.status_dismiss_ms();

    let store = ctx.store();
    use_future(move || {
        let store = store.clone();
        async move {
            match store.load_templates().await {
                Ok(list) => templates.set(list),
                Err(e) => flash(status, SaveStatus::error(e.banner_message()), dismiss_ms),
            }
        }
    });

    let store = ctx.store();
    let on_save = move |template: Template| {
        let store = store.clone();
        spawn(async move {
            let result = store.save_template(template).await;
            if let Ok(list) = &result {
                templates.set(list.clone());
                editing.set(None);
            }
            flash(
                status,
                SaveStatus::from_result(&result, "Template saved successfully!"),
                dismiss_ms,
            );
        });
    };

    let store = ctx.store();
    let on_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this template?") {
            return;
        }
        let store = store.clone();
        spawn(async move {
            let result = store.delete_template(&id).await;
            if let Ok(list) = &result {
                templates.set(list.clone());
            }
            flash(
                status,
                SaveStatus::from_result(&result, "Template deleted successfully!"),
                dismiss_ms,
            );
        });
    };

    let on_duplicate = move |source: Template| {
        let id = fresh_id::<Template>(&templates.read());
        editing.set(Some(source.duplicate(id)));
    };

    let groups = group_by_category(&templates.read());

    rsx! {
        div { class: "bg-white rounded-lg shadow p-6",
            div { class: "flex items-center justify-between mb-4",
                h2 { class: "text-xl font-bold text-gray-900", "Templates" }
                button {
                    class: PRIMARY_BUTTON,
                    onclick: move |_| {
                        let id = fresh_id::<Template>(&templates.read());
                        editing.set(Some(Template::new(id)));
                    },
                    div { class: "flex items-center",
                        icons::Plus { class: Some("w-4 h-4 mr-2".to_string()) }
                        span { "New Template" }
                    }
                }
            }

            StatusBanner { status }

            if groups.is_empty() {
                div { class: "text-center py-12 text-gray-400",
                    icons::Mail { class: Some("w-10 h-10 mx-auto mb-3".to_string()) }
                    p { "No templates yet." }
                }
            }

            for (category, members) in groups {
                div { key: "{category}", class: "mb-6",
                    h3 { class: "text-sm font-medium text-gray-500 uppercase mb-2", "{category}" }
                    div { class: "grid grid-cols-2 gap-3",
                        for template in members {
                            TemplateCard {
                                key: "{template.id}",
                                template: template.clone(),
                                on_edit: move |t: Template| editing.set(Some(t)),
                                on_duplicate: on_duplicate,
                                on_delete: on_delete.clone(),
                            }
                        }
                    }
                }
            }

            if let Some(draft) = editing() {
                TemplateDialog {
                    initial: draft,
                    on_save: on_save.clone(),
                    on_cancel: move |_| editing.set(None),
                }
            }
        }
    }
}

#[component]
fn TemplateCard(
    template: Template,
    on_edit: EventHandler<Template>,
    on_duplicate: EventHandler<Template>,
    on_delete: EventHandler<String>,
) -> Element {
    let edit_target = template.clone();
    let copy_source = template.clone();
    let delete_id = template.id.clone();

    rsx! {
        div { class: "border border-gray-200 rounded-lg p-4",
            div { class: "flex items-start justify-between",
                div {
                    p { class: "font-medium text-gray-900", "{template.name}" }
                    if !template.description.is_empty() {
                        p { class: "text-sm text-gray-500", "{template.description}" }
                    }
                }
                div { class: "flex space-x-2",
                    button {
                        class: "text-gray-400 hover:text-blue-600",
                        onclick: move |_| on_edit.call(edit_target.clone()),
                        icons::Pencil { class: Some("w-4 h-4".to_string()) }
                    }
                    button {
                        class: "text-gray-400 hover:text-blue-600",
                        onclick: move |_| on_duplicate.call(copy_source.clone()),
                        icons::Copy { class: Some("w-4 h-4".to_string()) }
                    }
                    button {
                        class: "text-gray-400 hover:text-red-600",
                        onclick: move |_| on_delete.call(delete_id.clone()),
                        icons::Trash { class: Some("w-4 h-4".to_string()) }
                    }
                }
            }
            pre { class: "mt-3 text-xs text-gray-600 whitespace-pre-wrap line-clamp-4 font-sans",
                "{template.content}"
            }
            if !template.tags.is_empty() {
                div { class: "flex flex-wrap gap-1 mt-2",
                    for tag in template.tags.iter() {
                        span { class: "text-xs px-2 py-0.5 rounded-full bg-gray-100 text-gray-600", "#{tag}" }
                    }
                }
            }
        }
    }
}

#[component]
fn TemplateDialog(
    initial: Template,
    on_save: EventHandler<Template>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut draft = use_signal(|| initial.clone());
    let mut new_tag = use_signal(String::new);

    let mut add_tag = move || {
        if draft.write().add_tag(&new_tag()) {
            new_tag.set(String::new());
        }
    };

    let current = draft();

    rsx! {
        div { class: "fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center z-50",
            div { class: "bg-white rounded-lg shadow-lg w-full max-w-2xl p-6 max-h-screen overflow-y-auto",
                h3 { class: "text-lg font-bold text-gray-900 mb-4",
                    if current.name.is_empty() { "New Template" } else { "Edit Template" }
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
                        label { class: LABEL_CLASS, "Category" }
                        select {
                            class: INPUT_CLASS,
                            value: "{current.category}",
                            onchange: move |e| draft.write().category = e.value(),
                            for c in TEMPLATE_CATEGORIES.iter() {
                                option { value: *c, selected: current.category == *c, "{c}" }
                            }
                        }
                    }
                }

                div { class: "mt-4",
                    label { class: LABEL_CLASS, "Description" }
                    input {
                        class: INPUT_CLASS,
                        value: "{current.description}",
                        oninput: move |e| draft.write().description = e.value()
                    }
                }

                div { class: "mt-4",
                    label { class: LABEL_CLASS, "Content *" }
                    textarea {
                        class: "{INPUT_CLASS} font-mono text-sm",
                        rows: "10",
                        placeholder: "Hi {{{{recipient.name}}}}, ...",
                        value: "{current.content}",
                        oninput: move |e| draft.write().content = e.value()
                    }
                    p { class: "mt-1 text-xs text-gray-500",
                        "Placeholders like {{{{recipient.name}}}} are kept as written."
                    }
                }

                div { class: "mt-4",
                    label { class: LABEL_CLASS, "Tags" }
                    div { class: "flex space-x-2 mb-2",
                        input {
                            class: INPUT_CLASS,
                            placeholder: "Add a tag",
                            value: "{new_tag}",
                            oninput: move |e| new_tag.set(e.value()),
                            onkeydown: move |e| {
                                if e.key() == Key::Enter {
                                    add_tag();
                                }
                            }
                        }
                        button { class: SECONDARY_BUTTON, onclick: move |_| add_tag(), "Add" }
                    }
                    div { class: "flex flex-wrap gap-2",
                        for (index, tag) in current.tags.iter().cloned().enumerate() {
                            span { key: "{index}-{tag}", class: CHIP_CLASS,
                                "{tag}"
                                button {
                                    class: "ml-2 text-blue-400 hover:text-blue-700",
                                    onclick: move |_| {
                                        draft.write().remove_tag(index);
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
                        div { class: "flex items-center",
                            icons::Save { class: Some("w-4 h-4 mr-2".to_string()) }
                            span { "Save Template" }
                        }
                    }
                }
            }
        }
    }
}

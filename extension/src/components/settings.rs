use dioxus::prelude::*;

use super::status_banner::{flash, StatusBanner};
use super::{INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON};
use crate::app_context::AppContext;
use crate::icons;
use crate::models::{ApiProvider, Settings, MAX_MAX_TOKENS, MIN_MAX_TOKENS};
use crate::status::SaveStatus;

#[component]
pub fn SettingsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut settings = use_signal(Settings::default);
    let mut show_key = use_signal(|| false);
    let mut saving = use_signal(|| false);
    let status = use_signal(|| None::<SaveStatus>);
    let dismiss_ms = ctx.status_dismiss_ms();

    let store = ctx.store();
    use_future(move || {
        let store = store.clone();
        async move {
            match store.load_settings().await {
                Ok(stored) => settings.set(stored),
                Err(e) => flash(status, SaveStatus::error(e.banner_message()), dismiss_ms),
            }
        }
    });

    let store = ctx.store();
    let handle_save = move |_| {
        let store = store.clone();
        spawn(async move {
            saving.set(true);
            let result = store.save_settings(&settings()).await;
            saving.set(false);
            flash(
                status,
                SaveStatus::from_result(&result, "Settings saved successfully!"),
                dismiss_ms,
            );
        });
    };

    let current = settings();
    let provider = current.api_provider;
    let key_input_type = if show_key() { "text" } else { "password" };

    rsx! {
        div { class: "bg-white rounded-lg shadow p-6",
            h2 { class: "text-xl font-bold text-gray-900 mb-4", "Settings" }

            StatusBanner { status }

            h3 { class: "text-sm font-medium text-gray-500 uppercase mb-3", "AI Provider" }
            div { class: "grid grid-cols-2 gap-4",
                div {
                    label { class: LABEL_CLASS, "Provider" }
                    select {
                        class: INPUT_CLASS,
                        value: "{provider.as_str()}",
                        onchange: move |e| {
                            if let Some(p) = ApiProvider::parse(&e.value()) {
                                settings.write().set_provider(p);
                            }
                        },
                        for p in ApiProvider::ALL {
                            option { value: p.as_str(), selected: p == provider, "{p.label()}" }
                        }
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Model" }
                    select {
                        class: INPUT_CLASS,
                        value: "{current.model}",
                        onchange: move |e| settings.write().model = e.value(),
                        for m in provider.models().iter() {
                            option { value: *m, selected: current.model == *m, "{m}" }
                        }
                    }
                }
            }

            div { class: "mt-4",
                label { class: LABEL_CLASS, "API Key" }
                div { class: "flex space-x-2",
                    input {
                        class: INPUT_CLASS,
                        r#type: key_input_type,
                        placeholder: "Paste your {provider.label()} API key",
                        value: "{current.api_key}",
                        oninput: move |e| settings.write().api_key = e.value()
                    }
                    button {
                        class: "text-sm text-blue-600 hover:text-blue-800 px-2",
                        onclick: move |_| show_key.toggle(),
                        if show_key() { "Hide" } else { "Show" }
                    }
                }
                p { class: "mt-1 text-xs text-gray-500", "Stored in browser sync storage." }
            }

            h3 { class: "text-sm font-medium text-gray-500 uppercase mt-6 mb-3", "Generation" }
            div { class: "grid grid-cols-2 gap-4",
                div {
                    label { class: LABEL_CLASS, "Max Tokens" }
                    input {
                        class: INPUT_CLASS,
                        r#type: "number",
                        min: "{MIN_MAX_TOKENS}",
                        max: "{MAX_MAX_TOKENS}",
                        value: "{current.max_tokens}",
                        oninput: move |e| {
                            if let Ok(value) = e.value().parse() {
                                settings.write().max_tokens = value;
                            }
                        }
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Temperature: {current.temperature:.1}" }
                    input {
                        class: "w-full",
                        r#type: "range",
                        min: "0",
                        max: "1",
                        step: "0.1",
                        value: "{current.temperature}",
                        oninput: move |e| {
                            if let Ok(value) = e.value().parse() {
                                settings.write().temperature = value;
                            }
                        }
                    }
                }
            }

            h3 { class: "text-sm font-medium text-gray-500 uppercase mt-6 mb-3", "Behaviour" }
            div { class: "space-y-3",
                Toggle {
                    label: "Auto-generate suggestions",
                    checked: current.auto_generate,
                    on_change: move |v| settings.write().auto_generate = v,
                }
                Toggle {
                    label: "Privacy mode (never send recipient notes)",
                    checked: current.privacy_mode,
                    on_change: move |v| settings.write().privacy_mode = v,
                }
                Toggle {
                    label: "Store generated drafts",
                    checked: current.store_drafts,
                    on_change: move |v| settings.write().store_drafts = v,
                }
            }

            div { class: "flex justify-end mt-6 pt-6 border-t border-gray-200",
                button {
                    class: PRIMARY_BUTTON,
                    disabled: saving(),
                    onclick: handle_save,
                    div { class: "flex items-center",
                        icons::Save { class: Some("w-4 h-4 mr-2".to_string()) }
                        span { if saving() { "Saving..." } else { "Save Settings" } }
                    }
                }
            }
        }
    }
}

#[component]
fn Toggle(label: &'static str, checked: bool, on_change: EventHandler<bool>) -> Element {
    rsx! {
        label { class: "flex items-center justify-between",
            span { class: "text-sm text-gray-700", "{label}" }
            input {
                r#type: "checkbox",
                class: "h-4 w-4 text-blue-600 rounded",
                checked: checked,
                onchange: move |e| on_change.call(e.checked())
            }
        }
    }
}

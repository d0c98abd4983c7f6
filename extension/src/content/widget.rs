use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;

use super::assistant::{ComposeAssistant, GenerateOutcome};
use super::dom::DomComposeSurface;
use crate::config::ExtensionConfig;
use crate::error::Result;
use crate::services::generator::Delayed;
use crate::services::{ChromeStorage, ContextStore, PlaceholderGenerator};

type PageAssistant = ComposeAssistant<ChromeStorage, Delayed<PlaceholderGenerator>, DomComposeSurface>;

thread_local! {
    static NEXT_MOUNT: Cell<u32> = const { Cell::new(0) };
}

/// Give the container a unique id and launch a widget app inside it
pub fn mount(container: &web_sys::Element) -> Result<()> {
    let n = NEXT_MOUNT.with(|next| {
        let n = next.get();
        next.set(n + 1);
        n
    });
    let id = format!("email-assistant-root-{}", n);
    container.set_id(&id);

    dioxus_web::launch::launch_cfg(ComposeAssistantWidget, dioxus_web::Config::new().rootname(id));
    Ok(())
}

fn build_assistant() -> Option<Rc<PageAssistant>> {
    let config = ExtensionConfig::load_or_default();
    let document = web_sys::window().and_then(|w| w.document())?;
    Some(Rc::new(ComposeAssistant::new(
        ContextStore::new(ChromeStorage::new()),
        Delayed::new(PlaceholderGenerator, config.content.generation_delay_ms),
        DomComposeSurface::new(document, config.content.compose_selector),
    )))
}

#[component]
pub fn ComposeAssistantWidget() -> Element {
    let assistant = use_hook(build_assistant);
    let mut prompt = use_signal(String::new);
    let mut generating = use_signal(|| false);

    let Some(assistant) = assistant else {
        return rsx! {};
    };

    let blank = prompt().trim().is_empty();
    let handle_generate = move |_| {
        let assistant = assistant.clone();
        spawn(async move {
            assistant.set_prompt(prompt());
            generating.set(true);
            match assistant.generate().await {
                Ok(GenerateOutcome::Written) => prompt.set(String::new()),
                // failures are already logged by the assistant
                Ok(GenerateOutcome::Skipped) | Err(_) => {}
            }
            generating.set(false);
        });
    };

    rsx! {
        div { style: "display: flex; align-items: center; gap: 8px;",
            input {
                r#type: "text",
                style: "flex: 1; padding: 8px 12px; border-radius: 20px; border: 1px solid #ccc; font-size: 14px;",
                placeholder: "What would you like to write about?",
                value: "{prompt}",
                disabled: generating(),
                oninput: move |e| prompt.set(e.value())
            }
            button {
                style: if generating() || blank {
                    "padding: 8px 16px; border-radius: 20px; background-color: #1a73e8; color: white; border: none; font-weight: bold; cursor: default; opacity: 0.7;"
                } else {
                    "padding: 8px 16px; border-radius: 20px; background-color: #1a73e8; color: white; border: none; font-weight: bold; cursor: pointer;"
                },
                disabled: generating() || blank,
                onclick: handle_generate,
                if generating() { "Generating..." } else { "Generate" }
            }
        }
    }
}

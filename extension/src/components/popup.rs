use dioxus::prelude::*;

use super::PRIMARY_BUTTON;
use crate::app_context::AppContext;
use crate::icons;
use crate::lifecycle::BrowserActions;
use crate::models::RuntimeFlags;
use crate::services::browser::{self, ChromeBrowser};

#[component]
pub fn Popup() -> Element {
    let ctx = use_context::<AppContext>();
    let mut flags = use_signal(RuntimeFlags::default);

    let store = ctx.store();
    use_future(move || {
        let store = store.clone();
        async move {
            match store.load_runtime_flags().await {
                Ok(loaded) => flags.set(loaded),
                Err(e) => log::warn!("Failed to read update flags: {}", e),
            }
        }
    });

    let page = ctx.dashboard_page().to_string();
    let open_dashboard = move |_| {
        let page = page.clone();
        spawn(async move {
            if let Err(e) = ChromeBrowser::new().open_page(&page).await {
                log::error!("{}", e);
            }
        });
    };

    let current = flags();

    rsx! {
        div { class: "w-72 p-4 bg-white",
            div { class: "flex items-center justify-between mb-4",
                div { class: "flex items-center",
                    icons::Mail { class: Some("w-5 h-5 text-blue-600 mr-2".to_string()) }
                    h1 { class: "text-lg font-bold text-gray-900", "Mail Assistant" }
                }
                span { class: "text-xs text-gray-400", "v{ctx.version}" }
            }

            if current.update_available {
                button {
                    class: "w-full mb-3 bg-red-50 border border-red-200 text-red-700 py-2 px-4 rounded-lg hover:bg-red-100 transition",
                    onclick: move |_| browser::reload(),
                    if let Some(version) = &current.new_version {
                        "Update Available! (v{version})"
                    } else {
                        "Update Available!"
                    }
                }
            }

            if let Some(info) = &current.update_info {
                p { class: "text-xs text-gray-500 mb-3",
                    match &info.previous_version {
                        Some(previous) => rsx! { "Updated from v{previous} to v{info.current_version}" },
                        None => rsx! { "Updated to v{info.current_version}" },
                    }
                }
            }

            button {
                class: "w-full {PRIMARY_BUTTON}",
                onclick: open_dashboard,
                div { class: "flex items-center justify-center",
                    icons::Settings { class: Some("w-4 h-4 mr-2".to_string()) }
                    span { "Open Dashboard" }
                }
            }
        }
    }
}

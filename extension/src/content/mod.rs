// Content script: runs inside the Gmail tab.

pub mod assistant;
pub mod observer;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
mod widget;

pub use assistant::{ComposeAssistant, ComposeSurface, GenerateOutcome};
pub use observer::{ComposeHost, DomChange, Injector, SurfaceWatch};

/// Content script entry point, called once by the JS loader.
/// Watches the page for compose surfaces for as long as the tab lives.
#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start_content_script() {
    use crate::config::ExtensionConfig;
    use dom::{DomHost, DomWatcher};

    let config = ExtensionConfig::load_or_default();
    crate::init_logging(&config);

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("Content script loaded without a document");
        return;
    };
    let Some(body) = document.body() else {
        log::error!("Content script loaded before <body> exists");
        return;
    };

    let watcher = DomWatcher::new(body.into());
    let changes = match watcher.watch() {
        Ok(changes) => changes,
        Err(e) => {
            log::error!("Failed to watch page: {}", e);
            return;
        }
    };

    let host = DomHost::new(document, config.content, widget::mount);
    log::info!("Mail assistant content script started");
    wasm_bindgen_futures::spawn_local(async move {
        Injector::new(host).run(changes).await;
    });
}

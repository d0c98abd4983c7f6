// Mail assistant browser extension.
// Platform-agnostic core (models, stores, lifecycle, compose logic) plus the
// wasm32 bindings and Dioxus pages built on top of it.

pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod status;

#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
mod app_context;
#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
mod components;
#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
pub mod icons;

pub use error::{Error, Result, ValidationError};

/// Route `log` output to the browser console at the configured level
#[cfg(target_arch = "wasm32")]
pub fn init_logging(config: &config::ExtensionConfig) {
    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
}

#[cfg(all(target_arch = "wasm32", feature = "dioxus"))]
mod pages {
    use dioxus::prelude::*;
    use wasm_bindgen::prelude::*;

    use crate::app_context::AppContext;
    use crate::components::{Dashboard, Popup};
    use crate::config::ExtensionConfig;

    fn provide_context() {
        use_context_provider(|| AppContext::new(ExtensionConfig::load_or_default()));
    }

    #[component]
    fn DashboardApp() -> Element {
        provide_context();
        rsx! { Dashboard {} }
    }

    #[component]
    fn PopupApp() -> Element {
        provide_context();
        rsx! { Popup {} }
    }

    fn launch(root: fn() -> Element) {
        let config = ExtensionConfig::load_or_default();
        crate::init_logging(&config);
        dioxus_web::launch::launch_cfg(root, dioxus_web::Config::new().rootname("main"));
    }

    /// Entry point of `dashboard.html`
    #[wasm_bindgen]
    pub fn start_dashboard() {
        launch(DashboardApp);
        log::info!("Dashboard started");
    }

    /// Entry point of `popup.html`
    #[wasm_bindgen]
    pub fn start_popup() {
        launch(PopupApp);
    }
}

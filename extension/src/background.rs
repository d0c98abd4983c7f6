// Background service worker for the mail assistant
// No Dioxus here: only the lifecycle handler and the chrome bindings it needs

// Dummy main for binary target
fn main() {}

#[cfg(target_arch = "wasm32")]
mod worker {
    use std::rc::Rc;

    use mail_assistant::config::ExtensionConfig;
    use mail_assistant::lifecycle::{InstalledDetails, LifecycleHandler, UpdateAvailableDetails};
    use mail_assistant::services::browser::{manifest_version, ChromeBrowser};
    use mail_assistant::services::ChromeStorage;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
        fn add_installed_listener(callback: &Closure<dyn FnMut(JsValue)>);

        #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onUpdateAvailable"], js_name = addListener)]
        fn add_update_available_listener(callback: &Closure<dyn FnMut(JsValue)>);
    }

    fn handler(config: &ExtensionConfig) -> LifecycleHandler<ChromeStorage, ChromeBrowser> {
        LifecycleHandler::new(
            ChromeStorage::new(),
            ChromeBrowser::new(),
            manifest_version(),
            config,
        )
    }

    fn on_installed(config: Rc<ExtensionConfig>, raw: JsValue) {
        let details: InstalledDetails = match serde_wasm_bindgen::from_value(raw) {
            Ok(details) => details,
            Err(e) => {
                log::error!("Unreadable onInstalled details: {}", e);
                return;
            }
        };
        spawn_local(async move {
            match handler(&config).on_installed(&details).await {
                Ok(outcome) => log::debug!("onInstalled handled: {:?}", outcome),
                Err(e) => log::error!("onInstalled failed: {}", e),
            }
        });
    }

    fn on_update_available(config: Rc<ExtensionConfig>, raw: JsValue) {
        let details: UpdateAvailableDetails = match serde_wasm_bindgen::from_value(raw) {
            Ok(details) => details,
            Err(e) => {
                log::error!("Unreadable onUpdateAvailable details: {}", e);
                return;
            }
        };
        spawn_local(async move {
            if let Err(e) = handler(&config).on_update_available(&details).await {
                log::error!("onUpdateAvailable failed: {}", e);
            }
        });
    }

    /// Initialize background service worker
    /// Called from the JavaScript glue once the module is loaded
    #[wasm_bindgen]
    pub fn init_background() {
        let config = Rc::new(ExtensionConfig::load_or_default());
        mail_assistant::init_logging(&config);

        let installed_config = config.clone();
        let installed = Closure::<dyn FnMut(JsValue)>::new(move |raw| {
            on_installed(installed_config.clone(), raw)
        });
        add_installed_listener(&installed);
        // listeners live as long as the worker
        installed.forget();

        let update = Closure::<dyn FnMut(JsValue)>::new(move |raw| {
            on_update_available(config.clone(), raw)
        });
        add_update_available_listener(&update);
        update.forget();

        log::info!("Mail assistant background worker initialized");
    }
}

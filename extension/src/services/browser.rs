// chrome.action / chrome.tabs / chrome.runtime bindings

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Error, Result};
use crate::lifecycle::BrowserActions;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeText)]
    fn set_badge_text(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeBackgroundColor)]
    fn set_badge_background_color(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = create)]
    fn create_tab(properties: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn get_url(path: &str) -> String;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getManifest)]
    fn get_manifest() -> JsValue;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = reload)]
    fn reload_extension();
}

fn single_field(name: &str, value: &str) -> Result<JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &name.into(), &value.into())
        .map_err(|e| Error::browser("Reflect.set", format!("{:?}", e)))?;
    Ok(obj.into())
}

/// Version string from manifest.json
pub fn manifest_version() -> String {
    js_sys::Reflect::get(&get_manifest(), &"version".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

/// Reload the extension so a pending update is applied
pub fn reload() {
    log::info!("Reloading extension to apply update");
    reload_extension();
}

#[derive(Clone, Copy, Default)]
pub struct ChromeBrowser;

impl ChromeBrowser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl BrowserActions for ChromeBrowser {
    async fn set_badge(&self, text: &str, color: &str) -> Result<()> {
        JsFuture::from(set_badge_text(&single_field("text", text)?))
            .await
            .map_err(|e| Error::browser("action.setBadgeText", format!("{:?}", e)))?;
        JsFuture::from(set_badge_background_color(&single_field("color", color)?))
            .await
            .map_err(|e| Error::browser("action.setBadgeBackgroundColor", format!("{:?}", e)))?;
        Ok(())
    }

    async fn open_page(&self, path: &str) -> Result<()> {
        let url = get_url(path);
        JsFuture::from(create_tab(&single_field("url", &url)?))
            .await
            .map_err(|e| Error::browser("tabs.create", format!("{:?}", e)))?;
        Ok(())
    }
}

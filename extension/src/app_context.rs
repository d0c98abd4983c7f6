// Shared dashboard/popup context using Dioxus context API
// Gives every panel the same store handle and config

use std::rc::Rc;

use crate::config::ExtensionConfig;
use crate::services::{ChromeStorage, ContextStore};

#[derive(Clone)]
pub struct AppContext {
    pub store: Rc<ContextStore<ChromeStorage>>,
    pub config: Rc<ExtensionConfig>,
    pub version: Rc<String>,
}

// Manual PartialEq implementation (contexts don't need real equality)
impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl AppContext {
    pub fn new(config: ExtensionConfig) -> Self {
        Self {
            store: Rc::new(ContextStore::new(ChromeStorage::new())),
            config: Rc::new(config),
            version: Rc::new(crate::services::browser::manifest_version()),
        }
    }

    pub fn store(&self) -> Rc<ContextStore<ChromeStorage>> {
        self.store.clone()
    }

    pub fn status_dismiss_ms(&self) -> u32 {
        self.config.dashboard.status_dismiss_ms
    }

    pub fn dashboard_page(&self) -> &str {
        &self.config.dashboard.page
    }
}

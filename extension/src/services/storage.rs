// Chrome Storage API Integration
// Every component talks to storage through `StorageService`, so the
// background worker, content script and dashboard can all be exercised
// against `MemoryStorage` in native tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub type StorageMap = serde_json::Map<String, Value>;

/// Storage keys shared by every extension context
pub mod keys {
    pub const USER_CONTEXT: &str = "userContext";
    pub const RECIPIENT_CONTEXT: &str = "recipientContext";
    pub const TEMPLATES: &str = "templates";
    pub const SETTINGS: &str = "settings";

    pub const UPDATE_AVAILABLE: &str = "updateAvailable";
    pub const NEW_VERSION: &str = "newVersion";
    pub const UPDATE_NOTIFICATION: &str = "updateNotification";
    pub const UPDATE_INFO: &str = "updateInfo";

    pub const RUNTIME_FLAGS: [&str; 4] = [
        UPDATE_AVAILABLE,
        NEW_VERSION,
        UPDATE_NOTIFICATION,
        UPDATE_INFO,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// `chrome.storage.sync`, replicated across the user's browsers
    Sync,
    /// `chrome.storage.local`, this device only
    Local,
}

/// Async key-value store with no cross-key transactions.
/// Callers rewriting a collection must write the whole array.
#[async_trait(?Send)]
pub trait StorageService {
    /// Returns only the keys that exist
    async fn get(&self, scope: StorageScope, keys: &[&str]) -> Result<StorageMap>;

    /// Merges `items` into the scope, last write wins
    async fn set(&self, scope: StorageScope, items: StorageMap) -> Result<()>;
}

#[async_trait(?Send)]
impl<S: StorageService + ?Sized> StorageService for Rc<S> {
    async fn get(&self, scope: StorageScope, keys: &[&str]) -> Result<StorageMap> {
        (**self).get(scope, keys).await
    }

    async fn set(&self, scope: StorageScope, items: StorageMap) -> Result<()> {
        (**self).set(scope, items).await
    }
}

/// Read one key and decode it
pub async fn get_record<T, S>(storage: &S, scope: StorageScope, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: StorageService + ?Sized,
{
    let mut found = storage.get(scope, &[key]).await?;
    match found.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| Error::Decode {
                key: key.to_string(),
                source,
            }),
    }
}

/// Encode and write one key, replacing whatever was there
pub async fn set_record<T, S>(storage: &S, scope: StorageScope, key: &str, record: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: StorageService + ?Sized,
{
    let value = serde_json::to_value(record).map_err(|source| Error::Encode {
        key: key.to_string(),
        source,
    })?;
    let mut items = StorageMap::new();
    items.insert(key.to_string(), value);
    storage.set(scope, items).await
}

/// In-memory store standing in for chrome.storage in tests
#[derive(Default)]
pub struct MemoryStorage {
    scopes: RefCell<HashMap<StorageScope, StorageMap>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set` fail like a full quota would
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn snapshot(&self, scope: StorageScope) -> StorageMap {
        self.scopes.borrow().get(&scope).cloned().unwrap_or_default()
    }

    pub fn insert(&self, scope: StorageScope, key: &str, value: Value) {
        self.scopes
            .borrow_mut()
            .entry(scope)
            .or_default()
            .insert(key.to_string(), value);
    }
}

#[async_trait(?Send)]
impl StorageService for MemoryStorage {
    async fn get(&self, scope: StorageScope, keys: &[&str]) -> Result<StorageMap> {
        let scopes = self.scopes.borrow();
        let mut found = StorageMap::new();
        if let Some(stored) = scopes.get(&scope) {
            for key in keys {
                if let Some(value) = stored.get(*key) {
                    found.insert(key.to_string(), value.clone());
                }
            }
        }
        Ok(found)
    }

    async fn set(&self, scope: StorageScope, items: StorageMap) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::storage("set", "simulated write failure"));
        }
        self.scopes.borrow_mut().entry(scope).or_default().extend(items);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use chrome::ChromeStorage;

#[cfg(target_arch = "wasm32")]
mod chrome {
    use async_trait::async_trait;
    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use super::{StorageMap, StorageScope, StorageService};
    use crate::error::{Error, Result};

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = get)]
        fn sync_get(keys: JsValue) -> js_sys::Promise;

        #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = set)]
        fn sync_set(items: JsValue) -> js_sys::Promise;

        #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get)]
        fn local_get(keys: JsValue) -> js_sys::Promise;

        #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set)]
        fn local_set(items: JsValue) -> js_sys::Promise;
    }

    fn js_message(value: &JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &"message".into())
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value))
    }

    /// chrome.storage.{sync,local} through promise-returning MV3 calls
    #[derive(Clone, Copy, Default)]
    pub struct ChromeStorage;

    impl ChromeStorage {
        pub fn new() -> Self {
            Self
        }
    }

    #[async_trait(?Send)]
    impl StorageService for ChromeStorage {
        async fn get(&self, scope: StorageScope, keys: &[&str]) -> Result<StorageMap> {
            let key_list = js_sys::Array::new();
            for key in keys {
                key_list.push(&JsValue::from_str(key));
            }

            let promise = match scope {
                StorageScope::Sync => sync_get(key_list.into()),
                StorageScope::Local => local_get(key_list.into()),
            };
            let result = JsFuture::from(promise)
                .await
                .map_err(|e| Error::storage("get", js_message(&e)))?;

            serde_wasm_bindgen::from_value(result)
                .map_err(|e| Error::storage("get", e.to_string()))
        }

        async fn set(&self, scope: StorageScope, items: StorageMap) -> Result<()> {
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            let object = items
                .serialize(&serializer)
                .map_err(|e| Error::storage("set", e.to_string()))?;

            let promise = match scope {
                StorageScope::Sync => sync_set(object),
                StorageScope::Local => local_set(object),
            };
            JsFuture::from(promise)
                .await
                .map_err(|e| Error::storage("set", js_message(&e)))?;
            Ok(())
        }
    }
}

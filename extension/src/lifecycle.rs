// Background service worker logic: install/update bookkeeping.
// Two independent handlers, no state carried between events.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{BadgeConfig, ExtensionConfig};
use crate::error::Result;
use crate::models::UpdateInfo;
use crate::services::storage::{keys, StorageMap, StorageScope, StorageService};

/// `chrome.runtime.OnInstalledReason`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDetails {
    pub reason: InstallReason,
    #[serde(default)]
    pub previous_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateAvailableDetails {
    pub version: String,
}

/// Browser calls the background worker makes besides storage
#[async_trait(?Send)]
pub trait BrowserActions {
    async fn set_badge(&self, text: &str, color: &str) -> Result<()>;

    /// Open an extension page in a new tab
    async fn open_page(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstallOutcome {
    OpenedDashboard,
    UpdateRecorded(UpdateInfo),
    /// Update event without a version change
    SameVersion,
    Ignored(InstallReason),
}

pub struct LifecycleHandler<S, B> {
    storage: S,
    browser: B,
    current_version: String,
    dashboard_page: String,
    badge: BadgeConfig,
}

impl<S: StorageService, B: BrowserActions> LifecycleHandler<S, B> {
    pub fn new(
        storage: S,
        browser: B,
        current_version: impl Into<String>,
        config: &ExtensionConfig,
    ) -> Self {
        Self {
            storage,
            browser,
            current_version: current_version.into(),
            dashboard_page: config.dashboard.page.clone(),
            badge: config.badge.clone(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// `chrome.runtime.onUpdateAvailable`
    pub async fn on_update_available(&self, details: &UpdateAvailableDetails) -> Result<()> {
        log::info!("Update available: {}", details.version);

        let mut flags = StorageMap::new();
        flags.insert(keys::UPDATE_AVAILABLE.to_string(), Value::Bool(true));
        flags.insert(
            keys::NEW_VERSION.to_string(),
            Value::String(details.version.clone()),
        );
        let stored = self.storage.set(StorageScope::Local, flags).await;
        if let Err(e) = &stored {
            log::error!("Failed to record pending update: {}", e);
        }

        // badge goes up even when the flags could not be stored
        self.browser
            .set_badge(&self.badge.update_text, &self.badge.update_color)
            .await?;
        stored
    }

    /// `chrome.runtime.onInstalled`
    pub async fn on_installed(&self, details: &InstalledDetails) -> Result<InstallOutcome> {
        match details.reason {
            InstallReason::Install => {
                log::info!("First install, opening {}", self.dashboard_page);
                self.browser.open_page(&self.dashboard_page).await?;
                Ok(InstallOutcome::OpenedDashboard)
            }
            InstallReason::Update => {
                let previous = details.previous_version.clone();
                log::info!(
                    "Updated from {} to {}",
                    previous.as_deref().unwrap_or("unknown"),
                    self.current_version
                );

                if previous.as_deref() == Some(self.current_version.as_str()) {
                    return Ok(InstallOutcome::SameVersion);
                }

                let info = UpdateInfo {
                    previous_version: previous,
                    current_version: self.current_version.clone(),
                };
                let encoded = serde_json::to_value(&info).map_err(|source| {
                    crate::error::Error::Encode {
                        key: keys::UPDATE_INFO.to_string(),
                        source,
                    }
                })?;

                let mut flags = StorageMap::new();
                flags.insert(keys::UPDATE_NOTIFICATION.to_string(), Value::Bool(true));
                flags.insert(keys::UPDATE_INFO.to_string(), encoded);
                self.storage.set(StorageScope::Local, flags).await?;

                Ok(InstallOutcome::UpdateRecorded(info))
            }
            other => {
                log::debug!("Ignoring onInstalled reason {:?}", other);
                Ok(InstallOutcome::Ignored(other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::storage::MemoryStorage;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingBrowser {
        badges: RefCell<Vec<(String, String)>>,
        opened: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl BrowserActions for RecordingBrowser {
        async fn set_badge(&self, text: &str, color: &str) -> Result<()> {
            self.badges
                .borrow_mut()
                .push((text.to_string(), color.to_string()));
            Ok(())
        }

        async fn open_page(&self, path: &str) -> Result<()> {
            self.opened.borrow_mut().push(path.to_string());
            Ok(())
        }
    }

    fn handler(version: &str) -> LifecycleHandler<MemoryStorage, RecordingBrowser> {
        LifecycleHandler::new(
            MemoryStorage::new(),
            RecordingBrowser::default(),
            version,
            &ExtensionConfig::default(),
        )
    }

    fn installed(reason: InstallReason, previous: Option<&str>) -> InstalledDetails {
        InstalledDetails {
            reason,
            previous_version: previous.map(str::to_string),
        }
    }

    #[test]
    fn test_first_install_opens_dashboard_once() {
        let handler = handler("1.0.0");
        let outcome = block_on(handler.on_installed(&installed(InstallReason::Install, None))).unwrap();

        assert_eq!(outcome, InstallOutcome::OpenedDashboard);
        assert_eq!(*handler.browser().opened.borrow(), vec!["dashboard.html"]);
        assert!(handler.storage().snapshot(StorageScope::Local).is_empty());
    }

    #[test]
    fn test_version_change_records_notification() {
        let handler = handler("1.1.0");
        let outcome = block_on(handler.on_installed(&installed(InstallReason::Update, Some("1.0.0")))).unwrap();

        assert!(matches!(outcome, InstallOutcome::UpdateRecorded(_)));
        let local = handler.storage().snapshot(StorageScope::Local);
        assert_eq!(local[keys::UPDATE_NOTIFICATION], json!(true));
        assert_eq!(
            local[keys::UPDATE_INFO],
            json!({ "previousVersion": "1.0.0", "currentVersion": "1.1.0" })
        );
        assert!(handler.browser().opened.borrow().is_empty());
    }

    #[test]
    fn test_same_version_update_writes_nothing() {
        let handler = handler("1.1.0");
        let outcome = block_on(handler.on_installed(&installed(InstallReason::Update, Some("1.1.0")))).unwrap();

        assert_eq!(outcome, InstallOutcome::SameVersion);
        assert_eq!(handler.storage().write_count(), 0);
    }

    #[test]
    fn test_browser_update_is_ignored() {
        let handler = handler("1.1.0");
        let outcome = block_on(handler.on_installed(&installed(InstallReason::ChromeUpdate, None))).unwrap();

        assert_eq!(outcome, InstallOutcome::Ignored(InstallReason::ChromeUpdate));
        assert_eq!(handler.storage().write_count(), 0);
        assert!(handler.browser().opened.borrow().is_empty());
    }

    #[test]
    fn test_update_available_sets_flags_and_badge() {
        let handler = handler("1.1.0");
        let details = UpdateAvailableDetails {
            version: "1.2.0".to_string(),
        };
        block_on(handler.on_update_available(&details)).unwrap();

        let local = handler.storage().snapshot(StorageScope::Local);
        assert_eq!(local[keys::UPDATE_AVAILABLE], json!(true));
        assert_eq!(local[keys::NEW_VERSION], json!("1.2.0"));
        assert_eq!(
            *handler.browser().badges.borrow(),
            vec![("!".to_string(), "#FF0000".to_string())]
        );
    }

    #[test]
    fn test_failed_flag_write_still_sets_badge() {
        let handler = handler("1.1.0");
        handler.storage().fail_writes(true);
        let details = UpdateAvailableDetails {
            version: "1.2.0".to_string(),
        };

        let result = block_on(handler.on_update_available(&details));
        assert!(matches!(result, Err(Error::Storage { .. })));
        assert_eq!(
            *handler.browser().badges.borrow(),
            vec![("!".to_string(), "#FF0000".to_string())]
        );
        assert!(handler.storage().snapshot(StorageScope::Local).is_empty());
    }

    #[test]
    fn test_update_without_previous_version_omits_it() {
        let handler = handler("1.1.0");
        let outcome = block_on(handler.on_installed(&installed(InstallReason::Update, None))).unwrap();

        assert_eq!(
            outcome,
            InstallOutcome::UpdateRecorded(UpdateInfo {
                previous_version: None,
                current_version: "1.1.0".to_string(),
            })
        );
        let local = handler.storage().snapshot(StorageScope::Local);
        assert_eq!(local[keys::UPDATE_INFO], json!({ "currentVersion": "1.1.0" }));
    }

    #[test]
    fn test_details_parse_from_chrome_shape() {
        let details: InstalledDetails =
            serde_json::from_value(json!({ "reason": "update", "previousVersion": "0.9.0" })).unwrap();
        assert_eq!(details, installed(InstallReason::Update, Some("0.9.0")));

        let details: InstalledDetails =
            serde_json::from_value(json!({ "reason": "shared_module_update", "id": "abc" })).unwrap();
        assert_eq!(details.reason, InstallReason::SharedModuleUpdate);
    }
}

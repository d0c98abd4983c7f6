// Profile, recipient, template and settings records on top of the
// storage service. Collections are read, modified in memory and written
// back whole; nothing is patched in place remotely.

use serde::{de::DeserializeOwned, Serialize};

use super::storage::{get_record, keys, set_record, StorageScope, StorageService};
use crate::error::{Result, ValidationError};
use crate::models::{
    new_record_id, Recipient, RuntimeFlags, Settings, Template, UserProfile,
};

/// A record kept in an id-keyed array under one sync storage key
pub trait CollectionRecord: Clone + Serialize + DeserializeOwned {
    const KEY: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn validate(&self) -> std::result::Result<(), ValidationError>;
}

impl CollectionRecord for Recipient {
    const KEY: &'static str = keys::RECIPIENT_CONTEXT;
    const ID_PREFIX: &'static str = "recipient";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Recipient::validate(self)
    }
}

impl CollectionRecord for Template {
    const KEY: &'static str = keys::TEMPLATES;
    const ID_PREFIX: &'static str = "template";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Template::validate(self)
    }
}

/// Id not used by any record in `existing`
pub fn fresh_id<T: CollectionRecord>(existing: &[T]) -> String {
    new_record_id(T::ID_PREFIX, |candidate| {
        existing.iter().any(|r| r.id() == candidate)
    })
}

/// Insert or replace by id, keeping every other position
pub fn upsert<T: CollectionRecord>(records: &mut Vec<T>, record: T) {
    match records.iter().position(|r| r.id() == record.id()) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}

/// Drop the record with `id`; returns whether anything was removed
pub fn remove_by_id<T: CollectionRecord>(records: &mut Vec<T>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}

pub struct ContextStore<S> {
    storage: S,
}

impl<S: StorageService> ContextStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn load_profile(&self) -> Result<UserProfile> {
        let profile = get_record(&self.storage, StorageScope::Sync, keys::USER_CONTEXT).await?;
        Ok(profile.unwrap_or_default())
    }

    /// True once the user has saved a profile at least once
    pub async fn has_profile(&self) -> Result<bool> {
        let found = self
            .storage
            .get(StorageScope::Sync, &[keys::USER_CONTEXT])
            .await?;
        Ok(found.contains_key(keys::USER_CONTEXT))
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        set_record(&self.storage, StorageScope::Sync, keys::USER_CONTEXT, profile).await?;
        log::info!("Saved user context");
        Ok(())
    }

    pub async fn load_settings(&self) -> Result<Settings> {
        let settings = get_record(&self.storage, StorageScope::Sync, keys::SETTINGS).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Range checks plus the API key check when a key is present
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        if !settings.api_key.is_empty() && !settings.api_key_plausible() {
            return Err(ValidationError::InvalidApiKey.into());
        }
        set_record(&self.storage, StorageScope::Sync, keys::SETTINGS, settings).await?;
        log::info!(
            "Saved settings (provider: {}, model: {})",
            settings.api_provider.as_str(),
            settings.model
        );
        Ok(())
    }

    pub async fn load_recipients(&self) -> Result<Vec<Recipient>> {
        self.load_collection().await
    }

    pub async fn save_recipient(&self, recipient: Recipient) -> Result<Vec<Recipient>> {
        self.save_into(recipient).await
    }

    pub async fn delete_recipient(&self, id: &str) -> Result<Vec<Recipient>> {
        self.delete_from(id).await
    }

    /// Loads templates, writing the sample set when none were ever stored
    pub async fn load_templates(&self) -> Result<Vec<Template>> {
        let stored: Option<Vec<Template>> =
            get_record(&self.storage, StorageScope::Sync, keys::TEMPLATES).await?;
        match stored {
            Some(templates) => Ok(templates),
            None => {
                let samples = sample_templates();
                set_record(&self.storage, StorageScope::Sync, keys::TEMPLATES, &samples).await?;
                log::info!("Seeded {} sample templates", samples.len());
                Ok(samples)
            }
        }
    }

    pub async fn save_template(&self, template: Template) -> Result<Vec<Template>> {
        self.save_into(template).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<Vec<Template>> {
        self.delete_from(id).await
    }

    /// Flags written by the background worker
    pub async fn load_runtime_flags(&self) -> Result<RuntimeFlags> {
        let found = self
            .storage
            .get(StorageScope::Local, &keys::RUNTIME_FLAGS)
            .await?;
        serde_json::from_value(serde_json::Value::Object(found)).map_err(|source| {
            crate::error::Error::Decode {
                key: keys::RUNTIME_FLAGS.join(","),
                source,
            }
        })
    }

    async fn load_collection<T: CollectionRecord>(&self) -> Result<Vec<T>> {
        let records = get_record(&self.storage, StorageScope::Sync, T::KEY).await?;
        Ok(records.unwrap_or_default())
    }

    async fn save_into<T: CollectionRecord>(&self, record: T) -> Result<Vec<T>> {
        record.validate()?;

        let mut records: Vec<T> = self.load_collection().await?;
        let id = record.id().to_string();
        upsert(&mut records, record);
        set_record(&self.storage, StorageScope::Sync, T::KEY, &records).await?;

        log::info!("Saved {} ({} total in {})", id, records.len(), T::KEY);
        Ok(records)
    }

    async fn delete_from<T: CollectionRecord>(&self, id: &str) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.load_collection().await?;
        if !remove_by_id(&mut records, id) {
            log::warn!("No record {} in {}, nothing deleted", id, T::KEY);
            return Ok(records);
        }
        set_record(&self.storage, StorageScope::Sync, T::KEY, &records).await?;

        log::info!("Deleted {} ({} left in {})", id, records.len(), T::KEY);
        Ok(records)
    }
}

fn sample_templates() -> Vec<Template> {
    vec![
        Template {
            id: "template_1".to_string(),
            name: "Professional Introduction".to_string(),
            description: "A formal introduction email for new business contacts".to_string(),
            category: "introduction".to_string(),
            content: "Dear {{recipient.name}},\n\n\
                I hope this email finds you well. My name is {{user.name}} and I am the \
                {{user.role}} at {{user.company}}.\n\n\
                I am reaching out because {{reason}}.\n\n\
                I would appreciate the opportunity to {{request}}.\n\n\
                Thank you for your time and consideration.\n\n\
                Best regards,\n{{user.name}}\n{{user.role}} | {{user.company}}"
                .to_string(),
            tags: vec![
                "introduction".to_string(),
                "formal".to_string(),
                "business".to_string(),
            ],
        },
        Template {
            id: "template_2".to_string(),
            name: "Meeting Follow-up".to_string(),
            description: "Thank you email after a business meeting".to_string(),
            category: "followup".to_string(),
            content: "Hi {{recipient.name}},\n\n\
                Thank you for taking the time to meet with me today to discuss {{topic}}.\n\n\
                I found our conversation about {{highlight}} particularly insightful. \
                As discussed, I will {{next_steps}}.\n\n\
                Please don't hesitate to reach out if you have any questions in the meantime.\n\n\
                Best regards,\n{{user.name}}"
                .to_string(),
            tags: vec![
                "follow-up".to_string(),
                "meeting".to_string(),
                "thank you".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::storage::MemoryStorage;
    use futures::executor::block_on;
    use serde_json::json;

    fn recipient(id: &str, name: &str, email: &str) -> Recipient {
        let mut r = Recipient::new(id);
        r.name = name.to_string();
        r.email = email.to_string();
        r
    }

    fn ids<T: CollectionRecord>(records: &[T]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_rejected_recipient_leaves_collection_unchanged() {
        let store = ContextStore::new(MemoryStorage::new());
        block_on(store.save_recipient(recipient("recipient_1", "Ana", "ana@x.com"))).unwrap();
        let writes = store.storage().write_count();

        let err = block_on(store.save_recipient(recipient("recipient_2", "", "bo@x.com"))).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::RecipientIncomplete)
        ));
        let err = block_on(store.save_recipient(recipient("recipient_2", "Bo", " "))).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(store.storage().write_count(), writes);
        let stored = block_on(store.load_recipients()).unwrap();
        assert_eq!(ids(&stored), vec!["recipient_1"]);
    }

    #[test]
    fn test_save_replaces_existing_recipient_in_place() {
        let store = ContextStore::new(MemoryStorage::new());
        for (id, name) in [("r1", "Ana"), ("r2", "Bo"), ("r3", "Cy")] {
            block_on(store.save_recipient(recipient(id, name, "x@x.com"))).unwrap();
        }

        let updated = block_on(store.save_recipient(recipient("r2", "Bo Updated", "bo@x.com"))).unwrap();
        assert_eq!(ids(&updated), vec!["r1", "r2", "r3"]);
        assert_eq!(updated[1].name, "Bo Updated");
    }

    #[test]
    fn test_delete_removes_only_matching_recipient() {
        let store = ContextStore::new(MemoryStorage::new());
        for id in ["r1", "r2", "r3", "r4"] {
            block_on(store.save_recipient(recipient(id, "Name", "x@x.com"))).unwrap();
        }

        let remaining = block_on(store.delete_recipient("r2")).unwrap();
        assert_eq!(ids(&remaining), vec!["r1", "r3", "r4"]);

        let writes = store.storage().write_count();
        let remaining = block_on(store.delete_recipient("missing")).unwrap();
        assert_eq!(ids(&remaining), vec!["r1", "r3", "r4"]);
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_templates_are_seeded_once() {
        let store = ContextStore::new(MemoryStorage::new());
        let templates = block_on(store.load_templates()).unwrap();
        assert_eq!(ids(&templates), vec!["template_1", "template_2"]);
        assert_eq!(store.storage().write_count(), 1);

        let remaining = block_on(store.delete_template("template_1")).unwrap();
        assert_eq!(ids(&remaining), vec!["template_2"]);

        let reloaded = block_on(store.load_templates()).unwrap();
        assert_eq!(ids(&reloaded), vec!["template_2"]);
    }

    #[test]
    fn test_empty_template_list_is_not_reseeded() {
        let storage = MemoryStorage::new();
        storage.insert(StorageScope::Sync, keys::TEMPLATES, json!([]));
        let store = ContextStore::new(storage);

        assert!(block_on(store.load_templates()).unwrap().is_empty());
        assert_eq!(store.storage().write_count(), 0);
    }

    #[test]
    fn test_template_validation() {
        let store = ContextStore::new(MemoryStorage::new());
        let mut template = Template::new("template_9");
        template.name = "Thanks".to_string();

        let err = block_on(store.save_template(template.clone())).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::TemplateIncomplete)
        ));

        template.content = "Thanks {{recipient.name}}!".to_string();
        let saved = block_on(store.save_template(template)).unwrap();
        assert_eq!(saved.last().map(|t| t.content.as_str()), Some("Thanks {{recipient.name}}!"));
    }

    #[test]
    fn test_profile_round_trips_wholesale() {
        let store = ContextStore::new(MemoryStorage::new());
        assert!(!block_on(store.has_profile()).unwrap());
        assert_eq!(block_on(store.load_profile()).unwrap(), UserProfile::default());

        let mut profile = UserProfile::default();
        profile.name = "Ana".to_string();
        profile.common_signatures = vec!["Best, Ana".to_string()];
        block_on(store.save_profile(&profile)).unwrap();

        assert!(block_on(store.has_profile()).unwrap());
        assert_eq!(block_on(store.load_profile()).unwrap(), profile);
    }

    #[test]
    fn test_settings_save_checks_api_key() {
        let store = ContextStore::new(MemoryStorage::new());
        let mut settings = Settings::default();
        settings.api_key = "sk-short".to_string();

        let err = block_on(store.save_settings(&settings)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidApiKey)
        ));

        settings.api_key = "sk-0123456789abcdef".to_string();
        block_on(store.save_settings(&settings)).unwrap();
        assert_eq!(block_on(store.load_settings()).unwrap(), settings);
    }

    #[test]
    fn test_storage_failure_is_surfaced() {
        let store = ContextStore::new(MemoryStorage::new());
        store.storage().fail_writes(true);

        let result = block_on(store.save_recipient(recipient("r1", "Ana", "ana@x.com")));
        assert!(matches!(result, Err(Error::Storage { .. })));
        assert!(block_on(store.load_recipients()).unwrap().is_empty());
    }

    #[test]
    fn test_runtime_flags_read_from_local_scope() {
        let storage = MemoryStorage::new();
        storage.insert(StorageScope::Local, keys::UPDATE_AVAILABLE, json!(true));
        storage.insert(StorageScope::Local, keys::NEW_VERSION, json!("1.3.0"));
        let store = ContextStore::new(storage);

        let flags = block_on(store.load_runtime_flags()).unwrap();
        assert!(flags.update_available);
        assert_eq!(flags.new_version.as_deref(), Some("1.3.0"));
        assert!(!flags.update_notification);
        assert_eq!(flags.update_info, None);
    }

    #[test]
    fn test_fresh_id_avoids_existing_ids() {
        let existing = vec![recipient(&fresh_id::<Recipient>(&[]), "Ana", "a@x.com")];
        let id = fresh_id(&existing);
        assert!(id.starts_with("recipient_"));
        assert_ne!(id, existing[0].id);
    }
}

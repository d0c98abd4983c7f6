use std::rc::Rc;

use futures::executor::block_on;
use mail_assistant::models::Recipient;
use mail_assistant::services::context_store::fresh_id;
use mail_assistant::services::storage::keys;
use mail_assistant::services::{ContextStore, MemoryStorage, StorageScope};
use mail_assistant::{Error, ValidationError};
use serde_json::json;

fn recipient(existing: &[Recipient], name: &str, email: &str) -> Recipient {
    let mut recipient = Recipient::new(fresh_id::<Recipient>(existing));
    recipient.name = name.to_string();
    recipient.email = email.to_string();
    recipient
}

fn stored_recipients(storage: &MemoryStorage) -> Vec<serde_json::Value> {
    match storage.snapshot(StorageScope::Sync).get(keys::RECIPIENT_CONTEXT) {
        Some(serde_json::Value::Array(items)) => items.clone(),
        other => panic!("unexpected recipientContext: {:?}", other),
    }
}

#[test]
fn test_add_add_delete_recipients() {
    let storage = Rc::new(MemoryStorage::new());
    storage.insert(StorageScope::Sync, keys::RECIPIENT_CONTEXT, json!([]));
    let store = ContextStore::new(storage.clone());

    let ana = recipient(&[], "Ana", "ana@x.com");
    let after_first = block_on(store.save_recipient(ana.clone())).unwrap();
    assert_eq!(after_first.len(), 1);

    let stored = stored_recipients(&storage);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], json!(ana.id));
    assert_eq!(stored[0]["name"], json!("Ana"));
    assert_eq!(stored[0]["email"], json!("ana@x.com"));
    assert_eq!(stored[0]["topics"], json!([]));
    assert!(ana.id.starts_with("recipient_"));

    let ben = recipient(&after_first, "Ben", "ben@x.com");
    assert_ne!(ben.id, ana.id);
    let after_second = block_on(store.save_recipient(ben.clone())).unwrap();
    assert_eq!(after_second.len(), 2);

    let after_delete = block_on(store.delete_recipient(&ana.id)).unwrap();
    assert_eq!(after_delete, vec![ben.clone()]);
    assert_eq!(block_on(store.load_recipients()).unwrap(), vec![ben]);
}

#[test]
fn test_incomplete_recipient_leaves_collection_untouched() {
    let storage = Rc::new(MemoryStorage::new());
    let store = ContextStore::new(storage.clone());

    let ana = recipient(&[], "Ana", "ana@x.com");
    block_on(store.save_recipient(ana.clone())).unwrap();
    let writes = storage.write_count();

    let nameless = recipient(&[ana.clone()], "  ", "someone@x.com");
    let err = block_on(store.save_recipient(nameless)).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::RecipientIncomplete)
    ));
    assert_eq!(storage.write_count(), writes);
    assert_eq!(block_on(store.load_recipients()).unwrap(), vec![ana]);
}

#[test]
fn test_edit_replaces_in_place() {
    let storage = Rc::new(MemoryStorage::new());
    let store = ContextStore::new(storage);

    let ana = recipient(&[], "Ana", "ana@x.com");
    let list = block_on(store.save_recipient(ana.clone())).unwrap();
    let ben = recipient(&list, "Ben", "ben@x.com");
    block_on(store.save_recipient(ben.clone())).unwrap();

    let mut edited = ana.clone();
    edited.company = Some("Acme".to_string());
    edited.add_topic("pricing");
    let list = block_on(store.save_recipient(edited.clone())).unwrap();

    assert_eq!(list, vec![edited, ben]);
}

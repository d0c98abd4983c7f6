// Compose assistant: prompt in, draft written into the compose surface.

use std::cell::{Cell, RefCell};

use crate::error::Result;
use crate::services::{ContextStore, DraftGenerator, DraftRequest, StorageService};

/// Where a finished draft goes
pub trait ComposeSurface {
    /// Replace the compose body with `html`
    fn write_draft(&self, html: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Blank prompt or a generation already in flight
    Skipped,
    Written,
}

pub struct ComposeAssistant<S, G, C> {
    store: ContextStore<S>,
    generator: G,
    surface: C,
    prompt: RefCell<String>,
    busy: Cell<bool>,
}

/// Clears the busy flag however `generate` exits
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S, G, C> ComposeAssistant<S, G, C>
where
    S: StorageService,
    G: DraftGenerator,
    C: ComposeSurface,
{
    pub fn new(store: ContextStore<S>, generator: G, surface: C) -> Self {
        Self {
            store,
            generator,
            surface,
            prompt: RefCell::new(String::new()),
            busy: Cell::new(false),
        }
    }

    pub fn set_prompt(&self, text: impl Into<String>) {
        *self.prompt.borrow_mut() = text.into();
    }

    pub fn prompt(&self) -> String {
        self.prompt.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn can_generate(&self) -> bool {
        !self.is_busy() && !self.prompt.borrow().trim().is_empty()
    }

    /// Draft from the current prompt and the stored user profile.
    /// On success the prompt is cleared; on failure it is kept so the
    /// user can retry, and the error is logged and returned.
    pub async fn generate(&self) -> Result<GenerateOutcome> {
        if !self.can_generate() {
            return Ok(GenerateOutcome::Skipped);
        }

        let _busy = BusyGuard::engage(&self.busy);
        let prompt = self.prompt.borrow().trim().to_string();

        match self.draft(prompt).await {
            Ok(()) => {
                self.prompt.borrow_mut().clear();
                Ok(GenerateOutcome::Written)
            }
            Err(e) => {
                log::error!("Failed to generate email: {}", e);
                Err(e)
            }
        }
    }

    async fn draft(&self, prompt: String) -> Result<()> {
        let profile = self.store.load_profile().await?;
        let request = DraftRequest { prompt, profile };
        let html = self.generator.generate(&request).await?;
        self.surface.write_draft(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::UserProfile;
    use crate::services::storage::{keys, MemoryStorage, StorageScope};
    use crate::services::PlaceholderGenerator;
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSurface {
        written: RefCell<Vec<String>>,
        missing: bool,
    }

    impl ComposeSurface for &RecordingSurface {
        fn write_draft(&self, html: &str) -> Result<()> {
            if self.missing {
                return Err(Error::NoComposeSurface);
            }
            self.written.borrow_mut().push(html.to_string());
            Ok(())
        }
    }

    /// Generator that blocks until the test opens the gate
    struct Gate(RefCell<Option<oneshot::Receiver<()>>>);

    #[async_trait(?Send)]
    impl DraftGenerator for Gate {
        async fn generate(&self, request: &DraftRequest) -> Result<String> {
            let rx = self.0.borrow_mut().take();
            if let Some(rx) = rx {
                let _ = rx.await;
            }
            Ok(format!("<p>{}</p>", request.prompt))
        }
    }

    fn store_with_profile(name: &str) -> ContextStore<MemoryStorage> {
        let store = ContextStore::new(MemoryStorage::new());
        let mut profile = UserProfile::default();
        profile.name = name.to_string();
        block_on(store.save_profile(&profile)).unwrap();
        store
    }

    #[test]
    fn test_blank_prompt_is_a_noop() {
        let surface = RecordingSurface::default();
        let assistant = ComposeAssistant::new(store_with_profile("Ana"), PlaceholderGenerator, &surface);

        assistant.set_prompt("   \n");
        assert_eq!(block_on(assistant.generate()).unwrap(), GenerateOutcome::Skipped);
        assert!(surface.written.borrow().is_empty());
        assert!(!assistant.is_busy());
    }

    #[test]
    fn test_generate_writes_draft_and_clears_prompt() {
        let surface = RecordingSurface::default();
        let assistant = ComposeAssistant::new(store_with_profile("Ana"), PlaceholderGenerator, &surface);

        assistant.set_prompt("  thank the team for the launch ");
        assert_eq!(block_on(assistant.generate()).unwrap(), GenerateOutcome::Written);

        let written = surface.written.borrow();
        assert_eq!(written.len(), 1);
        assert!(written[0].contains("\"thank the team for the launch\""));
        assert!(written[0].contains("<br>Ana</p>"));
        assert_eq!(assistant.prompt(), "");
        assert!(!assistant.is_busy());
    }

    #[test]
    fn test_second_generate_while_busy_is_skipped() {
        let surface = RecordingSurface::default();
        let (tx, rx) = oneshot::channel();
        let assistant = ComposeAssistant::new(
            store_with_profile("Ana"),
            Gate(RefCell::new(Some(rx))),
            &surface,
        );
        assistant.set_prompt("first");

        let (first, second) = block_on(async {
            futures::join!(assistant.generate(), async {
                assert!(assistant.is_busy());
                let second = assistant.generate().await;
                let _ = tx.send(());
                second
            })
        });

        assert_eq!(first.unwrap(), GenerateOutcome::Written);
        assert_eq!(second.unwrap(), GenerateOutcome::Skipped);
        assert_eq!(*surface.written.borrow(), vec!["<p>first</p>"]);
        assert!(!assistant.is_busy());
    }

    #[test]
    fn test_profile_read_failure_clears_busy_and_keeps_prompt() {
        let storage = MemoryStorage::new();
        // a bare string cannot decode into the profile object
        storage.insert(StorageScope::Sync, keys::USER_CONTEXT, json!("not a profile"));
        let surface = RecordingSurface::default();
        let assistant =
            ComposeAssistant::new(ContextStore::new(storage), PlaceholderGenerator, &surface);

        assistant.set_prompt("follow up");
        let err = block_on(assistant.generate()).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(!assistant.is_busy());
        assert_eq!(assistant.prompt(), "follow up");
        assert!(surface.written.borrow().is_empty());
    }

    #[test]
    fn test_generator_failure_is_returned() {
        let surface = RecordingSurface::default();
        let failing = |_: &DraftRequest| -> Result<String> {
            Err(Error::Generation("provider unavailable".to_string()))
        };
        let assistant = ComposeAssistant::new(store_with_profile("Ana"), failing, &surface);

        assistant.set_prompt("follow up");
        assert!(matches!(block_on(assistant.generate()), Err(Error::Generation(_))));
        assert!(assistant.can_generate());
    }

    #[test]
    fn test_missing_surface_is_reported() {
        let surface = RecordingSurface {
            missing: true,
            ..Default::default()
        };
        let assistant = ComposeAssistant::new(store_with_profile("Ana"), PlaceholderGenerator, &surface);

        assistant.set_prompt("follow up");
        assert!(matches!(block_on(assistant.generate()), Err(Error::NoComposeSurface)));
        assert!(!assistant.is_busy());
    }
}

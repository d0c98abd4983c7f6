pub mod context_store;
pub mod generator;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use context_store::ContextStore;
pub use generator::{DraftGenerator, DraftRequest, PlaceholderGenerator};
pub use storage::{MemoryStorage, StorageScope, StorageService};

#[cfg(target_arch = "wasm32")]
pub use storage::ChromeStorage;

pub mod consent_store;
pub mod error;
pub mod file_storage;
pub mod storage;

pub use consent_store::KeyValueConsentStore;
pub use error::StoreError;
pub use file_storage::FileStorage;
pub use storage::{KeyValueStorage, MemoryStorage};

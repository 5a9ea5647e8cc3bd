use crate::error::StoreError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A synchronous string key-value store, shaped like a browser's
/// `localStorage`. Every call may fail when the store is unavailable.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    disabled: bool,
    quota: Option<usize>,
}

/// In-memory storage. Clones share the same items, the way every component
/// on a page sees the same origin storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses every read and write.
    pub fn disabled() -> Self {
        let storage = Self::default();
        storage.set_disabled(true);
        storage
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Cap the total size (keys plus values, in bytes) of stored items.
    pub fn with_quota(self, bytes: usize) -> Self {
        self.inner.borrow_mut().quota = Some(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.disabled {
            return Err(StoreError::Disabled);
        }
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StoreError::Disabled);
        }
        if let Some(quota) = inner.quota {
            let others: usize = inner
                .items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StoreError::Disabled);
        }
        inner.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn clones_share_items() {
        let mut writer = MemoryStorage::new();
        let reader = writer.clone();
        writer.set_item("k", "v").unwrap();
        assert_eq!(reader.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn disabled_storage_fails_every_call() {
        let mut storage = MemoryStorage::disabled();
        assert!(matches!(storage.get_item("k"), Err(StoreError::Disabled)));
        assert!(matches!(storage.set_item("k", "v"), Err(StoreError::Disabled)));
        assert!(matches!(storage.remove_item("k"), Err(StoreError::Disabled)));
    }

    #[test]
    fn quota_counts_replacement_not_old_value() {
        let mut storage = MemoryStorage::new().with_quota(4);
        storage.set_item("k", "abc").unwrap();
        storage.set_item("k", "xyz").unwrap();
        let err = storage.set_item("k", "toolong").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 8, quota: 4 }));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("xyz"));
    }
}

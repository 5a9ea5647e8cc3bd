use crate::error::StoreError;
use crate::storage::KeyValueStorage;
use consent_core::{ConsentConfig, ConsentDecision, ConsentError, ConsentStore};

/// Stores the consent decision as JSON under `cookie_consent_<app-id>`.
pub struct KeyValueConsentStore<K> {
    storage: K,
    key: String,
}

impl<K: KeyValueStorage> KeyValueConsentStore<K> {
    pub fn new(storage: K, config: &ConsentConfig) -> Self {
        Self {
            storage,
            key: config.storage_key(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Read the stored decision, reporting why it could not be used.
    pub fn read(&self) -> Result<Option<ConsentDecision>, ConsentError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => Ok(Some(ConsentDecision::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Remove the stored decision, as if the visitor cleared site data.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)
    }
}

impl<K: KeyValueStorage> ConsentStore for KeyValueConsentStore<K> {
    fn load(&self) -> Option<ConsentDecision> {
        match self.read() {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring unusable consent record");
                None
            }
        }
    }

    fn save(&mut self, decision: &ConsentDecision) -> Result<(), ConsentError> {
        let json = decision.to_json()?;
        self.storage.set_item(&self.key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::FileStorage;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use consent_core::{ConsentController, Init, Phase};

    fn store(storage: MemoryStorage) -> KeyValueConsentStore<MemoryStorage> {
        KeyValueConsentStore::new(storage, &ConsentConfig::default())
    }

    #[test]
    fn uses_deployment_key() {
        let storage = MemoryStorage::new();
        let mut consent = store(storage.clone());
        consent.save(&ConsentDecision::new(true)).unwrap();
        assert!(storage
            .get_item("cookie_consent_lscf_main")
            .unwrap()
            .is_some());
    }

    #[test]
    fn save_then_load_keeps_choice() {
        for analytics in [true, false] {
            let mut consent = store(MemoryStorage::new());
            let decision = ConsentDecision {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
                analytics,
            };
            consent.save(&decision).unwrap();
            let loaded = consent.load().unwrap();
            assert_eq!(loaded.analytics, analytics);
            assert_eq!(loaded.timestamp, decision.timestamp);
        }
    }

    #[test]
    fn new_decision_replaces_old_record() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                "cookie_consent_lscf_main",
                r#"{"date":"2024-01-01T00:00:00.000Z","analytics":true,"extra":1}"#,
            )
            .unwrap();
        let mut consent = store(storage.clone());
        consent.save(&ConsentDecision::new(false)).unwrap();

        let raw = storage.get_item("cookie_consent_lscf_main").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["analytics"], false);
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn corrupt_record_loads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("cookie_consent_lscf_main", "{{{ not json")
            .unwrap();
        let consent = store(storage);
        assert!(matches!(consent.read(), Err(ConsentError::MalformedRecord(_))));
        assert!(consent.load().is_none());
    }

    #[test]
    fn disabled_storage_loads_as_absent_and_fails_save() {
        let mut consent = store(MemoryStorage::disabled());
        assert!(matches!(
            consent.read(),
            Err(ConsentError::StorageUnavailable(_))
        ));
        assert!(consent.load().is_none());
        assert!(matches!(
            consent.save(&ConsentDecision::new(true)),
            Err(ConsentError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn quota_exceeded_is_reported() {
        let mut consent = store(MemoryStorage::new().with_quota(8));
        assert!(matches!(
            consent.save(&ConsentDecision::new(true)),
            Err(ConsentError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn clear_removes_record() {
        let mut consent = store(MemoryStorage::new());
        consent.save(&ConsentDecision::new(true)).unwrap();
        consent.clear().unwrap();
        assert!(consent.read().unwrap().is_none());
    }

    #[test]
    fn app_ids_do_not_share_records() {
        let storage = MemoryStorage::new();
        let mut light = store(storage.clone());
        let dark = KeyValueConsentStore::new(
            storage,
            &ConsentConfig::new("portfolio_dark").unwrap(),
        );
        light.save(&ConsentDecision::new(true)).unwrap();
        assert!(dark.load().is_none());
    }

    #[test]
    fn session_survives_reload_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsentConfig::default();

        let consent = KeyValueConsentStore::new(FileStorage::new(dir.path()), &config);
        let mut first = ConsentController::new(consent, |_: bool| {});
        match first.init() {
            Init::BannerPending(token) => {
                first.banner_timer_fired(token);
            }
            other => panic!("expected pending banner, got {:?}", other),
        }
        first.open_settings();
        first.toggle_analytics(false);
        first.save_preferences();

        let consent = KeyValueConsentStore::new(FileStorage::new(dir.path()), &config);
        let mut reloaded = ConsentController::new(consent, |_: bool| {});
        assert!(matches!(reloaded.init(), Init::Adopted(ref d) if !d.analytics));
        assert_eq!(reloaded.phase(), Phase::Resolved);
        assert!(!reloaded.state().banner_visible);
    }
}

//! In-memory store for testing and throwaway runs

use fieldlog_util::ScopeKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::{Store, StoreError, StoreResult};

/// In-memory store. Contents are lost when it is dropped.
#[derive(Default)]
pub struct MemoryStore {
    payloads: Mutex<HashMap<ScopeKey, String>>,
    saves: AtomicUsize,

    /// Configure load to fail
    pub fail_load: AtomicBool,

    /// Configure save to fail
    pub fail_save: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a scope with a raw payload
    pub fn with_payload(self, key: &ScopeKey, payload: impl Into<String>) -> Self {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.insert(key.clone(), payload.into());
        }
        self
    }

    /// Raw payload currently held for a scope
    pub fn payload(&self, key: &ScopeKey) -> Option<String> {
        self.lock().ok().and_then(|p| p.get(key).cloned())
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<ScopeKey, String>>> {
        self.payloads
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &ScopeKey) -> StoreResult<Option<String>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("load disabled".into()));
        }
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &ScopeKey, payload: &str) -> StoreResult<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save disabled".into()));
        }
        self.lock()?.insert(key.clone(), payload.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.payloads.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_payloads() {
        let store = MemoryStore::new();
        let key = ScopeKey::for_pair("t", "s");

        assert!(store.load(&key).unwrap().is_none());
        store.save(&key, "[]").unwrap();
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failure_switches() {
        let key = ScopeKey::for_pair("t", "s");
        let store = MemoryStore::new().with_payload(&key, "[]");

        store.fail_load.store(true, Ordering::SeqCst);
        assert!(store.load(&key).is_err());

        store.fail_save.store(true, Ordering::SeqCst);
        assert!(store.save(&key, "[1]").is_err());
        assert_eq!(store.payload(&key).as_deref(), Some("[]"));
        assert_eq!(store.save_count(), 0);
    }
}

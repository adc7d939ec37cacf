//! Store trait definitions

use fieldlog_util::ScopeKey;

use crate::StoreResult;

/// Key-value persistence for session lists.
///
/// Payloads are JSON text produced by the session book; the store never
/// looks inside them.
pub trait Store: Send + Sync {
    /// Load the payload saved under `key`, if any
    fn load(&self, key: &ScopeKey) -> StoreResult<Option<String>>;

    /// Replace the payload saved under `key`
    fn save(&self, key: &ScopeKey, payload: &str) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

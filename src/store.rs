//! Durable key-value persistence for workflow state.
//!
//! The orchestrator persists its state after every mutation so a run can
//! resume after the host process restarts. The [`StateStore`] trait is
//! the storage seam; the host environment plugs in whatever durable
//! backend it has (extension storage, a file, a database). [`MemoryStore`]
//! is the in-process default used by tests and ephemeral setups.
//!
//! Absence of a key means "never stored" and is reported as `Ok(None)`,
//! never as an error.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// StateStore
// ============================================================================

/// Durable key-value persistence.
///
/// Values are opaque JSON; callers own serialization. Implementations
/// must be safe to call from concurrent tasks.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory [`StateStore`] backed by a hash map.
///
/// Contents do not survive process restart. Intended for tests and for
/// hosts that do not need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the store holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

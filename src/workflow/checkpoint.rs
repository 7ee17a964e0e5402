//! Persist-then-notify checkpointing.
//!
//! Every state mutation is followed by a checkpoint: the snapshot is
//! written to the [`StateStore`] under the fixed storage key and then
//! pushed to the [`ProgressNotifier`]. Both are awaited before the
//! caller advances, so the persisted state never lags actual progress
//! by more than one unit.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::notify::ProgressNotifier;
use crate::store::StateStore;
use crate::workflow::state::WorkflowState;

// ============================================================================
// Checkpoint
// ============================================================================

/// Couples the state store and the progress notifier.
#[derive(Clone)]
pub struct Checkpoint {
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn ProgressNotifier>,
}

impl Checkpoint {
    /// Creates a checkpoint over a store and a notifier.
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>, notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Persists the snapshot and notifies the observer.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails; notification is
    /// best-effort and never fails.
    pub async fn save(&self, state: &WorkflowState) -> Result<()> {
        let value = serde_json::to_value(state)?;
        self.store.set(WorkflowState::STORAGE_KEY, value).await?;
        self.notifier.notify(state).await;
        trace!(status = %state.status, "state checkpointed");
        Ok(())
    }

    /// Returns the underlying store.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// Returns the underlying notifier.
    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &dyn ProgressNotifier {
        self.notifier.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================

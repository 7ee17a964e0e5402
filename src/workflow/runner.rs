//! Sequential unit queue execution.
//!
//! Drives the idle units of the current state strictly in original
//! order, one in flight at a time. The cooperative stop flag is read
//! once per unit boundary: a stop leaves the remaining units `idle` and
//! resumable. Per-unit outcomes are recorded in place and checkpointed
//! after every unit regardless of success or failure, so the persisted
//! state never lags more than one unit.
//!
//! A unit that exhausted its retries stays in `error`; resumed runs skip
//! it, and only a full reset re-queues it.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::workflow::checkpoint::Checkpoint;
use crate::workflow::state::{UnitStatus, WorkflowState};

// ============================================================================
// StopFlag
// ============================================================================

/// Cooperative cancellation flag, shared across the orchestrator.
///
/// Set by the stop command, read at unit boundaries. Not persisted: a
/// process restart naturally stops in-flight work.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl StopFlag {
    /// Creates a cleared flag.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    #[inline]
    pub fn set(&self) {
        self.0.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Clears the flag for a new run.
    #[inline]
    pub fn clear(&self) {
        self.0.store(false, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns `true` if a stop was requested.
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

// ============================================================================
// RunOutcome
// ============================================================================

/// How a queue run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every idle unit reached a terminal per-unit status.
    Completed,

    /// The stop flag halted processing at a unit boundary.
    Stopped,
}

// ============================================================================
// TaskRunner
// ============================================================================

/// Drives the idle units of a shared state sequentially.
pub struct TaskRunner<'a> {
    state: &'a Mutex<WorkflowState>,
    stop: &'a StopFlag,
    checkpoint: &'a Checkpoint,
}

impl<'a> TaskRunner<'a> {
    /// Creates a runner over the shared state.
    #[must_use]
    pub fn new(
        state: &'a Mutex<WorkflowState>,
        stop: &'a StopFlag,
        checkpoint: &'a Checkpoint,
    ) -> Self {
        Self {
            state,
            stop,
            checkpoint,
        }
    }

    /// Processes every idle unit in original order.
    ///
    /// `per_unit` receives the unit's ordinal and URL and returns the
    /// extracted records on success. Success appends the records and
    /// marks the unit `completed`; failure marks it `error` with the
    /// captured message and the queue continues with the next unit.
    ///
    /// # Errors
    ///
    /// Only checkpointing failures abort the run; per-unit failures are
    /// recorded in state.
    pub async fn run_all<F, Fut>(&self, per_unit: F) -> Result<RunOutcome>
    where
        F: Fn(u32, String) -> Fut,
        Fut: Future<Output = Result<Vec<Value>>>,
    {
        let pending: Vec<usize> = {
            let state = self.state.lock();
            state
                .units
                .iter()
                .enumerate()
                .filter(|(_, unit)| unit.status == UnitStatus::Idle)
                .map(|(index, _)| index)
                .collect()
        };

        info!(unit_count = pending.len(), "unit queue starting");

        for index in pending {
            if self.stop.is_set() {
                info!("stop requested, halting unit queue");
                return Ok(RunOutcome::Stopped);
            }

            // a concurrent reset can replace the unit list under us; the
            // snapshot index is only valid if the unit is still there and
            // still queued
            let Some((ordinal, url)) = self.claim(index) else {
                info!("unit list changed, halting unit queue");
                return Ok(RunOutcome::Stopped);
            };
            self.save().await?;

            debug!(ordinal, url = %url, "unit started");
            let recorded = match per_unit(ordinal, url).await {
                Ok(records) => {
                    debug!(ordinal, record_count = records.len(), "unit completed");
                    self.complete(index, records)
                }
                Err(error) => {
                    warn!(ordinal, error = %error, "unit failed after retries");
                    self.record_failure(index, &error)
                }
            };
            if !recorded {
                info!(ordinal, "unit vanished before its outcome landed");
                return Ok(RunOutcome::Stopped);
            }
            self.save().await?;
        }

        Ok(RunOutcome::Completed)
    }

    /// Marks the unit at `index` as in flight and returns its identity,
    /// or `None` if the unit no longer exists or is no longer queued.
    fn claim(&self, index: usize) -> Option<(u32, String)> {
        let mut state = self.state.lock();
        let unit = state.units.get_mut(index)?;
        if unit.status != UnitStatus::Idle {
            return None;
        }
        unit.status = UnitStatus::Processing;
        let ordinal = unit.ordinal;
        let url = unit.url.clone();
        state.current_unit_index = ordinal;
        Some((ordinal, url))
    }

    /// Records a successful unit; `false` if the unit is gone.
    fn complete(&self, index: usize, records: Vec<Value>) -> bool {
        let mut state = self.state.lock();
        let Some(unit) = state.units.get_mut(index) else {
            return false;
        };
        unit.status = UnitStatus::Completed;
        state.records.extend(records);
        state.completed_count += 1;
        state.current_unit_index = 0;
        true
    }

    /// Records an exhausted unit; `false` if the unit is gone.
    fn record_failure(&self, index: usize, error: &Error) -> bool {
        let mut state = self.state.lock();
        let Some(unit) = state.units.get_mut(index) else {
            return false;
        };
        unit.status = UnitStatus::Error;
        unit.error_message = Some(error.to_string());
        state.current_unit_index = 0;
        true
    }

    /// Checkpoints the current snapshot.
    async fn save(&self) -> Result<()> {
        let snapshot = self.state.lock().clone();
        self.checkpoint.save(&snapshot).await
    }
}

// ============================================================================
// Tests
// ============================================================================

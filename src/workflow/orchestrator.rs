//! The phased workflow state machine.
//!
//! Composes tab lifecycle, load waiting, bounded retry and the unit
//! queue into two named phases:
//!
//! 1. **Discovery**: one tab on the seed URL retrieves the work
//!    description and the ordered unit list is derived from the seed.
//! 2. **Processing**: the unit queue runs sequentially, each unit
//!    extracting records through the page agent.
//!
//! The orchestrator owns the single [`WorkflowState`] value, persists
//! and broadcasts it after every transition, and converts every phase
//! or unit failure into a state mutation; nothing escapes to crash the
//! run. An external stop is cooperative: it sets the stop flag,
//! force-closes the active tab and transitions to `idle`, preserving
//! partial progress for a later resume.
//!
//! # Stop-while-in-flight policy
//!
//! A unit already inside its tab/extract step runs to its own terminal
//! status before the stop takes effect: `completed` if the in-flight
//! attempt succeeds, `error` once the force-closed tab makes its
//! remaining attempts fail. Units after it stay `idle`.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};
use url::Url;

use crate::agent::PageAgent;
use crate::browser::host::TabHost;
use crate::browser::lifecycle::TabLifecycle;
use crate::browser::load::LoadWaiter;
use crate::error::{Error, Result};
use crate::notify::ProgressNotifier;
use crate::store::StateStore;
use crate::workflow::checkpoint::Checkpoint;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::pages::build_page_urls;
use crate::workflow::retry::RetryPolicy;
use crate::workflow::runner::{RunOutcome, StopFlag, TaskRunner};
use crate::workflow::state::{Unit, WorkflowState, WorkflowStatus};

// ============================================================================
// WorkflowOrchestrator
// ============================================================================

/// Long-lived workflow instance.
///
/// Cheap to clone; all clones share the same state, stop flag and
/// active tab. At most one run is in flight at a time; a second start
/// is rejected with [`Error::Busy`].
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    config: WorkflowConfig,
    agent: Arc<dyn PageAgent>,
    lifecycle: TabLifecycle,
    checkpoint: Checkpoint,
    state: Mutex<WorkflowState>,
    stop: StopFlag,
    running: AtomicBool,
    restored: AtomicBool,
}

// ============================================================================
// Construction
// ============================================================================

impl WorkflowOrchestrator {
    /// Creates an orchestrator over the four external seams.
    #[must_use]
    pub fn new(
        host: Arc<dyn TabHost>,
        agent: Arc<dyn PageAgent>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn ProgressNotifier>,
        config: WorkflowConfig,
    ) -> Self {
        let waiter = LoadWaiter::new(config.load_timeout, config.settle_delay);
        Self {
            inner: Arc::new(Inner {
                config,
                agent,
                lifecycle: TabLifecycle::new(host, waiter),
                checkpoint: Checkpoint::new(store, notifier),
                state: Mutex::new(WorkflowState::default()),
                stop: StopFlag::new(),
                running: AtomicBool::new(false),
                restored: AtomicBool::new(false),
            }),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

impl WorkflowOrchestrator {
    /// Runs a workflow for `seed` to completion on the current task.
    ///
    /// A seed matching the existing unit list resumes it (prior records
    /// and unit statuses kept, discovery skipped); any other seed starts
    /// fresh. Phase and unit failures are recorded in state, not
    /// returned.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeed`] or [`Error::Busy`] before anything starts;
    /// storage failures while checkpointing.
    pub async fn run(&self, seed: &str) -> Result<()> {
        let _guard = self.begin(seed)?;
        self.drive(seed).await
    }

    /// Starts a workflow run on a background task.
    ///
    /// Pre-flight validation happens synchronously so the caller can ack
    /// or reject immediately; the run itself proceeds asynchronously.
    ///
    /// # Errors
    ///
    /// Same pre-flight errors as [`WorkflowOrchestrator::run`].
    pub fn spawn(&self, seed: &str) -> Result<JoinHandle<()>> {
        let guard = self.begin(seed)?;
        let orchestrator = self.clone();
        let seed = seed.to_string();
        Ok(tokio::spawn(async move {
            let _guard = guard;
            if let Err(run_error) = orchestrator.drive(&seed).await {
                error!(error = %run_error, "workflow run aborted");
            }
        }))
    }

    /// Requests a cooperative stop.
    ///
    /// Sets the stop flag, force-closes the active tab and transitions
    /// to `idle`, preserving partial progress. Idempotent; a no-op in
    /// terminal statuses.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the checkpoint fails.
    pub async fn stop(&self) -> Result<()> {
        if self.snapshot().status.is_terminal() {
            debug!("stop ignored in terminal status");
            return Ok(());
        }

        info!("stop requested");
        self.inner.stop.set();
        self.inner.lifecycle.force_close_active().await;

        {
            let mut state = self.inner.state.lock();
            state.status = WorkflowStatus::Idle;
            state.current_unit_index = 0;
        }
        self.checkpoint().await
    }

    /// Wipes the workflow back to its initial state.
    ///
    /// Stops any in-flight run, clears units and records, removes the
    /// persisted key (absence means "never started") and notifies.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal fails.
    pub async fn reset(&self) -> Result<()> {
        info!("resetting workflow state");
        self.inner.stop.set();
        self.inner.lifecycle.force_close_active().await;

        let fresh = WorkflowState::default();
        *self.inner.state.lock() = fresh.clone();
        self.inner.restored.store(true, Ordering::SeqCst);

        self.inner
            .checkpoint
            .store()
            .remove(WorkflowState::STORAGE_KEY)
            .await?;
        self.inner.checkpoint.notifier().notify(&fresh).await;
        Ok(())
    }

    /// Reloads persisted state at startup.
    ///
    /// In-flight statuses are normalized so a resumed run re-executes
    /// exactly the interrupted work. A missing key leaves the initial
    /// state untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error or a deserialization error for a
    /// corrupted persisted value.
    pub async fn restore(&self) -> Result<()> {
        let loaded = self
            .inner
            .checkpoint
            .store()
            .get(WorkflowState::STORAGE_KEY)
            .await?;

        if let Some(value) = loaded {
            let mut state: WorkflowState = serde_json::from_value(value)?;
            state.normalize_for_restart();
            info!(
                status = %state.status,
                units = state.units.len(),
                completed = state.completed_count,
                "workflow state restored from storage"
            );
            *self.inner.state.lock() = state;
        }

        self.inner.restored.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Returns the current state, restoring from storage first if this
    /// instance has never touched it.
    ///
    /// # Errors
    ///
    /// Propagates restore failures.
    pub async fn current_state(&self) -> Result<WorkflowState> {
        self.ensure_restored().await?;
        Ok(self.snapshot())
    }

    /// Returns an in-memory snapshot of the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> WorkflowState {
        self.inner.state.lock().clone()
    }

    /// Returns `true` while a run is in flight.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Run Guard
// ============================================================================

/// Releases the single-run slot when the run ends on any path.
struct RunGuard {
    inner: Arc<Inner>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// Phases
// ============================================================================

impl WorkflowOrchestrator {
    /// Validates the seed and claims the single-run slot.
    fn begin(&self, seed: &str) -> Result<RunGuard> {
        Url::parse(seed).map_err(|_| Error::invalid_seed(seed))?;

        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }

        self.inner.stop.clear();
        Ok(RunGuard {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Restores persisted state once per instance lifetime.
    ///
    /// Run before the fresh-vs-resume decision so a freshly restarted
    /// process resumes its persisted run instead of silently overwriting
    /// it.
    async fn ensure_restored(&self) -> Result<()> {
        if !self.inner.restored.load(Ordering::SeqCst) {
            self.restore().await?;
        }
        Ok(())
    }

    /// Runs both phases, converting failures into state mutations.
    async fn drive(&self, seed: &str) -> Result<()> {
        info!(seed = %seed, "workflow run starting");
        self.ensure_restored().await?;
        let resumed = self.prepare(seed);

        self.transition(WorkflowStatus::Discovering).await?;

        if !resumed {
            let policy = RetryPolicy::new(self.inner.config.max_attempts, self.inner.config.retry_delay);
            if let Err(discovery_error) = self.discover(seed, &policy).await {
                if self.inner.stop.is_set() {
                    info!("stop requested during discovery");
                    return self.finish(WorkflowStatus::Idle).await;
                }
                error!(error = %discovery_error, "discovery failed after retries");
                return self.fail(format!("discovery failed: {discovery_error}")).await;
            }
        }

        if self.inner.stop.is_set() {
            info!("stop requested before processing");
            return self.finish(WorkflowStatus::Idle).await;
        }

        self.transition(WorkflowStatus::Processing).await?;
        match self.process().await? {
            RunOutcome::Completed => {
                let snapshot = self.snapshot();
                info!(
                    completed = snapshot.completed_count,
                    records = snapshot.records.len(),
                    "workflow completed"
                );
                self.finish(WorkflowStatus::Completed).await
            }
            RunOutcome::Stopped => {
                info!("workflow stopped before completion");
                self.finish(WorkflowStatus::Idle).await
            }
        }
    }

    /// Decides fresh-vs-resume and resets state for a fresh start.
    ///
    /// A seed matching the first unit's URL resumes the existing unit
    /// list with its records; anything else wipes units, records and
    /// counters.
    fn prepare(&self, seed: &str) -> bool {
        let mut state = self.inner.state.lock();
        let resumed = state.units.first().is_some_and(|unit| unit.url == seed);

        if resumed {
            info!(
                units = state.units.len(),
                completed = state.completed_count,
                "resuming existing workflow"
            );
            state.error = None;
        } else {
            *state = WorkflowState::default();
        }

        resumed
    }

    /// Discovery phase: one retried tab on the seed builds the unit list.
    async fn discover(&self, seed: &str, policy: &RetryPolicy) -> Result<()> {
        let agent = self.inner.agent.as_ref();
        let info = self
            .inner
            .lifecycle
            .run(seed, policy, |tab_id| async move {
                agent.discover_info(tab_id).await
            })
            .await?;

        let urls = build_page_urls(seed, info.total_pages)?;
        info!(
            expected_total_units = info.expected_total_units,
            total_pages = info.total_pages,
            "discovery complete"
        );

        let mut state = self.inner.state.lock();
        state.expected_total_units = info.expected_total_units;
        state.units = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| Unit::new(url, index as u32 + 1))
            .collect();
        Ok(())
    }

    /// Processing phase: the unit queue with per-unit extraction.
    async fn process(&self) -> Result<RunOutcome> {
        let policy = RetryPolicy::new(self.inner.config.max_attempts, self.inner.config.retry_delay);
        let policy = &policy;
        let politeness_delay = self.inner.config.politeness_delay;
        let agent = self.inner.agent.as_ref();
        let lifecycle = &self.inner.lifecycle;

        let runner = TaskRunner::new(&self.inner.state, &self.inner.stop, &self.inner.checkpoint);
        runner
            .run_all(|ordinal, url| async move {
                let records = lifecycle
                    .run(&url, policy, |tab_id| async move {
                        let extraction = agent.extract(tab_id).await?;
                        Ok(extraction.records)
                    })
                    .await?;

                debug!(ordinal, record_count = records.len(), "unit extraction complete");
                sleep(politeness_delay).await;
                Ok(records)
            })
            .await
    }

    /// Sets a new status and checkpoints.
    async fn transition(&self, status: WorkflowStatus) -> Result<()> {
        self.inner.state.lock().status = status;
        self.checkpoint().await
    }

    /// Ends the run in `status`, clearing the in-flight marker.
    async fn finish(&self, status: WorkflowStatus) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            state.status = status;
            state.current_unit_index = 0;
        }
        self.checkpoint().await
    }

    /// Ends the run in `error` with a message.
    async fn fail(&self, message: String) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            state.status = WorkflowStatus::Error;
            state.error = Some(message);
            state.current_unit_index = 0;
        }
        self.checkpoint().await
    }

    /// Checkpoints the current snapshot.
    async fn checkpoint(&self) -> Result<()> {
        let snapshot = self.snapshot();
        self.inner.checkpoint.save(&snapshot).await
    }
}

// ============================================================================
// Tests
// ============================================================================

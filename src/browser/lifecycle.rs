//! Tab ownership across a retried unit of work.
//!
//! One unit gets exactly one tab for its whole retried run: attempt 1
//! creates an inactive tab, later attempts reload the same tab in place.
//! Whatever way the run ends (success, retryable failure, non-retryable
//! failure, external stop), the tab is closed; close errors are swallowed
//! because the tab may already be gone.
//!
//! The currently active handle is tracked in shared state so an external
//! stop can force-close it while the owning run is still awaiting a step.
//! That force-close races benignly with the run's own close: whichever
//! side takes the handle first closes it, the other side finds the slot
//! empty.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::browser::host::TabHost;
use crate::browser::load::LoadWaiter;
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::workflow::retry::RetryPolicy;

// ============================================================================
// TabLifecycle
// ============================================================================

/// Owns one tab per retried run and guarantees it is closed.
pub struct TabLifecycle {
    host: Arc<dyn TabHost>,
    waiter: LoadWaiter,
    active: Mutex<Option<TabId>>,
}

impl TabLifecycle {
    /// Creates a lifecycle over a host with the given load waiter.
    #[must_use]
    pub fn new(host: Arc<dyn TabHost>, waiter: LoadWaiter) -> Self {
        Self {
            host,
            waiter,
            active: Mutex::new(None),
        }
    }

    /// Runs `body` against a loaded tab for `url`, retried under `policy`.
    ///
    /// Attempt 1 creates a new inactive tab; attempts > 1 reload the same
    /// tab. Each attempt waits for the page load (and settle delay) before
    /// `body` runs. The tab is closed after the final attempt regardless
    /// of outcome.
    ///
    /// # Errors
    ///
    /// Returns the body's or the load's error once the policy gives up.
    /// A retry attempt finding the tab force-closed fails with
    /// [`Error::TabGone`] (non-retryable).
    pub async fn run<T, B, Fut>(&self, url: &str, policy: &RetryPolicy, body: B) -> Result<T>
    where
        B: Fn(TabId) -> Fut + Sync,
        Fut: Future<Output = Result<T>>,
    {
        let body = &body;
        let result = policy
            .run(|attempt| async move {
                let tab_id = self.obtain(url, attempt).await?;
                body(tab_id).await
            })
            .await;

        self.release().await;
        result
    }

    /// Force-closes the currently active tab, if any.
    ///
    /// Used by the stop handler while a unit may still own the tab.
    pub async fn force_close_active(&self) {
        let taken = self.active.lock().take();
        if let Some(tab_id) = taken {
            info!(tab_id = %tab_id, "force-closing active tab");
            if let Err(error) = self.host.close_tab(tab_id).await {
                debug!(tab_id = %tab_id, error = %error, "force-close failed, tab already gone");
            }
        }
    }

    /// Returns the currently active tab handle, if any.
    #[inline]
    #[must_use]
    pub fn active_tab(&self) -> Option<TabId> {
        *self.active.lock()
    }

    /// Creates (attempt 1) or reloads (attempt > 1) the unit's tab and
    /// waits for it to finish loading.
    async fn obtain(&self, url: &str, attempt: u32) -> Result<TabId> {
        let tab_id = if attempt == 1 {
            let events = self.host.subscribe();
            let tab_id = self.host.create_tab(url).await?;
            *self.active.lock() = Some(tab_id);
            debug!(tab_id = %tab_id, url = %url, "tab created, waiting for page load");
            self.waiter.await_load(events, tab_id).await?;
            tab_id
        } else {
            let current = *self.active.lock();
            let tab_id = current.ok_or(Error::TabGone)?;
            let events = self.host.subscribe();
            self.host.reload_tab(tab_id).await?;
            debug!(tab_id = %tab_id, attempt, "tab reloaded, waiting for page load");
            self.waiter.await_load(events, tab_id).await?;
            tab_id
        };

        Ok(tab_id)
    }

    /// Closes the active tab best-effort and clears the slot.
    async fn release(&self) {
        let taken = self.active.lock().take();
        if let Some(tab_id) = taken {
            if let Err(error) = self.host.close_tab(tab_id).await {
                debug!(tab_id = %tab_id, error = %error, "tab close failed during cleanup");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Page-load waiting.
//!
//! Races the tab's "load complete" event against a fixed ceiling. When
//! the event wins, an additional settle delay lets post-load DOM and
//! async work finish before extraction starts. Both the listen and the
//! settle share a single deadline, so the whole wait never exceeds the
//! configured timeout.
//!
//! The receiver is consumed by the call and dropped on every exit path,
//! so a listener can never be left registered.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, warn};

use crate::browser::host::{LoadStatus, TabEvent};
use crate::error::{Error, Result};
use crate::identifiers::TabId;

// ============================================================================
// LoadWaiter
// ============================================================================

/// Waits for a tab to finish loading, bounded by a timeout.
#[derive(Debug, Clone, Copy)]
pub struct LoadWaiter {
    /// Ceiling for the whole wait (listen + settle).
    timeout: Duration,

    /// Extra wait after the complete event before resolving.
    settle_delay: Duration,
}

impl LoadWaiter {
    /// Creates a waiter with the given ceiling and settle delay.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration, settle_delay: Duration) -> Self {
        Self {
            timeout,
            settle_delay,
        }
    }

    /// Waits until `tab_id` reports a completed load and the settle
    /// delay has elapsed.
    ///
    /// The receiver must have been subscribed *before* the navigation
    /// started, otherwise the completion event may already be gone.
    ///
    /// # Errors
    ///
    /// - [`Error::PageLoadTimeout`] if the ceiling elapses first.
    /// - [`Error::EventStreamClosed`] if the host dropped the event
    ///   stream.
    pub async fn await_load(
        &self,
        mut events: broadcast::Receiver<TabEvent>,
        tab_id: TabId,
    ) -> Result<()> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let event = match timeout_at(deadline, events.recv()).await {
                Ok(Ok(event)) => event,
                Ok(Err(RecvError::Lagged(skipped))) => {
                    warn!(tab_id = %tab_id, skipped, "tab event stream lagged");
                    continue;
                }
                Ok(Err(RecvError::Closed)) => return Err(Error::EventStreamClosed),
                Err(_) => {
                    warn!(tab_id = %tab_id, timeout_ms = self.timeout.as_millis() as u64, "page load timed out");
                    return Err(Error::page_load_timeout(self.timeout.as_millis() as u64));
                }
            };

            if event.tab_id == tab_id && event.status == LoadStatus::Complete {
                break;
            }
        }

        debug!(tab_id = %tab_id, "load complete, settling");

        // settle shares the deadline: a load that completes at the very
        // edge of the window still times out instead of overrunning it
        if timeout_at(deadline, sleep(self.settle_delay)).await.is_err() {
            return Err(Error::page_load_timeout(self.timeout.as_millis() as u64));
        }

        debug!(tab_id = %tab_id, "settle delay elapsed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

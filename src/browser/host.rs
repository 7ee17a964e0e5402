//! Raw browser tab control seam.
//!
//! The orchestrator never talks to a concrete browser API directly; it
//! drives tabs through [`TabHost`]. A host implementation wraps whatever
//! tab primitives the surrounding environment offers (extension tab API,
//! remote debugging protocol, a test double) and reports page-load
//! progress as a broadcast stream of [`TabEvent`]s.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::identifiers::TabId;

// ============================================================================
// LoadStatus
// ============================================================================

/// Load progress of a tab as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Navigation started or is in progress.
    Loading,

    /// The page finished loading.
    Complete,
}

// ============================================================================
// TabEvent
// ============================================================================

/// A tab load-progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabEvent {
    /// Tab this event is about.
    pub tab_id: TabId,

    /// New load status.
    pub status: LoadStatus,
}

impl TabEvent {
    /// Creates a `Complete` event for a tab.
    #[inline]
    #[must_use]
    pub const fn complete(tab_id: TabId) -> Self {
        Self {
            tab_id,
            status: LoadStatus::Complete,
        }
    }

    /// Creates a `Loading` event for a tab.
    #[inline]
    #[must_use]
    pub const fn loading(tab_id: TabId) -> Self {
        Self {
            tab_id,
            status: LoadStatus::Loading,
        }
    }
}

// ============================================================================
// TabHost
// ============================================================================

/// Raw browser tab control.
///
/// Contract notes:
///
/// - `create_tab` opens an *inactive* tab (it must not steal focus) and
///   fails with [`Error::TabHandleUnavailable`](crate::Error::TabHandleUnavailable)
///   when no addressable handle was produced.
/// - `close_tab` on a tab that is already gone is allowed to fail; the
///   caller swallows close errors during cleanup.
/// - `subscribe` must be called *before* the navigation it observes, so
///   a fast-completing load cannot slip past the listener.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Opens an inactive tab navigated to `url` and returns its handle.
    async fn create_tab(&self, url: &str) -> Result<TabId>;

    /// Reloads an existing tab in place.
    async fn reload_tab(&self, tab_id: TabId) -> Result<()>;

    /// Closes a tab. May fail if the tab is already gone.
    async fn close_tab(&self, tab_id: TabId) -> Result<()>;

    /// Subscribes to load-progress events for all tabs.
    fn subscribe(&self) -> broadcast::Receiver<TabEvent>;
}

//! Page-side extraction agent seam.
//!
//! The DOM-scraping and action routines themselves live in the page
//! context and are opaque to the orchestrator: it only ever asks the
//! agent to describe the work (discovery) or to extract records from
//! the currently loaded tab. [`PageAgent`] is that seam.
//!
//! A transport-backed implementation is available as
//! [`ChannelAgent`](crate::protocol::ChannelAgent), which speaks the
//! typed message protocol to a remote agent.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::TabId;

// ============================================================================
// PageInfo
// ============================================================================

/// Work description returned by the discovery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Total record count the discovery page advertises.
    pub expected_total_units: u32,

    /// Records per page.
    pub units_per_page: u32,

    /// Total number of pages to process.
    pub total_pages: u32,
}

// ============================================================================
// Extraction
// ============================================================================

/// Result of extracting one loaded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted records, in page order. Opaque to the orchestrator.
    pub records: Vec<Value>,

    /// URL of the next page if the page links one.
    pub next_page_url: Option<String>,
}

// ============================================================================
// PageAgent
// ============================================================================

/// The opaque extract/act function operating on a loaded page.
///
/// Both operations address the tab that the orchestrator just finished
/// loading. Errors reported by the agent are non-retryable; an agent
/// that cannot produce discovery info at all should surface
/// [`Error::PageInfoUnavailable`](crate::Error::PageInfoUnavailable),
/// which is retryable.
#[async_trait]
pub trait PageAgent: Send + Sync {
    /// Retrieves the work description from a loaded discovery page.
    async fn discover_info(&self, tab_id: TabId) -> Result<PageInfo>;

    /// Extracts records from a loaded page (or performs the page action).
    async fn extract(&self, tab_id: TabId) -> Result<Extraction>;
}

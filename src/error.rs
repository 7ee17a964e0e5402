//! Error types for the workflow orchestrator.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tabflow::{Result, Error};
//!
//! async fn example(orchestrator: &WorkflowOrchestrator) -> Result<()> {
//!     orchestrator.run("https://example.com/reviews/").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Retryable | [`Error::PageLoadTimeout`], [`Error::TabHandleUnavailable`], [`Error::PageInfoUnavailable`] |
//! | Tab | [`Error::TabGone`], [`Error::EventStreamClosed`] |
//! | Agent | [`Error::Agent`], [`Error::Protocol`] |
//! | Workflow | [`Error::Busy`], [`Error::InvalidSeed`], [`Error::Config`] |
//! | External | [`Error::Storage`], [`Error::Json`] |
//!
//! Retryability is a property of the error itself: [`Error::is_retryable`]
//! is the classification the retry policy consults, so callers never match
//! on message strings.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Retryable Errors
    // ========================================================================
    /// Page did not finish loading within the ceiling.
    ///
    /// Returned by the load waiter when neither the completion event nor
    /// the settle delay fits inside the timeout window.
    #[error("Page load timeout after {timeout_ms}ms")]
    PageLoadTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Tab creation did not yield an addressable handle.
    ///
    /// Returned when the host cannot produce a tab ID for a new tab.
    #[error("Tab handle could not be obtained")]
    TabHandleUnavailable,

    /// Discovery page info could not be retrieved.
    ///
    /// Returned when the page-side agent replies with an unusable shape
    /// to a discovery request.
    #[error("Page info could not be retrieved")]
    PageInfoUnavailable,

    // ========================================================================
    // Tab Errors
    // ========================================================================
    /// Active tab handle is missing at reload time.
    ///
    /// Returned on a retry attempt when the previously created tab no
    /// longer exists (for example, force-closed by an external stop).
    #[error("Active tab is gone, cannot reload for retry")]
    TabGone,

    /// Tab event stream closed while waiting for a page load.
    #[error("Tab event stream closed")]
    EventStreamClosed,

    // ========================================================================
    // Agent Errors
    // ========================================================================
    /// Page-side agent reported an error.
    ///
    /// Carries the agent's own error message verbatim.
    #[error("Page agent error: {message}")]
    Agent {
        /// Error message reported by the agent.
        message: String,
    },

    /// Protocol violation or unexpected reply shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Workflow Errors
    // ========================================================================
    /// A workflow run is already in progress.
    #[error("A workflow run is already in progress")]
    Busy,

    /// Seed URL could not be parsed.
    #[error("Invalid seed URL: {url}")]
    InvalidSeed {
        /// The rejected seed URL.
        url: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// State store operation failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a page load timeout error.
    #[inline]
    pub fn page_load_timeout(timeout_ms: u64) -> Self {
        Self::PageLoadTimeout { timeout_ms }
    }

    /// Creates a page agent error.
    #[inline]
    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an invalid seed error.
    #[inline]
    pub fn invalid_seed(url: impl Into<String>) -> Self {
        Self::InvalidSeed { url: url.into() }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    #[inline]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this failure is transient and worth retrying.
    ///
    /// The allow-list is deliberately small: page load timeouts, a tab
    /// handle that could not be obtained, and discovery info that could
    /// not be retrieved. Everything else short-circuits the retry loop.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PageLoadTimeout { .. } | Self::TabHandleUnavailable | Self::PageInfoUnavailable
        )
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PageLoadTimeout { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

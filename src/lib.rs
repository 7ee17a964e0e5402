//! Tabflow - Tab-driven web scraping workflow orchestration.
//!
//! This library runs multi-page scraping workflows through browser
//! tabs: discover how much work a seed page advertises, then walk the
//! derived page URLs one tab at a time, extracting records and
//! persisting progress after every unit.
//!
//! # Architecture
//!
//! The orchestrator sits between two seams:
//!
//! - **[`TabHost`]**: creates, reloads and closes tabs, and broadcasts
//!   page-load events
//! - **[`PageAgent`]**: answers discovery and extraction requests for
//!   the page loaded in a tab
//!
//! Key design principles:
//!
//! - One tab per unit of work; retries reload the same tab rather than
//!   opening new ones
//! - Every state change is persisted before observers are notified, so
//!   a crash loses at most the in-flight unit
//! - Cooperative stop: the flag is checked between units, and the
//!   in-flight unit runs to its own terminal status
//! - A persisted run resumes when started again from the same seed
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tabflow::{
//!     Command, MemoryStore, ProgressChannel, WorkflowConfig, WorkflowOrchestrator,
//!     WorkflowService,
//! };
//! # use tabflow::{PageAgent, TabHost};
//! # fn host() -> Arc<dyn TabHost> { unimplemented!() }
//! # fn agent() -> Arc<dyn PageAgent> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> tabflow::Result<()> {
//!     let progress = Arc::new(ProgressChannel::new());
//!     let mut updates = progress.subscribe();
//!
//!     let orchestrator = WorkflowOrchestrator::new(
//!         host(),
//!         agent(),
//!         Arc::new(MemoryStore::new()),
//!         progress,
//!         WorkflowConfig::default(),
//!     );
//!     let service = WorkflowService::new(orchestrator);
//!
//!     let reply = service
//!         .handle(Command::Start {
//!             seed: "https://example.com/reviews/".into(),
//!         })
//!         .await;
//!     println!("start: {reply:?}");
//!
//!     while let Ok(notification) = updates.recv().await {
//!         println!("progress: {notification:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | [`PageAgent`] seam and its data types |
//! | [`browser`] | Tab control: host seam, load waiting, lifecycle |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`export`] | Record export to CSV, TSV and JSON |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`notify`] | Progress notification seam and broadcast channel |
//! | [`protocol`] | Typed command/reply and agent message types |
//! | [`service`] | Command dispatch onto the orchestrator |
//! | [`store`] | Key-value state persistence seam |
//! | [`workflow`] | The phased workflow state machine |

// ============================================================================
// Modules
// ============================================================================

/// Page agent seam: discovery and extraction.
pub mod agent;

/// Browser tab control.
///
/// - [`TabHost`] - raw tab operations and load events
/// - [`LoadWaiter`] - completion event vs. timeout race
/// - [`TabLifecycle`] - tab ownership across a retried run
pub mod browser;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Record export to CSV, TSV and JSON.
pub mod export;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Progress notification seam and the broadcast-backed channel.
pub mod notify;

/// Typed protocol: observer commands, replies, agent messages.
pub mod protocol;

/// Command dispatch onto a workflow instance.
pub mod service;

/// Key-value state persistence seam.
pub mod store;

/// The workflow state machine and its supporting parts.
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Agent seam
pub use agent::{Extraction, PageAgent, PageInfo};

// Browser types
pub use browser::{LoadStatus, LoadWaiter, TabEvent, TabHost, TabLifecycle};

// Error types
pub use error::{Error, Result};

// Export functions
pub use export::{to_csv, to_json, to_tsv};

// Identifier types
pub use identifiers::TabId;

// Notification types
pub use notify::{NullNotifier, ProgressChannel, ProgressNotifier};

// Protocol types
pub use protocol::{AgentChannel, AgentReply, AgentRequest, ChannelAgent, Command, Notification, Reply};

// Service
pub use service::WorkflowService;

// Storage types
pub use store::{MemoryStore, StateStore};

// Workflow types
pub use workflow::{
    RetryPolicy, RunOutcome, StopFlag, Unit, UnitStatus, WorkflowConfig, WorkflowOrchestrator,
    WorkflowState, WorkflowStatus,
};

//! The tab-driven workflow: state, config, retry, queue, orchestrator.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `state` | [`WorkflowState`], [`Unit`] and status enums |
//! | `config` | [`WorkflowConfig`] timing and retry knobs |
//! | `retry` | [`RetryPolicy`]: bounded fixed-delay retry |
//! | `runner` | [`TaskRunner`]: sequential unit queue |
//! | `checkpoint` | persist-then-notify glue |
//! | `pages` | deterministic page URL derivation |
//! | `orchestrator` | [`WorkflowOrchestrator`] state machine |

// ============================================================================
// Submodules
// ============================================================================

/// Persist-then-notify checkpointing.
pub mod checkpoint;

/// Timing and retry configuration.
pub mod config;

/// The phased workflow state machine.
pub mod orchestrator;

/// Page URL derivation from the seed.
pub mod pages;

/// Bounded retry of an async unit of work.
pub mod retry;

/// Sequential unit queue execution.
pub mod runner;

/// Workflow state data model.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use checkpoint::Checkpoint;
pub use config::WorkflowConfig;
pub use orchestrator::WorkflowOrchestrator;
pub use pages::build_page_urls;
pub use retry::RetryPolicy;
pub use runner::{RunOutcome, StopFlag, TaskRunner};
pub use state::{Unit, UnitStatus, WorkflowState, WorkflowStatus};

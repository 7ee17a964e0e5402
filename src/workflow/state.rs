//! Workflow state data model.
//!
//! A single [`WorkflowState`] value is the whole resumable truth of a
//! workflow: phase, unit list with per-unit statuses, accumulated records
//! and progress counters. It is owned by the orchestrator, mutated only
//! inside its call chain, persisted after every mutation, and reloaded
//! from storage at startup.
//!
//! Serialized field names are camelCase to match the persisted layout
//! and the wire protocol.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// WorkflowStatus
// ============================================================================

/// Phase of a workflow (closed set).
///
/// Transitions: `idle → discovering → processing → completed`, with
/// `error` reachable from `discovering`/`processing` and `idle` reachable
/// at any time via stop/reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Not running; either never started or stopped/reset.
    #[default]
    Idle,

    /// Determining total work and building the unit list.
    Discovering,

    /// Executing units sequentially.
    Processing,

    /// All units reached a terminal per-unit status.
    Completed,

    /// Discovery failed; no units were processed.
    Error,
}

impl WorkflowStatus {
    /// Returns `true` for statuses that end a run until the next
    /// external start or reset command.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// UnitStatus
// ============================================================================

/// Per-unit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// Queued, not yet started.
    #[default]
    Idle,

    /// Currently in flight.
    Processing,

    /// Finished successfully.
    Completed,

    /// Failed after exhausting its retry budget.
    Error,
}

// ============================================================================
// Unit
// ============================================================================

/// One item of work in the processing phase.
///
/// Units are created in bulk when discovery succeeds and mutated in
/// place by the runner; they are never deleted except by a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Page address this unit processes.
    pub url: String,

    /// 1-based position in the unit list.
    pub ordinal: u32,

    /// Current status.
    pub status: UnitStatus,

    /// Failure message captured on exhausted retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Unit {
    /// Creates an idle unit.
    #[inline]
    #[must_use]
    pub fn new(url: impl Into<String>, ordinal: u32) -> Self {
        Self {
            url: url.into(),
            ordinal,
            status: UnitStatus::Idle,
            error_message: None,
        }
    }
}

// ============================================================================
// WorkflowState
// ============================================================================

/// The orchestrator's complete resumable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Current phase.
    pub status: WorkflowStatus,

    /// 1-based ordinal of the in-flight unit, 0 when none.
    pub current_unit_index: u32,

    /// Total record count the discovery page advertised.
    pub expected_total_units: u32,

    /// Number of units that completed successfully.
    pub completed_count: u32,

    /// Ordered unit list built by discovery.
    pub units: Vec<Unit>,

    /// Accumulated extracted records, appended in completion order.
    pub records: Vec<Value>,

    /// Workflow-level error message, set when discovery fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowState {
    /// Fixed storage key for the persisted state.
    ///
    /// Absence of the key means the workflow was never started.
    pub const STORAGE_KEY: &'static str = "workflowState";

    /// Creates a fresh idle state.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any unit is still queued.
    #[inline]
    #[must_use]
    pub fn has_idle_units(&self) -> bool {
        self.units.iter().any(|unit| unit.status == UnitStatus::Idle)
    }

    /// Normalizes a state loaded after a process restart.
    ///
    /// A crash mid-run leaves `discovering`/`processing` statuses and a
    /// unit stuck in `processing`; both are rewound to `idle` so a
    /// resumed run re-executes exactly the interrupted work. At most the
    /// in-flight unit is lost.
    pub fn normalize_for_restart(&mut self) {
        if matches!(
            self.status,
            WorkflowStatus::Discovering | WorkflowStatus::Processing
        ) {
            self.status = WorkflowStatus::Idle;
        }

        for unit in &mut self.units {
            if unit.status == UnitStatus::Processing {
                unit.status = UnitStatus::Idle;
            }
        }

        self.current_unit_index = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================

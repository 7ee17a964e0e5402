//! Message type definitions.
//!
//! All messages serialize with a SCREAMING_SNAKE `type` tag and
//! camelCase payload fields, matching the persisted state layout.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflow::WorkflowState;

// ============================================================================
// Command
// ============================================================================

/// Observer-issued commands to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Begin or resume a workflow from a seed URL.
    Start {
        /// Seed URL of the first page.
        seed: String,
    },

    /// Cooperative cancellation.
    Stop,

    /// Request the current state snapshot.
    GetState,

    /// Wipe state back to "never started".
    #[serde(alias = "CLEAR_DATA")]
    Reset,
}

// ============================================================================
// Reply
// ============================================================================

/// Immediate replies to observer commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reply {
    /// Command accepted.
    Ack {
        /// Always `true`; kept for wire compatibility.
        ok: bool,
    },

    /// State snapshot for `GET_STATE`.
    State {
        /// The current workflow state.
        state: WorkflowState,
    },

    /// Command rejected.
    Error {
        /// Why the command was rejected.
        error: String,
    },
}

impl Reply {
    /// Creates a positive ack.
    #[inline]
    #[must_use]
    pub const fn ack() -> Self {
        Self::Ack { ok: true }
    }

    /// Creates an error reply from any displayable error.
    #[inline]
    #[must_use]
    pub fn error(error: impl ToString) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }
}

// ============================================================================
// AgentRequest
// ============================================================================

/// Requests sent to the page-side agent for the currently loaded tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentRequest {
    /// Extract records from the loaded page.
    Extract,

    /// Retrieve the work description from the discovery page.
    DiscoverInfo,
}

// ============================================================================
// AgentReply
// ============================================================================

/// Replies from the page-side agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all_fields = "camelCase")]
pub enum AgentReply {
    /// Successful extraction.
    Extracted {
        /// Extracted records in page order.
        records: Vec<Value>,

        /// Next page URL if the page links one.
        next_page_url: Option<String>,
    },

    /// Work description from the discovery page.
    PageInfo {
        /// Total record count the page advertises.
        expected_total_units: u32,

        /// Records per page.
        units_per_page: u32,

        /// Total number of pages.
        total_pages: u32,
    },

    /// The agent failed.
    Error {
        /// The agent's error message.
        error: String,
    },
}

// ============================================================================
// Notification
// ============================================================================

/// Fire-and-forget pushes from the orchestrator to any observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    /// Emitted on every persisted state change.
    Progress {
        /// The state after the change.
        state: WorkflowState,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_command_tags() {
        let start: Command =
            serde_json::from_value(json!({ "type": "START", "seed": "https://example.com/" }))
                .expect("deserialize");
        assert_eq!(
            start,
            Command::Start {
                seed: "https://example.com/".into()
            }
        );

        let stop = serde_json::to_value(Command::Stop).expect("serialize");
        assert_eq!(stop, json!({ "type": "STOP" }));

        let get_state = serde_json::to_value(Command::GetState).expect("serialize");
        assert_eq!(get_state, json!({ "type": "GET_STATE" }));
    }

    #[test]
    fn test_clear_data_alias() {
        let reset: Command =
            serde_json::from_value(json!({ "type": "CLEAR_DATA" })).expect("deserialize");
        assert_eq!(reset, Command::Reset);

        let canonical: Command =
            serde_json::from_value(json!({ "type": "RESET" })).expect("deserialize");
        assert_eq!(canonical, Command::Reset);
    }

    #[test]
    fn test_reply_ack_shape() {
        let value = serde_json::to_value(Reply::ack()).expect("serialize");
        assert_eq!(value, json!({ "type": "ACK", "ok": true }));
    }

    #[test]
    fn test_agent_reply_field_names_are_camel_case() {
        let reply = AgentReply::Extracted {
            records: vec![json!({ "id": "r-1" })],
            next_page_url: Some("https://example.com/reviews/2/".into()),
        };
        let value = serde_json::to_value(&reply).expect("serialize");

        assert_eq!(value["type"], json!("EXTRACTED"));
        assert!(value.as_object().expect("object").contains_key("nextPageUrl"));
    }

    #[test]
    fn test_page_info_round_trip() {
        let reply = AgentReply::PageInfo {
            expected_total_units: 45,
            units_per_page: 15,
            total_pages: 3,
        };
        let value = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(value["type"], json!("PAGE_INFO"));
        assert_eq!(value["expectedTotalUnits"], json!(45));

        let back: AgentReply = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, reply);
    }

    #[test]
    fn test_progress_notification_shape() {
        let value = serde_json::to_value(Notification::Progress {
            state: WorkflowState::default(),
        })
        .expect("serialize");

        assert_eq!(value["type"], json!("PROGRESS"));
        assert_eq!(value["state"]["status"], json!("idle"));
    }
}

//! Typed message protocol between observer, orchestrator and page agent.
//!
//! Messages are tagged by a `type` field (SCREAMING_SNAKE tags,
//! camelCase payload fields) and fall into three exchanges:
//!
//! | Exchange | Direction | Messages |
//! |----------|-----------|----------|
//! | Command/Reply | Observer → orchestrator | [`Command`], [`Reply`] |
//! | Agent request/reply | Orchestrator → page agent | [`AgentRequest`], [`AgentReply`] |
//! | Notification | Orchestrator → observer | [`Notification`] (fire-and-forget) |
//!
//! The concrete transport carrying these messages is out of scope;
//! [`AgentChannel`] is the request/response seam a transport implements,
//! and [`ChannelAgent`] adapts it to the orchestrator's
//! [`PageAgent`](crate::agent::PageAgent) seam.

// ============================================================================
// Submodules
// ============================================================================

/// Transport seam and the channel-backed page agent.
pub mod channel;

/// Message type definitions.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{AgentChannel, ChannelAgent};
pub use message::{AgentReply, AgentRequest, Command, Notification, Reply};

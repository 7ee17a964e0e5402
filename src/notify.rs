//! Best-effort progress notification.
//!
//! After every persisted state change the orchestrator pushes the new
//! [`WorkflowState`] to any listening observer. The push is fire-and-forget:
//! a missing observer is normal (the UI may simply be closed) and is never
//! an error.
//!
//! # Implementations
//!
//! | Type | Behavior |
//! |------|----------|
//! | [`ProgressChannel`] | Broadcasts [`Notification::Progress`] to subscribers |
//! | [`NullNotifier`] | Drops every notification |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use crate::protocol::Notification;
use crate::workflow::WorkflowState;

// ============================================================================
// Constants
// ============================================================================

/// Default buffered notifications per subscriber before lagging.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// ProgressNotifier
// ============================================================================

/// Best-effort push of state snapshots to an observer.
///
/// Implementations must never fail the caller: delivery problems are
/// swallowed (at most logged), because progress reporting is advisory.
#[async_trait]
pub trait ProgressNotifier: Send + Sync {
    /// Pushes a state snapshot to any listening observer.
    async fn notify(&self, state: &WorkflowState);
}

// ============================================================================
// ProgressChannel
// ============================================================================

/// Broadcast-based [`ProgressNotifier`].
///
/// Observers call [`ProgressChannel::subscribe`] and receive a
/// [`Notification::Progress`] for every persisted state change. Sending
/// with no subscribers silently drops the notification.
#[derive(Debug, Clone)]
pub struct ProgressChannel {
    sender: broadcast::Sender<Notification>,
}

impl ProgressChannel {
    /// Creates a channel with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a channel buffering up to `capacity` notifications per
    /// subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes an observer to progress notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the number of currently attached observers.
    #[inline]
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProgressChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressNotifier for ProgressChannel {
    async fn notify(&self, state: &WorkflowState) {
        // send errors only mean nobody is listening
        if self
            .sender
            .send(Notification::Progress {
                state: state.clone(),
            })
            .is_err()
        {
            trace!("progress notification dropped, no observer attached");
        }
    }
}

// ============================================================================
// NullNotifier
// ============================================================================

/// A [`ProgressNotifier`] that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl ProgressNotifier for NullNotifier {
    async fn notify(&self, _state: &WorkflowState) {}
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::workflow::WorkflowStatus;

    #[tokio::test]
    async fn test_progress_delivered_to_subscriber() {
        let channel = ProgressChannel::new();
        let mut observer = channel.subscribe();

        let mut state = WorkflowState::default();
        state.status = WorkflowStatus::Discovering;
        channel.notify(&state).await;

        let notification = observer.recv().await.expect("recv");
        match notification {
            Notification::Progress { state } => {
                assert_eq!(state.status, WorkflowStatus::Discovering);
            }
        }
    }

    #[tokio::test]
    async fn test_notify_without_observer_is_silent() {
        let channel = ProgressChannel::new();
        // no subscriber attached; must not panic or error
        channel.notify(&WorkflowState::default()).await;
        assert_eq!(channel.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_null_notifier() {
        NullNotifier.notify(&WorkflowState::default()).await;
    }
}

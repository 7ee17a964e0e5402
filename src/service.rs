//! Command dispatch onto the orchestrator.
//!
//! The service is the background entry point an observer talks to: it
//! receives typed [`Command`]s, acks immediately, and lets the workflow
//! proceed asynchronously. Progress flows back through the
//! [`ProgressNotifier`](crate::ProgressNotifier) the orchestrator was
//! built with, not through command replies.

// ============================================================================
// Imports
// ============================================================================

use tracing::warn;

use crate::protocol::{Command, Reply};
use crate::workflow::WorkflowOrchestrator;

// ============================================================================
// WorkflowService
// ============================================================================

/// Dispatches observer commands onto a workflow instance.
#[derive(Clone)]
pub struct WorkflowService {
    orchestrator: WorkflowOrchestrator,
}

impl WorkflowService {
    /// Creates a service over an orchestrator.
    #[must_use]
    pub fn new(orchestrator: WorkflowOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Returns the underlying orchestrator.
    #[inline]
    #[must_use]
    pub fn orchestrator(&self) -> &WorkflowOrchestrator {
        &self.orchestrator
    }

    /// Handles one command and produces its immediate reply.
    ///
    /// `START` validates and spawns the run, then acks; a busy
    /// orchestrator or an invalid seed is rejected. `GET_STATE` serves
    /// the in-memory snapshot, falling back to the persisted copy when
    /// this instance has never touched storage.
    pub async fn handle(&self, command: Command) -> Reply {
        match command {
            Command::Start { seed } => match self.orchestrator.spawn(&seed) {
                Ok(_handle) => Reply::ack(),
                Err(error) => {
                    warn!(seed = %seed, error = %error, "start rejected");
                    Reply::error(error)
                }
            },

            Command::Stop => match self.orchestrator.stop().await {
                Ok(()) => Reply::ack(),
                Err(error) => Reply::error(error),
            },

            Command::GetState => match self.orchestrator.current_state().await {
                Ok(state) => Reply::State { state },
                Err(error) => Reply::error(error),
            },

            Command::Reset => match self.orchestrator.reset().await {
                Ok(()) => Reply::ack(),
                Err(error) => Reply::error(error),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use crate::agent::{Extraction, PageInfo};
    use crate::notify::ProgressChannel;
    use crate::store::{MemoryStore, StateStore};
    use crate::testing::{MockHost, ScriptedAgent};
    use crate::workflow::{WorkflowConfig, WorkflowState, WorkflowStatus};

    fn service_with(store: Arc<MemoryStore>) -> (WorkflowService, Arc<ScriptedAgent>) {
        let agent = Arc::new(ScriptedAgent::new());
        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(MockHost::new()),
            agent.clone(),
            store,
            Arc::new(ProgressChannel::new()),
            WorkflowConfig::default(),
        );
        (WorkflowService::new(orchestrator), agent)
    }

    fn scripted_happy_path(agent: &ScriptedAgent) {
        agent.push_info(Ok(PageInfo {
            expected_total_units: 2,
            units_per_page: 1,
            total_pages: 2,
        }));
        agent.push_extract(Ok(Extraction {
            records: vec![json!({ "id": "r-1" })],
            next_page_url: Some("https://example.com/reviews/2/".into()),
        }));
        agent.push_extract(Ok(Extraction {
            records: vec![json!({ "id": "r-2" })],
            next_page_url: None,
        }));
    }

    async fn wait_for_status(service: &WorkflowService, status: WorkflowStatus) -> WorkflowState {
        loop {
            let state = service.orchestrator().snapshot();
            if state.status == status {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_acks_and_runs_to_completion() {
        let (service, agent) = service_with(Arc::new(MemoryStore::new()));
        scripted_happy_path(&agent);

        let reply = service
            .handle(Command::Start {
                seed: "https://example.com/reviews/".into(),
            })
            .await;
        assert_eq!(reply, Reply::ack());

        let state = wait_for_status(&service, WorkflowStatus::Completed).await;
        assert_eq!(state.records.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_with_invalid_seed_is_rejected() {
        let (service, _agent) = service_with(Arc::new(MemoryStore::new()));

        let reply = service
            .handle(Command::Start {
                seed: "definitely not a url".into(),
            })
            .await;
        assert!(matches!(reply, Reply::Error { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_state_falls_back_to_persisted_copy() {
        let store = Arc::new(MemoryStore::new());

        // a previous process persisted a completed run
        let mut persisted = WorkflowState::default();
        persisted.status = WorkflowStatus::Completed;
        persisted.completed_count = 3;
        store
            .set(
                WorkflowState::STORAGE_KEY,
                serde_json::to_value(&persisted).expect("serialize"),
            )
            .await
            .expect("set");

        let (service, _agent) = service_with(store);
        let reply = service.handle(Command::GetState).await;
        match reply {
            Reply::State { state } => {
                assert_eq!(state.status, WorkflowStatus::Completed);
                assert_eq!(state.completed_count, 3);
            }
            other => panic!("expected state reply, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_acks() {
        let (service, _agent) = service_with(Arc::new(MemoryStore::new()));
        let reply = service.handle(Command::Stop).await;
        assert_eq!(reply, Reply::ack());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_acks_once_persisted() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(WorkflowState::STORAGE_KEY, json!({ "status": "completed" }))
            .await
            .expect("set");

        let (service, _agent) = service_with(Arc::clone(&store));
        let reply = service.handle(Command::Reset).await;
        assert_eq!(reply, Reply::ack());

        let persisted = store.get(WorkflowState::STORAGE_KEY).await.expect("get");
        assert!(persisted.is_none());
    }
}

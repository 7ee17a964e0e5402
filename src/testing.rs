//! Shared test doubles for the host and agent seams.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, broadcast};

use crate::agent::{Extraction, PageAgent, PageInfo};
use crate::browser::host::{TabEvent, TabHost};
use crate::error::{Error, Result};
use crate::identifiers::TabId;

// ============================================================================
// MockHost
// ============================================================================

/// [`TabHost`] double that hands out sequential tab IDs and, by
/// default, reports every load as complete immediately.
pub(crate) struct MockHost {
    events: broadcast::Sender<TabEvent>,
    next_id: AtomicU32,
    /// Remaining create calls that fail with no handle.
    failing_creates: AtomicU32,
    /// Remaining loads (create or reload) that never complete.
    silent_loads: AtomicU32,
    created: Mutex<Vec<String>>,
    reloads: Mutex<Vec<TabId>>,
    closed: Mutex<Vec<TabId>>,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            next_id: AtomicU32::new(1),
            failing_creates: AtomicU32::new(0),
            silent_loads: AtomicU32::new(0),
            created: Mutex::new(Vec::new()),
            reloads: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next `count` create calls fail with no handle.
    pub(crate) fn fail_next_creates(&self, count: u32) {
        self.failing_creates.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` loads never report completion.
    pub(crate) fn silence_next_loads(&self, count: u32) {
        self.silent_loads.store(count, Ordering::SeqCst);
    }

    /// URLs passed to `create_tab`, in order.
    pub(crate) fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    /// Tabs reloaded, in order.
    pub(crate) fn reloads(&self) -> Vec<TabId> {
        self.reloads.lock().clone()
    }

    /// Tabs closed, in order.
    pub(crate) fn closed(&self) -> Vec<TabId> {
        self.closed.lock().clone()
    }

    /// Emits a completion event unless this load was silenced.
    fn finish_load(&self, tab_id: TabId) {
        let silenced = self
            .silent_loads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if !silenced {
            let _ = self.events.send(TabEvent::complete(tab_id));
        }
    }
}

#[async_trait]
impl TabHost for MockHost {
    async fn create_tab(&self, url: &str) -> Result<TabId> {
        let failing = self
            .failing_creates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if failing {
            return Err(Error::TabHandleUnavailable);
        }

        let tab_id = TabId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.lock().push(url.to_string());
        self.finish_load(tab_id);
        Ok(tab_id)
    }

    async fn reload_tab(&self, tab_id: TabId) -> Result<()> {
        self.reloads.lock().push(tab_id);
        self.finish_load(tab_id);
        Ok(())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<()> {
        self.closed.lock().push(tab_id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// ScriptedAgent
// ============================================================================

/// One scripted agent reply, optionally gated on a notification.
enum Scripted<T> {
    Reply(Result<T>),
    Gated(Arc<Notify>, Result<T>),
}

/// [`PageAgent`] double replaying scripted replies in call order.
pub(crate) struct ScriptedAgent {
    info: Mutex<VecDeque<Scripted<PageInfo>>>,
    extracts: Mutex<VecDeque<Scripted<Extraction>>>,
    info_calls: AtomicU32,
    extract_calls: AtomicU32,
}

impl ScriptedAgent {
    pub(crate) fn new() -> Self {
        Self {
            info: Mutex::new(VecDeque::new()),
            extracts: Mutex::new(VecDeque::new()),
            info_calls: AtomicU32::new(0),
            extract_calls: AtomicU32::new(0),
        }
    }

    /// Queues a discovery reply.
    pub(crate) fn push_info(&self, reply: Result<PageInfo>) {
        self.info.lock().push_back(Scripted::Reply(reply));
    }

    /// Queues an extraction reply.
    pub(crate) fn push_extract(&self, reply: Result<Extraction>) {
        self.extracts.lock().push_back(Scripted::Reply(reply));
    }

    /// Queues an extraction reply that waits for `gate` first.
    pub(crate) fn gate_next_extract(&self, gate: Arc<Notify>, reply: Result<Extraction>) {
        self.extracts.lock().push_back(Scripted::Gated(gate, reply));
    }

    /// Number of discovery requests served.
    pub(crate) fn info_calls(&self) -> u32 {
        self.info_calls.load(Ordering::SeqCst)
    }

    /// Number of extraction requests served.
    #[allow(dead_code)]
    pub(crate) fn extract_calls(&self) -> u32 {
        self.extract_calls.load(Ordering::SeqCst)
    }

    async fn next<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Result<T> {
        let entry = queue.lock().pop_front();
        match entry {
            None => Err(Error::protocol("no scripted reply queued")),
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Gated(gate, reply)) => {
                gate.notified().await;
                reply
            }
        }
    }
}

#[async_trait]
impl PageAgent for ScriptedAgent {
    async fn discover_info(&self, _tab_id: TabId) -> Result<PageInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.info).await
    }

    async fn extract(&self, _tab_id: TabId) -> Result<Extraction> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.extracts).await
    }
}

//! Transport seam and the channel-backed page agent.
//!
//! [`AgentChannel`] is the request/response primitive a concrete
//! transport (extension messaging, WebSocket, an in-process test
//! double) implements. [`ChannelAgent`] adapts it to the orchestrator's
//! [`PageAgent`] seam, mapping reply shapes onto the error taxonomy:
//!
//! | Reply | Mapped to |
//! |-------|-----------|
//! | `ERROR` | [`Error::Agent`] (non-retryable) |
//! | wrong shape for `DISCOVER_INFO` | [`Error::PageInfoUnavailable`] (retryable) |
//! | wrong shape for `EXTRACT` | [`Error::Protocol`] (non-retryable) |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tracing::debug;

use crate::agent::{Extraction, PageAgent, PageInfo};
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::protocol::message::{AgentReply, AgentRequest};

// ============================================================================
// AgentChannel
// ============================================================================

/// Request/response channel to the page-side agent of a tab.
#[async_trait]
pub trait AgentChannel: Send + Sync {
    /// Sends a request to the agent in `tab_id` and awaits its reply.
    async fn request(&self, tab_id: TabId, request: AgentRequest) -> Result<AgentReply>;
}

// ============================================================================
// ChannelAgent
// ============================================================================

/// [`PageAgent`] implementation speaking the typed protocol over an
/// [`AgentChannel`].
pub struct ChannelAgent<C> {
    channel: C,
}

impl<C: AgentChannel> ChannelAgent<C> {
    /// Wraps a channel.
    #[inline]
    #[must_use]
    pub const fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Returns the underlying channel.
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }
}

#[async_trait]
impl<C: AgentChannel> PageAgent for ChannelAgent<C> {
    async fn discover_info(&self, tab_id: TabId) -> Result<PageInfo> {
        debug!(tab_id = %tab_id, "requesting page info");
        match self.channel.request(tab_id, AgentRequest::DiscoverInfo).await? {
            AgentReply::PageInfo {
                expected_total_units,
                units_per_page,
                total_pages,
            } => Ok(PageInfo {
                expected_total_units,
                units_per_page,
                total_pages,
            }),
            AgentReply::Error { error } => Err(Error::agent(error)),
            // the page may simply not have rendered the info yet
            other => {
                debug!(tab_id = %tab_id, reply = ?other, "unusable page info reply");
                Err(Error::PageInfoUnavailable)
            }
        }
    }

    async fn extract(&self, tab_id: TabId) -> Result<Extraction> {
        debug!(tab_id = %tab_id, "requesting extraction");
        match self.channel.request(tab_id, AgentRequest::Extract).await? {
            AgentReply::Extracted {
                records,
                next_page_url,
            } => Ok(Extraction {
                records,
                next_page_url,
            }),
            AgentReply::Error { error } => Err(Error::agent(error)),
            other => Err(Error::protocol(format!(
                "unexpected reply to EXTRACT: {other:?}"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use serde_json::json;

    /// Channel that replays a scripted list of replies.
    struct ScriptedChannel {
        replies: Mutex<Vec<Result<AgentReply>>>,
    }

    impl ScriptedChannel {
        fn new(replies: Vec<Result<AgentReply>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl AgentChannel for ScriptedChannel {
        async fn request(&self, _tab_id: TabId, _request: AgentRequest) -> Result<AgentReply> {
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                return Err(Error::protocol("no scripted reply"));
            }
            replies.remove(0)
        }
    }

    fn tab() -> TabId {
        TabId::new(1)
    }

    #[tokio::test]
    async fn test_extract_maps_extracted_reply() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::Extracted {
            records: vec![json!({ "id": "r-1" })],
            next_page_url: None,
        })]));

        let extraction = agent.extract(tab()).await.expect("extract");
        assert_eq!(extraction.records.len(), 1);
        assert!(extraction.next_page_url.is_none());
    }

    #[tokio::test]
    async fn test_extract_error_reply_is_non_retryable() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::Error {
            error: "selector matched nothing".into(),
        })]));

        let result = agent.extract(tab()).await;
        match result {
            Err(error @ Error::Agent { .. }) => assert!(!error.is_retryable()),
            other => panic!("expected agent error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_wrong_shape_is_protocol_error() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::PageInfo {
            expected_total_units: 1,
            units_per_page: 1,
            total_pages: 1,
        })]));

        let result = agent.extract(tab()).await;
        assert!(matches!(result, Err(Error::Protocol { .. })));
    }

    #[tokio::test]
    async fn test_discover_info_maps_page_info() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::PageInfo {
            expected_total_units: 45,
            units_per_page: 15,
            total_pages: 3,
        })]));

        let info = agent.discover_info(tab()).await.expect("discover");
        assert_eq!(info.expected_total_units, 45);
        assert_eq!(info.total_pages, 3);
    }

    #[tokio::test]
    async fn test_discover_info_wrong_shape_is_retryable() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::Extracted {
            records: Vec::new(),
            next_page_url: None,
        })]));

        let result = agent.discover_info(tab()).await;
        match result {
            Err(error @ Error::PageInfoUnavailable) => assert!(error.is_retryable()),
            other => panic!("expected retryable page info error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_discover_info_error_reply_is_non_retryable() {
        let agent = ChannelAgent::new(ScriptedChannel::new(vec![Ok(AgentReply::Error {
            error: "not a review page".into(),
        })]));

        let result = agent.discover_info(tab()).await;
        match result {
            Err(error @ Error::Agent { .. }) => assert!(!error.is_retryable()),
            other => panic!("expected agent error, got {other:?}"),
        }
    }
}

//! Scripted transport for tests. Enabled by the `test-util` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::StatusCode;
use url::Url;

use super::{HttpReply, Transport};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<HttpReply>,
    requests: Vec<(Url, String)>,
}

/// A scripted transport for tests: replies are handed out in order and every
/// posted body is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `200 OK` reply.
    #[must_use]
    pub fn with_reply(self, body: impl Into<String>) -> Self {
        self.push(HttpReply::ok(body));
        self
    }

    #[must_use]
    pub fn with_status(self, status: StatusCode, body: impl Into<String>) -> Self {
        self.push(HttpReply::with_status(status, body));
        self
    }

    pub fn push(&self, reply: HttpReply) {
        self.lock().replies.push_back(reply);
    }

    /// Request bodies posted so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    #[must_use]
    pub fn urls(&self) -> Vec<Url> {
        self.lock().requests.iter().map(|(url, _)| url.clone()).collect()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    #[must_use]
    pub fn remaining_replies(&self) -> usize {
        self.lock().replies.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    async fn post_xml(&self, url: &Url, body: String) -> Result<HttpReply> {
        let mut state = self.lock();
        state.requests.push((url.clone(), body));
        state
            .replies
            .pop_front()
            .ok_or_else(|| Error::malformed("mock transport has no reply queued"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_replies_in_order() {
        let transport = MockTransport::new()
            .with_reply("<first/>")
            .with_status(StatusCode::BAD_GATEWAY, "");
        let url = Url::parse("https://api.intacct.com/ia/xml/xmlgw.phtml").expect("url");

        let first = transport.post_xml(&url, "a".to_string()).await.expect("reply");
        let second = transport.post_xml(&url, "b".to_string()).await.expect("reply");
        assert_eq!(first, HttpReply::ok("<first/>"));
        assert_eq!(second.status, StatusCode::BAD_GATEWAY);
        assert!(transport.post_xml(&url, "c".to_string()).await.is_err());
        assert_eq!(transport.requests(), vec!["a", "b", "c"]);
    }
}

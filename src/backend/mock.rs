//! Mock backend for testing without a live AI service.
//!
//! [`MockBackend`] replays scripted outcomes in order, so tests can force
//! malformed output, transport failures, or a success on the Nth attempt.
//!
//! # Example
//!
//! ```
//! use scripture_enrichment::backend::MockBackend;
//!
//! let mock = MockBackend::fixed(r#"["hope", "healing"]"#);
//! assert_eq!(mock.calls(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::error::Result;
use crate::EnrichmentError;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion content.
    Text(String),
    /// Fail the call with an HTTP error of this status.
    Status(u16),
    /// Never answer within any reasonable timeout.
    Hang,
}

/// A test backend that returns scripted replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    /// Create a mock with the given scripted replies.
    ///
    /// # Panics
    ///
    /// Panics if `replies` is empty.
    pub fn new(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// Create a mock whose every call fails with `status`.
    pub fn failing(status: u16) -> Self {
        Self::new(vec![MockReply::Status(status)])
    }

    /// Create a mock whose every call hangs.
    pub fn hanging() -> Self {
        Self::new(vec![MockReply::Hang])
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> MockReply {
        let idx = self.index.fetch_add(1, Ordering::SeqCst) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        match self.next_reply() {
            MockReply::Text(text) => Ok(CompletionResponse { text, status: 200 }),
            MockReply::Status(status) => Err(EnrichmentError::Http {
                status,
                body: "mock failure".to_string(),
            }),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(EnrichmentError::Other("mock hang elapsed".into()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "test".to_string(),
            messages: vec![],
            max_tokens: 10,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockBackend::fixed("Hello!");
        let resp = mock.complete(&request()).await.unwrap();
        assert_eq!(resp.text, "Hello!");
        assert_eq!(resp.status, 200);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockBackend::new(vec![
            MockReply::Status(503),
            MockReply::Text("second".into()),
        ]);
        let r1 = mock.complete(&request()).await;
        let r2 = mock.complete(&request()).await.unwrap();
        let r3 = mock.complete(&request()).await;
        assert!(matches!(r1, Err(EnrichmentError::Http { status: 503, .. })));
        assert_eq!(r2.text, "second");
        assert!(r3.is_err()); // cycles
        assert_eq!(mock.requests().len(), 3);
    }
}

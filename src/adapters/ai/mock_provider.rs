//! Scripted response generator for tests.
//!
//! Replies are consumed in the order they were queued; once the queue is
//! empty every call answers "Mock response". Each request is recorded so
//! tests can inspect the composed prompt.
//!
//! ```ignore
//! let generator = MockAIProvider::new()
//!     .with_response("That sounds like a lovely day.")
//!     .with_error(MockError::EmptyResponse);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    ResponseGenerator, TokenUsage,
};

const MOCK_MODEL: &str = "mock-model-1";
const FALLBACK_REPLY: &str = "Mock response";

/// Failure to inject on a scripted call.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    EmptyResponse,
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::EmptyResponse => AIError::EmptyResponse,
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<String, MockError>>,
    requests: Vec<CompletionRequest>,
}

/// In-memory generator. Clones share one script, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
    delay: Duration,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.script.lock().unwrap().replies.push_back(Ok(content.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: MockError) -> Self {
        self.script.lock().unwrap().replies.push_back(Err(error));
        self
    }

    /// Sleeps this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    /// Prompt text of the latest request.
    pub fn last_prompt(&self) -> Option<String> {
        let script = self.script.lock().unwrap();
        script
            .requests
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
    }
}

#[async_trait]
impl ResponseGenerator for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request);
            script.replies.pop_front()
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let content = reply.unwrap_or_else(|| Ok(FALLBACK_REPLY.to_string()))?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(10, (content.len() / 4) as u32),
            content,
            model: MOCK_MODEL.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MOCK_MODEL)
    }
}

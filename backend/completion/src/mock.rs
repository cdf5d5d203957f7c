use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use voxrelay_core::{CompletionProvider, Service, UpstreamError};

/// A completion provider that replays queued replies and records every call.
///
/// Once the queue is drained it answers with the fallback reply.
pub struct MockCompletion {
    replies: Mutex<VecDeque<Result<String, UpstreamError>>>,
    fallback: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: "Mock response".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
        self
    }

    pub fn with_failure(self, err: UpstreamError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = reply.into();
        self
    }

    /// `(api_key, prompt)` for every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), prompt.to_string()));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) if text.is_empty() => Err(UpstreamError::Empty {
                service: Service::OpenAi,
            }),
            Some(reply) => reply,
            None => Ok(self.fallback.clone()),
        }
    }
}

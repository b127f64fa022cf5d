//! Mock provider for testing.
//!
//! [`MockProvider`] is a queue-based fake: tests push the responses and
//! errors it should return, and inspect the conversations it was sent.
//! Enable the `mock` feature to use it from other crates.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{LlmProvider, ProviderResponse};
use crate::tool::ToolSchema;

/// A queue-based mock provider for unit and integration tests.
///
/// Each `send_turn` pops the front of the queue. When the queue is empty the
/// `always_respond` fallback is used, if set; otherwise the call fails.
pub struct MockProvider {
    id: String,
    model: String,
    queue: Mutex<VecDeque<std::result::Result<ProviderResponse, String>>>,
    fallback: Mutex<Option<ProviderResponse>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockProvider {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the next turn
    pub fn queue_response(&self, response: ProviderResponse) {
        self.queue.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a provider failure; the message becomes the error text
    pub fn queue_error(&self, message: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Err(message.into()));
    }

    /// Response returned once the queue is drained
    pub fn always_respond(&self, response: ProviderResponse) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    /// Number of `send_turn` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of every conversation sent, in call order
    pub fn recorded_conversations(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn send_turn(
        &self,
        conversation: &Conversation,
        _tools: &[ToolSchema],
        _system_prompt: &str,
    ) -> Result<ProviderResponse> {
        self.calls
            .lock()
            .unwrap()
            .push(conversation.messages().to_vec());

        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(AgentError::Provider(message)),
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AgentError::Other("mock provider queue is empty".into())),
        }
    }
}

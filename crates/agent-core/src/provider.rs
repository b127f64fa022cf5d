//! LLM Provider Strategy Pattern
//!
//! Defines the single interface the agent loop drives. Each vendor adapter
//! translates the neutral [`Conversation`] and [`ToolSchema`] list into its
//! own wire format and maps the reply back into a [`ProviderResponse`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{LlmProvider, ProviderResponse};
//!
//! let provider = GeminiProvider::new(config)?;
//! match provider.send_turn(&conversation, &schemas, SYSTEM_PROMPT).await? {
//!     ProviderResponse::ToolCalls(calls) => { /* run tools */ }
//!     ProviderResponse::FinalText(text) => { /* done */ }
//!     ProviderResponse::Empty => { /* give up */ }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Conversation;
use crate::tool::{ToolCall, ToolSchema};

/// Sampling settings shared by every adapter
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per turn
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

const fn default_temperature() -> f32 {
    0.1
}

const fn default_max_tokens() -> u32 {
    4096
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// One model turn, normalized across vendors
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderResponse {
    /// The model wants these tools run, in this order, before the next turn
    ToolCalls(Vec<ToolCall>),

    /// The model produced its final answer
    FinalText(String),

    /// Neither text nor tool calls
    Empty,
}

impl ProviderResponse {
    /// Classify a parsed reply. Tool calls take precedence over text.
    pub fn from_parts(text: Option<String>, calls: Vec<ToolCall>) -> Self {
        if !calls.is_empty() {
            return Self::ToolCalls(calls);
        }
        match text {
            Some(text) if !text.trim().is_empty() => Self::FinalText(text),
            _ => Self::Empty,
        }
    }
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The agent loop works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider identifier (e.g. `"gemini"`, `"groq"`)
    fn id(&self) -> &str;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Check that the provider answers a minimal request
    async fn health_check(&self) -> Result<bool>;

    /// Send the conversation so far and return the model's next turn
    async fn send_turn(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
        system_prompt: &str,
    ) -> Result<ProviderResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolArgs;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert!((opts.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(opts.max_tokens, 4096);
    }

    #[test]
    fn test_tool_calls_win_over_text() {
        let call = ToolCall::new("get_tata_cars", ToolArgs::new());
        let response = ProviderResponse::from_parts(Some("thinking".into()), vec![call.clone()]);
        assert_eq!(response, ProviderResponse::ToolCalls(vec![call]));
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(ProviderResponse::from_parts(Some("  \n".into()), vec![]), ProviderResponse::Empty);
        assert_eq!(ProviderResponse::from_parts(None, vec![]), ProviderResponse::Empty);
    }
}

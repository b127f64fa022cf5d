//! Reasoning Loop
//!
//! Drives one provider through iterative tool-calling turns:
//!
//! ```text
//!            ToolCalls                 (all results appended)
//! AwaitingModel ─────────► ExecutingTools ─────────► AwaitingModel
//!      │ FinalText                                        │
//!      ▼                                                  │ Empty / step ceiling
//!     Done                                            Exhausted
//! ```
//!
//! The loop is written once against [`LlmProvider`]; vendor differences live
//! entirely in the adapters. Provider errors are returned to the caller
//! untouched so the fallback orchestrator can classify them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{LlmProvider, ProviderResponse};
use crate::tool::{ToolArgs, ToolCall, ToolRegistry};

/// Maximum model turns per query
pub const MAX_ITERATIONS: usize = 12;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt sent with every turn
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: MAX_ITERATIONS,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when you need data you cannot compute yourself, \
then synthesize the results into a concise answer.";

/// One executed tool call, as reported to the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolLogEntry {
    /// 1-indexed loop iteration that requested the call
    pub step: usize,

    #[serde(rename = "tool")]
    pub tool_name: String,

    #[serde(rename = "args")]
    pub arguments: ToolArgs,
}

/// Terminal output of a query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub answer: String,

    pub tool_log: Vec<ToolLogEntry>,

    #[serde(rename = "model")]
    pub model_id: String,

    #[serde(rename = "provider")]
    pub provider_id: String,

    /// True iff the secondary provider produced this result after a
    /// quota failure on the primary
    pub fallback_used: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResult {
    /// A failed query
    pub fn failure(
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Answer used when the loop stops without a final text
pub fn exhaustion_message(provider_id: &str) -> String {
    format!("{provider_id} reached max steps without a final answer.")
}

enum LoopState {
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Done(String),
    Exhausted,
}

/// The main Agent struct: one provider bound to the shared tool registry
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run a fresh conversation for `query` until the model answers or the
    /// step ceiling is reached.
    pub async fn run(&self, query: &str) -> Result<AgentResult> {
        let started = Instant::now();
        let schemas = self.tools.schemas();

        let mut conversation = Conversation::with_system_prompt(&self.config.system_prompt);
        conversation.push(Message::user(query));

        let mut tool_log = Vec::new();
        let mut step = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel if step >= self.config.max_iterations => {
                    tracing::warn!(
                        provider = self.provider.id(),
                        steps = step,
                        "step ceiling reached"
                    );
                    LoopState::Exhausted
                }
                LoopState::AwaitingModel => {
                    step += 1;
                    let response = self
                        .provider
                        .send_turn(&conversation, &schemas, &self.config.system_prompt)
                        .await?;

                    match response {
                        ProviderResponse::ToolCalls(calls) => LoopState::ExecutingTools(calls),
                        ProviderResponse::FinalText(text) => LoopState::Done(text),
                        ProviderResponse::Empty => {
                            tracing::warn!(
                                provider = self.provider.id(),
                                step,
                                "model returned neither text nor tool calls"
                            );
                            LoopState::Exhausted
                        }
                    }
                }
                LoopState::ExecutingTools(calls) => {
                    let calls: Vec<ToolCall> = calls.into_iter().map(ensure_call_id).collect();
                    conversation.push(Message::assistant_tool_calls(calls.clone()));

                    for call in &calls {
                        tracing::debug!(step, tool = %call.name, "executing tool");
                        let result = self.tools.execute(call).await;
                        tool_log.push(ToolLogEntry {
                            step,
                            tool_name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        });
                        conversation.push(Message::tool(&result));
                    }

                    LoopState::AwaitingModel
                }
                LoopState::Done(answer) => {
                    tracing::info!(
                        provider = self.provider.id(),
                        steps = step,
                        tools = tool_log.len(),
                        elapsed_ms = started.elapsed().as_millis(),
                        "agent finished"
                    );
                    return Ok(self.result(answer, tool_log));
                }
                LoopState::Exhausted => {
                    return Ok(self.result(exhaustion_message(self.provider.id()), tool_log));
                }
            };
        }
    }

    fn result(&self, answer: String, tool_log: Vec<ToolLogEntry>) -> AgentResult {
        AgentResult {
            answer,
            tool_log,
            model_id: self.provider.model().to_string(),
            provider_id: self.provider.id().to_string(),
            fallback_used: false,
            error: None,
        }
    }

    /// Identifier of the bound provider
    pub fn provider_id(&self) -> &str {
        self.provider.id()
    }

    /// Model of the bound provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// The bound provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Adapters that don't issue call IDs get a generated one so tool turns can
/// be paired with their request.
fn ensure_call_id(mut call: ToolCall) -> ToolCall {
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    call
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Arc::new(ToolRegistry::new()),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, self.tools, self.config))
    }
}

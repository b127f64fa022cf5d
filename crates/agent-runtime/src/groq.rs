//! Groq LLM Provider
//!
//! Groq serves an OpenAI-compatible chat completions API, so this adapter
//! speaks the OpenAI wire format with tool calls.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Conversation, Message, Role},
    provider::{GenerationOptions, LlmProvider, ProviderResponse},
    tool::{ToolArgs, ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http;

const PLACEHOLDER_KEY: &str = "YOUR_GROQ_API_KEY_HERE";

/// Groq provider configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// API key. Required.
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,

    /// Sampling settings
    pub generation: GenerationOptions,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            timeout: None,
            generation: GenerationOptions::default(),
        }
    }
}

impl GroqConfig {
    /// `None` when `GROQ_API_KEY` is missing, blank or the placeholder
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = http::configured_key(lookup("GROQ_API_KEY"), PLACEHOLDER_KEY)?;
        let defaults = Self::default();

        Some(Self {
            api_key,
            model: lookup("GROQ_MODEL").unwrap_or(defaults.model),
            base_url: lookup("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            timeout: lookup("PROVIDER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            generation: defaults.generation,
        })
    }
}

/// Groq LLM provider
pub struct GroqProvider {
    client: reqwest::Client,
    config: GroqConfig,
}

impl GroqProvider {
    pub fn new(config: GroqConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout)?,
            config,
        })
    }

    async fn complete(&self, request: &Request) -> Result<Response> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| http::transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| http::transport_error(&e))?;

        if !status.is_success() {
            return Err(http::status_error(status, &error_detail(&body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| AgentError::Provider(format!("Failed to parse Groq response: {e}")))
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn id(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<bool> {
        let request = Request {
            model: self.config.model.clone(),
            messages: vec![WireMessage::text("user", "ping")],
            tools: Vec::new(),
            tool_choice: None,
            temperature: 0.0,
            max_tokens: 3,
        };
        self.complete(&request).await?;
        Ok(true)
    }

    async fn send_turn(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
        system_prompt: &str,
    ) -> Result<ProviderResponse> {
        let request = build_request(
            &self.config.model,
            conversation,
            tools,
            system_prompt,
            &self.config.generation,
        );
        let response = self.complete(&request).await?;
        Ok(convert_response(response))
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Request {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".into()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded object; some models send `null`
    #[serde(default)]
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Conversion ─────────────────────────────────────────────────────

fn build_request(
    model: &str,
    conversation: &Conversation,
    tools: &[ToolSchema],
    system_prompt: &str,
    generation: &GenerationOptions,
) -> Request {
    let mut messages = vec![WireMessage::text("system", system_prompt)];
    messages.extend(conversation.turns().map(convert_message));

    let tools: Vec<WireTool> = tools
        .iter()
        .map(|schema| WireTool {
            kind: "function",
            function: WireFunction {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.json_schema(),
            },
        })
        .collect();

    Request {
        model: model.to_string(),
        tool_choice: (!tools.is_empty()).then_some("auto"),
        messages,
        tools,
        temperature: generation.temperature,
        max_tokens: generation.max_tokens,
    }
}

fn convert_message(message: &Message) -> WireMessage {
    match message.role {
        Role::Assistant => WireMessage {
            role: "assistant".into(),
            content: (!message.content.is_empty()).then(|| message.content.clone()),
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: function_kind(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: Some(Value::Object(call.arguments.clone()).to_string()),
                    },
                })
                .collect(),
            tool_call_id: None,
        },
        Role::Tool => WireMessage {
            role: "tool".into(),
            content: Some(message.content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: message.tool_call_id.clone(),
        },
        Role::User | Role::System => WireMessage::text(message.role.to_string().as_str(), message.content.clone()),
    }
}

fn convert_response(response: Response) -> ProviderResponse {
    let Some(choice) = response.choices.into_iter().next() else {
        return ProviderResponse::Empty;
    };

    let calls = choice
        .message
        .tool_calls
        .into_iter()
        .map(|call| {
            let arguments = parse_call_arguments(&call.function.name, call.function.arguments.as_deref());
            let converted = ToolCall::new(call.function.name, arguments);
            match call.id {
                Some(id) => converted.with_id(id),
                None => converted,
            }
        })
        .collect();

    ProviderResponse::from_parts(choice.message.content, calls)
}

/// Missing, `null` or malformed arguments become an empty map; the tool
/// then reports what it is missing.
fn parse_call_arguments(tool: &str, raw: Option<&str>) -> ToolArgs {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty() && *r != "null") else {
        return ToolArgs::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => ToolArgs::new(),
        Ok(other) => {
            tracing::warn!(tool, arguments = %other, "tool arguments are not an object");
            ToolArgs::new()
        }
        Err(e) => {
            tracing::warn!(tool, error = %e, "failed to parse tool arguments");
            ToolArgs::new()
        }
    }
}

/// `code: message` from an OpenAI-style error body, or the raw body
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| body.to_string(),
        |e| {
            let code = e.error.code.or(e.error.kind).unwrap_or_else(|| "error".into());
            format!("{code}: {}", e.error.message)
        },
    )
}

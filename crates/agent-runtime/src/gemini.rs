//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` for Google's `generateContent` REST API.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Conversation, Message, Role},
    provider::{GenerationOptions, LlmProvider, ProviderResponse},
    tool::{ParameterType, ToolArgs, ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::http;

const PLACEHOLDER_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key. Required.
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL, up to and including the API version
    pub base_url: String,

    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,

    /// Sampling settings
    pub generation: GenerationOptions,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            timeout: None,
            generation: GenerationOptions::default(),
        }
    }
}

impl GeminiConfig {
    /// `None` when `GEMINI_API_KEY` is missing, blank or the placeholder
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = http::configured_key(lookup("GEMINI_API_KEY"), PLACEHOLDER_KEY)?;
        let defaults = Self::default();

        Some(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: lookup("PROVIDER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            generation: defaults.generation,
        })
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout)?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, request: &Request) -> Result<Response> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
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
            .map_err(|e| AgentError::Provider(format!("Failed to parse Gemini response: {e}")))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<bool> {
        let request = Request {
            contents: vec![Content::text("user", "ping")],
            system_instruction: None,
            tools: Vec::new(),
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 3,
            },
        };
        self.generate(&request).await?;
        Ok(true)
    }

    async fn send_turn(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
        system_prompt: &str,
    ) -> Result<ProviderResponse> {
        let request = build_request(conversation, tools, system_prompt, &self.config.generation);
        let response = self.generate(&request).await?;
        Ok(convert_response(response))
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDeclarations>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default, skip_serializing)]
    thought: bool,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

// ── Conversion ─────────────────────────────────────────────────────

fn build_request(
    conversation: &Conversation,
    tools: &[ToolSchema],
    system_prompt: &str,
    generation: &GenerationOptions,
) -> Request {
    let declarations: Vec<FunctionDeclaration> = tools.iter().map(declaration).collect();

    Request {
        contents: convert_messages(conversation),
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part::text(system_prompt)],
        }),
        tools: if declarations.is_empty() {
            Vec::new()
        } else {
            vec![ToolDeclarations {
                function_declarations: declarations,
            }]
        },
        generation_config: GenerationConfig {
            temperature: generation.temperature,
            max_output_tokens: generation.max_tokens,
        },
    }
}

/// Gemini spells parameter types as upper-case OpenAPI names
const fn gemini_type(param_type: ParameterType) -> &'static str {
    match param_type {
        ParameterType::String => "STRING",
        ParameterType::Number => "NUMBER",
        ParameterType::Integer => "INTEGER",
        ParameterType::Boolean => "BOOLEAN",
    }
}

fn declaration(schema: &ToolSchema) -> FunctionDeclaration {
    let properties: Map<String, Value> = schema
        .parameters
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                json!({ "type": gemini_type(p.param_type), "description": p.description }),
            )
        })
        .collect();

    FunctionDeclaration {
        name: schema.name.clone(),
        description: schema.description.clone(),
        parameters: json!({
            "type": "OBJECT",
            "properties": properties,
            "required": schema.required_names(),
        }),
    }
}

/// Consecutive tool turns are merged into one `user` content holding all
/// function responses for the preceding model turn.
fn convert_messages(conversation: &Conversation) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();

    for message in conversation.turns() {
        match message.role {
            Role::Tool => {
                let part = Part {
                    function_response: Some(function_response(message)),
                    ..Default::default()
                };
                match contents.last_mut() {
                    Some(last) if last.parts.iter().all(|p| p.function_response.is_some()) => {
                        last.parts.push(part);
                    }
                    _ => contents.push(Content {
                        role: Some("user".into()),
                        parts: vec![part],
                    }),
                }
            }
            Role::Assistant => {
                let mut parts = Vec::new();
                if !message.content.is_empty() {
                    parts.push(Part::text(message.content.clone()));
                }
                parts.extend(message.tool_calls.iter().map(|call| Part {
                    function_call: Some(FunctionCall {
                        name: call.name.clone(),
                        args: Some(call.arguments.clone()),
                    }),
                    ..Default::default()
                }));
                contents.push(Content {
                    role: Some("model".into()),
                    parts,
                });
            }
            Role::User | Role::System => contents.push(Content::text("user", message.content.clone())),
        }
    }

    contents
}

fn function_response(message: &Message) -> FunctionResponse {
    let result = serde_json::from_str(&message.content)
        .unwrap_or_else(|_| Value::String(message.content.clone()));

    FunctionResponse {
        name: message.name.clone().unwrap_or_default(),
        response: json!({ "result": result }),
    }
}

fn convert_response(response: Response) -> ProviderResponse {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return ProviderResponse::Empty;
    };
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let mut texts = Vec::new();
    let mut calls = Vec::new();
    for part in parts.into_iter().filter(|p| !p.thought) {
        if let Some(call) = part.function_call {
            calls.push(ToolCall::new(call.name, call.args.unwrap_or_else(ToolArgs::new)));
        } else if let Some(text) = part.text {
            texts.push(text);
        }
    }

    if calls.is_empty() && texts.is_empty() {
        tracing::warn!(finish_reason = ?candidate.finish_reason, "Gemini candidate has no usable parts");
    }

    let text = (!texts.is_empty()).then(|| texts.join("\n"));
    ProviderResponse::from_parts(text, calls)
}

/// `STATUS: message` from a Gemini error body, or the raw body
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| body.to_string(),
        |e| format!("{}: {}", e.error.status, e.error.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::tool::{ParameterSchema, ToolResult};

    fn schema() -> ToolSchema {
        ToolSchema {
            name: "get_fuel_price".into(),
            description: "Get fuel price in city.".into(),
            parameters: vec![
                ParameterSchema::required("city", ParameterType::String, "City"),
                ParameterSchema::optional("fuel_type", ParameterType::String, "Fuel", json!("Petrol")),
            ],
        }
    }

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.base_url.ends_with("/v1beta"));
    }

    #[test]
    fn test_config_requires_real_key() {
        assert!(GeminiConfig::from_lookup(|_| None).is_none());
        assert!(GeminiConfig::from_lookup(|_| Some(PLACEHOLDER_KEY.into())).is_none());

        let config = GeminiConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("k".into()),
            "GEMINI_MODEL" => Some("gemini-2.0-flash".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert!(!format!("{config:?}").contains("\"k\""));
    }

    #[test]
    fn test_request_encodes_tools_and_system() {
        let mut conversation = Conversation::with_system_prompt("sys");
        conversation.push(Message::user("Petrol price in Pune?"));

        let request = build_request(&conversation, &[schema()], "sys", &GenerationOptions::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(value["contents"].as_array().unwrap().len(), 1);
        assert_eq!(value["contents"][0]["role"], "user");
        let decl = &value["tools"][0]["functionDeclarations"][0];
        assert_eq!(decl["name"], "get_fuel_price");
        assert_eq!(decl["parameters"]["type"], "OBJECT");
        assert_eq!(decl["parameters"]["properties"]["city"]["type"], "STRING");
        assert_eq!(decl["parameters"]["required"], json!(["city"]));
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_tool_turns_are_grouped() {
        let mut conversation = Conversation::with_system_prompt("sys");
        conversation.push(Message::user("q"));
        conversation.push(Message::assistant_tool_calls(vec![
            ToolCall::new("get_fuel_price", args(json!({"city": "Pune"}))).with_id("1"),
            ToolCall::new("get_fuel_price", args(json!({"city": "Delhi"}))).with_id("2"),
        ]));
        conversation.push(Message::tool(
            &ToolResult::success("get_fuel_price", json!({"price_per_litre": 104.29})).with_id("1"),
        ));
        conversation.push(Message::tool(
            &ToolResult::success("get_fuel_price", json!({"price_per_litre": 94.72})).with_id("2"),
        ));

        let contents = convert_messages(&conversation);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[1].parts.len(), 2);
        assert_eq!(contents[2].parts.len(), 2);

        let response = &contents[2].parts[0].function_response.as_ref().unwrap().response;
        assert_eq!(response["result"]["price_per_litre"], 104.29);
    }

    #[test]
    fn test_function_call_response() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "get_city_weather", "args": {"city": "Mumbai"}}},
                        {"functionCall": {"name": "get_tata_cars", "args": {"budget_min_lakhs": 10, "budget_max_lakhs": 16}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let response: Response = serde_json::from_value(body).unwrap();

        match convert_response(response) {
            ProviderResponse::ToolCalls(calls) => {
                assert_eq!(calls.len(), 2);
                assert_eq!(calls[0].name, "get_city_weather");
                assert_eq!(calls[0].arguments["city"], "Mumbai");
                assert_eq!(calls[1].name, "get_tata_cars");
            }
            other => panic!("expected tool calls, got {other:?}"),
        }
    }

    #[test]
    fn test_text_response_skips_thoughts() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "planning...", "thought": true},
                    {"text": "The Nexon fits."},
                    {"text": "Enjoy!"}
                ]}
            }]
        });
        let response: Response = serde_json::from_value(body).unwrap();
        assert_eq!(
            convert_response(response),
            ProviderResponse::FinalText("The Nexon fits.\nEnjoy!".into())
        );
    }

    #[test]
    fn test_no_candidates_is_empty() {
        let response: Response = serde_json::from_value(json!({"promptFeedback": {}})).unwrap();
        assert_eq!(convert_response(response), ProviderResponse::Empty);
    }

    #[test]
    fn test_error_detail() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_detail(body), "RESOURCE_EXHAUSTED: Quota exceeded");
        assert_eq!(error_detail("gateway down"), "gateway down");
    }
}

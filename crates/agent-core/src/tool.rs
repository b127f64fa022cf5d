//! Tool System
//!
//! Tools are registered once at startup and invoked by the agent loop.
//! The registry never fails a dispatch: unknown tools, bad arguments and
//! execution failures all come back as JSON error payloads so the model can
//! correct itself on the next turn.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Keyword arguments for a tool call
pub type ToolArgs = Map<String, Value>;

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: ToolArgs,

    /// Call ID for pairing results with requests
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: ToolArgs) -> Self {
        Self {
            name: name.into(),
            arguments,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Tool output, or an error object on failure
    pub payload: Value,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            payload,
        }
    }

    pub fn failure(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            payload,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Serialized payload as sent back to the model
    pub fn to_json_string(&self) -> String {
        self.payload.to_string()
    }
}

/// Parameter types advertised to providers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParameterType {
    /// JSON Schema spelling (`"string"`, `"number"`, ...)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// Parameter type
    #[serde(rename = "type")]
    pub param_type: ParameterType,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
        default: Value,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default: Some(default),
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Names of the required parameters, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// JSON Schema object describing the parameters
    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({
                        "type": p.param_type.as_str(),
                        "description": p.description,
                    }),
                )
            })
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given keyword arguments
    async fn execute(&self, args: &ToolArgs) -> Result<Value>;

    /// Validate argument names against the schema before execution
    fn validate(&self, args: &ToolArgs) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !args.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "missing required argument '{}'",
                    param.name
                )));
            }
        }

        if let Some(unexpected) = args
            .keys()
            .find(|key| !schema.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(AgentError::ToolValidation(format!(
                "unexpected keyword argument '{unexpected}'"
            )));
        }

        Ok(())
    }
}

/// Deserialize keyword arguments into a tool's typed argument struct
pub fn parse_arguments<T: DeserializeOwned>(args: &ToolArgs) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| AgentError::ToolValidation(e.to_string()))
}

/// Registry for available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_shared(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call. Never fails; errors become error payloads.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let result = match self.try_execute(&call.name, &call.arguments).await {
            Ok(payload) => ToolResult::success(&call.name, payload),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                ToolResult::failure(&call.name, self.error_payload(&call.name, &call.arguments, &e))
            }
        };

        match &call.id {
            Some(id) => result.with_id(id),
            None => result,
        }
    }

    /// Execute a named tool and serialize its output to a JSON string
    pub async fn dispatch(&self, name: &str, args: &ToolArgs) -> String {
        self.execute(&ToolCall::new(name, args.clone()))
            .await
            .to_json_string()
    }

    async fn try_execute(&self, name: &str, args: &ToolArgs) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tool.validate(args)?;
        tool.execute(args).await
    }

    fn error_payload(&self, name: &str, args: &ToolArgs, error: &AgentError) -> Value {
        match error {
            AgentError::ToolNotFound(_) => json!({
                "error": format!("Unknown tool: {name}"),
                "available": self.names(),
            }),
            AgentError::ToolValidation(detail) => json!({
                "error": format!("Bad arguments for {name}: {detail}"),
                "args_received": args,
            }),
            other => json!({
                "error": other.to_string(),
                "tool": name,
            }),
        }
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

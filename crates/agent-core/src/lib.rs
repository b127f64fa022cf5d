//! # agent-core
//!
//! Provider-agnostic agent loop with a closed tool registry and quota-aware
//! provider fallback.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    FallbackOrchestrator                      │
//! │   ┌──────────────┐   quota error   ┌──────────────┐          │
//! │   │ Agent (A)    │ ──────────────► │ Agent (B)    │          │
//! │   └──────┬───────┘                 └──────┬───────┘          │
//! │          │                                │                  │
//! │   ┌──────▼───────┐  ┌──────────────┐  ┌───▼──────────┐       │
//! │   │ LlmProvider  │  │ ToolRegistry │  │ LlmProvider  │       │
//! │   └──────────────┘  └──────────────┘  └──────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the same loop drive any vendor; adapters
//! live in `agent-runtime`.

pub mod error;
pub mod fallback;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AgentError, Result};
pub use fallback::{ErrorClassifier, FallbackOrchestrator, KeywordClassifier};
pub use message::{Conversation, Message, Role};
pub use provider::{GenerationOptions, LlmProvider, ProviderResponse};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentResult, ToolLogEntry};
pub use tool::{
    ParameterSchema, ParameterType, Tool, ToolArgs, ToolCall, ToolRegistry, ToolResult,
    ToolSchema,
};

//! # agent-runtime
//!
//! Hosted LLM providers for the car advisor agent.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google `generateContent` REST API
//! - **Groq** (default): OpenAI-compatible chat completions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::gemini::{GeminiConfig, GeminiProvider};
//!
//! if let Some(config) = GeminiConfig::from_env() {
//!     let agent = AgentBuilder::new()
//!         .provider(Arc::new(GeminiProvider::new(config)?))
//!         .tools(registry)
//!         .build()?;
//! }
//! ```

mod http;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "groq")]
pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};

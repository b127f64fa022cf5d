//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! A provider without a usable API key is simply absent.

use agent_runtime::{GeminiConfig, GroqConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Primary provider
    pub gemini: Option<GeminiConfig>,

    /// Secondary provider, used on quota errors or when forced
    pub groq: Option<GroqConfig>,

    pub bind_addr: String,
    pub static_dir: String,

    /// Refuse out-of-scope queries before they reach a provider
    pub guardrail_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            gemini: GeminiConfig::from_lookup(&lookup),
            groq: GroqConfig::from_lookup(&lookup),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
            guardrail_enabled: lookup("GUARDRAIL_ENABLED").is_some_and(|v| is_truthy(&v)),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

//! Application State

use std::sync::Arc;

use agent_core::{Agent, AgentConfig, FallbackOrchestrator, LlmProvider, ToolRegistry, reasoning::MAX_ITERATIONS};
use agent_runtime::{GeminiProvider, GroqProvider};
use car_advisor::{CAR_ADVISOR_PROMPT, Guardrail, WttrClient};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Primary provider, if configured
    pub gemini: Option<Arc<dyn LlmProvider>>,

    /// Secondary provider, if configured
    pub groq: Option<Arc<dyn LlmProvider>>,

    /// Agent loops over both providers with quota fallback
    pub orchestrator: Arc<FallbackOrchestrator>,

    /// Scope filter (None when disabled)
    pub guardrail: Option<Arc<Guardrail>>,
}

impl AppState {
    pub fn new(
        gemini: Option<Arc<dyn LlmProvider>>,
        groq: Option<Arc<dyn LlmProvider>>,
        tools: Arc<ToolRegistry>,
        guardrail: Option<Guardrail>,
    ) -> Self {
        let agent = |provider: &Arc<dyn LlmProvider>| {
            Agent::new(
                provider.clone(),
                tools.clone(),
                AgentConfig {
                    system_prompt: CAR_ADVISOR_PROMPT.into(),
                    max_iterations: MAX_ITERATIONS,
                },
            )
        };

        let orchestrator = FallbackOrchestrator::new(gemini.as_ref().map(agent), groq.as_ref().map(agent));

        Self {
            gemini,
            groq,
            orchestrator: Arc::new(orchestrator),
            guardrail: guardrail.map(Arc::new),
        }
    }

    /// Build providers and tools from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let gemini = match &config.gemini {
            Some(c) => Some(Arc::new(GeminiProvider::new(c.clone())?) as Arc<dyn LlmProvider>),
            None => None,
        };
        let groq = match &config.groq {
            Some(c) => Some(Arc::new(GroqProvider::new(c.clone())?) as Arc<dyn LlmProvider>),
            None => None,
        };

        let tools = car_advisor::build_registry(Arc::new(WttrClient::new()?));
        let guardrail = config.guardrail_enabled.then(Guardrail::default);

        Ok(Self::new(gemini, groq, Arc::new(tools), guardrail))
    }
}

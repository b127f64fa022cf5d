//! Provider Fallback
//!
//! Runs a query on the primary agent and, when the primary fails with a
//! quota/rate-limit error, reruns it from scratch on the secondary agent.
//! Any other primary failure is terminal for the query.
//!
//! Quota detection sits behind [`ErrorClassifier`] so vendor-specific error
//! taxonomies can be swapped without touching the orchestration.

use crate::error::AgentError;
use crate::reasoning::{Agent, AgentResult};

/// Substrings that mark a provider error as quota exhaustion
pub const QUOTA_KEYWORDS: [&str; 5] = [
    "429",
    "RESOURCE_EXHAUSTED",
    "quota",
    "rate_limit",
    "rate limit",
];

/// Provider id reported when no provider is configured
pub const NO_PROVIDER_ID: &str = "none";

/// Error reported when no provider is configured
pub const NO_PROVIDER_ERROR: &str = "No AI provider available";

/// Decides whether a provider error should trigger fallback
pub trait ErrorClassifier: Send + Sync {
    fn is_quota_error(&self, message: &str) -> bool;
}

impl<F> ErrorClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_quota_error(&self, message: &str) -> bool {
        self(message)
    }
}

/// Case-sensitive substring match against a keyword list
#[derive(Clone, Debug)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(QUOTA_KEYWORDS)
    }
}

impl ErrorClassifier for KeywordClassifier {
    fn is_quota_error(&self, message: &str) -> bool {
        self.keywords.iter().any(|k| message.contains(k.as_str()))
    }
}

/// Primary/secondary orchestration over two optional agents
pub struct FallbackOrchestrator {
    primary: Option<Agent>,
    secondary: Option<Agent>,
    classifier: Box<dyn ErrorClassifier>,
}

impl FallbackOrchestrator {
    pub fn new(primary: Option<Agent>, secondary: Option<Agent>) -> Self {
        Self {
            primary,
            secondary,
            classifier: Box::new(KeywordClassifier::default()),
        }
    }

    /// Replace the quota classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl ErrorClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub const fn primary(&self) -> Option<&Agent> {
        self.primary.as_ref()
    }

    pub const fn secondary(&self) -> Option<&Agent> {
        self.secondary.as_ref()
    }

    /// Whether at least one provider is configured
    pub const fn has_provider(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    /// Answer `query`, falling back to the secondary on quota errors.
    /// Always returns a structured result.
    pub async fn run(&self, query: &str, force_secondary: bool) -> AgentResult {
        if force_secondary {
            if let Some(secondary) = &self.secondary {
                tracing::info!(provider = secondary.provider_id(), "secondary provider forced");
                return Self::attempt(secondary, query, false).await;
            }
        }

        if let Some(primary) = &self.primary {
            match primary.run(query).await {
                Ok(result) => return result,
                Err(e) => {
                    let message = e.to_string();
                    let Some(secondary) = &self.secondary else {
                        tracing::error!(provider = primary.provider_id(), error = %message, "primary provider failed");
                        return failure(primary, &e);
                    };
                    if !self.classifier.is_quota_error(&message) {
                        tracing::error!(provider = primary.provider_id(), error = %message, "primary provider failed");
                        return failure(primary, &e);
                    }
                    tracing::warn!(
                        from = primary.provider_id(),
                        to = secondary.provider_id(),
                        error = %message,
                        "quota exhausted, falling back"
                    );
                    return Self::attempt(secondary, query, true).await;
                }
            }
        }

        if let Some(secondary) = &self.secondary {
            return Self::attempt(secondary, query, false).await;
        }

        tracing::error!("no AI provider configured");
        AgentResult::failure(NO_PROVIDER_ID, "", NO_PROVIDER_ERROR)
    }

    async fn attempt(agent: &Agent, query: &str, via_fallback: bool) -> AgentResult {
        let mut result = match agent.run(query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(provider = agent.provider_id(), error = %e, "provider failed");
                failure(agent, &e)
            }
        };
        result.fallback_used = via_fallback;
        result
    }
}

fn failure(agent: &Agent, error: &AgentError) -> AgentResult {
    AgentResult::failure(agent.provider_id(), agent.model(), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use crate::provider::ProviderResponse;
    use crate::tool::ToolRegistry;
    use std::sync::Arc;

    fn agent(provider: &Arc<MockProvider>) -> Agent {
        Agent::with_defaults(provider.clone(), Arc::new(ToolRegistry::new()))
    }

    fn answering(id: &str, answer: &str) -> Arc<MockProvider> {
        let provider = Arc::new(MockProvider::new(id, format!("{id}-model")));
        provider.queue_response(ProviderResponse::FinalText(answer.into()));
        provider
    }

    fn failing(id: &str, message: &str) -> Arc<MockProvider> {
        let provider = Arc::new(MockProvider::new(id, format!("{id}-model")));
        provider.queue_error(message);
        provider
    }

    #[test]
    fn test_keyword_classifier() {
        let classifier = KeywordClassifier::default();
        assert!(classifier.is_quota_error("429 Too Many Requests"));
        assert!(classifier.is_quota_error("You exceeded your current quota"));
        assert!(classifier.is_quota_error("RESOURCE_EXHAUSTED"));
        assert!(classifier.is_quota_error("rate_limit_exceeded"));
        assert!(classifier.is_quota_error("hit the rate limit"));
        assert!(!classifier.is_quota_error("500 Internal Server Error"));
        assert!(!classifier.is_quota_error("Rate Limit"));
    }

    #[tokio::test]
    async fn test_no_providers() {
        let orchestrator = FallbackOrchestrator::new(None, None);
        let result = orchestrator.run("Budget 10 lakhs", false).await;

        assert_eq!(result.provider_id, "none");
        assert_eq!(result.error.as_deref(), Some(NO_PROVIDER_ERROR));
    }

    #[tokio::test]
    async fn test_primary_success() {
        let primary = answering("gemini", "Nexon");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.answer, "Nexon");
        assert_eq!(result.provider_id, "gemini");
        assert!(!result.fallback_used);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_quota_error_falls_back() {
        let primary = failing("gemini", "429 RESOURCE_EXHAUSTED");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.provider_id, "groq");
        assert_eq!(result.model_id, "groq-model");
        assert!(result.fallback_used);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_quota_word_falls_back() {
        let primary = failing("gemini", "You exceeded your current quota");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        assert!(orchestrator.run("q", false).await.fallback_used);
    }

    #[tokio::test]
    async fn test_other_error_is_terminal() {
        let primary = failing("gemini", "400 INVALID_ARGUMENT");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.provider_id, "gemini");
        assert!(result.error.as_deref().unwrap().contains("400 INVALID_ARGUMENT"));
        assert!(!result.fallback_used);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_quota_error_without_secondary() {
        let primary = failing("gemini", "429 RESOURCE_EXHAUSTED");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), None);

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.provider_id, "gemini");
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_both_quota_surfaces_secondary_error() {
        let primary = failing("gemini", "429 RESOURCE_EXHAUSTED");
        let secondary = failing("groq", "429 rate_limit_exceeded");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.provider_id, "groq");
        assert!(result.error.as_deref().unwrap().contains("rate_limit_exceeded"));
        assert!(result.fallback_used);
    }

    #[tokio::test]
    async fn test_force_secondary_skips_primary() {
        let primary = answering("gemini", "Nexon");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)));

        let result = orchestrator.run("q", true).await;
        assert_eq!(result.provider_id, "groq");
        assert!(!result.fallback_used);
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_force_secondary_without_secondary_uses_primary() {
        let primary = answering("gemini", "Nexon");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), None);

        let result = orchestrator.run("q", true).await;
        assert_eq!(result.provider_id, "gemini");
    }

    #[tokio::test]
    async fn test_secondary_only() {
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(None, Some(agent(&secondary)));

        let result = orchestrator.run("q", false).await;
        assert_eq!(result.provider_id, "groq");
        assert!(!result.fallback_used);
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let primary = failing("gemini", "overloaded");
        let secondary = answering("groq", "Punch");
        let orchestrator = FallbackOrchestrator::new(Some(agent(&primary)), Some(agent(&secondary)))
            .with_classifier(|message: &str| message.contains("overloaded"));

        assert!(orchestrator.run("q", false).await.fallback_used);
    }
}

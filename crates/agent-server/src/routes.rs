//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{api_status, chat_handler, filter_handler, health_check};
use crate::state::AppState;

pub fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/status", get(api_status))
        // Agent API
        .route("/api/chat", post(chat_handler))
        // Direct search
        .route("/api/filter", post(filter_handler))
        // Web UI
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use agent_core::mock::MockProvider;
    use agent_core::{LlmProvider, ProviderResponse, ToolCall};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use car_advisor::{Guardrail, StaticWeatherClient, build_registry};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn mock(id: &str, model: &str) -> Arc<MockProvider> {
        Arc::new(MockProvider::new(id, model))
    }

    fn app(gemini: Option<Arc<MockProvider>>, groq: Option<Arc<MockProvider>>, guardrail: Option<Guardrail>) -> Router {
        let tools = build_registry(Arc::new(StaticWeatherClient::default()));
        let state = AppState::new(
            gemini.map(|p| p as Arc<dyn LlmProvider>),
            groq.map(|p| p as Arc<dyn LlmProvider>),
            Arc::new(tools),
            guardrail,
        );
        router(state, "static")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_configured_providers() {
        let (status, body) = send(app(Some(mock("gemini", "gemini-2.5-flash")), None, None), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["gemini_configured"], true);
        assert_eq!(body["groq_configured"], false);
    }

    #[tokio::test]
    async fn test_status_pings_configured_providers() {
        let (status, body) = send(app(Some(mock("gemini", "gemini-2.5-flash")), None, None), get("/api/status")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gemini"], true);
        assert_eq!(body["groq"], false);
        assert!(body["timestamp"].is_string());
        assert!(body.get("gemini_error").is_none());
        assert!(body.get("groq_error").is_none());
    }

    #[tokio::test]
    async fn test_chat_requires_query() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        let (status, body) = send(app(Some(gemini.clone()), None, None), post_json("/api/chat", &json!({"query": "   "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "query is required");
        assert_eq!(gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_malformed_body_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(None, None, None), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_chat_mistyped_field_names_the_problem() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        let (status, body) = send(
            app(Some(gemini.clone()), None, None),
            post_json("/api/chat", &json!({"query": "Best SUV?", "force_groq": "true"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BODY");
        assert!(body["error"].as_str().unwrap().contains("force_groq"));
        assert_eq!(gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_returns_answer_and_tool_log() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        gemini.queue_response(ProviderResponse::ToolCalls(vec![ToolCall::new(
            "get_fuel_price",
            json!({"city": "Pune"}).as_object().cloned().unwrap(),
        )]));
        gemini.queue_response(ProviderResponse::FinalText("Petrol is ₹104.21 in Pune.".into()));

        let (status, body) = send(
            app(Some(gemini), None, None),
            post_json("/api/chat", &json!({"query": "Petrol price in Pune?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Petrol is ₹104.21 in Pune.");
        assert_eq!(body["provider"], "gemini");
        assert_eq!(body["model"], "gemini-2.5-flash");
        assert_eq!(body["fallback_used"], false);
        assert_eq!(body["tool_log"], json!([{"step": 1, "tool": "get_fuel_price", "args": {"city": "Pune"}}]));
        assert!(body["elapsed_seconds"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_chat_falls_back_on_quota_error() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        gemini.queue_error("429 RESOURCE_EXHAUSTED: Quota exceeded");
        let groq = mock("groq", "llama-3.3-70b-versatile");
        groq.queue_response(ProviderResponse::FinalText("Try the Punch.".into()));

        let (status, body) = send(
            app(Some(gemini), Some(groq), None),
            post_json("/api/chat", &json!({"query": "Cheapest Tata?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "groq");
        assert_eq!(body["fallback_used"], true);
    }

    #[tokio::test]
    async fn test_chat_force_groq_skips_gemini() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        let groq = mock("groq", "llama-3.3-70b-versatile");
        groq.queue_response(ProviderResponse::FinalText("Nexon.".into()));

        let (status, body) = send(
            app(Some(gemini.clone()), Some(groq), None),
            post_json("/api/chat", &json!({"query": "Best SUV?", "force_groq": true})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "groq");
        assert_eq!(body["fallback_used"], false);
        assert_eq!(gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_500() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        gemini.queue_error("500 INTERNAL: backend error");

        let (status, body) = send(
            app(Some(gemini), None, None),
            post_json("/api/chat", &json!({"query": "Best SUV?"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["provider"], "gemini");
        assert!(body["error"].as_str().unwrap().contains("backend error"));
    }

    #[tokio::test]
    async fn test_chat_without_providers_is_500() {
        let (status, body) = send(app(None, None, None), post_json("/api/chat", &json!({"query": "Hi"}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No AI provider available");
        assert_eq!(body["provider"], "none");
    }

    #[tokio::test]
    async fn test_chat_guardrail_refuses_out_of_scope() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        let (status, body) = send(
            app(Some(gemini.clone()), None, Some(Guardrail::default())),
            post_json("/api/chat", &json!({"query": "Is the Hyundai Creta better?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], car_advisor::guardrail::REFUSAL);
        assert_eq!(gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_filter_bypasses_the_llm() {
        let gemini = mock("gemini", "gemini-2.5-flash");
        let (status, body) = send(
            app(Some(gemini.clone()), None, None),
            post_json("/api/filter", &json!({"budget_min": 10, "budget_max": 16, "fuel": "Petrol", "seats": 4})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_matches"], 4);
        assert_eq!(body["matching_cars"][0]["name"], "Tata Tigor");
        assert_eq!(gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_filter_bad_field_is_400_not_a_default_search() {
        let (status, body) = send(
            app(None, None, None),
            post_json("/api/filter", &json!({"budget_max": 12, "seats": "abc"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BODY");
        assert!(body.get("matching_cars").is_none());
    }

    #[tokio::test]
    async fn test_filter_defaults_list_the_catalogue() {
        let (status, body) = send(app(None, None, None), post_json("/api/filter", &json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["search_criteria"]["fuel"], "any");
        assert_eq!(body["total_matches"], car_advisor::catalog::cars().len());
    }
}

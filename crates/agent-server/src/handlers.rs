//! HTTP Handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use agent_core::{LlmProvider, ToolLogEntry};
use car_advisor::svckit::{CarSearch, SearchResults};

use crate::state::AppState;

/// Provider errors in `/api/status` are cut to this many characters
const STATUS_ERROR_CHARS: usize = 100;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gemini_configured: bool,
    pub groq_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub gemini: bool,
    pub groq: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub force_groq: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub tool_log: Vec<ToolLogEntry>,
    pub model: String,
    pub provider: String,
    pub fallback_used: bool,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub budget_min: Decimal,
    #[serde(default = "default_budget_max")]
    pub budget_max: Decimal,
    #[serde(default = "default_fuel")]
    pub fuel: String,
    #[serde(default = "default_seats", deserialize_with = "car_advisor::args::whole_number")]
    pub seats: u8,
}

impl From<FilterRequest> for CarSearch {
    fn from(req: FilterRequest) -> Self {
        Self::new(req.budget_min, req.budget_max)
            .fuel(req.fuel)
            .min_seats(req.seats)
    }
}

const fn default_budget_max() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_fuel() -> String {
    car_advisor::svckit::car_filter::ANY_FUEL.into()
}

const fn default_seats() -> u8 {
    car_advisor::svckit::car_filter::DEFAULT_MIN_SEATS
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            provider: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 400 carrying the extractor's explanation of what was wrong with the body
fn bad_body(rejection: &JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(rejection.body_text(), "INVALID_BODY")),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness and configuration summary (no provider calls)
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gemini_configured: state.gemini.is_some(),
        groq_configured: state.groq.is_some(),
    })
}

/// Ping each configured provider with a minimal request
pub async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let (gemini, groq) = tokio::join!(ping(state.gemini.as_ref()), ping(state.groq.as_ref()));

    Json(StatusResponse {
        gemini: gemini.is_ok(),
        groq: groq.is_ok(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        gemini_error: gemini.err().flatten(),
        groq_error: groq.err().flatten(),
    })
}

/// `Ok` when the provider answered; `Err(None)` when it is not configured
async fn ping(provider: Option<&Arc<dyn LlmProvider>>) -> Result<(), Option<String>> {
    let Some(provider) = provider else {
        return Err(None);
    };
    match provider.health_check().await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Some(format!("{} health check failed", provider.id()))),
        Err(e) => {
            tracing::warn!(provider = provider.id(), error = %e, "status ping failed");
            Err(Some(e.to_string().chars().take(STATUS_ERROR_CHARS).collect()))
        }
    }
}

/// Run the agent loop with quota fallback
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(&rejection).into_response(),
    };
    let query = request.query.trim();

    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("query is required", "EMPTY_QUERY")),
        )
            .into_response();
    }

    if let Some(guardrail) = &state.guardrail {
        if let Err(refusal) = guardrail.check(query) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(refusal.message, "OUT_OF_SCOPE")),
            )
                .into_response();
        }
    }

    let started = Instant::now();
    let result = state.orchestrator.run(query, request.force_groq).await;
    let elapsed_seconds = (started.elapsed().as_secs_f64() * 10.0).round() / 10.0;

    if let Some(error) = result.error {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error,
                code: "AGENT_ERROR",
                provider: Some(result.provider_id),
            }),
        )
            .into_response();
    }

    tracing::info!(
        provider = %result.provider_id,
        fallback_used = result.fallback_used,
        tools = result.tool_log.len(),
        elapsed_seconds,
        "chat answered"
    );

    Json(ChatResponse {
        answer: result.answer,
        tool_log: result.tool_log,
        model: result.model_id,
        provider: result.provider_id,
        fallback_used: result.fallback_used,
        elapsed_seconds,
    })
    .into_response()
}

/// Deterministic car search, no LLM involved
pub async fn filter_handler(
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Json(request) = payload.map_err(|rejection| bad_body(&rejection))?;
    Ok(Json(CarSearch::from(request).run()))
}

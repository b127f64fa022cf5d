//! Tata Car Advisor HTTP Server
//!
//! Axum-based server exposing the advisor agent (Gemini first, Groq on
//! quota exhaustion), a deterministic car search and the static web UI.

mod config;
mod handlers;
mod routes;
mod state;

use agent_core::LlmProvider;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let state = AppState::from_config(&config)?;

    match &state.gemini {
        Some(p) => tracing::info!("✓ Gemini configured ({})", p.model()),
        None => tracing::warn!("⚠ GEMINI_API_KEY not set - Gemini disabled"),
    }
    match &state.groq {
        Some(p) => tracing::info!("✓ Groq configured ({})", p.model()),
        None => tracing::warn!("⚠ GROQ_API_KEY not set - Groq disabled"),
    }
    if !state.orchestrator.has_provider() {
        tracing::warn!("⚠ No AI provider configured - /api/chat will fail, /api/filter still works");
    }
    if state.guardrail.is_some() {
        tracing::info!("✓ Scope guardrail enabled");
    }

    if let Some(agent) = state.orchestrator.primary().or_else(|| state.orchestrator.secondary()) {
        tracing::info!("Registered {} tools:", agent.tools().len());
        for name in agent.tools().names() {
            tracing::info!("  • {}", name);
        }
    }

    let app = routes::router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚗 Tata Car Advisor running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /api/status  - Ping Gemini and Groq");
    tracing::info!("  POST /api/chat    - Ask the advisor");
    tracing::info!("  POST /api/filter  - Search cars without AI");

    axum::serve(listener, app).await?;

    Ok(())
}

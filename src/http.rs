//! HTTP transport for decision-helper
//!
//! Axum router with two static pages and two JSON endpoints. The JSON endpoints never
//! report a model failure to the browser; they always answer 200 with either model
//! output or a fallback payload.

use axum::{
    Json, Router,
    extract::{Request, State, rejection::JsonRejection},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::{ChatCompletionsClient, ChatModel};
use crate::config::Config;
use crate::decision::{FactorExtractor, RecommendationGenerator};
use crate::error::Result;
use crate::prompts::PromptRegistry;
use crate::schemas::{
    FactorsRequest, FactorsResponse, RecommendationRequest, RecommendationResponse,
};

const INDEX_HTML: &str = include_str!("../templates/index.html");
const RECENTS_HTML: &str = include_str!("../templates/recents.html");

/// Shared, read-only state for every request
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub factors: FactorExtractor,
    pub recommender: RecommendationGenerator,
}

impl HttpState {
    /// Build state around any chat model implementation
    pub fn new(config: Arc<Config>, model: Arc<dyn ChatModel>) -> Result<Self> {
        let prompts = PromptRegistry::new();
        Ok(Self {
            factors: FactorExtractor::new(model.clone(), &prompts)?,
            recommender: RecommendationGenerator::new(model, &prompts)?,
            config,
        })
    }

    /// Build state with the configured chat-completions API
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let client = ChatCompletionsClient::new(&config.model)?;
        Self::new(config, Arc::new(client))
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Past sessions live in the browser's localStorage; the server only ships the page.
pub async fn recents_handler() -> Html<&'static str> {
    Html(RECENTS_HTML)
}

pub async fn get_factors_handler(
    State(state): State<HttpState>,
    payload: std::result::Result<Json<FactorsRequest>, JsonRejection>,
) -> Result<Json<FactorsResponse>> {
    let Json(req) = payload?;
    let factors = state.factors.extract(&req.question).await;
    Ok(Json(FactorsResponse { factors }))
}

pub async fn get_recommendation_handler(
    State(state): State<HttpState>,
    payload: std::result::Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>> {
    let Json(req) = payload?;
    let recommendation = state
        .recommender
        .recommend(&req.question, &req.selections)
        .await;
    Ok(Json(RecommendationResponse { recommendation }))
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();
    let resp = next.run(req).await;
    tracing::info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request handled"
    );
    resp
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/recents", get(recents_handler))
        .route("/get_factors", post(get_factors_handler))
        .route("/get_recommendation", post(get_recommendation_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_http_server(config: Arc<Config>) -> Result<()> {
    let bind = config.server.bind;
    let state = HttpState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

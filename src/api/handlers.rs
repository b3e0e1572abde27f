//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde_json::json;

use crate::error::{Result, SearchError};
use crate::models::{
    AnswerRequest, AnswerResponse, AutocompleteRequest, AutocompleteResponse, HealthResponse,
    SearchRequest, SearchResponse, SearchWithAnswerResponse, StatsResponse,
};
use crate::service::SearchService;
use crate::upstream::NO_SESSION;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    /// When the gateway started, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: SearchService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Instant::now(),
        }
    }
}

/// Handler for POST /api/search
pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(SearchError::InvalidRequest(error_msg));
    }

    let response = state.service.search(req.query(), &req.to_options()).await;
    Ok(Json(response))
}

/// Handler for POST /api/answer
///
/// Answers are always generated outside a session.
pub async fn answer_handler(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(SearchError::InvalidRequest(error_msg));
    }

    let options = req.options.clone().filter(|v| !v.is_null()).unwrap_or_else(|| json!({}));
    let answer = state
        .service
        .generate_answer(
            req.query(),
            req.query_id.as_deref().unwrap_or_default(),
            NO_SESSION,
            &options,
            req.search_results.as_deref(),
        )
        .await;
    Ok(Json(answer))
}

/// Handler for POST /api/search-with-answer
pub async fn search_with_answer_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchWithAnswerResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(SearchError::InvalidRequest(error_msg));
    }

    let response = state
        .service
        .search_with_answer(req.query(), &req.to_options())
        .await;
    Ok(Json(response))
}

/// Handler for POST /api/autocomplete
///
/// No suggestion source is wired up, so a valid query gets an empty list.
pub async fn autocomplete_handler(
    Json(req): Json<AutocompleteRequest>,
) -> Result<Json<AutocompleteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(SearchError::InvalidRequest(error_msg));
    }

    Ok(Json(AutocompleteResponse::default()))
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        cache: state.service.cache_stats(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Response DTOs for the search gateway API
//!
//! Defines the structure of outgoing HTTP response bodies that are not part
//! of the search/answer contract itself.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{AnswerResponse, SearchResponse};

/// Response body for `POST /api/search-with-answer`
#[derive(Debug, Clone, Serialize)]
pub struct SearchWithAnswerResponse {
    #[serde(flatten)]
    pub search: SearchResponse,
    pub answer: AnswerResponse,
}

/// Response body for `POST /api/autocomplete`
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<String>,
}

/// Response body for the stats endpoint (`GET /api/stats`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Live cache contents
    pub cache: CacheStats,
    /// Seconds since the service started
    pub uptime_seconds: u64,
}

/// Response body for the health endpoint (`GET /health`)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Human-readable description
    pub message: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "OK".to_string(),
            message: "AYAZay Search API is running".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

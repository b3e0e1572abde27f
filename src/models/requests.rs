//! Request DTOs for the search gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{SearchOptions, SearchResult};

/// Message returned when a request has no query text
pub const MISSING_QUERY: &str = "Query parameter is required";

/// Request body for `POST /api/search` and `POST /api/search-with-answer`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub session_id: Option<String>,
    pub facets: Option<Value>,
    pub boost: Option<Value>,
}

impl SearchRequest {
    /// Query text, empty when absent or null
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        missing_query(self.query())
    }

    /// Converts the request into service options, dropping empty values.
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            page_size: self.page_size.filter(|size| *size > 0),
            page_token: non_empty(&self.page_token),
            filter: non_empty(&self.filter),
            order_by: non_empty(&self.order_by),
            session_id: non_empty(&self.session_id),
            facet_specs: self.facets.clone().filter(|v| !v.is_null()),
            boost_specs: self.boost.clone().filter(|v| !v.is_null()),
            ..SearchOptions::default()
        }
    }
}

/// Request body for `POST /api/answer`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerRequest {
    pub query: Option<String>,
    pub query_id: Option<String>,
    pub session_id: Option<String>,
    pub options: Option<Value>,
    pub search_results: Option<Vec<SearchResult>>,
}

impl AnswerRequest {
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        missing_query(self.query())
    }
}

/// Request body for `POST /api/autocomplete`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AutocompleteRequest {
    pub query: Option<String>,
}

impl AutocompleteRequest {
    pub fn validate(&self) -> Option<String> {
        missing_query(self.query.as_deref().unwrap_or_default())
    }
}

fn missing_query(query: &str) -> Option<String> {
    query.trim().is_empty().then(|| MISSING_QUERY.to_string())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

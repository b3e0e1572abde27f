//! Search contract types
//!
//! The stable shape returned to clients whether results are live, cached or
//! synthesized from the sample catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single product hit.
///
/// Also accepted back from clients (the answer endpoint takes previously
/// surfaced results), so every field tolerates absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub extractive_answers: Vec<Value>,
    pub relevance_score: f64,
    pub price: String,
    pub image: String,
    pub availability: String,
    pub brand: String,
    pub category: String,
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_size: u64,
    pub attribution_token: String,
    pub next_page_token: Option<String>,
    pub corrected_query: Option<String>,
    pub query_id: String,
    pub session_id: String,
}

/// Caller-supplied search options.
///
/// Serialized as part of the response cache key, so unset fields are skipped
/// and field order is fixed by this declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_specs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_specs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_expansion_spec: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_correction_spec: Option<Value>,
}

impl SearchOptions {
    /// Options with only a page size set.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_tolerates_missing_fields() {
        let result: SearchResult =
            serde_json::from_str(r#"{"title": "Navy Blue Formal Shirt", "link": "https://x/3"}"#).unwrap();
        assert_eq!(result.title, "Navy Blue Formal Shirt");
        assert!(result.brand.is_empty());
        assert_eq!(result.relevance_score, 0.0);
    }

    #[test]
    fn test_search_response_serializes_camel_case() {
        let json = serde_json::to_value(SearchResponse::default()).unwrap();
        assert_eq!(json["totalSize"], 0);
        assert!(json["nextPageToken"].is_null());
        assert!(json.get("sessionId").is_some());
    }

    #[test]
    fn test_options_skip_unset_fields() {
        let json = serde_json::to_string(&SearchOptions::with_page_size(5)).unwrap();
        assert_eq!(json, r#"{"pageSize":5}"#);
    }
}

//! Retrieval service URLs and request bodies

use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::models::SearchOptions;

/// Session id meaning "no session"
pub const NO_SESSION: &str = "-";

/// Serving config methods
pub const SEARCH_METHOD: &str = "search";
pub const ANSWER_METHOD: &str = "answer";

/// Full URL of a serving config method, e.g. `...:search`.
pub fn endpoint_url(config: &Config, method: &str) -> String {
    format!(
        "{}/{}:{method}",
        config.discovery_base_url,
        config.serving_config_path()
    )
}

/// Session resource name, or None for an empty or placeholder session id.
pub fn session_path(config: &Config, session_id: &str) -> Option<String> {
    if session_id.is_empty() || session_id == NO_SESSION {
        return None;
    }
    Some(format!("{}/sessions/{session_id}", config.engine_path()))
}

/// Body of a `:search` call. Caller options win over configured defaults.
pub fn search_body(config: &Config, query: &str, options: &SearchOptions) -> Value {
    let mut body = json!({
        "query": query,
        "pageSize": options.page_size.unwrap_or(config.default_page_size),
        "queryExpansionSpec": options
            .query_expansion_spec
            .clone()
            .unwrap_or_else(|| json!({ "condition": "AUTO" })),
        "spellCorrectionSpec": options
            .spell_correction_spec
            .clone()
            .unwrap_or_else(|| json!({ "mode": "AUTO" })),
        "languageCode": options
            .language_code
            .clone()
            .unwrap_or_else(|| config.language_code.clone()),
        "userInfo": options
            .user_info
            .clone()
            .unwrap_or_else(|| json!({ "timeZone": config.time_zone })),
    });

    if let Some(session) = options
        .session_id
        .as_deref()
        .and_then(|id| session_path(config, id))
    {
        body["session"] = json!(session);
    }
    if let Some(page_token) = &options.page_token {
        body["pageToken"] = json!(page_token);
    }
    if let Some(filter) = &options.filter {
        body["filter"] = json!(filter);
    }
    if let Some(order_by) = &options.order_by {
        body["orderBy"] = json!(order_by);
    }
    if let Some(facet_specs) = &options.facet_specs {
        body["facetSpecs"] = facet_specs.clone();
    }
    if let Some(boost_specs) = &options.boost_specs {
        body["boostSpecs"] = boost_specs.clone();
    }
    body
}

/// Body of an `:answer` call.
///
/// The answer-generation defaults are merged in first, then the caller's
/// options, so a caller key replaces the whole default value for that key.
pub fn answer_body(
    config: &Config,
    query: &str,
    query_id: &str,
    session_id: &str,
    options: &Value,
) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), json!({ "text": query, "queryId": query_id }));
    if let Some(session) = session_path(config, session_id) {
        body.insert("session".to_string(), json!(session));
    }
    merge_top_level(&mut body, config.answer_generation_defaults());
    merge_top_level(&mut body, options.clone());
    Value::Object(body)
}

fn merge_top_level(target: &mut Map<String, Value>, source: Value) {
    if let Value::Object(source) = source {
        target.extend(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let config = Config::default();
        assert_eq!(
            endpoint_url(&config, SEARCH_METHOD),
            "https://discoveryengine.googleapis.com/v1alpha/projects/254558078304/locations/global/collections/default_collection/engines/ayazay_1747988653972/servingConfigs/default_search:search"
        );
        assert!(endpoint_url(&config, ANSWER_METHOD).ends_with("/servingConfigs/default_search:answer"));
    }

    #[test]
    fn test_session_path_skips_placeholder() {
        let config = Config::default();
        assert_eq!(session_path(&config, ""), None);
        assert_eq!(session_path(&config, NO_SESSION), None);
        assert!(session_path(&config, "123")
            .unwrap()
            .ends_with("/engines/ayazay_1747988653972/sessions/123"));
    }

    #[test]
    fn test_search_body_defaults() {
        let body = search_body(&Config::default(), "blue shirt", &SearchOptions::default());

        assert_eq!(body["query"], "blue shirt");
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["queryExpansionSpec"]["condition"], "AUTO");
        assert_eq!(body["spellCorrectionSpec"]["mode"], "AUTO");
        assert_eq!(body["languageCode"], "en-US");
        assert_eq!(body["userInfo"]["timeZone"], "Asia/Rangoon");
        assert!(body.get("session").is_none());
        assert!(body.get("filter").is_none());
    }

    #[test]
    fn test_search_body_with_options() {
        let options = SearchOptions {
            page_size: Some(5),
            page_token: Some("next".to_string()),
            filter: Some("brand: ANY(\"AYAZay\")".to_string()),
            session_id: Some("abc".to_string()),
            facet_specs: Some(json!([{ "facetKey": { "key": "category" } }])),
            ..SearchOptions::default()
        };

        let body = search_body(&Config::default(), "shirt", &options);

        assert_eq!(body["pageSize"], 5);
        assert_eq!(body["pageToken"], "next");
        assert_eq!(body["filter"], "brand: ANY(\"AYAZay\")");
        assert!(body["session"].as_str().unwrap().ends_with("/sessions/abc"));
        assert_eq!(body["facetSpecs"][0]["facetKey"]["key"], "category");
        assert!(body.get("boostSpecs").is_none());
    }

    #[test]
    fn test_answer_body_merges_options_over_defaults() {
        let options = json!({ "relatedQuestionsSpec": { "enable": false } });

        let body = answer_body(&Config::default(), "blue shirt", "q-1", NO_SESSION, &options);

        assert_eq!(body["query"]["text"], "blue shirt");
        assert_eq!(body["query"]["queryId"], "q-1");
        assert!(body.get("session").is_none());
        assert_eq!(body["relatedQuestionsSpec"]["enable"], false);
        assert_eq!(body["answerGenerationSpec"]["includeCitations"], true);
    }

    #[test]
    fn test_answer_body_with_session() {
        let body = answer_body(&Config::default(), "shirt", "", "s-9", &json!({}));
        assert!(body["session"].as_str().unwrap().ends_with("/sessions/s-9"));
    }
}

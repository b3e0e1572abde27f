//! Configuration Module
//!
//! Handles loading gateway configuration from environment variables, and
//! builds the default request specs sent to the retrieval service.

use std::env;
use std::str::FromStr;

use serde_json::{json, Value};

const DEFAULT_PROJECT_ID: &str = "254558078304";
const DEFAULT_LOCATION: &str = "global";
const DEFAULT_COLLECTION_ID: &str = "default_collection";
const DEFAULT_ENGINE_ID: &str = "ayazay_1747988653972";
const DEFAULT_SERVING_CONFIG_ID: &str = "default_search";
const DEFAULT_DISCOVERY_BASE_URL: &str = "https://discoveryengine.googleapis.com/v1alpha";
const DEFAULT_PRODUCT_BASE_URL: &str = "https://ayazay.com/products";

const ANSWER_MODEL_VERSION: &str = "gemini-2.0-flash-001/answer_gen/v1";
const ANSWER_PREAMBLE: &str = "Generate a final answer as a helpful and friendly assistant.
Use only the relevant information from the search results.
Don't add any new or unrelated information.
Use the exact words from the search results when possible.
Keep the response friendly, simple, and under 20 sentences.
Always say \"product\", not \"product stock\".
Always refer to the platform as \"AYAZay\".
Avoid showing technical IDs like product_stock_id.
Do not show \"* **\" in the response.
";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub location: String,
    pub collection_id: String,
    pub engine_id: String,
    pub serving_config_id: String,
    /// HTTP server port
    pub server_port: u16,
    /// Root of the retrieval service API, without a trailing slash
    pub discovery_base_url: String,
    /// Fixed bearer token; when unset the metadata server is asked instead
    pub access_token: Option<String>,
    /// TTL in seconds for shaped search and answer responses
    pub response_cache_ttl: u64,
    /// TTL in seconds for the upstream access token
    pub token_cache_ttl: u64,
    pub default_page_size: u32,
    pub language_code: String,
    pub time_zone: String,
    /// Product links are built as `<product_base_url>/<product id>`
    pub product_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PROJECT_ID`, `LOCATION`, `COLLECTION_ID`, `ENGINE_ID`,
    ///   `SERVING_CONFIG_ID` - Serving config coordinates
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `DISCOVERY_BASE_URL` - Retrieval service root
    /// - `ACCESS_TOKEN` - Fixed bearer token (default: metadata server)
    /// - `RESPONSE_CACHE_TTL` - Response TTL in seconds (default: 300)
    /// - `TOKEN_CACHE_TTL` - Token TTL in seconds (default: 3300)
    /// - `DEFAULT_PAGE_SIZE` - Results per page (default: 10)
    /// - `LANGUAGE_CODE` - Search language (default: en-US)
    /// - `TIME_ZONE` - Caller time zone (default: Asia/Rangoon)
    /// - `PRODUCT_BASE_URL` - Product link prefix
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            project_id: string_var("PROJECT_ID", defaults.project_id),
            location: string_var("LOCATION", defaults.location),
            collection_id: string_var("COLLECTION_ID", defaults.collection_id),
            engine_id: string_var("ENGINE_ID", defaults.engine_id),
            serving_config_id: string_var("SERVING_CONFIG_ID", defaults.serving_config_id),
            server_port: parsed_var("PORT", defaults.server_port),
            discovery_base_url: string_var("DISCOVERY_BASE_URL", defaults.discovery_base_url)
                .trim_end_matches('/')
                .to_string(),
            access_token: env::var("ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            response_cache_ttl: parsed_var("RESPONSE_CACHE_TTL", defaults.response_cache_ttl),
            token_cache_ttl: parsed_var("TOKEN_CACHE_TTL", defaults.token_cache_ttl),
            default_page_size: parsed_var("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            language_code: string_var("LANGUAGE_CODE", defaults.language_code),
            time_zone: string_var("TIME_ZONE", defaults.time_zone),
            product_base_url: string_var("PRODUCT_BASE_URL", defaults.product_base_url)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Resource path of the engine, shared by serving configs and sessions.
    pub fn engine_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/collections/{}/engines/{}",
            self.project_id, self.location, self.collection_id, self.engine_id
        )
    }

    /// Resource path of the serving config queried for search and answers.
    pub fn serving_config_path(&self) -> String {
        format!("{}/servingConfigs/{}", self.engine_path(), self.serving_config_id)
    }

    /// Default specs merged into every answer request before caller options.
    pub fn answer_generation_defaults(&self) -> Value {
        json!({
            "relatedQuestionsSpec": { "enable": true },
            "answerGenerationSpec": {
                "ignoreAdversarialQuery": false,
                "ignoreNonAnswerSeekingQuery": false,
                "ignoreLowRelevantContent": false,
                "multimodalSpec": {},
                "includeCitations": true,
                "promptSpec": { "preamble": ANSWER_PREAMBLE },
                "modelSpec": { "modelVersion": ANSWER_MODEL_VERSION }
            }
        })
    }
}

fn string_var(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            engine_id: DEFAULT_ENGINE_ID.to_string(),
            serving_config_id: DEFAULT_SERVING_CONFIG_ID.to_string(),
            server_port: 3000,
            discovery_base_url: DEFAULT_DISCOVERY_BASE_URL.to_string(),
            access_token: None,
            response_cache_ttl: 300,
            token_cache_ttl: 3300,
            default_page_size: 10,
            language_code: "en-US".to_string(),
            time_zone: "Asia/Rangoon".to_string(),
            product_base_url: DEFAULT_PRODUCT_BASE_URL.to_string(),
        }
    }
}

//! Search Service
//!
//! Orchestrates token caching, response memoization and upstream calls.
//! Neither `search` nor `generate_answer` fails: any upstream problem is
//! logged and answered with sample data, which is not cached.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ExpiringCache, AUTH_TOKEN_KEY};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::models::{AnswerResponse, SearchOptions, SearchResponse, SearchResult, SearchWithAnswerResponse};
use crate::shaper::{format_answer_response, format_search_response, mock_answer, mock_search_results};
use crate::upstream::request::{self, ANSWER_METHOD, SEARCH_METHOD};
use crate::upstream::{CredentialProvider, Transport, NO_SESSION};

/// Initial answers shorter than this (in characters) are regenerated with
/// the search results once they are known
const REFINE_BELOW_CHARS: usize = 100;

/// Anything the service keeps in its cache.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CachedValue {
    Token(String),
    Search(SearchResponse),
    Answer(AnswerResponse),
}

/// Cache key for a search: the query and options as stable JSON.
pub fn search_cache_key(query: &str, options: &SearchOptions) -> String {
    format!("search_{}", json!({ "query": query, "options": options }))
}

/// Cache key for an answer. Supplied search results are not part of it.
pub fn answer_cache_key(query: &str, query_id: &str, options: &Value) -> String {
    format!(
        "answer_{}",
        json!({ "query": query, "queryId": query_id, "options": options })
    )
}

/// Search and answer facade over the retrieval service.
#[derive(Clone)]
pub struct SearchService {
    config: Arc<Config>,
    cache: ExpiringCache<CachedValue>,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn Transport>,
}

impl SearchService {
    pub fn new(
        config: Config,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            cache: ExpiringCache::new(),
            credentials,
            transport,
        }
    }

    /// Returns the upstream access token, fetching it only when the cached
    /// one has expired.
    pub async fn auth_token(&self) -> Result<String> {
        if let Some(CachedValue::Token(token)) = self.cache.get(AUTH_TOKEN_KEY) {
            debug!("Using cached auth token");
            return Ok(token);
        }

        info!("Fetching new auth token");
        let token = self.credentials.access_token().await?;
        self.cache.set(
            AUTH_TOKEN_KEY,
            CachedValue::Token(token.clone()),
            self.config.token_cache_ttl,
        );
        Ok(token)
    }

    /// Searches the catalog, serving repeated requests from the cache.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        let key = search_cache_key(query, options);
        if let Some(CachedValue::Search(cached)) = self.cache.get(&key) {
            info!(query = query, "Returning cached search results");
            return cached;
        }

        match self.fetch_search(query, options).await {
            Ok(response) => {
                self.cache.set(
                    key,
                    CachedValue::Search(response.clone()),
                    self.config.response_cache_ttl,
                );
                response
            }
            Err(err) => {
                warn!(query = query, error = %err, "Search failed, returning sample results");
                let page_size = options.page_size.unwrap_or(self.config.default_page_size);
                mock_search_results(query, page_size as usize)
            }
        }
    }

    async fn fetch_search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let token = self.auth_token().await?;
        let url = request::endpoint_url(&self.config, SEARCH_METHOD);
        let body = request::search_body(&self.config, query, options);

        let data = self.post(&url, &token, &body).await?;
        Ok(format_search_response(&data, query, &self.config.product_base_url))
    }

    /// Generates an answer, annotating mentions of `search_results`.
    pub async fn generate_answer(
        &self,
        query: &str,
        query_id: &str,
        session_id: &str,
        options: &Value,
        search_results: Option<&[SearchResult]>,
    ) -> AnswerResponse {
        let key = answer_cache_key(query, query_id, options);
        if let Some(CachedValue::Answer(cached)) = self.cache.get(&key) {
            info!(query = query, "Returning cached answer");
            return cached;
        }

        match self
            .fetch_answer(query, query_id, session_id, options, search_results)
            .await
        {
            Ok(answer) => {
                self.cache.set(
                    key,
                    CachedValue::Answer(answer.clone()),
                    self.config.response_cache_ttl,
                );
                answer
            }
            Err(err) => {
                warn!(query = query, error = %err, "Answer generation failed, returning sample answer");
                mock_answer(query, search_results)
            }
        }
    }

    async fn fetch_answer(
        &self,
        query: &str,
        query_id: &str,
        session_id: &str,
        options: &Value,
        search_results: Option<&[SearchResult]>,
    ) -> Result<AnswerResponse> {
        let token = self.auth_token().await?;
        let url = request::endpoint_url(&self.config, ANSWER_METHOD);
        let body = request::answer_body(&self.config, query, query_id, session_id, options);

        let data = self.post(&url, &token, &body).await?;
        Ok(format_answer_response(&data, search_results))
    }

    /// Runs a search and an initial answer concurrently.
    ///
    /// When the search yields a query id and results but the initial answer
    /// is short, a second answer is generated against those results.
    pub async fn search_with_answer(&self, query: &str, options: &SearchOptions) -> SearchWithAnswerResponse {
        let no_options = json!({});
        let (search, initial) = tokio::join!(
            self.search(query, options),
            self.generate_answer(query, "", NO_SESSION, &no_options, None),
        );

        let refine = !search.query_id.is_empty()
            && !search.results.is_empty()
            && initial.answer_text.chars().count() < REFINE_BELOW_CHARS;

        let answer = if refine {
            debug!(query = query, query_id = %search.query_id, "Refining answer with search results");
            self.generate_answer(
                query,
                &search.query_id,
                NO_SESSION,
                &no_options,
                Some(search.results.as_slice()),
            )
            .await
        } else {
            initial
        };

        SearchWithAnswerResponse { search, answer }
    }

    /// Live cache contents.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn post(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        let response = self.transport.post_json(url, token, body).await?;
        if !response.is_ok() {
            return Err(SearchError::Upstream {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }
}

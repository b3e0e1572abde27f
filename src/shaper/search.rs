//! Search response shaping
//!
//! Maps a raw retrieval-service search payload onto [`SearchResponse`]. Every
//! attribute has its own fallback chain; a missing or mistyped field only
//! ever drops that attribute to its default.

use serde_json::Value;
use tracing::debug;

use crate::models::{SearchResponse, SearchResult};
use crate::shaper::fixtures::{
    SAMPLE_ATTRIBUTION_TOKEN, SAMPLE_PRODUCTS, SAMPLE_QUERY_ID, SAMPLE_RELEVANCE_SCORE,
};

/// Page size used when neither the caller nor configuration supplies one
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const DEFAULT_TITLE: &str = "Product Item";
pub const DEFAULT_SNIPPET: &str = "Product description not available";
pub const DEFAULT_BRAND: &str = "AYAZay";
pub const DEFAULT_AVAILABILITY: &str = "Available";
pub const DEFAULT_CURRENCY: &str = "MMK";

/// Placeholder the retrieval service puts in snippets when it has none
pub const NO_SNIPPET_SENTINEL: &str = "No snippet is available for this page.";

// == Format ==
/// Shapes a raw search payload.
///
/// A payload without results yields the sample catalog for `query`.
pub fn format_search_response(data: &Value, query: &str, product_base_url: &str) -> SearchResponse {
    let raw_results = match data.get("results").and_then(Value::as_array) {
        Some(results) if !results.is_empty() => results,
        _ => return mock_search_results(query, DEFAULT_PAGE_SIZE),
    };

    let results = raw_results
        .iter()
        .map(|result| format_result(result, product_base_url))
        .collect();

    SearchResponse {
        results,
        total_size: data.get("totalSize").and_then(as_count).unwrap_or(0),
        attribution_token: text(data.get("attributionToken")).unwrap_or_default(),
        next_page_token: text(data.get("nextPageToken")),
        corrected_query: text(data.get("correctedQuery")),
        query_id: text(data.get("queryId")).unwrap_or_default(),
        session_id: text(data.get("session"))
            .and_then(|session| session.rsplit('/').next().map(str::to_string))
            .unwrap_or_default(),
    }
}

fn format_result(result: &Value, product_base_url: &str) -> SearchResult {
    let empty = Value::Null;
    let document = result.get("document").unwrap_or(&empty);
    let derived = document.get("derivedStructData").unwrap_or(&empty);
    let fields = document.get("structData").unwrap_or(&empty);

    let id = text(result.get("id")).unwrap_or_default();

    let title = first_text([fields.get("product_name"), derived.get("title")])
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let snippet = first_text([
        fields.get("product_description"),
        fields.get("product_details"),
        derived.get("snippet"),
    ])
    .or_else(|| {
        text(derived.pointer("/snippets/0/snippet")).filter(|s| s != NO_SNIPPET_SENTINEL)
    })
    .unwrap_or_else(|| DEFAULT_SNIPPET.to_string());

    let product_id = text(fields.get("product_id")).unwrap_or_else(|| id.clone());

    SearchResult {
        link: format!("{}/{}", product_base_url.trim_end_matches('/'), product_id),
        id,
        title,
        snippet,
        extractive_answers: derived
            .get("extractive_answers")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        relevance_score: result
            .pointer("/modelScores/relevance_score/values/0")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        price: format_price(fields),
        image: first_text([fields.get("product_stock_image"), fields.get("product_image")])
            .unwrap_or_default(),
        availability: text(fields.get("product_stock_name"))
            .unwrap_or_else(|| DEFAULT_AVAILABILITY.to_string()),
        brand: first_text([fields.get("merchant_name"), fields.get("sales_channel")])
            .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        category: text(fields.get("product_category")).unwrap_or_default(),
    }
}

/// `"<currency> <grouped amount>"` for a non-zero numeric price, else empty.
fn format_price(fields: &Value) -> String {
    let amount = match fields.get("product_stock_price") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount.filter(|a| *a != 0.0 && a.is_finite()) {
        Some(amount) => {
            let currency = text(fields.get("product_stock_currency"))
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
            format!("{} {}", currency, group_thousands(amount))
        }
        None => String::new(),
    }
}

/// Formats a number with comma thousands separators and at most three
/// fraction digits, e.g. `25000` → `25,000`, `1234.5` → `1,234.5`.
pub fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

// == Sample Data ==
/// Synthesized response built from the sample catalog.
///
/// Every sample product is a blue shirt, so a query naming the colour (or any
/// other query) is served the whole catalog, trimmed to `page_size`.
pub fn mock_search_results(query: &str, page_size: usize) -> SearchResponse {
    debug!(query = query, "Serving sample catalog");

    let results = SAMPLE_PRODUCTS
        .iter()
        .take(page_size)
        .map(|product| SearchResult {
            id: product.id.to_string(),
            title: product.title.to_string(),
            link: product.link.to_string(),
            snippet: product.snippet.to_string(),
            extractive_answers: Vec::new(),
            relevance_score: SAMPLE_RELEVANCE_SCORE,
            price: product.price.to_string(),
            image: product.image.to_string(),
            availability: product.availability.to_string(),
            brand: product.brand.to_string(),
            category: product.category.to_string(),
        })
        .collect();

    SearchResponse {
        results,
        total_size: SAMPLE_PRODUCTS.len() as u64,
        attribution_token: SAMPLE_ATTRIBUTION_TOKEN.to_string(),
        next_page_token: None,
        corrected_query: None,
        query_id: SAMPLE_QUERY_ID.to_string(),
        session_id: String::new(),
    }
}

// == Field Helpers ==
/// Non-empty string or number as text; anything else counts as absent.
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First candidate that yields text.
pub(crate) fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<String> {
    candidates.into_iter().find_map(text)
}

/// Counts arrive as numbers or as decimal strings (int64 in JSON).
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://ayazay.com/products";

    fn payload(result: Value) -> Value {
        json!({
            "results": [result],
            "totalSize": 1,
            "attributionToken": "attr-1",
            "queryId": "q-1",
            "session": "projects/p/locations/global/collections/c/engines/e/sessions/12345"
        })
    }

    #[test]
    fn test_structured_fields_take_precedence() {
        let data = payload(json!({
            "id": "doc-1",
            "document": {
                "structData": {
                    "product_name": "Classic Blue Cotton Shirt",
                    "product_description": "Premium cotton",
                    "product_stock_price": 25000,
                    "product_stock_image": "https://img/stock.jpg",
                    "product_image": "https://img/product.jpg",
                    "merchant_name": "Yangon Tailors",
                    "product_category": "Shirts",
                    "product_stock_name": "In Stock",
                    "product_id": 77
                },
                "derivedStructData": {"title": "derived title", "snippet": "derived snippet"}
            },
            "modelScores": {"relevance_score": {"values": [0.42]}}
        }));

        let response = format_search_response(&data, "blue shirt", BASE);
        let result = &response.results[0];

        assert_eq!(result.id, "doc-1");
        assert_eq!(result.title, "Classic Blue Cotton Shirt");
        assert_eq!(result.snippet, "Premium cotton");
        assert_eq!(result.price, "MMK 25,000");
        assert_eq!(result.image, "https://img/stock.jpg");
        assert_eq!(result.brand, "Yangon Tailors");
        assert_eq!(result.category, "Shirts");
        assert_eq!(result.availability, "In Stock");
        assert_eq!(result.link, "https://ayazay.com/products/77");
        assert_eq!(result.relevance_score, 0.42);
    }

    #[test]
    fn test_derived_title_used_without_product_name() {
        let data = payload(json!({
            "id": "doc-2",
            "document": {"derivedStructData": {"title": "Blue Denim Work Shirt"}}
        }));

        let response = format_search_response(&data, "denim", BASE);
        assert_eq!(response.results[0].title, "Blue Denim Work Shirt");
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let data = payload(json!({"id": "doc-3"}));

        let result = &format_search_response(&data, "anything", BASE).results[0];
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.snippet, DEFAULT_SNIPPET);
        assert_eq!(result.price, "");
        assert_eq!(result.image, "");
        assert_eq!(result.brand, DEFAULT_BRAND);
        assert_eq!(result.category, "");
        assert_eq!(result.availability, DEFAULT_AVAILABILITY);
        assert_eq!(result.link, "https://ayazay.com/products/doc-3");
        assert_eq!(result.relevance_score, 0.0);
        assert!(result.extractive_answers.is_empty());
    }

    #[test]
    fn test_snippet_fallback_chain() {
        let details = payload(json!({"document": {"structData": {"product_details": "Details text"}}}));
        assert_eq!(format_search_response(&details, "q", BASE).results[0].snippet, "Details text");

        let listed = payload(json!({
            "document": {"derivedStructData": {"snippets": [{"snippet": "From snippets"}]}}
        }));
        assert_eq!(format_search_response(&listed, "q", BASE).results[0].snippet, "From snippets");

        let sentinel = payload(json!({
            "document": {"derivedStructData": {"snippets": [{"snippet": NO_SNIPPET_SENTINEL}]}}
        }));
        assert_eq!(format_search_response(&sentinel, "q", BASE).results[0].snippet, DEFAULT_SNIPPET);
    }

    #[test]
    fn test_empty_strings_fall_through() {
        let data = payload(json!({
            "document": {
                "structData": {"product_name": "", "merchant_name": "", "sales_channel": "Online"},
                "derivedStructData": {"title": "Fallback Title"}
            }
        }));

        let result = &format_search_response(&data, "q", BASE).results[0];
        assert_eq!(result.title, "Fallback Title");
        assert_eq!(result.brand, "Online");
    }

    #[test]
    fn test_price_currency_and_zero() {
        let priced = payload(json!({
            "document": {"structData": {"product_stock_price": 1234.5, "product_stock_currency": "USD"}}
        }));
        assert_eq!(format_search_response(&priced, "q", BASE).results[0].price, "USD 1,234.5");

        let free = payload(json!({"document": {"structData": {"product_stock_price": 0}}}));
        assert_eq!(format_search_response(&free, "q", BASE).results[0].price, "");
    }

    #[test]
    fn test_pass_through_fields() {
        let data = payload(json!({"id": "doc-1"}));
        let response = format_search_response(&data, "q", BASE);

        assert_eq!(response.total_size, 1);
        assert_eq!(response.attribution_token, "attr-1");
        assert_eq!(response.query_id, "q-1");
        assert_eq!(response.session_id, "12345");
        assert_eq!(response.next_page_token, None);
        assert_eq!(response.corrected_query, None);
    }

    #[test]
    fn test_pass_through_defaults() {
        let data = json!({"results": [{"id": "doc-1"}]});
        let response = format_search_response(&data, "q", BASE);

        assert_eq!(response.total_size, 0);
        assert_eq!(response.attribution_token, "");
        assert_eq!(response.query_id, "");
        assert_eq!(response.session_id, "");
    }

    #[test]
    fn test_empty_results_fall_back_to_sample_catalog() {
        let response = format_search_response(&json!({"results": []}), "blue shirt", BASE);

        assert_eq!(response.total_size, SAMPLE_PRODUCTS.len() as u64);
        assert_eq!(response.results.len(), SAMPLE_PRODUCTS.len());
        assert_eq!(response.attribution_token, "mock-token");
        for result in &response.results {
            assert_eq!(result.brand, "AYAZay");
            assert!(result.availability == "In Stock" || result.availability == "Limited Stock");
        }
    }

    #[test]
    fn test_missing_payload_falls_back_to_sample_catalog() {
        let response = format_search_response(&Value::Null, "blue shirt", BASE);
        assert_eq!(response.query_id, "mock-query-id");
    }

    #[test]
    fn test_mock_results_respect_page_size() {
        let response = mock_search_results("blue shirt", 2);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.total_size, 5);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.5), "0.5");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.891), "1,234,567.891");
        assert_eq!(group_thousands(-45000.0), "-45,000");
    }
}

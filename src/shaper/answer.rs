//! Answer response shaping and product annotation
//!
//! Real answers are annotated by locating each surfaced product's title in
//! the text and placing a marker after its first eligible mention. The
//! existing markers and markup are collected once up front (see
//! [`AnnotatedSpans`]), which is what makes re-running the step a no-op.

use std::collections::HashSet;
use std::ops::Range;

use regex::RegexBuilder;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{AnswerResponse, Citation, Reference, SearchResult};
use crate::shaper::fixtures::{
    ANSWER_INTENT, CATALOG_INTRO, CATALOG_OUTRO, GENERIC_ANSWER, LISTED_RESULTS_INTRO,
    LISTED_RESULTS_OUTRO, RELATED_QUESTIONS, SAMPLE_PRODUCTS, SUCCEEDED,
};
use crate::shaper::marker::{overlaps, render_marker, AnnotatedSpans, ProductDetails};
use crate::shaper::search::DEFAULT_SNIPPET;

/// Results listed in a synthesized answer
const MAX_LISTED_RESULTS: usize = 3;
/// Characters of a snippet quoted in a synthesized answer
const SNIPPET_PREVIEW_CHARS: usize = 80;

// == Format ==
/// Shapes a raw answer payload, annotating mentions of `search_results`.
pub fn format_answer_response(data: &Value, search_results: Option<&[SearchResult]>) -> AnswerResponse {
    let empty = Value::Null;
    let answer = data.get("answer").unwrap_or(&empty);

    let mut answer_text = answer
        .get("answerText")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Some(results) = search_results.filter(|results| !results.is_empty()) {
        if !answer_text.is_empty() {
            answer_text = annotate_answer(&answer_text, results);
        }
    }

    let citations = array(answer.get("citations"))
        .iter()
        .map(|citation| Citation {
            start_index: citation.get("startIndex").cloned(),
            end_index: citation.get("endIndex").cloned(),
            sources: array(citation.get("sources")).to_vec(),
        })
        .collect();

    let references = array(answer.get("references"))
        .iter()
        .map(|reference| Reference {
            title: string_at(reference, "/chunkInfo/documentMetadata/title"),
            uri: string_at(reference, "/chunkInfo/documentMetadata/uri"),
            content: string_at(reference, "/chunkInfo/content"),
        })
        .collect();

    let related_questions = array(answer.get("relatedQuestions"))
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    AnswerResponse {
        answer_text,
        citations,
        references,
        related_questions,
        query_understanding_info: data
            .get("queryUnderstandingInfo")
            .filter(|info| !info.is_null())
            .cloned()
            .unwrap_or_else(|| json!({})),
        state: answer
            .get("state")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

fn array(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn string_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// == Annotate ==
/// Places a product marker after the first eligible mention of each product.
///
/// A mention is eligible when it is outside markup and existing markers, does
/// not overlap another annotated title, and is not already followed by a
/// marker. Products whose marker is already present are skipped, and
/// products without a title or link are ignored. Longer titles are placed
/// first so a title contained in another one cannot split it.
pub fn annotate_answer(text: &str, products: &[SearchResult]) -> String {
    let spans = AnnotatedSpans::scan(text);

    let mut seen = HashSet::new();
    let mut candidates: Vec<&SearchResult> = products
        .iter()
        .filter(|product| !product.title.is_empty() && !product.link.is_empty())
        .filter(|product| seen.insert(product.title.to_lowercase()))
        .collect();
    candidates.sort_by(|a, b| b.title.len().cmp(&a.title.len()));

    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut insertions: Vec<(usize, String)> = Vec::new();

    for product in candidates {
        if spans.is_annotated(&product.title) {
            continue;
        }
        if let Some(range) = first_eligible_mention(text, &product.title, &spans, &claimed) {
            insertions.push((range.end, format!(" {}", render_marker(&ProductDetails::from_result(product)))));
            claimed.push(range);
        }
    }

    if insertions.is_empty() {
        return text.to_string();
    }
    debug!("Annotated {} product mentions", insertions.len());

    insertions.sort_by_key(|(position, _)| *position);
    let extra: usize = insertions.iter().map(|(_, marker)| marker.len()).sum();
    let mut annotated = String::with_capacity(text.len() + extra);
    let mut cursor = 0;
    for (position, marker) in insertions {
        annotated.push_str(&text[cursor..position]);
        annotated.push_str(&marker);
        cursor = position;
    }
    annotated.push_str(&text[cursor..]);
    annotated
}

fn first_eligible_mention(
    text: &str,
    title: &str,
    spans: &AnnotatedSpans,
    claimed: &[Range<usize>],
) -> Option<Range<usize>> {
    let pattern = RegexBuilder::new(&regex::escape(title))
        .case_insensitive(true)
        .build()
        .ok()?;

    for found in pattern.find_iter(text) {
        let range = found.range();
        if spans.is_protected(&range) || claimed.iter().any(|c| overlaps(c, &range)) {
            continue;
        }
        match spans.marker_after(text, range.end) {
            // A marker we cannot attribute is taken to be this product's own
            Some(marker) if marker.title.is_none() => return None,
            Some(_) => continue,
            None => return Some(range),
        }
    }
    None
}

// == Sample Answers ==
/// Synthesized answer used when the retrieval service is unavailable.
///
/// Queries matching the sample intent list the first few supplied results,
/// or the sample catalog when none were supplied; anything else gets a
/// generic reply.
pub fn mock_answer(query: &str, search_results: Option<&[SearchResult]>) -> AnswerResponse {
    let results = search_results.unwrap_or_default();

    let answer_text = if !query.to_lowercase().contains(ANSWER_INTENT) {
        GENERIC_ANSWER.to_string()
    } else if results.is_empty() {
        catalog_answer()
    } else {
        listed_results_answer(&results[..results.len().min(MAX_LISTED_RESULTS)])
    };

    AnswerResponse {
        answer_text,
        related_questions: RELATED_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        state: SUCCEEDED.to_string(),
        ..AnswerResponse::default()
    }
}

fn listed_results_answer(results: &[SearchResult]) -> String {
    let mut text = String::from(LISTED_RESULTS_INTRO);

    for product in results {
        text.push_str(&format!("• {} from {}", product.title, product.brand));
        if !product.price.is_empty() {
            text.push_str(&format!(" for {}", product.price));
        }
        if !product.snippet.is_empty() && product.snippet != DEFAULT_SNIPPET {
            let preview: String = product.snippet.chars().take(SNIPPET_PREVIEW_CHARS).collect();
            text.push_str(&format!(". {preview}..."));
        }
        if !product.availability.is_empty() {
            text.push_str(&format!(" This product is available in {}.", product.availability));
        }
        if !product.link.is_empty() {
            text.push(' ');
            text.push_str(&render_marker(&ProductDetails::from_result(product)));
        }
        text.push_str("\n\n");
    }

    text.push_str(LISTED_RESULTS_OUTRO);
    text
}

fn catalog_answer() -> String {
    let mut text = String::from(CATALOG_INTRO);

    for product in SAMPLE_PRODUCTS {
        text.push_str(&format!(
            "• {} ({}) - {} {}\n\n",
            product.title,
            product.price,
            product.summary,
            render_marker(&ProductDetails::from_sample(product))
        ));
    }

    text.push_str(CATALOG_OUTRO);
    text
}

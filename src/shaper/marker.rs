//! Product detail markers
//!
//! A marker is an inline button placed right after a product title in answer
//! text. Its `onclick` carries the product details as JSON with double quotes
//! escaped as `&quot;`, which the presentation layer reads back.
//!
//! [`AnnotatedSpans`] records, in one left-to-right pass, every marker and
//! markup tag already present in a text, along with the title each marker
//! belongs to. Annotation consults it instead of re-scanning the text.

use std::collections::HashSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::models::SearchResult;
use crate::shaper::fixtures::SampleProduct;
use crate::shaper::search::{DEFAULT_AVAILABILITY, DEFAULT_BRAND};

pub const MARKER_OPEN: &str =
    "<button class=\"inline-link-btn\" onclick=\"showProductDetails(this, '";
pub const MARKER_CLOSE: &str = "')\">🔗</button>";

const UNKNOWN_ID: &str = "unknown";
const DEFAULT_PRICE: &str = "Price not available";
const DEFAULT_DESCRIPTION: &str = "Product details available";

// == Product Details ==
/// Payload embedded in a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: String,
    pub description: String,
    pub availability: String,
    pub link: String,
}

impl ProductDetails {
    /// Builds the payload for a search result, filling blanks with defaults.
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            id: or_default(&result.id, UNKNOWN_ID),
            title: result.title.clone(),
            brand: or_default(&result.brand, DEFAULT_BRAND),
            price: or_default(&result.price, DEFAULT_PRICE),
            description: or_default(&result.snippet, DEFAULT_DESCRIPTION),
            availability: or_default(&result.availability, DEFAULT_AVAILABILITY),
            link: result.link.clone(),
        }
    }

    /// Builds the payload for a sample catalog product.
    pub fn from_sample(product: &SampleProduct) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.to_string(),
            brand: product.brand.to_string(),
            price: product.price.to_string(),
            description: product.summary.to_string(),
            availability: product.availability.to_string(),
            link: product.link.to_string(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

// == Rendering ==
/// Renders the marker for `details`.
pub fn render_marker(details: &ProductDetails) -> String {
    let payload = serde_json::to_string(details).unwrap_or_default();
    format!("{MARKER_OPEN}{}{MARKER_CLOSE}", payload.replace('"', "&quot;"))
}

/// Reads the product details back out of a marker payload.
fn parse_payload(payload: &str) -> Option<ProductDetails> {
    serde_json::from_str(&payload.replace("&quot;", "\"")).ok()
}

// == Annotated Spans ==
/// A marker found in existing text.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpan {
    /// Byte range of the whole `<button>...</button>`
    pub range: Range<usize>,
    /// Title from the payload, if it parsed
    pub title: Option<String>,
}

/// Byte ranges of a text that annotation must not touch.
#[derive(Debug, Default)]
pub struct AnnotatedSpans {
    /// Markers in order of appearance
    markers: Vec<MarkerSpan>,
    /// Markup, markers, and the title text each marker annotates
    protected: Vec<Range<usize>>,
    /// Lowercased titles that already carry a marker
    titles: HashSet<String>,
}

impl AnnotatedSpans {
    /// Scans `text` once from left to right.
    pub fn scan(text: &str) -> Self {
        let mut spans = Self::default();
        let mut cursor = 0;

        while let Some(offset) = text[cursor..].find('<') {
            let start = cursor + offset;
            let rest = &text[start..];

            if let Some((payload, len)) = marker_at(rest) {
                spans.record_marker(text, start..start + len, payload);
                cursor = start + len;
            } else if let Some(len) = tag_len(rest) {
                spans.protected.push(start..start + len);
                cursor = start + len;
            } else {
                // A stray `<` is plain text
                cursor = start + 1;
            }
        }

        spans.protected.sort_by_key(|range| range.start);
        spans
    }

    fn record_marker(&mut self, text: &str, range: Range<usize>, payload: &str) {
        let title = parse_payload(payload)
            .map(|details| details.title)
            .filter(|title| !title.is_empty());

        if let Some(title) = &title {
            if let Some(title_range) = title_before(text, range.start, title) {
                self.protected.push(title_range);
            }
            self.titles.insert(title.to_lowercase());
        }

        self.protected.push(range.clone());
        self.markers.push(MarkerSpan { range, title });
    }

    /// Returns true if a marker for `title` is already present.
    pub fn is_annotated(&self, title: &str) -> bool {
        self.titles.contains(&title.to_lowercase())
    }

    /// Returns true if `range` overlaps markup, a marker, or an annotated title.
    pub fn is_protected(&self, range: &Range<usize>) -> bool {
        self.protected.iter().any(|span| overlaps(span, range))
    }

    /// Returns the marker that directly follows byte offset `end`, allowing
    /// only whitespace in between.
    pub fn marker_after(&self, text: &str, end: usize) -> Option<&MarkerSpan> {
        let index = self.markers.partition_point(|marker| marker.range.start < end);
        self.markers
            .get(index)
            .filter(|marker| text[end..marker.range.start].trim().is_empty())
    }

    /// Number of markers found.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

/// Payload and total length of a complete marker at the start of `rest`.
fn marker_at(rest: &str) -> Option<(&str, usize)> {
    let after_open = rest.strip_prefix(MARKER_OPEN)?;
    let close = after_open.find(MARKER_CLOSE)?;
    Some((&after_open[..close], MARKER_OPEN.len() + close + MARKER_CLOSE.len()))
}

/// Length of the tag at the start of `rest`.
///
/// A `<` opens markup only when followed by a tag name, `/` or `!`, and the
/// tag must close with `>` before any further `<`.
fn tag_len(rest: &str) -> Option<usize> {
    let opens_tag = rest[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
    if !opens_tag {
        return None;
    }
    let bound = rest[1..].find(|c| c == '<' || c == '>')? + 1;
    (rest.as_bytes()[bound] == b'>').then_some(bound + 1)
}

/// Finds `title` (case-insensitively) immediately before `marker_start`,
/// ignoring whitespace between the two.
fn title_before(text: &str, marker_start: usize, title: &str) -> Option<Range<usize>> {
    let before = text[..marker_start].trim_end();
    let start = before.len().checked_sub(title.len())?;
    if !before.is_char_boundary(start) {
        return None;
    }
    (before[start..].to_lowercase() == title.to_lowercase()).then(|| start..before.len())
}

pub(crate) fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(title: &str) -> ProductDetails {
        ProductDetails {
            id: "1".to_string(),
            title: title.to_string(),
            brand: "AYAZay".to_string(),
            price: "MMK 25,000".to_string(),
            description: "Premium cotton".to_string(),
            availability: "In Stock".to_string(),
            link: "https://ayazay.com/products/blue-cotton-shirt".to_string(),
        }
    }

    #[test]
    fn test_render_marker_escapes_quotes() {
        let marker = render_marker(&details("Classic Blue Cotton Shirt"));

        assert!(marker.starts_with(MARKER_OPEN));
        assert!(marker.ends_with(MARKER_CLOSE));
        assert!(marker.contains("{&quot;id&quot;:&quot;1&quot;"));
        assert!(!marker[MARKER_OPEN.len()..marker.len() - MARKER_CLOSE.len()].contains('"'));
    }

    #[test]
    fn test_payload_round_trips_through_scan() {
        let text = format!(
            "Try the Classic Blue Cotton Shirt {} today.",
            render_marker(&details("Classic Blue Cotton Shirt"))
        );

        let spans = AnnotatedSpans::scan(&text);
        assert_eq!(spans.marker_count(), 1);
        assert!(spans.is_annotated("classic blue cotton shirt"));
        assert!(!spans.is_annotated("Navy Blue Formal Shirt"));
    }

    #[test]
    fn test_annotated_title_is_protected() {
        let text = format!("Classic Blue Cotton Shirt {}", render_marker(&details("Classic Blue Cotton Shirt")));
        let spans = AnnotatedSpans::scan(&text);

        // "Blue Cotton" inside the annotated title
        assert!(spans.is_protected(&(8..19)));
    }

    #[test]
    fn test_markup_is_protected() {
        let text = "<a href=\"/blue-shirt\">Blue Shirt</a> costs < 30,000";
        let spans = AnnotatedSpans::scan(text);

        assert!(spans.is_protected(&(9..19)));
        assert!(!spans.is_protected(&(22..32)));
        // A bare "<" is not markup
        assert_eq!(spans.protected.len(), 2);
    }

    #[test]
    fn test_marker_after_allows_whitespace_only() {
        let marker = render_marker(&details("Blue Denim Work Shirt"));
        let text = format!("Blue Denim Work Shirt  {marker} and Blue Denim Work Shirt again");
        let spans = AnnotatedSpans::scan(&text);

        assert!(spans.marker_after(&text, 21).is_some());
        let second_end = text.rfind("Shirt").unwrap() + "Shirt".len();
        assert!(spans.marker_after(&text, second_end).is_none());
    }

    #[test]
    fn test_unparseable_marker_has_no_title() {
        let text = format!("Blue Plaid Button-Down {MARKER_OPEN}not json{MARKER_CLOSE}");
        let spans = AnnotatedSpans::scan(&text);

        assert_eq!(spans.marker_count(), 1);
        let marker = spans.marker_after(&text, "Blue Plaid Button-Down".len()).unwrap();
        assert!(marker.title.is_none());
    }

    #[test]
    fn test_stray_angle_bracket_is_plain_text() {
        let marker = render_marker(&details("Classic Blue Cotton Shirt"));
        let text = format!("Sizes S<M fit. Classic Blue Cotton Shirt {marker} is great.");
        let spans = AnnotatedSpans::scan(&text);

        assert_eq!(spans.marker_count(), 1);
        assert!(spans.is_annotated("Classic Blue Cotton Shirt"));
        // "M fit." is not swallowed into a tag
        assert!(!spans.is_protected(&(8..14)));
    }

    #[test]
    fn test_unclosed_tag_does_not_stop_scan() {
        let marker = render_marker(&details("Navy Blue Formal Shirt"));
        let text = format!("a<b Navy Blue Formal Shirt {marker}");
        let spans = AnnotatedSpans::scan(&text);

        assert_eq!(spans.marker_count(), 1);
        assert!(spans.is_annotated("navy blue formal shirt"));
    }

    #[test]
    fn test_unterminated_marker_is_not_recorded() {
        let text = format!("Blue Shirt {MARKER_OPEN}{{}} and more");
        let spans = AnnotatedSpans::scan(&text);

        assert_eq!(spans.marker_count(), 0);
    }

    #[test]
    fn test_from_result_fills_defaults() {
        let result = SearchResult {
            title: "Blue Plaid Button-Down".to_string(),
            link: "https://ayazay.com/products/blue-plaid-shirt".to_string(),
            ..SearchResult::default()
        };

        let details = ProductDetails::from_result(&result);
        assert_eq!(details.id, "unknown");
        assert_eq!(details.brand, "AYAZay");
        assert_eq!(details.price, "Price not available");
        assert_eq!(details.description, "Product details available");
        assert_eq!(details.availability, "Available");
    }
}

//! Response Shaping Module
//!
//! Turns raw retrieval-service payloads into the client contract, annotates
//! answer text with product detail markers, and synthesizes sample responses
//! when the service cannot be reached.

pub mod answer;
pub mod fixtures;
pub mod marker;
pub mod search;


// Re-export public types
pub use answer::{annotate_answer, format_answer_response, mock_answer};
pub use marker::{render_marker, AnnotatedSpans, ProductDetails, MARKER_CLOSE, MARKER_OPEN};
pub use search::{format_search_response, mock_search_results, DEFAULT_PAGE_SIZE};

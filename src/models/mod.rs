//! Request and Response models for the search gateway
//!
//! This module defines the client-facing search/answer contract and the DTOs
//! used for serializing/deserializing HTTP request and response bodies.

pub mod answer;
pub mod requests;
pub mod responses;
pub mod search;

// Re-export commonly used types
pub use answer::{AnswerResponse, Citation, Reference};
pub use requests::{AnswerRequest, AutocompleteRequest, SearchRequest, MISSING_QUERY};
pub use responses::{
    AutocompleteResponse, HealthResponse, SearchWithAnswerResponse, StatsResponse,
};
pub use search::{SearchOptions, SearchResponse, SearchResult};

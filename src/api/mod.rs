//! API Module
//!
//! HTTP handlers and routing for the search gateway REST API.
//!
//! # Endpoints
//! - `POST /api/search` - Search the catalog
//! - `POST /api/answer` - Generate an answer
//! - `POST /api/search-with-answer` - Search and answer in one call
//! - `POST /api/autocomplete` - Query suggestions (always empty)
//! - `GET /api/stats` - Cache statistics and uptime
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

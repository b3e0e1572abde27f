//! AYAZay Search - A product search gateway
//!
//! Forwards search and answer queries to a document-retrieval service,
//! memoizes shaped responses in a TTL cache, and annotates answers with
//! product detail markers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod shaper;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use service::SearchService;

//! Upstream Module
//!
//! Everything needed to talk to the retrieval service: access tokens, the
//! outbound HTTP transport, and request construction.

pub mod credentials;
pub mod request;
pub mod transport;

// Re-export public types
pub use credentials::{CredentialProvider, MetadataTokenProvider, StaticTokenProvider};
pub use request::NO_SESSION;
pub use transport::{HttpTransport, Transport, UpstreamResponse};

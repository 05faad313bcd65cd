//! Locsearch Core - Client binding for the location search endpoint

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Issues `GET api/_search/locations/:id` requests through an injected HTTP
//! transport and decodes the JSON array response into location records.

pub mod client;
pub mod config;
pub mod errors;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{LOCATIONS_SEARCH_PATH, LocationSearchClient};
pub use config::SearchClientConfig;
pub use errors::LocationSearchError;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{Location, LocationRecord, SearchQuery};

/// Convenience type alias for Results with LocationSearchError.
pub type Result<T> = std::result::Result<T, LocationSearchError>;

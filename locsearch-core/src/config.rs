//! Configuration for the location search client.
//!
//! Defaults live here; environment variables can override the values that
//! commonly differ between deployments.

use std::time::Duration;

use url::Url;

use crate::errors::LocationSearchError;

/// Connection settings for the search backend.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Root URL of the application serving `api/_search/...`
    pub base_url: String,
    /// Total time allowed for one request
    pub request_timeout: Duration,
    /// Time allowed to establish the TCP connection
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("locsearch/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 3,
        }
    }
}

impl SearchClientConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("LOCSEARCH_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(timeout) = std::env::var("LOCSEARCH_TIMEOUT_SECS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(timeout) = std::env::var("LOCSEARCH_CONNECT_TIMEOUT_SECS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.connect_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Creates a configuration pointing at `base_url` with short timeouts.
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }

    /// Parses the base URL, appending a trailing slash when missing.
    ///
    /// Without the slash, relative joins would replace the last path segment
    /// of a base such as `http://host/app`.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::InvalidUrl` - If the base URL cannot be parsed
    ///   or cannot serve as a base for relative paths
    pub fn parsed_base_url(&self) -> Result<Url, LocationSearchError> {
        parse_base_url(&self.base_url)
    }
}

/// Parses `raw` as an absolute base URL ending in `/`.
///
/// # Errors
///
/// - `LocationSearchError::InvalidUrl` - If `raw` is not an absolute
///   hierarchical URL
pub fn parse_base_url(raw: &str) -> Result<Url, LocationSearchError> {
    let mut url = Url::parse(raw).map_err(|e| LocationSearchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(LocationSearchError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

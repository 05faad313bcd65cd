//! HTTP transport abstraction for the search client.
//!
//! The client never talks to the network directly. It is handed an
//! [`HttpTransport`] at construction, which keeps status interpretation and
//! decoding in one place and lets tests substitute canned responses.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use crate::config::SearchClientConfig;
use crate::errors::LocationSearchError;

/// Raw response handed back by a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code of the response
    pub status: StatusCode,
    /// Undecoded response body
    pub body: Bytes,
}

/// Capability to perform HTTP GET requests.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Sends a GET request for `url` expecting a JSON body.
    ///
    /// Any response, whatever its status, is returned as `Ok`.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::Transport` - If no response was received
    async fn get(&self, url: Url) -> Result<HttpResponse, LocationSearchError>;
}

/// Production transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with timeouts and user agent from `config`.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::Transport` - If the TLS backend or client
    ///   cannot be initialised
    pub fn new(config: &SearchClientConfig) -> Result<Self, LocationSearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing client, sharing its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: Url) -> Result<HttpResponse, LocationSearchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }
}

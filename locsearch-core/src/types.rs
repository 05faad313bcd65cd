//! Data types for location search requests and results.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::LocationSearchError;

/// Single element of a search response.
///
/// The backend decides the shape of each record, so the payload is kept as
/// raw JSON. Accessors cover the fields the location entity is known to
/// carry; anything else is reachable through [`LocationRecord::as_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRecord(serde_json::Value);

impl LocationRecord {
    /// Wraps an arbitrary JSON value.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Raw JSON payload as returned by the server.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the record, returning the raw JSON payload.
    pub fn into_json(self) -> serde_json::Value {
        self.0
    }

    /// Numeric `id` field, if present.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(serde_json::Value::as_i64)
    }

    /// `upsaId` field, if present.
    pub fn upsa_id(&self) -> Option<&str> {
        self.0.get("upsaId").and_then(serde_json::Value::as_str)
    }

    /// `name` field, if present.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(serde_json::Value::as_str)
    }

    /// Decodes the payload into a caller-supplied type.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::Deserialization` - If the payload does not
    ///   match the shape of `T`
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, LocationSearchError> {
        Ok(T::deserialize(&self.0)?)
    }
}

impl From<serde_json::Value> for LocationRecord {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

/// Typed view of the location entity served by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Backend primary key
    pub id: Option<i64>,
    /// Identifier in the upstream staffing system
    pub upsa_id: Option<String>,
    /// Display name of the location
    pub name: Option<String>,
}

/// Parameters for one search request.
///
/// `id` fills the `:id` slot of the URL template; every other parameter is
/// sent in the query string in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    id: Option<String>,
    params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Creates an empty query: no id, no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the `query` parameter read by the backend search resource.
    pub fn with_query(self, text: impl Into<String>) -> Self {
        self.with_param("query", text)
    }

    /// Appends a free-form query-string parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Path id, if one was set.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Query-string parameters in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

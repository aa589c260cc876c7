//! Query requests: a Cypher string plus named parameters.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::graph::row::Params;

/// A Cypher query with the parameters to bind to it.
///
/// `Request` is built with a consuming builder and is not mutated after
/// that; executors only ever borrow it.
///
/// # Example
///
/// ```ignore
/// let request = Request::new("MATCH (p:Person) WHERE p.name = $name RETURN p")
///     .param("name", "Ada");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    query: String,
    params: Params,
}

impl Request {
    /// Creates a request without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Params::new(),
        }
    }

    /// Adds a parameter to the request.
    ///
    /// Parameters are referenced in Cypher using `$name` syntax. A value that
    /// cannot be represented as JSON is bound as `null`.
    pub fn param<T: Serialize>(self, name: &str, value: T) -> Self {
        let json_value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!(param = name, error = %e, "parameter is not serializable, binding null");
            JsonValue::Null
        });
        self.param_raw(name, json_value)
    }

    /// Adds a parameter that's already a JSON value.
    pub fn param_raw(mut self, name: &str, value: JsonValue) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    /// Replaces all parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// The Cypher query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The bound parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns true if the query text is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

impl From<&str> for Request {
    fn from(query: &str) -> Self {
        Request::new(query)
    }
}

impl From<String> for Request {
    fn from(query: String) -> Self {
        Request::new(query)
    }
}

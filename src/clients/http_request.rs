//! GraphQL operation request type.
//!
//! This module provides [`OperationRequest`], the JSON body posted to the
//! SuperOps endpoint, and the lexical mutation check used by read-only mode.

use serde::Serialize;
use serde_json::{Map, Value};

/// A single GraphQL operation and its variables.
///
/// Serializes to the wire body `{"query": ..., "variables": {...}}`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use superops_msp::clients::OperationRequest;
///
/// let request = OperationRequest::new("query { getStatusList { id } }", json!({}));
/// assert!(!request.is_mutation());
/// assert_eq!(
///     serde_json::to_value(&request).unwrap(),
///     json!({"query": "query { getStatusList { id } }", "variables": {}})
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationRequest {
    /// The GraphQL document.
    pub query: String,
    /// Variables for the document, always a JSON object.
    pub variables: Value,
}

impl OperationRequest {
    /// Creates a new request.
    ///
    /// `null` variables become an empty object; any other non-object value is
    /// kept as given.
    #[must_use]
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        let variables = if variables.is_null() {
            Value::Object(Map::new())
        } else {
            variables
        };
        Self {
            query: query.into(),
            variables,
        }
    }

    /// Returns `true` if the operation text starts with the `mutation` keyword.
    ///
    /// See [`is_mutation`].
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        is_mutation(&self.query)
    }
}

/// Returns `true` if `operation`, ignoring leading whitespace and case,
/// starts with `mutation`.
///
/// This is a prefix check on the raw text, not a parse: a document opening
/// with a `#` comment is not detected.
#[must_use]
pub fn is_mutation(operation: &str) -> bool {
    const KEYWORD: &str = "mutation";
    operation
        .trim_start()
        .get(..KEYWORD.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(KEYWORD))
}

//! Error types for SuperOps API requests.
//!
//! This module contains the failure taxonomy of
//! [`GraphqlClient::execute`](crate::clients::GraphqlClient::execute).
//!
//! # Error Handling
//!
//! - [`ApiError`]: A classified API failure (non-2xx status, or GraphQL
//!   errors delivered inside a 200 response)
//! - [`ClientError`]: Unified error type for everything `execute` can fail with
//!
//! # Example
//!
//! ```rust,ignore
//! use superops_msp::clients::ClientError;
//!
//! match client.execute(query, variables).await {
//!     Ok(data) => println!("{data}"),
//!     Err(ClientError::Api(e)) if e.is_auth_error() => {
//!         println!("Check your API token");
//!     }
//!     Err(ClientError::Api(e)) => println!("API error {}: {}", e.status(), e),
//!     Err(ClientError::Timeout { timeout_ms }) => println!("Gave up after {timeout_ms}ms"),
//!     Err(e) => println!("{e}"),
//! }
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Status code used for GraphQL errors returned with a successful transport status.
pub const GRAPHQL_ERROR_STATUS: u16 = 200;

/// Maximum number of raw body characters quoted in an invalid-JSON error.
pub const INVALID_BODY_EXCERPT_CHARS: usize = 200;

/// Request details retained on an [`ApiError`] for diagnostics.
///
/// The context is never inspected when classifying an error.
#[derive(Clone, Debug, PartialEq)]
pub struct CallContext {
    /// The GraphQL operation text.
    pub operation: String,
    /// The variables sent with the operation.
    pub variables: Value,
    /// The endpoint the request was sent to.
    pub endpoint: String,
}

/// A classified SuperOps API failure.
///
/// An `ApiError` is a plain record of the terminal HTTP status, the parsed
/// response body and the call context. Its message and classification are
/// derived from `status` and `body` on demand, so constructing one never fails
/// whatever shape the body has.
///
/// A status of `200` paired with an array body denotes GraphQL errors that
/// arrived inside a successful response.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use superops_msp::clients::ApiError;
///
/// let error = ApiError::new(401, json!({"error": "unauthorized"}), None);
/// assert_eq!(error.to_string(), "HTTP 401: unauthorized");
/// assert!(error.is_auth_error());
/// assert!(!error.is_retryable());
///
/// let error = ApiError::new(200, json!([{"message": "bad input"}]), None);
/// assert!(error.is_graphql_error());
/// assert_eq!(error.to_string(), "bad input");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    status: u16,
    body: Value,
    context: Option<CallContext>,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub const fn new(status: u16, body: Value, context: Option<CallContext>) -> Self {
        Self {
            status,
            body,
            context,
        }
    }

    /// Returns the HTTP status code (`200` for GraphQL-shaped errors).
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the parsed response body, or the GraphQL `errors` array.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the call context, if one was attached.
    #[must_use]
    pub const fn context(&self) -> Option<&CallContext> {
        self.context.as_ref()
    }

    /// Returns the human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> String {
        format_message(self.status, &self.body)
    }

    /// Returns `true` if the API rejected the call for rate limiting (429).
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Returns `true` for authentication or authorization failures (401, 403).
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    /// Returns `true` for server-side failures (status 500 and above).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Returns `true` if GraphQL errors arrived inside a 200 response.
    #[must_use]
    pub fn is_graphql_error(&self) -> bool {
        self.status == GRAPHQL_ERROR_STATUS && self.body.is_array()
    }

    /// Returns `true` if a blind reattempt may succeed (rate limited or server error).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.is_rate_limited() || self.is_server_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

/// Derives a message from a status and body.
///
/// For GraphQL errors (status 200, array body) the `message` fields are
/// joined with `"; "`. When none is usable, `extensions.clientError` entries
/// are rendered as `"<code>: <attributes>"`, and failing that the whole body
/// is pretty-printed. Any other combination renders as
/// `"HTTP <status>: <body.message | body.error | 'Request failed'>"`.
#[must_use]
pub fn format_message(status: u16, body: &Value) -> String {
    if let (GRAPHQL_ERROR_STATUS, Some(errors)) = (status, body.as_array()) {
        return format_graphql_errors(errors, body);
    }

    let detail = non_empty_str(body.get("message"))
        .or_else(|| non_empty_str(body.get("error")))
        .unwrap_or("Request failed");
    format!("HTTP {status}: {detail}")
}

fn format_graphql_errors(errors: &[Value], body: &Value) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| non_empty_str(e.get("message")))
        .collect();
    if !messages.is_empty() {
        return messages.join("; ");
    }

    let client_errors: Vec<String> = errors
        .iter()
        .filter_map(|e| e.pointer("/extensions/clientError").and_then(Value::as_array))
        .flatten()
        .map(format_client_error)
        .collect();
    if !client_errors.is_empty() {
        return client_errors.join("; ");
    }

    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

fn format_client_error(entry: &Value) -> String {
    let code = match entry.get("code") {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Null) | None => "unknown".to_string(),
        Some(other) => other.to_string(),
    };

    let attributes: Vec<&str> = entry
        .pointer("/param/attributes")
        .and_then(Value::as_array)
        .map(|attrs| attrs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if attributes.is_empty() {
        format!("{code}: unknown")
    } else {
        format!("{code}: {}", attributes.join(", "))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Unified error type for [`GraphqlClient::execute`](crate::clients::GraphqlClient::execute).
///
/// Only [`ClientError::Api`] errors whose [`ApiError::is_retryable`] is `true`
/// are retried; every other variant is terminal for the call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A mutation was attempted while the client is read-only.
    #[error("Mutations are disabled in read-only mode. Set SUPEROPS_READ_ONLY=false to enable mutations.")]
    ReadOnly,

    /// The response body was not valid JSON.
    #[error("Invalid JSON response (HTTP {status}): {excerpt}")]
    InvalidJson {
        /// The HTTP status of the response.
        status: u16,
        /// The first 200 characters of the raw body.
        excerpt: String,
    },

    /// The attempt did not complete within the configured timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// The configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// A classified API failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Builds an [`ClientError::InvalidJson`] from a raw body, truncating the excerpt.
    #[must_use]
    pub fn invalid_json(status: u16, raw_body: &str) -> Self {
        Self::InvalidJson {
            status,
            excerpt: raw_body.chars().take(INVALID_BODY_EXCERPT_CHARS).collect(),
        }
    }

    /// Returns the underlying [`ApiError`], if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` if the retry policy should attempt the call again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}

//! Error types for SuperOps client configuration.
//!
//! This module contains the error type produced while building a
//! [`SuperOpsConfig`](crate::SuperOpsConfig). Request-time failures live in
//! [`crate::clients`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation before any request is made.
//!
//! # Example
//!
//! ```rust
//! use superops_msp::{ApiToken, ConfigError};
//!
//! let result = ApiToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiToken)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant carries a message that names the setting to fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API token cannot be empty.
    #[error("SUPEROPS_API_KEY is required. Please provide a non-empty SuperOps API token.")]
    EmptyApiToken,

    /// Customer subdomain cannot be empty.
    #[error("SUPEROPS_SUBDOMAIN is required. Please provide your SuperOps customer subdomain.")]
    EmptySubdomain,

    /// A required builder field was never set.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The timeout override could not be parsed.
    #[error("Invalid timeout '{value}'. Expected a positive number of milliseconds.")]
    InvalidTimeout {
        /// The raw value that was provided.
        value: String,
    },

    /// A credential or subdomain cannot be sent as an HTTP header value.
    #[error("Invalid characters in '{field}'. The value must be printable ASCII so it can be sent as an HTTP header.")]
    InvalidHeaderValue {
        /// The name of the offending setting.
        field: &'static str,
    },

    /// The base URL override is not an http(s) URL.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}

//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated SuperOps API token.
///
/// This newtype ensures the token is non-empty and masks its value in debug
/// output so it never lands in logs.
///
/// # Example
///
/// ```rust
/// use superops_msp::ApiToken;
///
/// let token = ApiToken::new("my-token").unwrap();
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// A validated customer subdomain.
///
/// Sent verbatim in the `CustomerSubDomain` header of every request.
///
/// # Example
///
/// ```rust
/// use superops_msp::Subdomain;
///
/// let subdomain = Subdomain::new(" acme ").unwrap();
/// assert_eq!(subdomain.as_ref(), "acme");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subdomain(String);

impl Subdomain {
    /// Creates a new validated subdomain, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySubdomain`] if nothing is left after trimming.
    pub fn new(subdomain: impl Into<String>) -> Result<Self, ConfigError> {
        let subdomain = subdomain.into();
        let subdomain = subdomain.trim();
        if subdomain.is_empty() {
            return Err(ConfigError::EmptySubdomain);
        }
        Ok(Self(subdomain.to_string()))
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated base URL overriding the regional API host.
///
/// Only the scheme and authority are kept; a trailing slash is stripped so
/// the endpoint path can be appended directly.
///
/// # Example
///
/// ```rust
/// use superops_msp::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost:8080/").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:8080");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL uses the `http`
    /// or `https` scheme and names a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        if host.is_empty() || host.starts_with([':', '/']) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_rejects_empty_string() {
        assert!(matches!(ApiToken::new(""), Err(ConfigError::EmptyApiToken)));
        assert!(matches!(
            ApiToken::new("   "),
            Err(ConfigError::EmptyApiToken)
        ));
    }

    #[test]
    fn test_api_token_masks_value_in_debug() {
        let token = ApiToken::new("super-secret-token").unwrap();
        let debug_output = format!("{:?}", token);
        assert_eq!(debug_output, "ApiToken(*****)");
        assert!(!debug_output.contains("super-secret-token"));
    }

    #[test]
    fn test_subdomain_trims_and_rejects_empty() {
        assert_eq!(Subdomain::new("  acme  ").unwrap().as_ref(), "acme");
        assert!(matches!(
            Subdomain::new(" "),
            Err(ConfigError::EmptySubdomain)
        ));
    }

    #[test]
    fn test_base_url_accepts_http_and_https() {
        assert_eq!(
            BaseUrl::new("https://proxy.example.com").unwrap().as_ref(),
            "https://proxy.example.com"
        );
        assert_eq!(
            BaseUrl::new("http://127.0.0.1:3000/").unwrap().as_ref(),
            "http://127.0.0.1:3000"
        );
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("proxy.example.com").is_err());
        assert!(BaseUrl::new("ftp://proxy.example.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("https://:8080").is_err());
    }
}

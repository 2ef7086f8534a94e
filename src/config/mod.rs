//! Configuration types for the SuperOps MSP client.
//!
//! This module provides the configuration used to construct a
//! [`GraphqlClient`](crate::clients::GraphqlClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`SuperOpsConfig`]: The immutable client configuration
//! - [`SuperOpsConfigBuilder`]: A builder for constructing [`SuperOpsConfig`] instances
//! - [`ApiToken`]: A validated API token newtype with masked debug output
//! - [`Subdomain`]: A validated customer subdomain
//! - [`BaseUrl`]: A validated host override
//! - [`Region`]: The data-center region selecting the API host
//!
//! # Example
//!
//! ```rust
//! use superops_msp::{SuperOpsConfig, ApiToken, Subdomain, Region};
//!
//! let config = SuperOpsConfig::builder()
//!     .api_token(ApiToken::new("my-token").unwrap())
//!     .subdomain(Subdomain::new("acme").unwrap())
//!     .region(Region::Eu)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.endpoint(), "https://euapi.superops.ai/msp");
//! ```

mod newtypes;
mod region;

pub use newtypes::{ApiToken, BaseUrl, Subdomain};
pub use region::Region;

use std::time::Duration;

use crate::error::ConfigError;

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Path of the GraphQL endpoint, identical in every region.
pub const ENDPOINT_PATH: &str = "/msp";

/// Environment variable holding the API token.
pub const ENV_API_KEY: &str = "SUPEROPS_API_KEY";
/// Environment variable holding the customer subdomain.
pub const ENV_SUBDOMAIN: &str = "SUPEROPS_SUBDOMAIN";
/// Environment variable selecting the region.
pub const ENV_REGION: &str = "SUPEROPS_REGION";
/// Environment variable overriding the timeout, in milliseconds.
pub const ENV_TIMEOUT: &str = "SUPEROPS_TIMEOUT";
/// Environment variable enabling read-only mode.
pub const ENV_READ_ONLY: &str = "SUPEROPS_READ_ONLY";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "SUPEROPS_BASE_URL";

/// Configuration for the SuperOps MSP client.
///
/// A `SuperOpsConfig` is validated once when built and is immutable
/// afterwards. It is `Clone`, `Send` and `Sync`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use superops_msp::{SuperOpsConfig, ApiToken, Subdomain};
///
/// let config = SuperOpsConfig::builder()
///     .api_token(ApiToken::new("token").unwrap())
///     .subdomain(Subdomain::new("acme").unwrap())
///     .timeout(Duration::from_secs(10))
///     .read_only(true)
///     .build()
///     .unwrap();
///
/// assert!(config.read_only());
/// assert_eq!(config.endpoint(), "https://api.superops.ai/msp");
/// ```
#[derive(Clone, Debug)]
pub struct SuperOpsConfig {
    api_token: ApiToken,
    subdomain: Subdomain,
    region: Region,
    timeout: Duration,
    read_only: bool,
    base_url: Option<BaseUrl>,
}

impl SuperOpsConfig {
    /// Creates a new builder for constructing a `SuperOpsConfig`.
    #[must_use]
    pub fn builder() -> SuperOpsConfigBuilder {
        SuperOpsConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// See [`from_lookup`](Self::from_lookup) for the variables read.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or empty,
    /// or an optional one cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from a key lookup function.
    ///
    /// Reads `SUPEROPS_API_KEY` and `SUPEROPS_SUBDOMAIN` (required),
    /// `SUPEROPS_REGION`, `SUPEROPS_TIMEOUT` (milliseconds),
    /// `SUPEROPS_READ_ONLY` (`true`, `1` or `yes`) and `SUPEROPS_BASE_URL`.
    /// Empty optional values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or empty,
    /// the timeout is not a positive integer, or the base URL is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use superops_msp::{SuperOpsConfig, Region};
    ///
    /// let env = HashMap::from([
    ///     ("SUPEROPS_API_KEY", "token"),
    ///     ("SUPEROPS_SUBDOMAIN", "acme"),
    ///     ("SUPEROPS_REGION", "eu"),
    /// ]);
    /// let config = SuperOpsConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.region(), Region::Eu);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = ApiToken::new(lookup(ENV_API_KEY).unwrap_or_default())?;
        let subdomain = Subdomain::new(lookup(ENV_SUBDOMAIN).unwrap_or_default())?;

        let mut builder = Self::builder().api_token(api_token).subdomain(subdomain);

        if let Some(region) = optional(ENV_REGION) {
            builder = builder.region(region.parse::<Region>().unwrap_or_default());
        }

        if let Some(raw) = optional(ENV_TIMEOUT) {
            builder = builder.timeout(parse_timeout(&raw)?);
        }

        if let Some(raw) = optional(ENV_READ_ONLY) {
            builder = builder.read_only(parse_flag(&raw));
        }

        if let Some(url) = optional(ENV_BASE_URL) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }

        builder.build()
    }

    /// Returns the API token.
    #[must_use]
    pub const fn api_token(&self) -> &ApiToken {
        &self.api_token
    }

    /// Returns the customer subdomain.
    #[must_use]
    pub const fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    /// Returns the configured region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether mutation operations are blocked.
    #[must_use]
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// Returns the base URL override, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the full GraphQL endpoint URL.
    ///
    /// Uses the base URL override when set, otherwise `https://{region host}`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.base_url.as_ref().map_or_else(
            || format!("https://{}{ENDPOINT_PATH}", self.region.host()),
            |base| format!("{}{ENDPOINT_PATH}", base.as_ref()),
        )
    }
}

// Verify SuperOpsConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SuperOpsConfig>();
};

/// Builder for constructing [`SuperOpsConfig`] instances.
///
/// Required fields are `api_token` and `subdomain`.
///
/// # Defaults
///
/// - `region`: [`Region::Us`]
/// - `timeout`: 30 seconds
/// - `read_only`: `false`
/// - `base_url`: `None`
#[derive(Debug, Default)]
pub struct SuperOpsConfigBuilder {
    api_token: Option<ApiToken>,
    subdomain: Option<Subdomain>,
    region: Option<Region>,
    timeout: Option<Duration>,
    read_only: Option<bool>,
    base_url: Option<BaseUrl>,
}

impl SuperOpsConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token (required).
    #[must_use]
    pub fn api_token(mut self, token: ApiToken) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Sets the customer subdomain (required).
    #[must_use]
    pub fn subdomain(mut self, subdomain: Subdomain) -> Self {
        self.subdomain = Some(subdomain);
        self
    }

    /// Sets the region.
    #[must_use]
    pub const fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables read-only mode.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Overrides the regional host, e.g. for a proxy.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Builds the [`SuperOpsConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_token` or
    /// `subdomain` are not set, and [`ConfigError::InvalidTimeout`] for a
    /// zero timeout.
    pub fn build(self) -> Result<SuperOpsConfig, ConfigError> {
        let api_token = self
            .api_token
            .ok_or(ConfigError::MissingRequiredField { field: "api_token" })?;
        let subdomain = self
            .subdomain
            .ok_or(ConfigError::MissingRequiredField { field: "subdomain" })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(SuperOpsConfig {
            api_token,
            subdomain,
            region: self.region.unwrap_or_default(),
            timeout,
            read_only: self.read_only.unwrap_or(false),
            base_url: self.base_url,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

//! GraphQL client implementation for the SuperOps MSP API.
//!
//! This module provides the [`GraphqlClient`] type, the request execution
//! engine behind every tool call.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::clients::errors::{ApiError, CallContext, ClientError, GRAPHQL_ERROR_STATUS};
use crate::clients::http_request::OperationRequest;
use crate::clients::retry::RetryPolicy;
use crate::config::SuperOpsConfig;
use crate::error::ConfigError;

/// Fixed client identifier sent as `User-Agent`.
pub const CLIENT_USER_AGENT: &str = "superops-msp-mcp/1.0";

/// Header carrying the customer subdomain.
pub const SUBDOMAIN_HEADER: &str = "CustomerSubDomain";

/// GraphQL client for the SuperOps MSP API.
///
/// Each call to [`execute`](Self::execute) posts one operation to the
/// configured endpoint, enforces the per-attempt timeout, classifies
/// failures and retries rate-limited or server-side failures according to
/// its [`RetryPolicy`].
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync` and holds no mutable state beyond its
/// immutable configuration, so concurrent calls on one instance are
/// independent.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use superops_msp::{GraphqlClient, SuperOpsConfig};
///
/// let client = GraphqlClient::new(SuperOpsConfig::from_env()?)?;
///
/// let data = client
///     .execute(
///         "query getTicket($input: TicketIdentifierInput!) { getTicket(input: $input) { subject } }",
///         json!({ "input": { "ticketId": "1234" } }),
///     )
///     .await?;
/// println!("Subject: {}", data["getTicket"]["subject"]);
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Validated configuration.
    config: SuperOpsConfig,
    /// Full endpoint URL (e.g., `https://api.superops.ai/msp`).
    endpoint: String,
    /// Headers sent with every request.
    default_headers: HeaderMap,
    /// Attempt budget and backoff schedule.
    retry_policy: RetryPolicy,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderValue`] if the token or subdomain
    /// cannot be encoded as an HTTP header.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    pub fn new(config: SuperOpsConfig) -> Result<Self, ConfigError> {
        let default_headers = Self::build_default_headers(&config)?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = config.endpoint();
        tracing::debug!(
            endpoint = %endpoint,
            region = %config.region(),
            read_only = config.read_only(),
            "Created SuperOps GraphQL client"
        );

        Ok(Self {
            client,
            config,
            endpoint,
            default_headers,
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the endpoint URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &SuperOpsConfig {
        &self.config
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Executes one GraphQL operation and returns the response `data`.
    ///
    /// In read-only mode an operation whose text starts with `mutation` is
    /// rejected before any network activity. Otherwise the operation is sent
    /// under the client's retry policy; each attempt gets a fresh timeout.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ReadOnly`] for a mutation on a read-only client
    /// - [`ClientError::Network`] if the request could not be sent
    /// - [`ClientError::InvalidJson`] if the body is not JSON
    /// - [`ClientError::Timeout`] if an attempt exceeded the timeout
    /// - [`ClientError::Api`] for non-2xx statuses or a non-empty `errors`
    ///   array; 429 and 5xx are retried before being returned
    pub async fn execute(&self, operation: &str, variables: Value) -> Result<Value, ClientError> {
        let request = OperationRequest::new(operation, variables);

        if self.config.read_only() && request.is_mutation() {
            tracing::warn!("Rejected mutation in read-only mode");
            return Err(ClientError::ReadOnly);
        }

        let context = CallContext {
            operation: request.query.clone(),
            variables: request.variables.clone(),
            endpoint: self.endpoint.clone(),
        };

        self.retry_policy
            .run(
                |attempt| self.attempt(&request, &context, attempt),
                ClientError::is_retryable,
            )
            .await
    }

    /// Runs a single attempt under the configured timeout.
    ///
    /// The in-flight request is dropped, and with it the connection, when
    /// the timeout elapses.
    async fn attempt(
        &self,
        request: &OperationRequest,
        context: &CallContext,
        attempt: u32,
    ) -> Result<Value, ClientError> {
        tracing::debug!(attempt, endpoint = %self.endpoint, "Sending SuperOps GraphQL request");

        let timeout = self.config.timeout();
        if let Ok(result) = tokio::time::timeout(timeout, self.send(request, context)).await {
            result
        } else {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(attempt, timeout_ms, "SuperOps request timed out");
            Err(ClientError::Timeout { timeout_ms })
        }
    }

    /// Posts the request and classifies the response.
    async fn send(
        &self,
        request: &OperationRequest,
        context: &CallContext,
    ) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.default_headers.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let raw_body = response.text().await?;

        let body: Value = serde_json::from_str(&raw_body)
            .map_err(|_| ClientError::invalid_json(status.as_u16(), &raw_body))?;

        if !status.is_success() {
            return Err(ApiError::new(status.as_u16(), body, Some(context.clone())).into());
        }

        if let Some(errors) = body.get("errors").filter(|e| has_entries(e)) {
            return Err(
                ApiError::new(GRAPHQL_ERROR_STATUS, errors.clone(), Some(context.clone())).into(),
            );
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    fn build_default_headers(config: &SuperOpsConfig) -> Result<HeaderMap, ConfigError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.api_token().as_ref()))
                .map_err(|_| ConfigError::InvalidHeaderValue { field: "api_token" })?;
        authorization.set_sensitive(true);

        let subdomain = HeaderValue::from_str(config.subdomain().as_ref())
            .map_err(|_| ConfigError::InvalidHeaderValue { field: "subdomain" })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(HeaderName::from_static("customersubdomain"), subdomain);
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        Ok(headers)
    }
}

/// Returns `true` for a non-empty `errors` array.
fn has_entries(errors: &Value) -> bool {
    errors.as_array().map_or(false, |list| !list.is_empty())
}

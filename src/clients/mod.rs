//! HTTP client types for SuperOps API communication.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GraphqlClient`]: The request execution engine
//! - [`OperationRequest`]: One GraphQL operation and its variables
//! - [`RetryPolicy`]: Attempt budget and backoff schedule
//! - [`ApiError`]: A classified API failure
//! - [`ClientError`]: Everything [`GraphqlClient::execute`] can fail with
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)** and **5xx (Server Error)**: retried with backoff
//!   (1s, then 2s) for up to 3 attempts in total
//! - **Other 4xx** and **GraphQL errors in a 200 body**: returned immediately
//! - **Timeouts, invalid JSON, network errors, read-only violations**:
//!   returned immediately

mod errors;
pub mod graphql;
mod http_request;
mod retry;

pub use errors::{
    format_message, ApiError, CallContext, ClientError, GRAPHQL_ERROR_STATUS,
    INVALID_BODY_EXCERPT_CHARS,
};
pub use graphql::{GraphqlClient, CLIENT_USER_AGENT, SUBDOMAIN_HEADER};
pub use http_request::{is_mutation, OperationRequest};
pub use retry::{RetryPolicy, DEFAULT_DELAYS_MS, DEFAULT_MAX_ATTEMPTS};

//! GraphQL API client for the SuperOps MSP API.
//!
//! This module provides [`GraphqlClient`], the request execution engine:
//! bearer-token dispatch to the regional `/msp` endpoint, a per-attempt
//! timeout, retry of transient failures and classification of everything
//! else into [`ClientError`](crate::clients::ClientError).
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use superops_msp::{GraphqlClient, SuperOpsConfig};
//!
//! let client = GraphqlClient::new(SuperOpsConfig::from_env()?)?;
//!
//! // Simple query
//! let data = client.execute("query getStatusList { getStatusList { id name } }", json!({})).await?;
//! println!("Statuses: {}", data["getStatusList"]);
//! ```
//!
//! # Response Handling
//!
//! SuperOps answers with `{"data": ..., "errors": [...]}`. A non-empty
//! `errors` array is a failure even when the HTTP status is 200; it surfaces
//! as an [`ApiError`](crate::clients::ApiError) whose
//! [`is_graphql_error`](crate::clients::ApiError::is_graphql_error) is `true`.
//!
//! # Retry Behavior
//!
//! Up to 3 attempts by default, waiting 1s then 2s between them. Only 429
//! and 5xx responses are retried. Timeouts, invalid JSON bodies, network
//! failures and other API errors are returned immediately.

mod client;

pub use client::{GraphqlClient, CLIENT_USER_AGENT, SUBDOMAIN_HEADER};

//! # SuperOps MSP client
//!
//! A Rust client for the SuperOps MSP GraphQL API, and the tool catalog that
//! exposes it to language-model agents over the Model Context Protocol.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`SuperOpsConfig`] and [`SuperOpsConfigBuilder`]
//! - Validated newtypes for the API token, subdomain and endpoint override
//! - A request engine, [`GraphqlClient`], with per-attempt timeouts,
//!   retry with exponential backoff for rate limits and server errors, and a
//!   read-only mode that refuses mutations before any network activity
//! - A classified error value, [`ApiError`], with pure predicates for
//!   rate limiting, authentication, server and GraphQL errors
//! - A catalog of lookup, ticket, client, alert and asset tools via [`tools::ToolRegistry`]
//! - A newline-delimited JSON-RPC MCP server via [`server::McpServer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use superops_msp::{ApiToken, Region, Subdomain, SuperOpsConfig};
//!
//! let config = SuperOpsConfig::builder()
//!     .api_token(ApiToken::new("your-api-token").unwrap())
//!     .subdomain(Subdomain::new("acme").unwrap())
//!     .region(Region::Eu)
//!     .read_only(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.endpoint(), "https://euapi.superops.ai/msp");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use serde_json::json;
//! use superops_msp::{GraphqlClient, SuperOpsConfig};
//!
//! let client = GraphqlClient::new(SuperOpsConfig::from_env()?)?;
//!
//! let data = client
//!     .execute("query { getStatusList { id name } }", json!({}))
//!     .await?;
//! ```
//!
//! ## Handling Errors
//!
//! ```rust,ignore
//! use superops_msp::ClientError;
//!
//! match client.execute(query, variables).await {
//!     Ok(data) => println!("{data}"),
//!     Err(ClientError::Api(e)) if e.is_auth_error() => eprintln!("check credentials"),
//!     Err(ClientError::Api(e)) if e.is_rate_limited() => eprintln!("retry later"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: The client is `Send + Sync`; concurrent calls are independent
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

// Re-export public types at crate root for convenience
pub use config::{ApiToken, BaseUrl, Region, Subdomain, SuperOpsConfig, SuperOpsConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{ApiError, CallContext, ClientError, GraphqlClient, OperationRequest, RetryPolicy};

// Re-export tool and server types
pub use server::McpServer;
pub use tools::{ToolDefinition, ToolError, ToolRegistry};

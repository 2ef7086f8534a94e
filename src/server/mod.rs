//! MCP server over stdio.
//!
//! The server reads newline-delimited JSON-RPC 2.0 messages, answers the
//! MCP lifecycle methods (`initialize`, `ping`) and routes `tools/list` and
//! `tools/call` to a [`ToolRegistry`]. Responses are written one per line.
//! Notifications are consumed silently.
//!
//! Each request runs on its own task, so a slow tool call (retry backoff or
//! a long timeout) does not hold up `ping` or other calls. Responses are
//! written in completion order; clients match them by `id`.
//!
//! Tool failures are not protocol errors: they come back as a regular
//! `tools/call` result with `isError: true` and a human-readable message.
//!
//! # Example
//!
//! ```rust,ignore
//! use superops_msp::server::McpServer;
//!
//! let server = McpServer::new(registry);
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! server.serve(stdin, tokio::io::stdout()).await?;
//! ```

mod protocol;

pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;

use crate::clients::ClientError;
use crate::tools::{ToolError, ToolRegistry};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "superops-msp";

/// Version reported in `serverInfo`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// An MCP server backed by a [`ToolRegistry`].
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone, Debug)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Creates a server exposing every tool in `registry`.
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns the tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serves requests from `reader` until it reaches end of input.
    ///
    /// Blank lines are skipped. Every other line is handled on a spawned
    /// task; each response is written as one line and flushed as soon as it
    /// is ready. Requests still in flight when input closes are answered
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or writing fails.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut in_flight = JoinSet::new();
        let mut input_open = true;

        while input_open || !in_flight.is_empty() {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let server = self.clone();
                        in_flight.spawn(async move { server.handle_line(&line).await });
                    }
                    None => {
                        tracing::info!("Input closed, finishing in-flight requests");
                        input_open = false;
                    }
                },
                Some(joined) = in_flight.join_next() => match joined {
                    Ok(Some(response)) => write_response(&mut writer, &response).await?,
                    Ok(None) => {}
                    Err(e) => tracing::error!(error = %e, "Request task failed"),
                },
            }
        }

        tracing::info!("Shutting down");
        Ok(())
    }

    /// Handles one raw message line.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
            )),
        }
    }

    /// Handles one decoded request.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(Self::initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            method => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: CallParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;

        match self.registry.call(&params.name, params.arguments).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|_| result.to_string());
                Ok(json!({ "content": [{ "type": "text", "text": text }] }))
            }
            Err(error) => {
                tracing::warn!(tool = %params.name, error = %error, "Tool call failed");
                Ok(json!({
                    "content": [{ "type": "text", "text": render_tool_error(&error) }],
                    "isError": true,
                }))
            }
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_vec(response)?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await
}

/// Renders a tool failure for the model.
///
/// Authentication failures ask for a credential check, rate limiting asks
/// for a later retry and GraphQL errors show their message. Other API
/// errors show the derived message, which leads with the HTTP status.
#[must_use]
pub fn render_tool_error(error: &ToolError) -> String {
    let ToolError::Client(ClientError::Api(api)) = error else {
        return format!("Error: {error}");
    };

    if api.is_auth_error() {
        format!(
            "Authentication failed: {}. Please check SUPEROPS_API_KEY and SUPEROPS_SUBDOMAIN.",
            api.message()
        )
    } else if api.is_rate_limited() {
        "Rate limit exceeded: the SuperOps API is throttling requests. Please try again later."
            .to_string()
    } else if api.is_graphql_error() {
        format!("GraphQL error: {}", api.message())
    } else {
        format!("API error: {}", api.message())
    }
}

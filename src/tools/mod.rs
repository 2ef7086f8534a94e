//! Tool catalog exposed over MCP.
//!
//! Each tool maps a named, schema-described call onto one GraphQL operation
//! executed through the [`GraphqlClient`]. The catalog is split by area:
//!
//! - [`lookups`]: reference data (statuses, priorities, technicians, ...)
//! - [`tickets`]: ticket queues and ticket actions
//! - [`clients`]: clients, their sites, contacts and contracts, and alerts
//! - [`assets`]: managed assets and their inventory, patch and activity data
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use superops_msp::{GraphqlClient, SuperOpsConfig};
//! use superops_msp::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::new(GraphqlClient::new(SuperOpsConfig::from_env()?)?);
//! let statuses = registry.call("get_statuses", json!({})).await?;
//! println!("{} statuses", statuses["count"]);
//! ```

pub mod assets;
pub mod clients;
pub mod lookups;
pub mod tickets;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::clients::{ClientError, GraphqlClient};

/// Description of one tool as advertised by `tools/list`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// What the tool does, for the model.
    pub description: &'static str,
    /// JSON Schema of the tool arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

/// Errors produced while running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name exists.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The requested tool name.
        name: String,
    },

    /// The arguments were malformed or failed a tool precondition.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// The tool that rejected its arguments.
        tool: String,
        /// What was wrong.
        message: String,
    },

    /// The underlying API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ToolError {
    /// Builds an [`ToolError::InvalidArguments`].
    #[must_use]
    pub fn invalid(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

/// Dispatches tool calls to the area that owns them.
///
/// The registry owns the [`GraphqlClient`]; it is created once at startup
/// and shared by every call.
#[derive(Debug)]
pub struct ToolRegistry {
    client: GraphqlClient,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Creates a registry serving every known tool.
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self {
            client,
            definitions: all_definitions(),
        }
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Runs the named tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unknown name,
    /// [`ToolError::InvalidArguments`] when arguments do not fit the tool, and
    /// [`ToolError::Client`] when the API call fails.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        tracing::debug!(tool = name, "Calling tool");

        if lookups::is_lookup_tool(name) {
            lookups::handle(name, arguments, &self.client).await
        } else if tickets::is_ticket_tool(name) {
            tickets::handle(name, arguments, &self.client).await
        } else if clients::is_client_tool(name) {
            clients::handle(name, arguments, &self.client).await
        } else if assets::is_asset_tool(name) {
            assets::handle(name, arguments, &self.client).await
        } else {
            Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    }
}

fn all_definitions() -> Vec<ToolDefinition> {
    let mut definitions = lookups::definitions();
    definitions.extend(tickets::definitions());
    definitions.extend(clients::definitions());
    definitions.extend(assets::definitions());
    definitions
}

/// Largest page size the list queries accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Resolves a requested page number; absent or zero means the first page.
pub(crate) fn page_number(page: Option<u32>) -> u32 {
    page.filter(|p| *p > 0).unwrap_or(1)
}

/// Resolves a requested page size; absent or zero falls back to `default`.
///
/// The result is not capped; callers apply [`MAX_PAGE_SIZE`] where the
/// query enforces it.
pub(crate) fn page_size(size: Option<u32>, default: u32) -> u32 {
    size.filter(|s| *s > 0).unwrap_or(default)
}

/// Builds one list filter condition.
pub(crate) fn condition(attribute: &str, operator: &str, value: Value) -> Value {
    serde_json::json!({"attribute": attribute, "operator": operator, "value": value})
}

/// Returns the value if it holds a non-empty string.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Deserializes tool arguments, treating `null` as an empty object.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        Value::Object(Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid(tool, e.to_string()))
}

/// Returns the string field of a `{name: ...}` reference, or the value itself.
pub(crate) fn display_name(value: &Value) -> Value {
    match value.get("name") {
        Some(name) if !name.is_null() && name != "" => name.clone(),
        _ => value.clone(),
    }
}

//! `superops-msp-mcp`: MCP server exposing SuperOps MSP tools over stdio.
//!
//! Configuration is read from the environment (`SUPEROPS_API_KEY`,
//! `SUPEROPS_SUBDOMAIN`, `SUPEROPS_REGION`, `SUPEROPS_TIMEOUT`,
//! `SUPEROPS_READ_ONLY`, `SUPEROPS_BASE_URL`). Logs go to stderr and are
//! filtered with `RUST_LOG`.

use std::process::ExitCode;

use superops_msp::server::{McpServer, SERVER_NAME, SERVER_VERSION};
use superops_msp::tools::ToolRegistry;
use superops_msp::{GraphqlClient, SuperOpsConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match SuperOpsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match GraphqlClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Could not create SuperOps client");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        name = SERVER_NAME,
        version = SERVER_VERSION,
        endpoint = client.endpoint(),
        read_only = client.config().read_only(),
        "Starting MCP server on stdio"
    );

    let server = McpServer::new(ToolRegistry::new(client));
    let stdin = BufReader::new(tokio::io::stdin());

    if let Err(e) = server.serve(stdin, tokio::io::stdout()).await {
        tracing::error!(error = %e, "Server I/O failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

//! Daemon entry point for the BOJ MCP server.
//!
//! Loads configuration from flags and the environment, builds the shared
//! solved.ac client, and serves the MCP protocol over stdio and, when an
//! address is configured, streamable HTTP.

mod config;
mod services;

use std::sync::Arc;

use boj_mcp::BojMcp;
use boj_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::BojConfig;
use crate::services::build_client;

fn init_tracing(config: &BojConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(&config.log)?;
    // stdout carries the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = BojConfig::from_args()?;
    init_tracing(&config)?;

    let api = Arc::new(build_client(&config)?);
    info!(
        api_base = api.base_url(),
        default_handle = config.handle.as_deref().unwrap_or("-"),
        "solved.ac client ready"
    );
    let service = BojMcp::with_client(api, config.handle.clone());

    let http = config.mcp_http_addr.map(|addr| {
        let service = service.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_streamable_http(service, McpHttpServerConfig::new(addr)).await {
                error!(error = %err, "streamable HTTP server stopped");
            }
        })
    });

    if config.enable_stdio {
        serve_stdio(service).await?;
    } else if let Some(handle) = http {
        handle.await?;
    }
    Ok(())
}

//! freshdesk-mcp - MCP server for the Freshdesk helpdesk
//!
//! This binary runs as an MCP server over stdio so a desktop assistant can
//! work with a Freshdesk helpdesk.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `FRESHDESK_DOMAIN`: helpdesk subdomain, e.g. `yourcompany`
//! - `FRESHDESK_API_KEY`: agent API key
//!
//! # Usage
//!
//! ```bash
//! FRESHDESK_DOMAIN=yourcompany FRESHDESK_API_KEY=... ./freshdesk-mcp
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use freshdesk_mcp::{config, freshdesk_client, server};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries MCP JSON-RPC, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("freshdesk_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting Freshdesk MCP server v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(domain = %config.domain, base_url = %config.base_url, "Configuration loaded");

    let client = freshdesk_client::FreshdeskClient::new(&config)
        .context("Failed to create Freshdesk client")?;

    tracing::info!("Testing connection to Freshdesk...");
    if let Err(e) = client.test_connection().await {
        tracing::error!(error = %e, "Connection test failed");
        tracing::warn!(
            "Server will start but may not be able to reach Freshdesk. \
             Check FRESHDESK_DOMAIN, FRESHDESK_API_KEY and network connectivity."
        );
    }

    let server = server::FreshdeskServer::new(client);

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}

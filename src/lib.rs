//! # Freshdesk MCP
//!
//! An MCP (Model Context Protocol) server for the Freshdesk helpdesk.
//!
//! It exposes Freshdesk API v2 operations as MCP tools so AI assistants can
//! work with tickets, contacts, companies, agents and groups.
//!
//! ## Features
//!
//! - **Tickets**: list, search, view, create, update, trash and restore
//! - **Conversations**: read the thread, reply to requesters, add notes
//! - **Directory**: contacts, companies, agents and groups
//! - **Pagination**: list tools walk every page, with an optional result cap
//! - **Security**: API keys are never logged or exposed in error messages
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types with message sanitization
//! - [`freshdesk_client`] - Authenticated HTTP client and pagination driver
//! - [`server`] - MCP server implementation with tool routing
//! - [`models`] - Query parameters, paginated results and ticket codes
//! - [`tools`] - Tool input parameter structs
//!
//! ## Configuration
//!
//! Required:
//! - `FRESHDESK_DOMAIN`: helpdesk subdomain (`yourcompany` for `yourcompany.freshdesk.com`)
//! - `FRESHDESK_API_KEY`: agent API key
//!
//! Optional:
//! - `FRESHDESK_BASE_URL`: override the derived `https://<domain>.freshdesk.com/api/v2`
//! - `FRESHDESK_TIMEOUT_SECS`: per-request timeout (default 30)
//! - `RUST_LOG`: log level (e.g., `freshdesk_mcp=debug`)
//!
//! ## Example
//!
//! Using the [`FreshdeskClient`](freshdesk_client::FreshdeskClient) directly:
//!
//! ```ignore
//! use freshdesk_mcp::config::Config;
//! use freshdesk_mcp::freshdesk_client::FreshdeskClient;
//! use freshdesk_mcp::models::QueryParams;
//!
//! async fn example() -> Result<(), freshdesk_mcp::error::FreshdeskError> {
//!     let config = Config::from_env()?;
//!     let client = FreshdeskClient::new(&config)?;
//!
//!     // First 50 tickets for one company
//!     let params = QueryParams::new().with("company_id", 42u64);
//!     let tickets = client.list_tickets(params, Some(50)).await?;
//!     println!("{} tickets", tickets.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod freshdesk_client;
pub mod models;
pub mod server;
pub mod tools;

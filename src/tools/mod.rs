//! MCP tool inputs for the Freshdesk server.
//!
//! This module contains the parameter structs, with their sanitization and
//! validation, for the tools registered in [`crate::server`].

mod inputs;

pub use inputs::*;

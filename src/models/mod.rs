//! Data models for the Freshdesk API.
//!
//! Freshdesk records are passed through as raw JSON. This module holds the
//! types that the client itself interprets: query parameters, paginated
//! results, error bodies and ticket enumerations.

mod common;
mod ticket;

pub use common::*;
pub use ticket::*;

//! Error types for the Freshdesk MCP server.
//!
//! This module defines `FreshdeskError`, the unified error type used throughout
//! the crate for consistent error handling and propagation.
//!
//! # Security
//!
//! Error messages shown to tool callers must never contain the API key.
//! Use `sanitized_display()` when rendering an error outside the process.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for all Freshdesk operations.
///
/// Every failure is single-shot: nothing in this crate retries, so each
/// variant describes exactly one failed attempt.
#[derive(Error, Debug)]
pub enum FreshdeskError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The Freshdesk API answered with a non-2xx status.
    ///
    /// `description` comes from the JSON error body when present, otherwise
    /// it is synthesized from the status line. Field-level validation errors
    /// are kept verbatim and appended to the message.
    #[error("Freshdesk API error: {description}{}", render_field_errors(.errors.as_ref()))]
    Api {
        /// The HTTP status code returned.
        status: StatusCode,
        /// Human-readable description of the failure.
        description: String,
        /// The `errors` array from the response body, if any.
        errors: Option<serde_json::Value>,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation}) - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

/// Formats the field-level error list for display, or nothing when absent.
fn render_field_errors(errors: Option<&serde_json::Value>) -> String {
    match errors {
        Some(errors) if !errors.is_null() => {
            let rendered =
                serde_json::to_string_pretty(errors).unwrap_or_else(|_| errors.to_string());
            format!("\n{}", rendered)
        }
        _ => String::new(),
    }
}

impl FreshdeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        FreshdeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        FreshdeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        FreshdeskError::Validation(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        FreshdeskError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates an API error from a status and description.
    pub fn api(
        status: StatusCode,
        description: impl Into<String>,
        errors: Option<serde_json::Value>,
    ) -> Self {
        FreshdeskError::Api {
            status,
            description: description.into(),
            errors,
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        FreshdeskError::ConnectionTest {
            message: message.into(),
        }
    }

    /// The description used when an error body carries none of its own,
    /// e.g. `HTTP 502: Bad Gateway`.
    pub fn status_line(status: StatusCode) -> String {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FreshdeskError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the API rejected the credentials (401 or 403).
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Sanitizes a message by replacing any occurrence of the API key
    /// with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, api_key: &str) -> String {
        if api_key.is_empty() {
            return message.to_string();
        }
        message.replace(api_key, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, api_key: &str) -> String {
        Self::sanitize_message(&self.to_string(), api_key)
    }
}

//! Configuration management for the Freshdesk MCP server.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present. The resulting
//! `Config` is built once at start-up and never changes afterwards.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::FreshdeskError;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Host suffix of every Freshdesk helpdesk.
const FRESHDESK_HOST_SUFFIX: &str = ".freshdesk.com";

/// Configuration for connecting to a Freshdesk helpdesk.
///
/// The API key is stored but never logged or exposed in error messages;
/// the `Debug` impl redacts it.
#[derive(Clone)]
pub struct Config {
    /// Helpdesk subdomain (`acme` for `acme.freshdesk.com`).
    pub domain: String,

    /// API base URL, `https://<domain>.freshdesk.com/api/v2` unless overridden.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Agent API key. Must never be logged.
    api_key: String,
}

impl Config {
    /// Builds a configuration for `domain` with the standard base URL.
    ///
    /// # Errors
    ///
    /// Returns `FreshdeskError::Config` if the domain or key fails validation.
    pub fn new(domain: &str, api_key: impl Into<String>) -> Result<Self, FreshdeskError> {
        let domain = Self::normalize_domain(domain)?;
        let api_key = api_key.into();
        Self::validate_api_key(&api_key)?;

        Ok(Config {
            base_url: Self::default_base_url(&domain),
            domain,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `FRESHDESK_DOMAIN`: helpdesk subdomain, host, or URL
    /// - `FRESHDESK_API_KEY`: agent API key
    ///
    /// # Optional Environment Variables
    ///
    /// - `FRESHDESK_BASE_URL`: overrides the derived API base URL
    /// - `FRESHDESK_TIMEOUT_SECS`: per-request timeout (default 30)
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, FreshdeskError> {
        let domain = Self::get_required_env("FRESHDESK_DOMAIN")?;
        let api_key = Self::get_required_env("FRESHDESK_API_KEY")?;

        let mut config = Self::new(&domain, api_key)?;

        if let Some(base_url) = Self::get_optional_env("FRESHDESK_BASE_URL") {
            config = config.with_base_url(&base_url)?;
        }

        if let Some(timeout) = Self::get_optional_env("FRESHDESK_TIMEOUT_SECS") {
            config.timeout = Self::parse_timeout(&timeout)?;
        }

        Ok(config)
    }

    /// Replaces the derived base URL, e.g. to go through a proxy.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, FreshdeskError> {
        self.base_url = Self::validate_base_url(base_url)?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API key. Only the HTTP client and error sanitization may use it.
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, FreshdeskError> {
        Self::get_optional_env(name).ok_or_else(|| FreshdeskError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    fn default_base_url(domain: &str) -> String {
        format!("https://{}{}/api/v2", domain, FRESHDESK_HOST_SUFFIX)
    }

    /// Reduces `https://acme.freshdesk.com/`, `acme.freshdesk.com` or `acme`
    /// to the bare subdomain and checks it is a valid DNS label.
    fn normalize_domain(domain: &str) -> Result<String, FreshdeskError> {
        let domain = domain.trim().to_lowercase();
        let domain = domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        let domain = domain.strip_suffix(FRESHDESK_HOST_SUFFIX).unwrap_or(domain);

        let valid = !domain.is_empty()
            && !domain.starts_with('-')
            && !domain.ends_with('-')
            && domain
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-');

        if !valid {
            return Err(FreshdeskError::invalid_config(
                "FRESHDESK_DOMAIN must be a helpdesk subdomain such as 'yourcompany'",
            ));
        }

        Ok(domain.to_string())
    }

    /// Validates and normalizes a base URL override.
    fn validate_base_url(url: &str) -> Result<String, FreshdeskError> {
        let url = url.trim().trim_end_matches('/');

        let parsed = Url::parse(url).map_err(|e| {
            FreshdeskError::invalid_config(format!("FRESHDESK_BASE_URL is not a valid URL: {}", e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FreshdeskError::invalid_config(
                "FRESHDESK_BASE_URL must start with http:// or https://",
            ));
        }

        Ok(url.to_string())
    }

    fn parse_timeout(value: &str) -> Result<Duration, FreshdeskError> {
        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(FreshdeskError::invalid_config(
                "FRESHDESK_TIMEOUT_SECS must be a positive number of seconds",
            )),
        }
    }

    /// Validates the API key is not a placeholder value.
    fn validate_api_key(key: &str) -> Result<(), FreshdeskError> {
        if key.trim().is_empty() {
            return Err(FreshdeskError::missing_env("FRESHDESK_API_KEY"));
        }

        let key_lower = key.to_lowercase();
        let placeholder_patterns = [
            "your_api_key",
            "your_key",
            "placeholder",
            "xxx",
            "changeme",
        ];

        for pattern in placeholder_patterns {
            if key_lower.contains(pattern) {
                return Err(FreshdeskError::invalid_config(
                    "FRESHDESK_API_KEY appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: from_env() is not exercised here because tests run in parallel
    // and environment variables are process-global.

    #[test]
    fn test_new_derives_base_url() {
        let config = Config::new("acme", "abc123def456").unwrap();
        assert_eq!(config.domain, "acme");
        assert_eq!(config.base_url, "https://acme.freshdesk.com/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_normalize_domain_accepts_host_and_url() {
        assert_eq!(Config::normalize_domain("acme").unwrap(), "acme");
        assert_eq!(
            Config::normalize_domain("acme.freshdesk.com").unwrap(),
            "acme"
        );
        assert_eq!(
            Config::normalize_domain("https://Acme.freshdesk.com/").unwrap(),
            "acme"
        );
        assert_eq!(Config::normalize_domain("  my-team ").unwrap(), "my-team");
    }

    #[test]
    fn test_normalize_domain_rejects_garbage() {
        assert!(Config::normalize_domain("").is_err());
        assert!(Config::normalize_domain("acme.example.com").is_err());
        assert!(Config::normalize_domain("acme/../evil").is_err());
        assert!(Config::normalize_domain("-acme").is_err());
    }

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result = Config::validate_base_url("http://127.0.0.1:8080/api/v2/").unwrap();
        assert_eq!(result, "http://127.0.0.1:8080/api/v2");
    }

    #[test]
    fn test_validate_base_url_requires_http_scheme() {
        assert!(Config::validate_base_url("example.com").is_err());
        assert!(Config::validate_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = Config::new("acme", "abc123def456")
            .unwrap()
            .with_base_url("http://localhost:9000")
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.domain, "acme");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(Config::parse_timeout("5").unwrap(), Duration::from_secs(5));
        assert!(Config::parse_timeout("0").is_err());
        assert!(Config::parse_timeout("soon").is_err());
    }

    #[test]
    fn test_validate_api_key_rejects_placeholder() {
        assert!(Config::validate_api_key("your_api_key_here").is_err());
        assert!(Config::validate_api_key("   ").is_err());
    }

    #[test]
    fn test_validate_api_key_accepts_real_key() {
        assert!(Config::validate_api_key("abc123def456").is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::new("acme", "abc123def456").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("abc123def456"));
        assert!(debug.contains("[REDACTED]"));
    }
}

//! Common types shared across Freshdesk API calls.
//!
//! This module defines query parameters, the aggregated pagination result,
//! and the shape of Freshdesk error bodies.

use serde::{Deserialize, Serialize};

use crate::error::FreshdeskError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: usize = 30;

/// A single query parameter value.
///
/// Lists are sent as repeated keys (`tags=a&tags=b`), never as one encoded array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value.
    Scalar(String),
    /// A value repeated once per element, in order.
    List(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::List(values)
    }
}

/// Ordered query parameters for one request.
///
/// Keys keep their insertion order; `set` replaces an existing key in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of `set_opt`.
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.set_opt(key, value);
        self
    }

    /// Sets `key`, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Sets `key` only when `value` is present.
    pub fn set_opt<V: Into<QueryValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reads `per_page`, if present, as a page size.
    ///
    /// # Errors
    ///
    /// Returns `FreshdeskError::Validation` if the value is not a positive integer.
    pub fn per_page(&self) -> Result<Option<usize>, FreshdeskError> {
        match self.get("per_page") {
            None => Ok(None),
            Some(QueryValue::Scalar(raw)) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => Ok(Some(size)),
                _ => Err(FreshdeskError::validation(format!(
                    "per_page must be a positive integer, got: {:?}",
                    raw
                ))),
            },
            Some(QueryValue::List(_)) => Err(FreshdeskError::validation(
                "per_page must be a single value, not a list",
            )),
        }
    }

    /// Flattens into `(key, value)` pairs, repeating keys for list values.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            match value {
                QueryValue::Scalar(v) => pairs.push((key.clone(), v.clone())),
                QueryValue::List(values) => {
                    pairs.extend(values.iter().map(|v| (key.clone(), v.clone())));
                }
            }
        }
        pairs
    }
}

/// Records collected across pages by the pagination driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paginated {
    /// Records in page order, then within-page order.
    pub results: Vec<serde_json::Value>,

    /// Number of records in `results` (after any cap was applied).
    pub total: usize,
}

impl Paginated {
    /// Wraps collected records, deriving `total` from their count.
    pub fn new(results: Vec<serde_json::Value>) -> Self {
        let total = results.len();
        Self { results, total }
    }
}

/// Shape of a Freshdesk error response body.
///
/// ```json
/// {"description": "Validation failed",
///  "errors": [{"field": "email", "message": "...", "code": "invalid_value"}]}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Summary of the failure. Usually a string, but kept raw so an odd
    /// shape does not cost us the `errors` list.
    #[serde(default)]
    pub description: Option<serde_json::Value>,

    /// Field-level validation errors, kept as raw JSON.
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// The description as text. Strings are used as is, other JSON values
    /// are rendered; null and blank strings count as missing.
    pub fn description_text(&self) -> Option<String> {
        match self.description.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

//! HTTP client for the Freshdesk API v2.
//!
//! This module provides the `FreshdeskClient` struct for making authenticated
//! requests to the Freshdesk REST API, plus the pagination driver that walks
//! list endpoints page by page.
//!
//! # Failure policy
//!
//! Every call is a single attempt. Non-2xx responses become
//! `FreshdeskError::Api` and propagate immediately; nothing is retried or cached.
//!
//! # Security
//!
//! The API key is never logged. The `Authorization` header is computed once
//! at construction and marked sensitive.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::FreshdeskError;
use crate::models::{ApiErrorBody, Paginated, QueryParams, DEFAULT_PER_PAGE};

/// Password half of the Basic credential; Freshdesk ignores it but requires one.
const BASIC_AUTH_PASSWORD: &str = "X";

/// Maximum length for error descriptions to avoid echoing huge bodies back.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Freshdesk API.
///
/// Cloning is cheap and clones share the connection pool. All state is
/// fixed at construction, so one client can serve concurrent tool calls.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = FreshdeskClient::new(&config)?;
///
/// let open = QueryParams::new().with("filter", "new_and_my_open");
/// let tickets = client.list_tickets(open, Some(50)).await?;
/// println!("{} tickets", tickets.total);
/// ```
#[derive(Clone)]
pub struct FreshdeskClient {
    /// The underlying HTTP client.
    http: Client,

    /// API base URL without trailing slash (e.g. `https://acme.freshdesk.com/api/v2`).
    base_url: String,

    /// Precomputed `Basic base64(api_key:X)` header.
    auth_header: HeaderValue,

    /// API key, kept only to scrub it from error text.
    /// SECURITY: Never log this value!
    api_key: String,

    /// Timeout applied to every request, reported in timeout errors.
    timeout: std::time::Duration,
}

impl FreshdeskClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `FreshdeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, FreshdeskError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FreshdeskError::HttpClient)?;

        let auth_header = Self::basic_auth_header(config.api_key())?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header,
            api_key: config.api_key().to_string(),
            timeout: config.timeout,
        })
    }

    /// Builds the `Authorization` header value for an API key.
    fn basic_auth_header(api_key: &str) -> Result<HeaderValue, FreshdeskError> {
        let encoded = STANDARD.encode(format!("{}:{}", api_key, BASIC_AUTH_PASSWORD));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|_| {
            FreshdeskError::invalid_config("FRESHDESK_API_KEY cannot be encoded as a header")
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// The API base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a reference to the API key for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub(crate) fn api_key_for_sanitization(&self) -> &str {
        &self.api_key
    }

    /// Tests connectivity by fetching the agent that owns the API key.
    ///
    /// # Errors
    ///
    /// Returns `FreshdeskError::ConnectionTest` with a hint about what to check.
    pub async fn test_connection(&self) -> Result<(), FreshdeskError> {
        tracing::debug!("Testing connection to Freshdesk");

        match self.get_current_agent().await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) if e.is_auth_failure() => Err(FreshdeskError::connection_test(
                "Authentication failed - verify FRESHDESK_API_KEY is correct",
            )),
            Err(FreshdeskError::Timeout { duration, .. }) => {
                Err(FreshdeskError::connection_test(format!(
                    "Connection timed out after {:?} - verify FRESHDESK_DOMAIN is correct and the helpdesk is reachable",
                    duration
                )))
            }
            Err(FreshdeskError::Http(e)) => {
                let message = FreshdeskError::sanitize_message(&e.to_string(), &self.api_key);
                Err(FreshdeskError::connection_test(format!(
                    "HTTP error: {} - verify FRESHDESK_DOMAIN is correct",
                    message
                )))
            }
            Err(e) => Err(FreshdeskError::connection_test(
                e.sanitized_display(&self.api_key),
            )),
        }
    }

    // ========================================================================
    // Request executor
    // ========================================================================

    /// Performs one authenticated request and normalizes the outcome.
    ///
    /// - `path` is appended to the base URL (e.g. `/tickets/42`).
    /// - `query` list values are sent as repeated keys.
    /// - `body` is serialized as JSON.
    ///
    /// A 204 response yields an empty JSON object; any other 2xx body is
    /// parsed and returned untouched.
    ///
    /// # Errors
    ///
    /// Returns `FreshdeskError::Api` for non-2xx statuses, `Timeout` or `Http`
    /// for transport failures, and `Serialization` for unparseable 2xx bodies.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value, FreshdeskError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(
            method = %method,
            path = %path,
            query_keys = query.map_or(0, QueryParams::len),
            "Making Freshdesk API request"
        );

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, self.auth_header.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(params) = query.filter(|p| !p.is_empty()) {
            req = req.query(&params.to_pairs());
        }

        if let Some(body) = body {
            req = req.body(serde_json::to_vec(body)?);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return FreshdeskError::timeout(self.timeout, format!("{} {}", method, path));
            }
            FreshdeskError::Http(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let body = response.text().await.map_err(FreshdeskError::Http)?;

        tracing::trace!(status = %status, bytes = body.len(), "Freshdesk API response");

        Ok(serde_json::from_str(&body)?)
    }

    /// Converts a non-2xx response into `FreshdeskError::Api`.
    ///
    /// The description comes from the body's `description` field when the
    /// body is a JSON object carrying one; otherwise it is the status line.
    async fn handle_http_error(&self, status: StatusCode, response: reqwest::Response) -> FreshdeskError {
        let body = response.text().await.unwrap_or_default();

        let (description, errors) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => (
                parsed
                    .description_text()
                    .unwrap_or_else(|| FreshdeskError::status_line(status)),
                parsed.errors,
            ),
            Err(_) => (FreshdeskError::status_line(status), None),
        };

        let description = FreshdeskError::sanitize_message(&description, &self.api_key);
        let description = truncate_on_char_boundary(&description, MAX_ERROR_BODY_LEN);

        tracing::warn!(status = %status, description = %description, "Freshdesk API returned an error");

        FreshdeskError::api(status, description, errors)
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Value, FreshdeskError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, FreshdeskError> {
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, FreshdeskError> {
        self.request(Method::PUT, path, None, Some(body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value, FreshdeskError> {
        self.request(Method::DELETE, path, None, None).await
    }

    // ========================================================================
    // Pagination driver
    // ========================================================================

    /// Fetches every page of a list endpoint, optionally stopping at a cap.
    ///
    /// Pages are requested one at a time with `page` and `per_page` layered
    /// over `params` (per_page defaults to 30). The walk stops when a page is
    /// empty or not an array, when `max_results` records have been collected
    /// (the result is truncated to exactly the cap), or when a page comes back
    /// shorter than `per_page`. A full final page therefore costs one extra,
    /// empty request.
    ///
    /// A `max_results` of zero means no cap.
    ///
    /// # Errors
    ///
    /// Any request failure aborts the walk; records already collected are dropped.
    pub async fn paginate(
        &self,
        path: &str,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        let per_page = params.per_page()?.unwrap_or(DEFAULT_PER_PAGE);
        let max_results = max_results.filter(|&cap| cap > 0);

        let mut results: Vec<Value> = Vec::new();
        let mut page: usize = 1;

        loop {
            let mut page_params = params.clone();
            page_params.set("page", page);
            page_params.set("per_page", per_page);

            let records = match self.get(path, Some(&page_params)).await? {
                Value::Array(records) => records,
                other => {
                    if other.as_object().map_or(!other.is_null(), |o| !o.is_empty()) {
                        tracing::debug!(path = %path, page, "List endpoint returned a non-array page, treating as exhausted");
                    }
                    Vec::new()
                }
            };

            if records.is_empty() {
                break;
            }

            let page_len = records.len();
            results.extend(records);

            if let Some(cap) = max_results {
                if results.len() >= cap {
                    results.truncate(cap);
                    break;
                }
            }

            if page_len < per_page {
                break;
            }

            page += 1;
        }

        tracing::debug!(path = %path, pages = page, records = results.len(), "Pagination finished");

        Ok(Paginated::new(results))
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Lists tickets, walking all pages.
    pub async fn list_tickets(
        &self,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        self.paginate("/tickets", params, max_results).await
    }

    /// Gets a single ticket, optionally embedding related data
    /// (`conversations`, `requester`, `company`, `stats`).
    pub async fn get_ticket(&self, id: u64, include: &[String]) -> Result<Value, FreshdeskError> {
        let path = format!("/tickets/{}", id);
        if include.is_empty() {
            return self.get(&path, None).await;
        }
        let params = QueryParams::new().with("include", include.join(","));
        self.get(&path, Some(&params)).await
    }

    /// Creates a ticket.
    pub async fn create_ticket(&self, ticket: &Value) -> Result<Value, FreshdeskError> {
        self.post("/tickets", ticket).await
    }

    /// Updates a ticket's properties.
    pub async fn update_ticket(&self, id: u64, changes: &Value) -> Result<Value, FreshdeskError> {
        self.put(&format!("/tickets/{}", id), changes).await
    }

    /// Moves a ticket to trash.
    pub async fn delete_ticket(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.delete(&format!("/tickets/{}", id)).await
    }

    /// Restores a ticket from trash.
    pub async fn restore_ticket(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.put(&format!("/tickets/{}/restore", id), &Value::Object(serde_json::Map::new()))
            .await
    }

    /// Lists replies and notes on a ticket.
    pub async fn list_conversations(&self, ticket_id: u64) -> Result<Value, FreshdeskError> {
        self.get(&format!("/tickets/{}/conversations", ticket_id), None)
            .await
    }

    /// Adds a public reply to a ticket.
    pub async fn add_reply(&self, ticket_id: u64, reply: &Value) -> Result<Value, FreshdeskError> {
        self.post(&format!("/tickets/{}/reply", ticket_id), reply).await
    }

    /// Adds a note to a ticket.
    pub async fn add_note(&self, ticket_id: u64, note: &Value) -> Result<Value, FreshdeskError> {
        self.post(&format!("/tickets/{}/notes", ticket_id), note).await
    }

    /// Runs a ticket search using the Freshdesk query language
    /// (e.g. `priority:4 AND status:2`).
    pub async fn search_tickets(&self, query: &str, page: Option<u32>) -> Result<Value, FreshdeskError> {
        let params = QueryParams::new()
            .with("query", format!("\"{}\"", query))
            .with_opt("page", page);
        self.get("/search/tickets", Some(&params)).await
    }

    // ========================================================================
    // Contacts, companies, agents, groups
    // ========================================================================

    /// Lists contacts, walking all pages.
    pub async fn list_contacts(
        &self,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        self.paginate("/contacts", params, max_results).await
    }

    /// Gets a single contact.
    pub async fn get_contact(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.get(&format!("/contacts/{}", id), None).await
    }

    /// Creates a contact.
    pub async fn create_contact(&self, contact: &Value) -> Result<Value, FreshdeskError> {
        self.post("/contacts", contact).await
    }

    /// Updates a contact's properties.
    pub async fn update_contact(&self, id: u64, changes: &Value) -> Result<Value, FreshdeskError> {
        self.put(&format!("/contacts/{}", id), changes).await
    }

    /// Soft-deletes a contact.
    pub async fn delete_contact(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.delete(&format!("/contacts/{}", id)).await
    }

    /// Runs a contact search using the Freshdesk query language
    /// (e.g. `email:'jane@example.com'`).
    pub async fn search_contacts(&self, query: &str, page: Option<u32>) -> Result<Value, FreshdeskError> {
        let params = QueryParams::new()
            .with("query", format!("\"{}\"", query))
            .with_opt("page", page);
        self.get("/search/contacts", Some(&params)).await
    }

    /// Merges secondary contacts into a primary one. The secondaries are deleted.
    pub async fn merge_contacts(
        &self,
        primary_id: u64,
        secondary_ids: &[u64],
    ) -> Result<Value, FreshdeskError> {
        let body = serde_json::json!({
            "primary_contact_id": primary_id,
            "secondary_contact_ids": secondary_ids,
        });
        self.post("/contacts/merge", &body).await
    }

    /// Lists companies, walking all pages.
    pub async fn list_companies(
        &self,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        self.paginate("/companies", params, max_results).await
    }

    /// Gets a single company.
    pub async fn get_company(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.get(&format!("/companies/{}", id), None).await
    }

    /// Creates a company.
    pub async fn create_company(&self, company: &Value) -> Result<Value, FreshdeskError> {
        self.post("/companies", company).await
    }

    /// Updates a company's properties.
    pub async fn update_company(&self, id: u64, changes: &Value) -> Result<Value, FreshdeskError> {
        self.put(&format!("/companies/{}", id), changes).await
    }

    /// Deletes a company. Its contacts are kept but unlinked.
    pub async fn delete_company(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.delete(&format!("/companies/{}", id)).await
    }

    /// Lists agents, walking all pages.
    pub async fn list_agents(
        &self,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        self.paginate("/agents", params, max_results).await
    }

    /// Gets a single agent.
    pub async fn get_agent(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.get(&format!("/agents/{}", id), None).await
    }

    /// Gets the agent that owns the API key.
    pub async fn get_current_agent(&self) -> Result<Value, FreshdeskError> {
        self.get("/agents/me", None).await
    }

    /// Lists groups, walking all pages.
    pub async fn list_groups(
        &self,
        params: QueryParams,
        max_results: Option<usize>,
    ) -> Result<Paginated, FreshdeskError> {
        self.paginate("/groups", params, max_results).await
    }

    /// Gets a single group.
    pub async fn get_group(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.get(&format!("/groups/{}", id), None).await
    }

    /// Creates a group.
    pub async fn create_group(&self, group: &Value) -> Result<Value, FreshdeskError> {
        self.post("/groups", group).await
    }

    /// Updates a group's properties.
    pub async fn update_group(&self, id: u64, changes: &Value) -> Result<Value, FreshdeskError> {
        self.put(&format!("/groups/{}", id), changes).await
    }

    /// Deletes a group.
    pub async fn delete_group(&self, id: u64) -> Result<Value, FreshdeskError> {
        self.delete(&format!("/groups/{}", id)).await
    }
}

/// Cuts `text` to at most `max_len` bytes without splitting a character.
fn truncate_on_char_boundary(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &text[..end])
}

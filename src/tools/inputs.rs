//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! Input structs with free-text fields implement `sanitize()` which trims
//! whitespace and drops empty optional strings. Structs that carry
//! constrained values also implement `validate()`. Both run before any
//! request is sent.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::FreshdeskError;
use crate::models::{QueryParams, TicketPriority, TicketSource, TicketStatus};

/// Largest page size the Freshdesk API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Search results are capped at 10 pages of 30 by Freshdesk.
pub const MAX_SEARCH_PAGE: u32 = 10;

/// Filters accepted by `GET /tickets?filter=`.
const TICKET_FILTERS: [&str; 4] = ["new_and_my_open", "watching", "spam", "deleted"];

/// Fields accepted by `order_by` on the ticket list.
const TICKET_ORDER_FIELDS: [&str; 4] = ["created_at", "due_by", "updated_at", "status"];

/// Contact states accepted by `GET /contacts?state=`.
const CONTACT_STATES: [&str; 4] = ["blocked", "deleted", "unverified", "verified"];

/// Agent types accepted by `GET /agents?state=`.
const AGENT_STATES: [&str; 2] = ["fulltime", "occasional"];

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Trims every entry of an optional list, dropping blanks and empty lists.
fn trim_list(list: &Option<Vec<String>>) -> Option<Vec<String>> {
    list.as_ref()
        .map(|items| {
            items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
}

fn check_one_of(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), FreshdeskError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(FreshdeskError::validation(format!(
            "{} must be one of {}, got: {:?}",
            field,
            allowed.join(", "),
            v
        ))),
        _ => Ok(()),
    }
}

fn check_per_page(per_page: Option<u32>) -> Result<(), FreshdeskError> {
    match per_page {
        Some(n) if n == 0 || n > MAX_PER_PAGE => Err(FreshdeskError::validation(format!(
            "per_page must be between 1 and {}, got: {}",
            MAX_PER_PAGE, n
        ))),
        _ => Ok(()),
    }
}

fn check_ticket_codes(
    status: Option<u8>,
    priority: Option<u8>,
    source: Option<u8>,
) -> Result<(), FreshdeskError> {
    if let Some(code) = status {
        TicketStatus::try_from(code)?;
    }
    if let Some(code) = priority {
        TicketPriority::try_from(code)?;
    }
    if let Some(code) = source {
        TicketSource::try_from(code)?;
    }
    Ok(())
}

/// Serializes a request body, keeping only the fields that were provided.
fn to_body<T: Serialize>(input: &T) -> Result<serde_json::Value, FreshdeskError> {
    Ok(serde_json::to_value(input)?)
}

// ============================================================================
// Tickets
// ============================================================================

/// Input parameters for the list_tickets tool.
///
/// All fields are optional - use them to filter the results.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTicketsInput {
    /// Predefined filter: 'new_and_my_open', 'watching', 'spam' or 'deleted'.
    #[serde(default)]
    pub filter: Option<String>,

    /// Only tickets raised by this contact ID.
    #[serde(default)]
    pub requester_id: Option<u64>,

    /// Only tickets raised by this requester email.
    #[serde(default)]
    pub email: Option<String>,

    /// Only tickets belonging to this company ID.
    #[serde(default)]
    pub company_id: Option<u64>,

    /// Only tickets updated after this timestamp (ISO 8601, e.g. 2024-01-31T00:00:00Z).
    #[serde(default)]
    pub updated_since: Option<String>,

    /// Sort field: 'created_at', 'due_by', 'updated_at' or 'status'.
    #[serde(default)]
    pub order_by: Option<String>,

    /// Sort direction: 'asc' or 'desc'.
    #[serde(default)]
    pub order_type: Option<String>,

    /// Results fetched per page (default: 30, max: 100).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Maximum total tickets to return across all pages.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl ListTicketsInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            filter: trim_option(&self.filter),
            email: trim_option(&self.email),
            updated_since: trim_option(&self.updated_since),
            order_by: trim_option(&self.order_by),
            order_type: trim_option(&self.order_type).map(|s| s.to_lowercase()),
            ..self
        }
    }

    /// Checks enumerated fields and the page size.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_one_of("filter", self.filter.as_deref(), &TICKET_FILTERS)?;
        check_one_of("order_by", self.order_by.as_deref(), &TICKET_ORDER_FIELDS)?;
        check_one_of("order_type", self.order_type.as_deref(), &["asc", "desc"])?;
        check_per_page(self.per_page)
    }

    /// Builds the query string for `GET /tickets`.
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("filter", self.filter.clone())
            .with_opt("requester_id", self.requester_id)
            .with_opt("email", self.email.clone())
            .with_opt("company_id", self.company_id)
            .with_opt("updated_since", self.updated_since.clone())
            .with_opt("order_by", self.order_by.clone())
            .with_opt("order_type", self.order_type.clone())
            .with_opt("per_page", self.per_page)
    }
}

/// Input parameters for tools that act on one ticket by ID.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketIdInput {
    /// The ticket ID.
    pub ticket_id: u64,
}

/// Input parameters for the get_ticket tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTicketInput {
    /// The ticket ID.
    pub ticket_id: u64,

    /// Related data to embed: 'conversations', 'requester', 'company', 'stats'.
    #[serde(default)]
    pub include: Option<Vec<String>>,
}

impl GetTicketInput {
    /// Sanitizes input by trimming the include list.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            include: trim_list(&self.include),
            ..self
        }
    }
}

/// Input parameters for the create_ticket tool.
///
/// Subject and description are required, plus one of email, phone or requester_id.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateTicketInput {
    /// Ticket subject.
    pub subject: String,

    /// Ticket description (HTML allowed).
    pub description: String,

    /// Requester email; a contact is created if it does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Requester phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Existing requester contact ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<u64>,

    /// Status: 2=Open, 3=Pending, 4=Resolved, 5=Closed, 6+ for custom statuses (default: 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,

    /// Priority: 1=Low, 2=Medium, 3=High, 4=Urgent (default: 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    /// Source: 1=Email, 2=Portal, 3=Phone, 7=Chat, 9=Feedback Widget, 10=Outbound Email, or a custom source code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<u8>,

    /// Ticket type as configured in the helpdesk (e.g. 'Question', 'Incident').
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,

    /// Group ID to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,

    /// Agent ID to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_id: Option<u64>,

    /// Company ID of the requester.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,

    /// Product ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,

    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// CC email addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<Vec<String>>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CreateTicketInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            subject: self.subject.trim().to_string(),
            description: self.description.trim().to_string(),
            email: trim_option(&self.email),
            phone: trim_option(&self.phone),
            ticket_type: trim_option(&self.ticket_type),
            tags: trim_list(&self.tags),
            cc_emails: trim_list(&self.cc_emails),
            ..self
        }
    }

    /// Checks required fields and enumerated codes.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if self.subject.is_empty() {
            return Err(FreshdeskError::validation("subject is required and cannot be empty"));
        }
        if self.description.is_empty() {
            return Err(FreshdeskError::validation(
                "description is required and cannot be empty",
            ));
        }
        if self.email.is_none() && self.phone.is_none() && self.requester_id.is_none() {
            return Err(FreshdeskError::validation(
                "one of email, phone or requester_id is required to identify the requester",
            ));
        }
        check_ticket_codes(self.status, self.priority, self.source)
    }

    /// Builds the JSON body for `POST /tickets`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the update_ticket tool.
///
/// Ticket ID is required. At least one other field must be provided.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct UpdateTicketInput {
    /// The ticket ID.
    #[serde(skip_serializing)]
    pub ticket_id: u64,

    /// New subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// New description (HTML allowed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Status: 2=Open, 3=Pending, 4=Resolved, 5=Closed, 6+ for custom statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,

    /// Priority: 1=Low, 2=Medium, 3=High, 4=Urgent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    /// Ticket type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,

    /// Group ID to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,

    /// Agent ID to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_id: Option<u64>,

    /// Tags (replaces the existing tags).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateTicketInput {
    /// Returns true if at least one field besides ticket_id is set.
    pub fn has_updates(&self) -> bool {
        self.subject.is_some()
            || self.description.is_some()
            || self.status.is_some()
            || self.priority.is_some()
            || self.ticket_type.is_some()
            || self.group_id.is_some()
            || self.responder_id.is_some()
            || self.tags.is_some()
            || self.custom_fields.is_some()
    }

    /// Sanitizes input by trimming whitespace from all string fields.
    ///
    /// Tags are trimmed but an explicit empty list is kept, since it clears them.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            subject: trim_option(&self.subject),
            description: trim_option(&self.description),
            ticket_type: trim_option(&self.ticket_type),
            tags: self.tags.map(|tags| {
                tags.into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            }),
            ..self
        }
    }

    /// Checks there is something to update and that codes are valid.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if !self.has_updates() {
            return Err(FreshdeskError::validation(
                "at least one field must be provided for update (subject, description, status, priority, type, group_id, responder_id, tags or custom_fields)",
            ));
        }
        check_ticket_codes(self.status, self.priority, None)
    }

    /// Builds the JSON body for `PUT /tickets/{id}`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the add_reply tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddReplyInput {
    /// The ticket ID.
    #[serde(skip_serializing)]
    pub ticket_id: u64,

    /// Reply content (HTML allowed).
    pub body: String,

    /// Sender address; must be a support email configured in the helpdesk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,

    /// ID of the agent sending the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    /// CC email addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<Vec<String>>,

    /// BCC email addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc_emails: Option<Vec<String>>,
}

impl AddReplyInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            body: self.body.trim().to_string(),
            from_email: trim_option(&self.from_email),
            cc_emails: trim_list(&self.cc_emails),
            bcc_emails: trim_list(&self.bcc_emails),
            ..self
        }
    }

    /// Checks the reply has content.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if self.body.is_empty() {
            return Err(FreshdeskError::validation("reply body is required and cannot be empty"));
        }
        Ok(())
    }

    /// Builds the JSON body for `POST /tickets/{id}/reply`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the add_note tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddNoteInput {
    /// The ticket ID.
    #[serde(skip_serializing)]
    pub ticket_id: u64,

    /// Note content (HTML allowed).
    pub body: String,

    /// ID of the agent adding the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    /// Agent email addresses to notify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_emails: Option<Vec<String>>,

    /// If false, the note is visible to the requester. Default: true (private).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl AddNoteInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            body: self.body.trim().to_string(),
            notify_emails: trim_list(&self.notify_emails),
            ..self
        }
    }

    /// Checks the note has content.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if self.body.is_empty() {
            return Err(FreshdeskError::validation("note body is required and cannot be empty"));
        }
        Ok(())
    }

    /// Returns whether the note will be private once defaults are applied.
    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(true)
    }

    /// Builds the JSON body for `POST /tickets/{id}/notes`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        let mut body = to_body(self)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("private".to_string(), serde_json::json!(self.is_private()));
        }
        Ok(body)
    }
}

/// Input parameters for the search_tickets and search_contacts tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Freshdesk query language, e.g. "status:2 AND priority:4" for tickets
    /// or "email:'jane@example.com'" for contacts.
    pub query: String,

    /// Page number, 1-10 (30 results per page).
    #[serde(default)]
    pub page: Option<u32>,
}

impl SearchInput {
    /// Sanitizes input by trimming the query and stripping wrapping quotes,
    /// which the client adds itself.
    #[must_use]
    pub fn sanitize(self) -> Self {
        let query = self.query.trim();
        let query = query
            .strip_prefix('"')
            .and_then(|q| q.strip_suffix('"'))
            .unwrap_or(query);
        Self {
            query: query.trim().to_string(),
            page: self.page,
        }
    }

    /// Checks the query is present and the page is in range.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if self.query.is_empty() {
            return Err(FreshdeskError::validation("query is required and cannot be empty"));
        }
        match self.page {
            Some(p) if p == 0 || p > MAX_SEARCH_PAGE => Err(FreshdeskError::validation(format!(
                "page must be between 1 and {}, got: {}",
                MAX_SEARCH_PAGE, p
            ))),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Contacts, companies, agents, groups
// ============================================================================

/// Input parameters for the list_contacts tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListContactsInput {
    /// Only the contact with this email.
    #[serde(default)]
    pub email: Option<String>,

    /// Only contacts with this phone number.
    #[serde(default)]
    pub phone: Option<String>,

    /// Only contacts with this mobile number.
    #[serde(default)]
    pub mobile: Option<String>,

    /// Only contacts belonging to this company ID.
    #[serde(default)]
    pub company_id: Option<u64>,

    /// Contact state: 'blocked', 'deleted', 'unverified' or 'verified'.
    #[serde(default)]
    pub state: Option<String>,

    /// Only contacts updated after this timestamp (ISO 8601).
    #[serde(default)]
    pub updated_since: Option<String>,

    /// Results fetched per page (default: 30, max: 100).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Maximum total contacts to return across all pages.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl ListContactsInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            email: trim_option(&self.email),
            phone: trim_option(&self.phone),
            mobile: trim_option(&self.mobile),
            state: trim_option(&self.state).map(|s| s.to_lowercase()),
            updated_since: trim_option(&self.updated_since),
            ..self
        }
    }

    /// Checks the state filter and page size.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_one_of("state", self.state.as_deref(), &CONTACT_STATES)?;
        check_per_page(self.per_page)
    }

    /// Builds the query string for `GET /contacts`.
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("email", self.email.clone())
            .with_opt("phone", self.phone.clone())
            .with_opt("mobile", self.mobile.clone())
            .with_opt("company_id", self.company_id)
            .with_opt("state", self.state.clone())
            .with_opt("_updated_since", self.updated_since.clone())
            .with_opt("per_page", self.per_page)
    }
}

/// Input parameters for the list_agents tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListAgentsInput {
    /// Only the agent with this email.
    #[serde(default)]
    pub email: Option<String>,

    /// Only agents with this phone number.
    #[serde(default)]
    pub phone: Option<String>,

    /// Only agents with this mobile number.
    #[serde(default)]
    pub mobile: Option<String>,

    /// Agent type: 'fulltime' or 'occasional'.
    #[serde(default)]
    pub state: Option<String>,

    /// Results fetched per page (default: 30, max: 100).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Maximum total agents to return across all pages.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl ListAgentsInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            email: trim_option(&self.email),
            phone: trim_option(&self.phone),
            mobile: trim_option(&self.mobile),
            state: trim_option(&self.state).map(|s| s.to_lowercase()),
            ..self
        }
    }

    /// Checks the agent type and page size.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_one_of("state", self.state.as_deref(), &AGENT_STATES)?;
        check_per_page(self.per_page)
    }

    /// Builds the query string for `GET /agents`.
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("email", self.email.clone())
            .with_opt("phone", self.phone.clone())
            .with_opt("mobile", self.mobile.clone())
            .with_opt("state", self.state.clone())
            .with_opt("per_page", self.per_page)
    }
}

/// Input parameters for list tools that only page (companies, groups).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListPageInput {
    /// Results fetched per page (default: 30, max: 100).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Maximum total records to return across all pages.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl ListPageInput {
    /// Checks the page size.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_per_page(self.per_page)
    }

    /// Builds the query string carrying only the page size.
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new().with_opt("per_page", self.per_page)
    }
}

/// Input parameters for the get_contact and delete_contact tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContactIdInput {
    /// The contact ID.
    pub contact_id: u64,
}

/// Input parameters for the get_company and delete_company tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompanyIdInput {
    /// The company ID.
    pub company_id: u64,
}

/// Input parameters for the get_agent tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AgentIdInput {
    /// The agent ID.
    pub agent_id: u64,
}

/// Input parameters for the get_group and delete_group tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GroupIdInput {
    /// The group ID.
    pub group_id: u64,
}

// ============================================================================
// Directory writes
// ============================================================================

/// Fails when an update body carries no fields.
fn check_has_updates(body: &serde_json::Value, fields: &str) -> Result<(), FreshdeskError> {
    if body.as_object().is_some_and(|o| o.is_empty()) {
        return Err(FreshdeskError::validation(format!(
            "at least one field must be provided for update ({})",
            fields
        )));
    }
    Ok(())
}

fn check_name(name: &str, what: &str) -> Result<(), FreshdeskError> {
    if name.is_empty() {
        return Err(FreshdeskError::validation(format!(
            "{} name is required and cannot be empty",
            what
        )));
    }
    Ok(())
}

/// Input parameters for the create_contact tool.
///
/// Name is required, plus one of email, phone or mobile.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateContactInput {
    /// Full name.
    pub name: String,

    /// Primary email; must be unique in the helpdesk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Mobile number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// Company ID the contact belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,

    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CreateContactInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: trim_option(&self.email),
            phone: trim_option(&self.phone),
            mobile: trim_option(&self.mobile),
            job_title: trim_option(&self.job_title),
            tags: trim_list(&self.tags),
            ..self
        }
    }

    /// Checks the name and that the contact can be reached.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_name(&self.name, "contact")?;
        if self.email.is_none() && self.phone.is_none() && self.mobile.is_none() {
            return Err(FreshdeskError::validation(
                "one of email, phone or mobile is required for a contact",
            ));
        }
        Ok(())
    }

    /// Builds the JSON body for `POST /contacts`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the update_contact tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct UpdateContactInput {
    /// The contact ID.
    #[serde(skip_serializing)]
    pub contact_id: u64,

    /// New full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New primary email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// New phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// New mobile number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// New company ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,

    /// New job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Tags (replaces the existing tags).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateContactInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: trim_option(&self.name),
            email: trim_option(&self.email),
            phone: trim_option(&self.phone),
            mobile: trim_option(&self.mobile),
            job_title: trim_option(&self.job_title),
            ..self
        }
    }

    /// Builds the JSON body for `PUT /contacts/{id}`, refusing an empty one.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        let body = to_body(self)?;
        check_has_updates(
            &body,
            "name, email, phone, mobile, company_id, job_title, tags or custom_fields",
        )?;
        Ok(body)
    }
}

/// Input parameters for the merge_contacts tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MergeContactsInput {
    /// Contact that survives the merge.
    pub primary_contact_id: u64,

    /// Contacts folded into the primary and then deleted.
    pub secondary_contact_ids: Vec<u64>,
}

impl MergeContactsInput {
    /// Checks there is something to merge and the primary is not merged into itself.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        if self.secondary_contact_ids.is_empty() {
            return Err(FreshdeskError::validation(
                "secondary_contact_ids must list at least one contact",
            ));
        }
        if self.secondary_contact_ids.contains(&self.primary_contact_id) {
            return Err(FreshdeskError::validation(
                "secondary_contact_ids cannot include the primary contact",
            ));
        }
        Ok(())
    }
}

/// Input parameters for the create_company tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateCompanyInput {
    /// Company name; must be unique.
    pub name: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Email domains; contacts with these domains join the company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,

    /// Internal note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Industry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CreateCompanyInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: trim_option(&self.description),
            domains: trim_list(&self.domains),
            note: trim_option(&self.note),
            industry: trim_option(&self.industry),
            ..self
        }
    }

    /// Checks the name is present.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_name(&self.name, "company")
    }

    /// Builds the JSON body for `POST /companies`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the update_company tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct UpdateCompanyInput {
    /// The company ID.
    #[serde(skip_serializing)]
    pub company_id: u64,

    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Email domains (replaces the existing list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,

    /// New internal note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// New industry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Custom field values keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateCompanyInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: trim_option(&self.name),
            description: trim_option(&self.description),
            note: trim_option(&self.note),
            industry: trim_option(&self.industry),
            ..self
        }
    }

    /// Builds the JSON body for `PUT /companies/{id}`, refusing an empty one.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        let body = to_body(self)?;
        check_has_updates(
            &body,
            "name, description, domains, note, industry or custom_fields",
        )?;
        Ok(body)
    }
}

/// Input parameters for the create_group tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateGroupInput {
    /// Group name; must be unique.
    pub name: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Agents in the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_ids: Option<Vec<u64>>,

    /// Agent notified when a ticket stays unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to: Option<u64>,

    /// Delay before escalation, e.g. "30m", "1h", "2d".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_for: Option<String>,
}

impl CreateGroupInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: trim_option(&self.description),
            unassigned_for: trim_option(&self.unassigned_for),
            ..self
        }
    }

    /// Checks the name is present.
    pub fn validate(&self) -> Result<(), FreshdeskError> {
        check_name(&self.name, "group")
    }

    /// Builds the JSON body for `POST /groups`.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        to_body(self)
    }
}

/// Input parameters for the update_group tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct UpdateGroupInput {
    /// The group ID.
    #[serde(skip_serializing)]
    pub group_id: u64,

    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Agents in the group (replaces the existing list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_ids: Option<Vec<u64>>,

    /// Agent notified when a ticket stays unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to: Option<u64>,

    /// Delay before escalation, e.g. "30m", "1h", "2d".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_for: Option<String>,
}

impl UpdateGroupInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: trim_option(&self.name),
            description: trim_option(&self.description),
            unassigned_for: trim_option(&self.unassigned_for),
            ..self
        }
    }

    /// Builds the JSON body for `PUT /groups/{id}`, refusing an empty one.
    pub fn to_body(&self) -> Result<serde_json::Value, FreshdeskError> {
        let body = to_body(self)?;
        check_has_updates(
            &body,
            "name, description, agent_ids, escalate_to or unassigned_for",
        )?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryValue;
    use serde_json::json;

    // ========================================================================
    // Sanitization tests
    // ========================================================================

    #[test]
    fn test_trim_option_trims_whitespace() {
        let s = Some("  hello  ".to_string());
        assert_eq!(trim_option(&s), Some("hello".to_string()));
    }

    #[test]
    fn test_trim_option_filters_empty() {
        let s = Some("   ".to_string());
        assert_eq!(trim_option(&s), None);
    }

    #[test]
    fn test_trim_list_drops_blanks_and_empty_lists() {
        let list = Some(vec!["  a ".to_string(), "   ".to_string()]);
        assert_eq!(trim_list(&list), Some(vec!["a".to_string()]));
        assert_eq!(trim_list(&Some(vec![" ".to_string()])), None);
        assert_eq!(trim_list(&None), None);
    }

    #[test]
    fn test_list_tickets_input_sanitize_and_query() {
        let input = ListTicketsInput {
            filter: Some("  watching ".to_string()),
            email: Some("   ".to_string()),
            company_id: Some(9),
            order_type: Some(" DESC ".to_string()),
            per_page: Some(50),
            max_results: Some(120),
            ..Default::default()
        }
        .sanitize();

        assert_eq!(input.filter.as_deref(), Some("watching"));
        assert_eq!(input.email, None);
        assert_eq!(input.order_type.as_deref(), Some("desc"));
        assert!(input.validate().is_ok());

        let query = input.to_query();
        assert_eq!(query.get("filter"), Some(&QueryValue::from("watching")));
        assert_eq!(query.get("company_id"), Some(&QueryValue::from("9")));
        assert_eq!(query.get("per_page"), Some(&QueryValue::from("50")));
        assert!(query.get("email").is_none());
        assert!(query.get("max_results").is_none());
    }

    #[test]
    fn test_list_tickets_input_rejects_bad_values() {
        let input = ListTicketsInput {
            filter: Some("everything".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = ListTicketsInput {
            per_page: Some(101),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("per_page"));

        let input = ListTicketsInput {
            order_type: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_get_ticket_input_sanitize() {
        let input: GetTicketInput =
            serde_json::from_str(r#"{"ticket_id": 7, "include": [" stats ", ""]}"#).unwrap();
        let input = input.sanitize();
        assert_eq!(input.ticket_id, 7);
        assert_eq!(input.include, Some(vec!["stats".to_string()]));
    }

    // ========================================================================
    // Write inputs
    // ========================================================================

    #[test]
    fn test_create_ticket_input_body_skips_missing_fields() {
        let json = r#"{
            "subject": "  Printer on fire ",
            "description": "<p>Smoke everywhere</p>",
            "email": "jane@example.com",
            "priority": 4,
            "type": "Incident",
            "tags": ["hardware", " "]
        }"#;
        let input: CreateTicketInput = serde_json::from_str(json).unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());

        let body = input.to_body().unwrap();
        assert_eq!(
            body,
            json!({
                "subject": "Printer on fire",
                "description": "<p>Smoke everywhere</p>",
                "email": "jane@example.com",
                "priority": 4,
                "type": "Incident",
                "tags": ["hardware"]
            })
        );
    }

    #[test]
    fn test_create_ticket_input_requires_requester() {
        let input: CreateTicketInput =
            serde_json::from_str(r#"{"subject": "S", "description": "D"}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("requester"));
    }

    #[test]
    fn test_create_ticket_input_rejects_bad_codes() {
        let input: CreateTicketInput = serde_json::from_str(
            r#"{"subject": "S", "description": "D", "requester_id": 1, "status": 1}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());

        let input: CreateTicketInput = serde_json::from_str(
            r#"{"subject": "S", "description": "D", "requester_id": 1, "priority": 5}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());

        let input: CreateTicketInput = serde_json::from_str(
            r#"{"subject": "S", "description": "D", "requester_id": 1, "source": 0}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_ticket_input_passes_custom_source_through() {
        let input: CreateTicketInput = serde_json::from_str(
            r#"{"subject": "S", "description": "D", "requester_id": 1, "source": 8}"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.to_body().unwrap()["source"], 8);
    }

    #[test]
    fn test_update_ticket_input_accepts_custom_status() {
        let input: UpdateTicketInput =
            serde_json::from_str(r#"{"ticket_id": 1, "status": 6}"#).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.to_body().unwrap(), json!({"status": 6}));
    }

    #[test]
    fn test_update_ticket_input_has_updates() {
        let input: UpdateTicketInput = serde_json::from_str(r#"{"ticket_id": 123}"#).unwrap();
        assert!(!input.has_updates());
        assert!(input.validate().is_err());

        let input: UpdateTicketInput =
            serde_json::from_str(r#"{"ticket_id": 123, "status": 4}"#).unwrap();
        assert!(input.has_updates());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_ticket_input_body_omits_ticket_id() {
        let input: UpdateTicketInput = serde_json::from_str(
            r#"{"ticket_id": 123, "responder_id": 55, "tags": []}"#,
        )
        .unwrap();
        let body = input.sanitize().to_body().unwrap();
        assert_eq!(body, json!({"responder_id": 55, "tags": []}));
    }

    #[test]
    fn test_add_reply_input() {
        let input: AddReplyInput = serde_json::from_str(
            r#"{"ticket_id": 5, "body": "  Thanks!  ", "cc_emails": ["boss@example.com"]}"#,
        )
        .unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());
        assert_eq!(
            input.to_body().unwrap(),
            json!({"body": "Thanks!", "cc_emails": ["boss@example.com"]})
        );
    }

    #[test]
    fn test_add_note_defaults_to_private() {
        let input: AddNoteInput =
            serde_json::from_str(r#"{"ticket_id": 5, "body": "internal"}"#).unwrap();
        assert!(input.is_private());
        assert_eq!(
            input.to_body().unwrap(),
            json!({"body": "internal", "private": true})
        );

        let input: AddNoteInput =
            serde_json::from_str(r#"{"ticket_id": 5, "body": "public", "private": false}"#)
                .unwrap();
        assert_eq!(
            input.to_body().unwrap(),
            json!({"body": "public", "private": false})
        );
    }

    #[test]
    fn test_add_note_rejects_blank_body() {
        let input: AddNoteInput =
            serde_json::from_str(r#"{"ticket_id": 5, "body": "   "}"#).unwrap();
        assert!(input.sanitize().validate().is_err());
    }

    #[test]
    fn test_search_tickets_input_strips_quotes() {
        let input = SearchInput {
            query: r#"  "priority:4 AND status:2"  "#.to_string(),
            page: Some(2),
        }
        .sanitize();
        assert_eq!(input.query, "priority:4 AND status:2");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_search_tickets_input_page_bounds() {
        let input = SearchInput {
            query: "status:2".to_string(),
            page: Some(11),
        };
        assert!(input.validate().is_err());

        let input = SearchInput {
            query: "   ".to_string(),
            page: None,
        }
        .sanitize();
        assert!(input.validate().is_err());
    }

    // ========================================================================
    // Directory inputs
    // ========================================================================

    #[test]
    fn test_list_contacts_input_query() {
        let input: ListContactsInput = serde_json::from_str(
            r#"{"email": " jane@example.com ", "state": "Verified", "updated_since": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());

        let query = input.to_query();
        assert_eq!(query.get("email"), Some(&QueryValue::from("jane@example.com")));
        assert_eq!(query.get("state"), Some(&QueryValue::from("verified")));
        assert_eq!(
            query.get("_updated_since"),
            Some(&QueryValue::from("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_list_agents_input_rejects_unknown_state() {
        let input = ListAgentsInput {
            state: Some("parttime".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = ListAgentsInput {
            state: Some("occasional".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_contact_input() {
        let input: CreateContactInput =
            serde_json::from_value(json!({"name": " Jane Doe ", "mobile": " 555-0100 "})).unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());
        assert_eq!(
            input.to_body().unwrap(),
            json!({"name": "Jane Doe", "mobile": "555-0100"})
        );

        let input: CreateContactInput =
            serde_json::from_value(json!({"name": "No Reach"})).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_contact_input_refuses_empty_body() {
        let input: UpdateContactInput =
            serde_json::from_value(json!({"contact_id": 4, "name": "   "})).unwrap();
        let err = input.sanitize().to_body().unwrap_err();
        assert!(err.to_string().contains("at least one field"));

        let input: UpdateContactInput =
            serde_json::from_value(json!({"contact_id": 4, "company_id": 9})).unwrap();
        assert_eq!(input.to_body().unwrap(), json!({"company_id": 9}));
    }

    #[test]
    fn test_merge_contacts_input_validation() {
        let input = MergeContactsInput {
            primary_contact_id: 1,
            secondary_contact_ids: vec![],
        };
        assert!(input.validate().is_err());

        let input = MergeContactsInput {
            primary_contact_id: 1,
            secondary_contact_ids: vec![2, 1],
        };
        assert!(input.validate().is_err());

        let input = MergeContactsInput {
            primary_contact_id: 1,
            secondary_contact_ids: vec![2, 3],
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_company_inputs() {
        let input: CreateCompanyInput = serde_json::from_value(
            json!({"name": "Acme", "domains": [" acme.com ", ""]}),
        )
        .unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());
        assert_eq!(
            input.to_body().unwrap(),
            json!({"name": "Acme", "domains": ["acme.com"]})
        );

        let input: CreateCompanyInput = serde_json::from_value(json!({"name": "  "})).unwrap();
        assert!(input.sanitize().validate().is_err());

        let input: UpdateCompanyInput =
            serde_json::from_value(json!({"company_id": 8})).unwrap();
        assert!(input.to_body().is_err());
    }

    #[test]
    fn test_group_inputs() {
        let input: CreateGroupInput = serde_json::from_value(
            json!({"name": "Billing", "agent_ids": [3, 4], "unassigned_for": " 30m "}),
        )
        .unwrap();
        let input = input.sanitize();
        assert!(input.validate().is_ok());
        assert_eq!(
            input.to_body().unwrap(),
            json!({"name": "Billing", "agent_ids": [3, 4], "unassigned_for": "30m"})
        );

        let input: UpdateGroupInput =
            serde_json::from_value(json!({"group_id": 2, "escalate_to": 11})).unwrap();
        assert_eq!(input.to_body().unwrap(), json!({"escalate_to": 11}));
    }

    #[test]
    fn test_list_page_input() {
        let input: ListPageInput = serde_json::from_str("{}").unwrap();
        assert!(input.validate().is_ok());
        assert!(input.to_query().is_empty());

        let input: ListPageInput = serde_json::from_str(r#"{"per_page": 0}"#).unwrap();
        assert!(input.validate().is_err());
    }
}

//! MCP server implementation for Freshdesk.
//!
//! This module defines the `FreshdeskServer` struct that implements the MCP
//! `ServerHandler` trait, exposing Freshdesk helpdesk operations as tools.
//! Every tool is a thin delegate to [`FreshdeskClient`]; results are returned
//! as pretty-printed JSON.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Serialize;

use crate::error::FreshdeskError;
use crate::freshdesk_client::FreshdeskClient;
use crate::tools::{
    AddNoteInput, AddReplyInput, AgentIdInput, CompanyIdInput, ContactIdInput,
    CreateCompanyInput, CreateContactInput, CreateGroupInput, CreateTicketInput, GetTicketInput,
    GroupIdInput, ListAgentsInput, ListContactsInput, ListPageInput, ListTicketsInput,
    MergeContactsInput, SearchInput, TicketIdInput, UpdateCompanyInput, UpdateContactInput,
    UpdateGroupInput, UpdateTicketInput,
};

/// The Freshdesk MCP server.
///
/// This server exposes Freshdesk ticket, contact, company, agent and group
/// operations as MCP tools.
#[derive(Clone)]
pub struct FreshdeskServer {
    /// Freshdesk client for API operations.
    client: FreshdeskClient,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FreshdeskServer {
    /// Creates a new server instance around a configured client.
    pub fn new(client: FreshdeskClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// A simple ping tool to verify the server is running.
    ///
    /// Returns "pong" on success.
    #[tool(description = "Test connectivity to the Freshdesk MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// List tickets across all pages, honoring filters and a result cap.
    #[tool(description = "List Freshdesk tickets. Filter by predefined filter, requester, company or update time, and sort by created_at, due_by, updated_at or status. Fetches all pages unless max_results is set. Returns {results, total}.")]
    async fn list_tickets(
        &self,
        Parameters(input): Parameters<ListTicketsInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "list_tickets tool called");
        input.validate().map_err(|e| e.to_string())?;

        let tickets = self
            .client
            .list_tickets(input.to_query(), cap(input.max_results))
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list tickets");
                format!("Failed to list tickets: {}", sanitized)
            })?;

        to_pretty_json(&tickets)
    }

    /// Get one ticket, optionally with embedded related data.
    #[tool(description = "Get full details of a single Freshdesk ticket. Use include to embed 'conversations', 'requester', 'company' or 'stats'.")]
    async fn get_ticket(
        &self,
        Parameters(input): Parameters<GetTicketInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, "get_ticket tool called");

        let include = input.include.clone().unwrap_or_default();
        let ticket = self
            .client
            .get_ticket(input.ticket_id, &include)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to get ticket");
                format!("Failed to get ticket {}: {}", input.ticket_id, sanitized)
            })?;

        to_pretty_json(&ticket)
    }

    #[tool(description = "Create a Freshdesk ticket. Subject and description are required, plus one of email, phone or requester_id. Status: 2=Open, 3=Pending, 4=Resolved, 5=Closed, or a custom status (6+). Priority: 1=Low to 4=Urgent.")]
    async fn create_ticket(
        &self,
        Parameters(input): Parameters<CreateTicketInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(subject = %input.subject, "create_ticket tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let ticket = self.client.create_ticket(&body).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to create ticket");
            format!("Failed to create ticket: {}", sanitized)
        })?;

        to_pretty_json(&ticket)
    }

    #[tool(description = "Update a Freshdesk ticket's subject, description, status (custom statuses 6+ allowed), priority, type, assignment, tags or custom fields. Ticket ID is required.")]
    async fn update_ticket(
        &self,
        Parameters(input): Parameters<UpdateTicketInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, "update_ticket tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let ticket = self
            .client
            .update_ticket(input.ticket_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to update ticket");
                format!("Failed to update ticket {}: {}", input.ticket_id, sanitized)
            })?;

        to_pretty_json(&ticket)
    }

    #[tool(description = "Move a Freshdesk ticket to trash. It can be brought back with restore_ticket.")]
    async fn delete_ticket(
        &self,
        Parameters(input): Parameters<TicketIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(ticket_id = input.ticket_id, "delete_ticket tool called");

        self.client
            .delete_ticket(input.ticket_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to delete ticket");
                format!("Failed to delete ticket {}: {}", input.ticket_id, sanitized)
            })?;

        Ok(format!("Ticket {} moved to trash.", input.ticket_id))
    }

    #[tool(description = "Restore a Freshdesk ticket from trash.")]
    async fn restore_ticket(
        &self,
        Parameters(input): Parameters<TicketIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(ticket_id = input.ticket_id, "restore_ticket tool called");

        self.client
            .restore_ticket(input.ticket_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to restore ticket");
                format!("Failed to restore ticket {}: {}", input.ticket_id, sanitized)
            })?;

        Ok(format!("Ticket {} restored.", input.ticket_id))
    }

    #[tool(description = "List the replies and notes on a Freshdesk ticket, oldest first.")]
    async fn list_conversations(
        &self,
        Parameters(input): Parameters<TicketIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(ticket_id = input.ticket_id, "list_conversations tool called");

        let conversations = self
            .client
            .list_conversations(input.ticket_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to list conversations");
                format!(
                    "Failed to list conversations for ticket {}: {}",
                    input.ticket_id, sanitized
                )
            })?;

        to_pretty_json(&conversations)
    }

    /// Reply to the requester; the reply is emailed to them.
    #[tool(description = "Add a public reply to a Freshdesk ticket. The requester is emailed. Ticket ID and body are required.")]
    async fn add_reply(
        &self,
        Parameters(input): Parameters<AddReplyInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, "add_reply tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let reply = self
            .client
            .add_reply(input.ticket_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to add reply");
                format!("Failed to add reply to ticket {}: {}", input.ticket_id, sanitized)
            })?;

        to_pretty_json(&reply)
    }

    #[tool(description = "Add a note to a Freshdesk ticket. Notes are private (agents only) unless private is false. Ticket ID and body are required.")]
    async fn add_note(
        &self,
        Parameters(input): Parameters<AddNoteInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, private = input.is_private(), "add_note tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let note = self
            .client
            .add_note(input.ticket_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = input.ticket_id, "Failed to add note");
                format!("Failed to add note to ticket {}: {}", input.ticket_id, sanitized)
            })?;

        to_pretty_json(&note)
    }

    #[tool(description = "Search Freshdesk tickets with the Freshdesk query language, e.g. \"priority:4 AND status:2\" or \"tag:'billing'\". Returns up to 30 results per page, pages 1-10.")]
    async fn search_tickets(
        &self,
        Parameters(input): Parameters<SearchInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(query = %input.query, page = ?input.page, "search_tickets tool called");
        input.validate().map_err(|e| e.to_string())?;

        let results = self
            .client
            .search_tickets(&input.query, input.page)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to search tickets");
                format!("Failed to search tickets: {}", sanitized)
            })?;

        to_pretty_json(&results)
    }

    // ========================================================================
    // Contacts and companies
    // ========================================================================

    #[tool(description = "List Freshdesk contacts. Filter by email, phone, mobile, company_id, state or update time. Fetches all pages unless max_results is set. Returns {results, total}.")]
    async fn list_contacts(
        &self,
        Parameters(input): Parameters<ListContactsInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "list_contacts tool called");
        input.validate().map_err(|e| e.to_string())?;

        let contacts = self
            .client
            .list_contacts(input.to_query(), cap(input.max_results))
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list contacts");
                format!("Failed to list contacts: {}", sanitized)
            })?;

        to_pretty_json(&contacts)
    }

    #[tool(description = "Get a single Freshdesk contact by ID.")]
    async fn get_contact(
        &self,
        Parameters(input): Parameters<ContactIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(contact_id = input.contact_id, "get_contact tool called");

        let contact = self
            .client
            .get_contact(input.contact_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, contact_id = input.contact_id, "Failed to get contact");
                format!("Failed to get contact {}: {}", input.contact_id, sanitized)
            })?;

        to_pretty_json(&contact)
    }

    #[tool(description = "Create a Freshdesk contact. Name is required, plus one of email, phone or mobile.")]
    async fn create_contact(
        &self,
        Parameters(input): Parameters<CreateContactInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(name = %input.name, "create_contact tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let contact = self.client.create_contact(&body).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to create contact");
            format!("Failed to create contact: {}", sanitized)
        })?;

        to_pretty_json(&contact)
    }

    #[tool(description = "Update a Freshdesk contact's name, email, phone, mobile, company, job title, tags or custom fields. Contact ID is required.")]
    async fn update_contact(
        &self,
        Parameters(input): Parameters<UpdateContactInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(contact_id = input.contact_id, "update_contact tool called");

        let body = input.to_body().map_err(|e| e.to_string())?;
        let contact = self
            .client
            .update_contact(input.contact_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, contact_id = input.contact_id, "Failed to update contact");
                format!("Failed to update contact {}: {}", input.contact_id, sanitized)
            })?;

        to_pretty_json(&contact)
    }

    #[tool(description = "Soft-delete a Freshdesk contact. Their tickets are kept.")]
    async fn delete_contact(
        &self,
        Parameters(input): Parameters<ContactIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(contact_id = input.contact_id, "delete_contact tool called");

        self.client
            .delete_contact(input.contact_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, contact_id = input.contact_id, "Failed to delete contact");
                format!("Failed to delete contact {}: {}", input.contact_id, sanitized)
            })?;

        Ok(format!("Contact {} deleted.", input.contact_id))
    }

    #[tool(description = "Search Freshdesk contacts with the Freshdesk query language, e.g. \"email:'jane@example.com'\" or \"company_id:42\". Returns up to 30 results per page, pages 1-10.")]
    async fn search_contacts(
        &self,
        Parameters(input): Parameters<SearchInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(query = %input.query, page = ?input.page, "search_contacts tool called");
        input.validate().map_err(|e| e.to_string())?;

        let results = self
            .client
            .search_contacts(&input.query, input.page)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to search contacts");
                format!("Failed to search contacts: {}", sanitized)
            })?;

        to_pretty_json(&results)
    }

    /// Merge duplicates into one contact; the secondaries are deleted.
    #[tool(description = "Merge duplicate Freshdesk contacts into a primary contact. Tickets move to the primary and the secondary contacts are deleted.")]
    async fn merge_contacts(
        &self,
        Parameters(input): Parameters<MergeContactsInput>,
    ) -> Result<String, String> {
        tracing::debug!(
            primary_contact_id = input.primary_contact_id,
            secondaries = input.secondary_contact_ids.len(),
            "merge_contacts tool called"
        );
        input.validate().map_err(|e| e.to_string())?;

        self.client
            .merge_contacts(input.primary_contact_id, &input.secondary_contact_ids)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, primary_contact_id = input.primary_contact_id, "Failed to merge contacts");
                format!(
                    "Failed to merge contacts into {}: {}",
                    input.primary_contact_id, sanitized
                )
            })?;

        Ok(format!(
            "Merged {} contact(s) into contact {}.",
            input.secondary_contact_ids.len(),
            input.primary_contact_id
        ))
    }

    #[tool(description = "List Freshdesk companies. Fetches all pages unless max_results is set. Returns {results, total}.")]
    async fn list_companies(
        &self,
        Parameters(input): Parameters<ListPageInput>,
    ) -> Result<String, String> {
        tracing::debug!(?input, "list_companies tool called");
        input.validate().map_err(|e| e.to_string())?;

        let companies = self
            .client
            .list_companies(input.to_query(), cap(input.max_results))
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list companies");
                format!("Failed to list companies: {}", sanitized)
            })?;

        to_pretty_json(&companies)
    }

    #[tool(description = "Get a single Freshdesk company by ID.")]
    async fn get_company(
        &self,
        Parameters(input): Parameters<CompanyIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(company_id = input.company_id, "get_company tool called");

        let company = self
            .client
            .get_company(input.company_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, company_id = input.company_id, "Failed to get company");
                format!("Failed to get company {}: {}", input.company_id, sanitized)
            })?;

        to_pretty_json(&company)
    }

    #[tool(description = "Create a Freshdesk company. Name is required; domains link contacts by email domain.")]
    async fn create_company(
        &self,
        Parameters(input): Parameters<CreateCompanyInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(name = %input.name, "create_company tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let company = self.client.create_company(&body).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to create company");
            format!("Failed to create company: {}", sanitized)
        })?;

        to_pretty_json(&company)
    }

    #[tool(description = "Update a Freshdesk company's name, description, domains, note, industry or custom fields. Company ID is required.")]
    async fn update_company(
        &self,
        Parameters(input): Parameters<UpdateCompanyInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(company_id = input.company_id, "update_company tool called");

        let body = input.to_body().map_err(|e| e.to_string())?;
        let company = self
            .client
            .update_company(input.company_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, company_id = input.company_id, "Failed to update company");
                format!("Failed to update company {}: {}", input.company_id, sanitized)
            })?;

        to_pretty_json(&company)
    }

    #[tool(description = "Delete a Freshdesk company. Its contacts are kept but no longer linked to it.")]
    async fn delete_company(
        &self,
        Parameters(input): Parameters<CompanyIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(company_id = input.company_id, "delete_company tool called");

        self.client
            .delete_company(input.company_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, company_id = input.company_id, "Failed to delete company");
                format!("Failed to delete company {}: {}", input.company_id, sanitized)
            })?;

        Ok(format!("Company {} deleted.", input.company_id))
    }

    // ========================================================================
    // Agents and groups
    // ========================================================================

    #[tool(description = "List Freshdesk agents. Filter by email, phone, mobile or state ('fulltime' or 'occasional'). Use the agent ID as responder_id when assigning tickets.")]
    async fn list_agents(
        &self,
        Parameters(input): Parameters<ListAgentsInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "list_agents tool called");
        input.validate().map_err(|e| e.to_string())?;

        let agents = self
            .client
            .list_agents(input.to_query(), cap(input.max_results))
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list agents");
                format!("Failed to list agents: {}", sanitized)
            })?;

        to_pretty_json(&agents)
    }

    #[tool(description = "Get a single Freshdesk agent by ID.")]
    async fn get_agent(
        &self,
        Parameters(input): Parameters<AgentIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(agent_id = input.agent_id, "get_agent tool called");

        let agent = self
            .client
            .get_agent(input.agent_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, agent_id = input.agent_id, "Failed to get agent");
                format!("Failed to get agent {}: {}", input.agent_id, sanitized)
            })?;

        to_pretty_json(&agent)
    }

    #[tool(description = "Get the Freshdesk agent that owns the configured API key.")]
    async fn get_current_agent(&self) -> Result<String, String> {
        tracing::debug!("get_current_agent tool called");

        let agent = self.client.get_current_agent().await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to get current agent");
            format!("Failed to get current agent: {}", sanitized)
        })?;

        to_pretty_json(&agent)
    }

    #[tool(description = "List Freshdesk agent groups. Use the group ID as group_id when assigning tickets.")]
    async fn list_groups(
        &self,
        Parameters(input): Parameters<ListPageInput>,
    ) -> Result<String, String> {
        tracing::debug!(?input, "list_groups tool called");
        input.validate().map_err(|e| e.to_string())?;

        let groups = self
            .client
            .list_groups(input.to_query(), cap(input.max_results))
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list groups");
                format!("Failed to list groups: {}", sanitized)
            })?;

        to_pretty_json(&groups)
    }

    #[tool(description = "Get a single Freshdesk group by ID.")]
    async fn get_group(
        &self,
        Parameters(input): Parameters<GroupIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(group_id = input.group_id, "get_group tool called");

        let group = self
            .client
            .get_group(input.group_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, group_id = input.group_id, "Failed to get group");
                format!("Failed to get group {}: {}", input.group_id, sanitized)
            })?;

        to_pretty_json(&group)
    }

    #[tool(description = "Create a Freshdesk agent group. Name is required.")]
    async fn create_group(
        &self,
        Parameters(input): Parameters<CreateGroupInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(name = %input.name, "create_group tool called");
        input.validate().map_err(|e| e.to_string())?;

        let body = input.to_body().map_err(|e| e.to_string())?;
        let group = self.client.create_group(&body).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to create group");
            format!("Failed to create group: {}", sanitized)
        })?;

        to_pretty_json(&group)
    }

    #[tool(description = "Update a Freshdesk group's name, description, agents or escalation settings. Group ID is required.")]
    async fn update_group(
        &self,
        Parameters(input): Parameters<UpdateGroupInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(group_id = input.group_id, "update_group tool called");

        let body = input.to_body().map_err(|e| e.to_string())?;
        let group = self
            .client
            .update_group(input.group_id, &body)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, group_id = input.group_id, "Failed to update group");
                format!("Failed to update group {}: {}", input.group_id, sanitized)
            })?;

        to_pretty_json(&group)
    }

    #[tool(description = "Delete a Freshdesk agent group.")]
    async fn delete_group(
        &self,
        Parameters(input): Parameters<GroupIdInput>,
    ) -> Result<String, String> {
        tracing::debug!(group_id = input.group_id, "delete_group tool called");

        self.client
            .delete_group(input.group_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, group_id = input.group_id, "Failed to delete group");
                format!("Failed to delete group {}: {}", input.group_id, sanitized)
            })?;

        Ok(format!("Group {} deleted.", input.group_id))
    }

    /// Sanitizes an error message to remove any API key.
    fn sanitize_error(&self, error: &FreshdeskError) -> String {
        error.sanitized_display(self.client.api_key_for_sanitization())
    }
}

#[tool_handler]
impl ServerHandler for FreshdeskServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Freshdesk MCP gives access to a Freshdesk helpdesk. \
                 Use list_tickets or search_tickets to find tickets and get_ticket for details. \
                 Create and change tickets with create_ticket and update_ticket, and \
                 talk to requesters with add_reply or leave internal notes with add_note. \
                 list_agents and list_groups return the IDs used for assignment. \
                 Contacts, companies and groups can be created, updated and deleted, \
                 and duplicate contacts merged with merge_contacts. \
                 List tools fetch every page; pass max_results to stop early. \
                 Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Converts a tool's `max_results` into the driver's cap.
fn cap(max_results: Option<u32>) -> Option<usize> {
    max_results.map(|n| n as usize)
}

/// Renders a result as indented JSON for the tool response.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize tool result");
        format!("Failed to format result: {}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Paginated;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = "test_key_12345";

    fn test_server_for(base_url: &str) -> FreshdeskServer {
        let config = Config::new("acme", TEST_KEY)
            .unwrap()
            .with_base_url(base_url)
            .unwrap();
        FreshdeskServer::new(FreshdeskClient::new(&config).expect("Failed to create test client"))
    }

    fn test_server() -> FreshdeskServer {
        let config = Config::new("acme", TEST_KEY).unwrap();
        FreshdeskServer::new(FreshdeskClient::new(&config).expect("Failed to create test client"))
    }

    #[test]
    fn test_server_creation() {
        let info = test_server().get_info();
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_server_info_has_tools_capability() {
        let info = test_server().get_info();
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_ping_tool_returns_pong() {
        assert_eq!(test_server().ping(), "pong");
    }

    #[test]
    fn test_cap_passes_zero_through() {
        assert_eq!(cap(None), None);
        assert_eq!(cap(Some(0)), Some(0));
        assert_eq!(cap(Some(25)), Some(25));
    }

    #[test]
    fn test_to_pretty_json_renders_paginated() {
        let page = Paginated::new(vec![json!({"id": 1})]);
        let text = to_pretty_json(&page).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"results": [{"id": 1}], "total": 1}));
        assert!(text.contains('\n'));
    }

    #[tokio::test]
    async fn test_list_tickets_tool_applies_cap() {
        let mock = MockServer::start().await;
        let page: Vec<_> = (1..=30).map(|id| json!({"id": id})).collect();
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .and(query_param("filter", "watching"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input = ListTicketsInput {
            filter: Some("watching".to_string()),
            max_results: Some(5),
            ..Default::default()
        };
        let text = server.list_tickets(Parameters(input)).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["total"], 5);
        assert_eq!(parsed["results"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_tickets_tool_rejects_invalid_filter_without_request() {
        let mock = MockServer::start().await;
        let server = test_server_for(&mock.uri());
        let input = ListTicketsInput {
            filter: Some("all".to_string()),
            ..Default::default()
        };
        let err = server.list_tickets(Parameters(input)).await.unwrap_err();
        assert!(err.contains("filter"));
        assert!(mock.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_ticket_tool_reports_api_error() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets/999"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"description": "Record not found"})),
            )
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input = GetTicketInput {
            ticket_id: 999,
            include: None,
        };
        let err = server.get_ticket(Parameters(input)).await.unwrap_err();
        assert!(err.starts_with("Failed to get ticket 999"));
        assert!(err.contains("Record not found"));
        assert!(!err.contains(TEST_KEY));
    }

    #[tokio::test]
    async fn test_add_note_tool_sends_private_by_default() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tickets/5/notes"))
            .and(body_json(json!({"body": "checked logs", "private": true})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 77, "private": true})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input: AddNoteInput =
            serde_json::from_value(json!({"ticket_id": 5, "body": " checked logs "})).unwrap();
        let text = server.add_note(Parameters(input)).await.unwrap();
        assert!(text.contains("\"id\": 77"));
    }

    #[tokio::test]
    async fn test_delete_ticket_tool_handles_no_content() {
        let mock = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tickets/12"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let text = server
            .delete_ticket(Parameters(TicketIdInput { ticket_id: 12 }))
            .await
            .unwrap();
        assert_eq!(text, "Ticket 12 moved to trash.");
    }

    #[tokio::test]
    async fn test_update_ticket_tool_requires_a_change() {
        let server = test_server();
        let input: UpdateTicketInput = serde_json::from_value(json!({"ticket_id": 3})).unwrap();
        let err = server.update_ticket(Parameters(input)).await.unwrap_err();
        assert!(err.contains("at least one field"));
    }

    #[tokio::test]
    async fn test_update_ticket_tool_sends_custom_status() {
        let mock = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tickets/1"))
            .and(body_json(json!({"status": 6})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "status": 6})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input: UpdateTicketInput =
            serde_json::from_value(json!({"ticket_id": 1, "status": 6})).unwrap();
        let text = server.update_ticket(Parameters(input)).await.unwrap();
        assert!(text.contains("\"status\": 6"));
    }

    #[tokio::test]
    async fn test_create_ticket_tool_sends_custom_source() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tickets"))
            .and(body_json(json!({
                "subject": "Kiosk down",
                "description": "Lobby kiosk",
                "requester_id": 3,
                "source": 8
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 90, "source": 8})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input: CreateTicketInput = serde_json::from_value(json!({
            "subject": "Kiosk down",
            "description": "Lobby kiosk",
            "requester_id": 3,
            "source": 8
        }))
        .unwrap();
        let text = server.create_ticket(Parameters(input)).await.unwrap();
        assert!(text.contains("\"id\": 90"));
    }

    #[tokio::test]
    async fn test_merge_contacts_tool_posts_ids() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/merge"))
            .and(body_json(json!({"primary_contact_id": 10, "secondary_contact_ids": [11, 12]})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let input = MergeContactsInput {
            primary_contact_id: 10,
            secondary_contact_ids: vec![11, 12],
        };
        let text = server.merge_contacts(Parameters(input)).await.unwrap();
        assert_eq!(text, "Merged 2 contact(s) into contact 10.");
    }

    #[tokio::test]
    async fn test_update_group_tool_rejects_empty_update_without_request() {
        let mock = MockServer::start().await;
        let server = test_server_for(&mock.uri());
        let input: UpdateGroupInput =
            serde_json::from_value(json!({"group_id": 4, "name": "  "})).unwrap();
        let err = server.update_group(Parameters(input)).await.unwrap_err();
        assert!(err.contains("at least one field"));
        assert!(mock.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_company_tool_reports_not_found() {
        let mock = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/companies/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock)
            .await;

        let server = test_server_for(&mock.uri());
        let err = server
            .delete_company(Parameters(CompanyIdInput { company_id: 404 }))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            "Failed to delete company 404: Freshdesk API error: HTTP 404: Not Found"
        );
    }
}

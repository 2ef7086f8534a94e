//! Ticket queue and ticket action tools.
//!
//! Queue tools page through `getTicketList` with a filter condition and
//! render compact ticket summaries. Action tools wrap the ticket mutations
//! (`createTicket`, `updateTicket`, `createTicketConversation`,
//! `createTicketNote`, `softDeleteTickets`); they are refused by a read-only
//! client.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::GraphqlClient;
use crate::tools::{
    condition, display_name, page_number, page_size, parse_args, present, ToolDefinition,
    ToolError, MAX_PAGE_SIZE,
};

/// Statuses that count as "not closed".
///
/// The list filter has no negation operator, so open tickets are selected
/// by enumerating every other status.
pub const NON_CLOSED_STATUSES: [&str; 6] = [
    "Open",
    "On Hold",
    "On-Site",
    "Waiting on third party",
    "Abandoned",
    "Resolved",
];

/// Default page size for ticket lists.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

const DEFAULT_NEW_TICKET_HOURS: u32 = 24;

const TICKET_TOOLS: [&str; 19] = [
    "get_ticket",
    "get_open_tickets",
    "get_my_tickets",
    "get_new_tickets",
    "get_urgent_tickets",
    "get_tickets_by_client",
    "get_ticket_conversation",
    "get_ticket_notes",
    "create_ticket",
    "reply_to_ticket",
    "add_ticket_note",
    "update_ticket_status",
    "update_ticket_priority",
    "update_ticket_category",
    "assign_ticket",
    "change_ticket_requester",
    "add_ticket_follower",
    "close_ticket",
    "delete_ticket",
];

const TICKET_FIELDS: &str = "ticketId displayId subject ticketType requestType source
      client site requester additionalRequester followers techGroup technician
      status priority impact urgency category subcategory cause subcause
      resolutionCode sla createdTime updatedTime firstResponseDueTime
      firstResponseTime firstResponseViolated resolutionDueTime resolutionTime
      resolutionViolated customFields worklogTimespent";

const CONVERSATION_FIELDS: &str = "conversationId content time user type
      toUsers { userId name email }
      ccUsers { userId name email }
      bccUsers { userId name email }
      attachments { name size downloadUrl }";

const NOTE_FIELDS: &str = "noteId addedBy addedOn content privacyType
      attachments { name size downloadUrl }";

fn get_ticket_query() -> String {
    format!(
        "query getTicket($input: TicketIdentifierInput!) {{
  getTicket(input: $input) {{ {TICKET_FIELDS} }}
}}"
    )
}

fn get_ticket_list_query() -> String {
    format!(
        "query getTicketList($input: ListInfoInput!) {{
  getTicketList(input: $input) {{
    tickets {{ {TICKET_FIELDS} }}
    listInfo {{ page pageSize totalCount hasMore }}
  }}
}}"
    )
}

fn get_conversation_list_query() -> String {
    format!(
        "query getTicketConversationList($input: TicketIdentifierInput!) {{
  getTicketConversationList(input: $input) {{ {CONVERSATION_FIELDS} }}
}}"
    )
}

fn get_note_list_query() -> String {
    format!(
        "query getTicketNoteList($input: TicketIdentifierInput!) {{
  getTicketNoteList(input: $input) {{ {NOTE_FIELDS} }}
}}"
    )
}

fn create_ticket_mutation() -> String {
    format!(
        "mutation createTicket($input: CreateTicketInput!) {{
  createTicket(input: $input) {{ {TICKET_FIELDS} }}
}}"
    )
}

fn update_ticket_mutation() -> String {
    format!(
        "mutation updateTicket($input: UpdateTicketInput!) {{
  updateTicket(input: $input) {{ {TICKET_FIELDS} }}
}}"
    )
}

fn create_conversation_mutation() -> String {
    format!(
        "mutation createTicketConversation($input: CreateTicketConversationInput!) {{
  createTicketConversation(input: $input) {{ {CONVERSATION_FIELDS} }}
}}"
    )
}

fn create_note_mutation() -> String {
    format!(
        "mutation createTicketNote($input: CreateTicketNoteInput!) {{
  createTicketNote(input: $input) {{ {NOTE_FIELDS} }}
}}"
    )
}

const SOFT_DELETE_TICKETS_MUTATION: &str = "mutation softDeleteTickets($input: [TicketIdentifierInput]) {
  softDeleteTickets(input: $input)
}";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketIdArgs {
    ticket_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenTicketsArgs {
    client_id: Option<String>,
    technician_id: Option<String>,
    priority: Option<String>,
    created_after: Option<String>,
    created_before: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyTicketsArgs {
    technician_id: Option<String>,
    technician_email: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewTicketsArgs {
    hours: Option<u32>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UrgentTicketsArgs {
    include_high_priority: Option<bool>,
    #[serde(rename = "includeSLAViolated")]
    include_sla_violated: Option<bool>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientTicketsArgs {
    client_id: String,
    status: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTicketArgs {
    subject: String,
    client_id: String,
    description: Option<String>,
    requester_id: Option<String>,
    technician_id: Option<String>,
    tech_group_id: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    impact: Option<String>,
    urgency: Option<String>,
    source: Option<String>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyArgs {
    ticket_id: String,
    content: String,
    send_mail: Option<bool>,
    cc_emails: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteArgs {
    ticket_id: String,
    content: String,
    privacy_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusArgs {
    ticket_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriorityArgs {
    ticket_id: String,
    priority: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryArgs {
    ticket_id: String,
    category: Option<String>,
    subcategory: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignArgs {
    ticket_id: String,
    technician_id: Option<String>,
    tech_group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequesterArgs {
    ticket_id: String,
    requester_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowerArgs {
    ticket_id: String,
    technician_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloseArgs {
    ticket_id: String,
    resolution_code: Option<String>,
    suppress_notification: Option<bool>,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

fn string_prop(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn ticket_id_prop() -> Value {
    string_prop("The ID of the ticket")
}

fn schema(properties: Value, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

/// Adds `page` and `pageSize` to a list tool's properties.
fn paged(mut properties: Value) -> Value {
    properties["page"] = json!({
        "type": "integer",
        "minimum": 1,
        "description": "Page number for pagination (default: 1)"
    });
    properties["pageSize"] = json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_PAGE_SIZE,
        "description": "Number of tickets per page (default: 25, max: 100)"
    });
    properties
}

/// Returns the ticket tool definitions.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_ticket",
            "Get full details of a specific ticket by ID. Returns all ticket fields including status, priority, assignee, SLA info, and custom fields.",
            schema(json!({"ticketId": string_prop("The ID of the ticket to retrieve")}), &["ticketId"]),
        ),
        ToolDefinition::new(
            "get_open_tickets",
            "List open tickets with optional filters. Returns tickets that are not closed, with pagination support.",
            schema(
                paged(json!({
                    "clientId": string_prop("Filter by client account ID"),
                    "technicianId": string_prop("Filter by assigned technician user ID"),
                    "priority": string_prop("Filter by priority level (e.g., \"High\", \"Medium\", \"Low\")"),
                    "createdAfter": string_prop("Filter tickets created after this date (ISO 8601 format, e.g., \"2024-01-15T00:00:00\")"),
                    "createdBefore": string_prop("Filter tickets created before this date (ISO 8601 format)")
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_my_tickets",
            "Get tickets assigned to a specific technician. Useful for viewing a technician's workload.",
            schema(
                paged(json!({
                    "technicianId": string_prop("The user ID of the technician"),
                    "technicianEmail": string_prop("The email of the technician (alternative to technicianId)"),
                    "includeFollowed": {
                        "type": "boolean",
                        "description": "Include tickets where the technician is a follower (default: false)"
                    }
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_new_tickets",
            "Get tickets created within the last N hours. Useful for monitoring incoming ticket volume.",
            schema(
                paged(json!({
                    "hours": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of hours to look back (default: 24)"
                    }
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_urgent_tickets",
            "Get high priority tickets or tickets that have violated SLA. Useful for identifying critical issues.",
            schema(
                paged(json!({
                    "includeHighPriority": {
                        "type": "boolean",
                        "description": "Include tickets with High priority (default: true)"
                    },
                    "includeSLAViolated": {
                        "type": "boolean",
                        "description": "Include tickets that have violated SLA (default: true)"
                    }
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_tickets_by_client",
            "Get all tickets for a specific client. Useful for viewing client history and open issues.",
            schema(
                paged(json!({
                    "clientId": string_prop("The account ID of the client"),
                    "status": string_prop("Filter by ticket status (e.g., \"New\", \"Open\", \"Closed\")")
                })),
                &["clientId"],
            ),
        ),
        ToolDefinition::new(
            "get_ticket_conversation",
            "Get the full conversation thread of a ticket. Returns all messages between requester and technicians.",
            schema(json!({"ticketId": ticket_id_prop()}), &["ticketId"]),
        ),
        ToolDefinition::new(
            "get_ticket_notes",
            "Get internal notes on a ticket. Notes can be public (visible to requester) or private (internal only).",
            schema(json!({"ticketId": ticket_id_prop()}), &["ticketId"]),
        ),
        ToolDefinition::new(
            "create_ticket",
            "Create a new ticket. Requires at minimum a subject and client. Returns the created ticket with its new ID.",
            schema(
                json!({
                    "subject": string_prop("The subject/title of the ticket"),
                    "description": string_prop("Detailed description of the issue"),
                    "clientId": string_prop("The account ID of the client"),
                    "requesterId": string_prop("The user ID of the requester (client user)"),
                    "technicianId": string_prop("The user ID of the technician to assign"),
                    "techGroupId": string_prop("The group ID of the technician group to assign"),
                    "status": string_prop("Initial status (default: \"New\")"),
                    "priority": string_prop("Priority level (e.g., \"High\", \"Medium\", \"Low\")"),
                    "category": string_prop("Ticket category"),
                    "subcategory": string_prop("Ticket subcategory"),
                    "impact": string_prop("Impact level"),
                    "urgency": string_prop("Urgency level"),
                    "source": {
                        "type": "string",
                        "enum": ["FORM", "AGENT", "EMAIL", "AI", "PHONE", "INTEGRATION"],
                        "description": "Creation source (default: \"FORM\")"
                    },
                    "customFields": {
                        "type": "object",
                        "description": "Custom field values as key-value pairs"
                    }
                }),
                &["subject", "clientId"],
            ),
        ),
        ToolDefinition::new(
            "reply_to_ticket",
            "Send a reply to the ticket requester. Can optionally send an email notification.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "content": string_prop("The reply content (supports HTML)"),
                    "sendMail": {
                        "type": "boolean",
                        "description": "Send email notification to requester (default: true)"
                    },
                    "ccEmails": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Email addresses to CC on the reply"
                    }
                }),
                &["ticketId", "content"],
            ),
        ),
        ToolDefinition::new(
            "add_ticket_note",
            "Add an internal or public note to a ticket. Private notes are only visible to technicians.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "content": string_prop("The note content"),
                    "privacyType": {
                        "type": "string",
                        "enum": ["PUBLIC", "PRIVATE"],
                        "description": "Note visibility (default: \"PRIVATE\")"
                    }
                }),
                &["ticketId", "content"],
            ),
        ),
        ToolDefinition::new(
            "update_ticket_status",
            "Change the status of a ticket (e.g., New, Open, Pending, Resolved, Closed).",
            schema(
                json!({"ticketId": ticket_id_prop(), "status": string_prop("The new status value")}),
                &["ticketId", "status"],
            ),
        ),
        ToolDefinition::new(
            "update_ticket_priority",
            "Change the priority of a ticket (e.g., High, Medium, Low).",
            schema(
                json!({"ticketId": ticket_id_prop(), "priority": string_prop("The new priority value")}),
                &["ticketId", "priority"],
            ),
        ),
        ToolDefinition::new(
            "update_ticket_category",
            "Change the category and/or subcategory of a ticket.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "category": string_prop("The new category"),
                    "subcategory": string_prop("The new subcategory")
                }),
                &["ticketId"],
            ),
        ),
        ToolDefinition::new(
            "assign_ticket",
            "Assign a ticket to a technician and/or technician group.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "technicianId": string_prop("The user ID of the technician to assign"),
                    "techGroupId": string_prop("The group ID of the technician group to assign")
                }),
                &["ticketId"],
            ),
        ),
        ToolDefinition::new(
            "change_ticket_requester",
            "Change who the ticket is for (the requester).",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "requesterId": string_prop("The user ID of the new requester")
                }),
                &["ticketId", "requesterId"],
            ),
        ),
        ToolDefinition::new(
            "add_ticket_follower",
            "Add a technician as a follower on a ticket. Followers receive notifications about ticket updates.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "technicianId": string_prop("The user ID of the technician to add as follower")
                }),
                &["ticketId", "technicianId"],
            ),
        ),
        ToolDefinition::new(
            "close_ticket",
            "Close a ticket with an optional resolution code. Sets status to \"Closed\" and records the resolution.",
            schema(
                json!({
                    "ticketId": ticket_id_prop(),
                    "resolutionCode": string_prop("Resolution code (e.g., \"Permanent Fix\", \"Workaround\", \"Unable to Reproduce\")"),
                    "suppressNotification": {
                        "type": "boolean",
                        "description": "Suppress the close notification email (default: false)"
                    }
                }),
                &["ticketId"],
            ),
        ),
        ToolDefinition::new(
            "delete_ticket",
            "Soft delete (trash) a ticket. The ticket can be restored from trash in SuperOps.",
            schema(json!({"ticketId": string_prop("The ID of the ticket to delete")}), &["ticketId"]),
        ),
    ]
}

/// Returns `true` if `name` is a ticket tool.
#[must_use]
pub fn is_ticket_tool(name: &str) -> bool {
    TICKET_TOOLS.contains(&name)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_status_condition() -> Value {
    condition("status", "includes", json!(NON_CLOSED_STATUSES))
}

fn sort_desc(attribute: &str) -> Value {
    json!([{"attribute": attribute, "order": "DESC"}])
}

/// Builds a `ListInfoInput`.
///
/// A single condition is sent as is; several are wrapped in an `AND` group.
fn build_list_input(paging: &Paging, mut conditions: Vec<Value>, sort: Value) -> Value {
    let mut input = Map::new();
    input.insert("page".to_string(), json!(page_number(paging.page)));
    input.insert(
        "pageSize".to_string(),
        json!(page_size(paging.page_size, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)),
    );

    match conditions.len() {
        0 => {}
        1 => {
            input.insert("condition".to_string(), conditions.remove(0));
        }
        _ => {
            input.insert(
                "condition".to_string(),
                json!({"operator": "AND", "value": conditions}),
            );
        }
    }

    if sort.as_array().map_or(false, |s| !s.is_empty()) {
        input.insert("sort".to_string(), sort);
    }

    Value::Object(input)
}

/// Formats `now - hours` as an ISO-8601 timestamp without zone designator,
/// the form the list filter compares against.
fn hours_before(now: DateTime<Utc>, hours: u32) -> String {
    (now - Duration::hours(i64::from(hours)))
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

/// Renders a JSON scalar for a message.
fn text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

/// Compact view of a ticket.
fn format_ticket(ticket: &Value) -> Value {
    json!({
        "id": ticket["ticketId"],
        "displayId": ticket["displayId"],
        "subject": ticket["subject"],
        "status": ticket["status"],
        "priority": ticket["priority"],
        "client": display_name(&ticket["client"]),
        "requester": display_name(&ticket["requester"]),
        "technician": display_name(&ticket["technician"]),
        "techGroup": display_name(&ticket["techGroup"]),
        "category": ticket["category"],
        "subcategory": ticket["subcategory"],
        "createdTime": ticket["createdTime"],
        "updatedTime": ticket["updatedTime"],
        "sla": display_name(&ticket["sla"]),
        "firstResponseViolated": ticket["firstResponseViolated"],
        "resolutionViolated": ticket["resolutionViolated"],
        "source": ticket["source"],
    })
}

fn format_ticket_list(data: &Value, tool: &str) -> Value {
    let list = &data["getTicketList"];
    let tickets: Vec<Value> = list["tickets"]
        .as_array()
        .map(|tickets| tickets.iter().map(format_ticket).collect())
        .unwrap_or_default();
    let info = &list["listInfo"];

    json!({
        "tickets": tickets,
        "pagination": {
            "page": info["page"],
            "pageSize": info["pageSize"],
            "totalCount": info["totalCount"],
            "hasMore": info["hasMore"],
        },
        "_meta": {"tool": tool},
    })
}

fn updated(message: String, data: &Value, tool: &str) -> Value {
    json!({
        "success": true,
        "message": message,
        "ticket": format_ticket(&data["updateTicket"]),
        "_meta": {"tool": tool},
    })
}

async fn list_tickets(
    client: &GraphqlClient,
    input: Value,
    tool: &str,
) -> Result<Value, ToolError> {
    let data = client
        .execute(&get_ticket_list_query(), json!({ "input": input }))
        .await?;
    Ok(format_ticket_list(&data, tool))
}

async fn update_ticket(client: &GraphqlClient, input: Value) -> Result<Value, ToolError> {
    Ok(client
        .execute(&update_ticket_mutation(), json!({ "input": input }))
        .await?)
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Runs a ticket tool.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] when required arguments are
/// missing or a tool precondition fails (checked before any request),
/// [`ToolError::Client`] when the API call fails, and
/// [`ToolError::UnknownTool`] for names this module does not own.
#[allow(clippy::too_many_lines)]
pub async fn handle(name: &str, arguments: Value, client: &GraphqlClient) -> Result<Value, ToolError> {
    match name {
        "get_ticket" => {
            let args: TicketIdArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    &get_ticket_query(),
                    json!({ "input": { "ticketId": args.ticket_id } }),
                )
                .await?;

            let ticket = &data["getTicket"];
            if ticket.is_null() {
                return Ok(json!({
                    "error": true,
                    "message": format!("Ticket {} not found", args.ticket_id),
                }));
            }
            Ok(json!({"ticket": ticket, "_meta": {"tool": name}}))
        }

        "get_open_tickets" => {
            let args: OpenTicketsArgs = parse_args(name, arguments)?;

            let mut conditions = vec![open_status_condition()];
            if let Some(client_id) = present(&args.client_id) {
                conditions.push(condition("client.accountId", "is", json!(client_id)));
            }
            if let Some(technician_id) = present(&args.technician_id) {
                conditions.push(condition("technician.userId", "is", json!(technician_id)));
            }
            if let Some(priority) = present(&args.priority) {
                conditions.push(condition("priority", "is", json!(priority)));
            }
            if let Some(after) = present(&args.created_after) {
                conditions.push(condition("createdTime", "greater than", json!(after)));
            }
            if let Some(before) = present(&args.created_before) {
                conditions.push(condition("createdTime", "less than", json!(before)));
            }

            let input = build_list_input(&args.paging, conditions, sort_desc("createdTime"));
            list_tickets(client, input, name).await
        }

        "get_my_tickets" => {
            let args: MyTicketsArgs = parse_args(name, arguments)?;

            let technician = if let Some(id) = present(&args.technician_id) {
                condition("technician.userId", "is", json!(id))
            } else if let Some(email) = present(&args.technician_email) {
                condition("technician.email", "is", json!(email))
            } else {
                return Err(ToolError::invalid(
                    name,
                    "Either technicianId or technicianEmail is required",
                ));
            };

            let conditions = vec![technician, open_status_condition()];
            let input = build_list_input(&args.paging, conditions, sort_desc("updatedTime"));
            list_tickets(client, input, name).await
        }

        "get_new_tickets" => {
            let args: NewTicketsArgs = parse_args(name, arguments)?;
            let hours = args
                .hours
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_NEW_TICKET_HOURS);
            let since = hours_before(Utc::now(), hours);

            let conditions = vec![condition("createdTime", "greater than", json!(since))];
            let input = build_list_input(&args.paging, conditions, sort_desc("createdTime"));

            let mut result = list_tickets(client, input, name).await?;
            result["timeRange"] = json!({"hours": hours, "since": since});
            Ok(result)
        }

        "get_urgent_tickets" => {
            let args: UrgentTicketsArgs = parse_args(name, arguments)?;

            let mut any_of = Vec::new();
            if args.include_high_priority.unwrap_or(true) {
                any_of.push(condition("priority", "is", json!("High")));
            }
            if args.include_sla_violated.unwrap_or(true) {
                any_of.push(condition("firstResponseViolated", "is", json!(true)));
                any_of.push(condition("resolutionViolated", "is", json!(true)));
            }
            if any_of.is_empty() {
                return Err(ToolError::invalid(
                    name,
                    "At least one filter (includeHighPriority or includeSLAViolated) must be true",
                ));
            }

            let conditions = vec![
                open_status_condition(),
                json!({"operator": "OR", "value": any_of}),
            ];
            let input = build_list_input(&args.paging, conditions, sort_desc("createdTime"));
            list_tickets(client, input, name).await
        }

        "get_tickets_by_client" => {
            let args: ClientTicketsArgs = parse_args(name, arguments)?;

            let mut conditions = vec![condition("client.accountId", "is", json!(args.client_id))];
            if let Some(status) = present(&args.status) {
                conditions.push(condition("status", "is", json!(status)));
            }

            let input = build_list_input(&args.paging, conditions, sort_desc("createdTime"));
            list_tickets(client, input, name).await
        }

        "get_ticket_conversation" => {
            let args: TicketIdArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    &get_conversation_list_query(),
                    json!({ "input": { "ticketId": args.ticket_id } }),
                )
                .await?;

            let conversations: Vec<Value> = data["getTicketConversationList"]
                .as_array()
                .map(|list| {
                    list.iter()
                        .map(|c| {
                            json!({
                                "id": c["conversationId"],
                                "content": c["content"],
                                "time": c["time"],
                                "user": c["user"],
                                "type": c["type"],
                                "toUsers": c["toUsers"],
                                "ccUsers": c["ccUsers"],
                                "attachments": c["attachments"],
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            Ok(json!({
                "ticketId": args.ticket_id,
                "conversationCount": conversations.len(),
                "conversations": conversations,
                "_meta": {"tool": name},
            }))
        }

        "get_ticket_notes" => {
            let args: TicketIdArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    &get_note_list_query(),
                    json!({ "input": { "ticketId": args.ticket_id } }),
                )
                .await?;

            let notes: Vec<Value> = data["getTicketNoteList"]
                .as_array()
                .map(|list| {
                    list.iter()
                        .map(|n| {
                            json!({
                                "id": n["noteId"],
                                "content": n["content"],
                                "addedBy": n["addedBy"],
                                "addedOn": n["addedOn"],
                                "privacyType": n["privacyType"],
                                "attachments": n["attachments"],
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            Ok(json!({
                "ticketId": args.ticket_id,
                "noteCount": notes.len(),
                "notes": notes,
                "_meta": {"tool": name},
            }))
        }

        "create_ticket" => {
            let args: CreateTicketArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("subject".to_string(), json!(args.subject));
            input.insert("client".to_string(), json!({"accountId": args.client_id}));
            input.insert(
                "source".to_string(),
                json!(present(&args.source).unwrap_or("FORM")),
            );
            if let Some(requester) = present(&args.requester_id) {
                input.insert("requester".to_string(), json!({"userId": requester}));
            }
            if let Some(technician) = present(&args.technician_id) {
                input.insert("technician".to_string(), json!({"userId": technician}));
            }
            if let Some(group) = present(&args.tech_group_id) {
                input.insert("techGroup".to_string(), json!({"groupId": group}));
            }
            for (key, value) in [
                ("description", &args.description),
                ("status", &args.status),
                ("priority", &args.priority),
                ("category", &args.category),
                ("subcategory", &args.subcategory),
                ("impact", &args.impact),
                ("urgency", &args.urgency),
            ] {
                if let Some(value) = present(value) {
                    input.insert(key.to_string(), json!(value));
                }
            }
            if let Some(custom_fields) = args.custom_fields.filter(|v| !v.is_null()) {
                input.insert("customFields".to_string(), custom_fields);
            }

            let data = client
                .execute(&create_ticket_mutation(), json!({ "input": input }))
                .await?;
            let ticket = &data["createTicket"];

            Ok(json!({
                "success": true,
                "message": format!("Ticket {} created successfully", text(&ticket["displayId"])),
                "ticket": ticket,
                "_meta": {"tool": name},
            }))
        }

        "reply_to_ticket" => {
            let args: ReplyArgs = parse_args(name, arguments)?;
            let send_mail = args.send_mail.unwrap_or(true);

            let mut input = Map::new();
            input.insert("ticket".to_string(), json!({"ticketId": args.ticket_id}));
            input.insert("content".to_string(), json!(args.content));
            input.insert("sendMail".to_string(), json!(send_mail));
            if let Some(emails) = args.cc_emails.filter(|e| !e.is_empty()) {
                let cc: Vec<Value> = emails.iter().map(|email| json!({"email": email})).collect();
                input.insert("ccUsers".to_string(), json!(cc));
            }

            let data = client
                .execute(&create_conversation_mutation(), json!({ "input": input }))
                .await?;

            Ok(json!({
                "success": true,
                "message": "Reply sent successfully",
                "conversation": data["createTicketConversation"],
                "emailSent": send_mail,
                "_meta": {"tool": name},
            }))
        }

        "add_ticket_note" => {
            let args: NoteArgs = parse_args(name, arguments)?;
            let privacy = present(&args.privacy_type).unwrap_or("PRIVATE").to_string();

            let input = json!({
                "ticket": {"ticketId": args.ticket_id},
                "content": args.content,
                "privacyType": privacy,
            });
            let data = client
                .execute(&create_note_mutation(), json!({ "input": input }))
                .await?;

            Ok(json!({
                "success": true,
                "message": format!("{privacy} note added successfully"),
                "note": data["createTicketNote"],
                "_meta": {"tool": name},
            }))
        }

        "update_ticket_status" => {
            let args: StatusArgs = parse_args(name, arguments)?;
            let data = update_ticket(
                client,
                json!({"ticketId": args.ticket_id, "status": args.status}),
            )
            .await?;
            Ok(updated(
                format!("Ticket status updated to \"{}\"", args.status),
                &data,
                name,
            ))
        }

        "update_ticket_priority" => {
            let args: PriorityArgs = parse_args(name, arguments)?;
            let data = update_ticket(
                client,
                json!({"ticketId": args.ticket_id, "priority": args.priority}),
            )
            .await?;
            Ok(updated(
                format!("Ticket priority updated to \"{}\"", args.priority),
                &data,
                name,
            ))
        }

        "update_ticket_category" => {
            let args: CategoryArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("ticketId".to_string(), json!(args.ticket_id));
            if let Some(category) = present(&args.category) {
                input.insert("category".to_string(), json!(category));
            }
            if let Some(subcategory) = present(&args.subcategory) {
                input.insert("subcategory".to_string(), json!(subcategory));
            }
            if input.len() == 1 {
                return Err(ToolError::invalid(
                    name,
                    "At least one of category or subcategory is required",
                ));
            }

            let data = update_ticket(client, Value::Object(input)).await?;
            Ok(updated(
                "Ticket category updated successfully".to_string(),
                &data,
                name,
            ))
        }

        "assign_ticket" => {
            let args: AssignArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("ticketId".to_string(), json!(args.ticket_id));
            if let Some(technician) = present(&args.technician_id) {
                input.insert("technician".to_string(), json!({"userId": technician}));
            }
            if let Some(group) = present(&args.tech_group_id) {
                input.insert("techGroup".to_string(), json!({"groupId": group}));
            }
            if input.len() == 1 {
                return Err(ToolError::invalid(
                    name,
                    "At least one of technicianId or techGroupId is required",
                ));
            }

            let data = update_ticket(client, Value::Object(input)).await?;
            let ticket = &data["updateTicket"];

            let mut assigned_to = Vec::new();
            if let Some(technician) = ticket["technician"]["name"].as_str() {
                assigned_to.push(format!("technician: {technician}"));
            }
            if let Some(group) = ticket["techGroup"]["name"].as_str() {
                assigned_to.push(format!("group: {group}"));
            }

            Ok(updated(
                format!("Ticket assigned to {}", assigned_to.join(", ")),
                &data,
                name,
            ))
        }

        "change_ticket_requester" => {
            let args: RequesterArgs = parse_args(name, arguments)?;
            let data = update_ticket(
                client,
                json!({"ticketId": args.ticket_id, "requester": {"userId": args.requester_id}}),
            )
            .await?;

            let requester = data["updateTicket"]["requester"]["name"]
                .as_str()
                .filter(|n| !n.is_empty())
                .unwrap_or(&args.requester_id)
                .to_string();
            Ok(updated(
                format!("Ticket requester changed to {requester}"),
                &data,
                name,
            ))
        }

        "add_ticket_follower" => {
            let args: FollowerArgs = parse_args(name, arguments)?;
            let data = update_ticket(
                client,
                json!({
                    "ticketId": args.ticket_id,
                    "addFollowers": [{"userId": args.technician_id}],
                }),
            )
            .await?;
            Ok(updated("Follower added successfully".to_string(), &data, name))
        }

        "close_ticket" => {
            let args: CloseArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("ticketId".to_string(), json!(args.ticket_id));
            input.insert("status".to_string(), json!("Closed"));
            let resolution = present(&args.resolution_code);
            if let Some(code) = resolution {
                input.insert("resolutionCode".to_string(), json!(code));
            }
            if args.suppress_notification.unwrap_or(false) {
                input.insert("suppressCloseNotification".to_string(), json!(true));
            }

            let data = update_ticket(client, Value::Object(input)).await?;
            let suffix = resolution
                .map(|code| format!(" with resolution: {code}"))
                .unwrap_or_default();
            let message = format!(
                "Ticket {} closed{suffix}",
                text(&data["updateTicket"]["displayId"])
            );
            Ok(updated(message, &data, name))
        }

        "delete_ticket" => {
            let args: TicketIdArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    SOFT_DELETE_TICKETS_MUTATION,
                    json!({ "input": [{ "ticketId": args.ticket_id }] }),
                )
                .await?;

            let deleted = data["softDeleteTickets"].as_bool().unwrap_or(false);
            let message = if deleted {
                format!("Ticket {} moved to trash", args.ticket_id)
            } else {
                format!("Failed to delete ticket {}", args.ticket_id)
            };
            Ok(json!({"success": deleted, "message": message, "_meta": {"tool": name}}))
        }

        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

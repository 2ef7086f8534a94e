//! Client, contact and alert tools.
//!
//! Client tools cover accounts, their sites, contacts (client users) and
//! contracts. Alert tools list RMM alerts and create or resolve them.
//! Creating and updating records goes through mutations, which a read-only
//! client refuses.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::GraphqlClient;
use crate::tools::{
    condition, page_number, page_size, parse_args, present, ToolDefinition, ToolError,
    MAX_PAGE_SIZE,
};

/// Default page size for client, contact and alert lists.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const CLIENT_TOOLS: [&str; 15] = [
    "get_client",
    "get_clients",
    "get_client_sites",
    "get_client_users",
    "get_client_contracts",
    "create_client",
    "create_client_user",
    "create_client_site",
    "update_client",
    "update_client_user",
    "search_contacts",
    "get_alerts",
    "get_asset_alerts",
    "resolve_alerts",
    "create_alert",
];

const CLIENT_FIELDS: &str = "accountId name stage status emailDomains accountManager
      primaryContact secondaryContact hqSite technicianGroups customFields";

const CLIENT_SITE_FIELDS: &str = "id name timezoneCode working24x7 line1 line2 line3
      city postalCode countryCode stateCode contactNumber client hq";

const CLIENT_USER_FIELDS: &str = "userId firstName lastName name email contactNumber
      reportingManager site role client customFields";

const CLIENT_CONTRACT_FIELDS: &str = "contractId client
      contract { contractId name description contractType }
      startDate endDate contractStatus";

const ALERT_FIELDS: &str = "id message createdTime status severity description asset policy";

const LIST_INFO_FIELDS: &str = "listInfo { page pageSize totalCount }";

fn get_client_query() -> String {
    format!(
        "query getClient($input: ClientIdentifierInput!) {{
  getClient(input: $input) {{ {CLIENT_FIELDS} }}
}}"
    )
}

fn get_client_list_query() -> String {
    format!(
        "query getClientList($input: ListInfoInput!) {{
  getClientList(input: $input) {{
    clients {{ {CLIENT_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn get_client_site_list_query() -> String {
    format!(
        "query getClientSiteList($input: GetClientSiteListInput!) {{
  getClientSiteList(input: $input) {{
    sites {{ {CLIENT_SITE_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn get_client_user_list_query() -> String {
    format!(
        "query getClientUserList($input: GetClientUserListInput!) {{
  getClientUserList(input: $input) {{
    userList {{ {CLIENT_USER_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn get_client_contract_list_query() -> String {
    format!(
        "query getClientContractList($input: ListInfoInput) {{
  getClientContractList(input: $input) {{
    clientContracts {{ {CLIENT_CONTRACT_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn create_client_mutation() -> String {
    format!(
        "mutation createClientV2($input: CreateClientInputV2!) {{
  createClientV2(input: $input) {{ {CLIENT_FIELDS} }}
}}"
    )
}

fn create_client_user_mutation() -> String {
    format!(
        "mutation createClientUser($input: CreateClientUserInput!) {{
  createClientUser(input: $input) {{ {CLIENT_USER_FIELDS} }}
}}"
    )
}

fn create_client_site_mutation() -> String {
    format!(
        "mutation createClientSite($input: CreateClientSiteInput!) {{
  createClientSite(input: $input) {{ {CLIENT_SITE_FIELDS} }}
}}"
    )
}

fn update_client_mutation() -> String {
    format!(
        "mutation updateClient($input: UpdateClientInput!) {{
  updateClient(input: $input) {{ {CLIENT_FIELDS} }}
}}"
    )
}

fn update_client_user_mutation() -> String {
    format!(
        "mutation updateClientUser($input: UpdateClientUserInput!) {{
  updateClientUser(input: $input) {{ {CLIENT_USER_FIELDS} }}
}}"
    )
}

fn get_alert_list_query() -> String {
    format!(
        "query getAlertList($input: ListInfoInput!) {{
  getAlertList(input: $input) {{
    alerts {{ {ALERT_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn get_alerts_for_asset_query() -> String {
    format!(
        "query getAlertsForAsset($input: AssetDetailsListInput!) {{
  getAlertsForAsset(input: $input) {{
    alerts {{ {ALERT_FIELDS} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

fn create_alert_mutation() -> String {
    format!(
        "mutation createAlert($input: CreateAlertInput!) {{
  createAlert(input: $input) {{ {ALERT_FIELDS} }}
}}"
    )
}

const RESOLVE_ALERTS_MUTATION: &str = "mutation resolveAlerts($input: [ResolveAlertInput]) {
  resolveAlerts(input: $input)
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

impl Paging {
    fn list_info(&self) -> Map<String, Value> {
        let mut info = Map::new();
        info.insert("page".to_string(), json!(page_number(self.page)));
        info.insert(
            "pageSize".to_string(),
            json!(page_size(self.page_size, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)),
        );
        info
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountIdArgs {
    account_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientListArgs {
    stage: Option<String>,
    status: Option<String>,
    search: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientScopedArgs {
    client_id: String,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractListArgs {
    client_id: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    line1: Option<String>,
    line2: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country_code: Option<String>,
    state_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateClientArgs {
    name: String,
    hq_site_name: String,
    hq_site_timezone: String,
    stage: Option<String>,
    status: Option<String>,
    email_domains: Option<Vec<String>>,
    account_manager_id: Option<String>,
    #[serde(rename = "hqSiteWorking24x7")]
    hq_site_working_24x7: Option<bool>,
    hq_site_address: Option<Address>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateClientUserArgs {
    first_name: String,
    email: String,
    role_id: String,
    client_id: String,
    site_id: String,
    last_name: Option<String>,
    contact_number: Option<String>,
    reporting_manager_id: Option<String>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateClientSiteArgs {
    client_id: String,
    name: String,
    timezone_code: String,
    #[serde(rename = "working24x7")]
    working_24x7: Option<bool>,
    line1: Option<String>,
    line2: Option<String>,
    line3: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country_code: Option<String>,
    state_code: Option<String>,
    contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateClientArgs {
    account_id: String,
    name: Option<String>,
    stage: Option<String>,
    status: Option<String>,
    email_domains: Option<Vec<String>>,
    account_manager_id: Option<String>,
    primary_contact_id: Option<String>,
    secondary_contact_id: Option<String>,
    hq_site_id: Option<String>,
    add_technician_group_ids: Option<Vec<String>>,
    delete_technician_group_ids: Option<Vec<String>>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateClientUserArgs {
    user_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    contact_number: Option<String>,
    reporting_manager_id: Option<String>,
    site_id: Option<String>,
    role_id: Option<String>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchContactsArgs {
    search: String,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertListArgs {
    status: Option<String>,
    severity: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetAlertsArgs {
    asset_id: String,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveAlertsArgs {
    alert_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAlertArgs {
    asset_id: String,
    message: String,
    description: Option<String>,
    severity: Option<String>,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

fn string_prop(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn string_list_prop(description: &str) -> Value {
    json!({"type": "array", "items": {"type": "string"}, "description": description})
}

fn custom_fields_prop(description: &str) -> Value {
    json!({"type": "object", "description": description})
}

fn schema(properties: Value, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

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
        "description": "Number of results per page (default: 50, max: 100)"
    });
    properties
}

/// Returns the client, contact and alert tool definitions.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_client",
            "Get full details of a specific client by ID. Returns client info including name, stage, status, email domains, contacts, HQ site, and technician groups.",
            schema(json!({"accountId": string_prop("The unique ID of the client")}), &["accountId"]),
        ),
        ToolDefinition::new(
            "get_clients",
            "List all clients with optional filtering. Returns paginated list of clients with their basic info.",
            schema(
                paged(json!({
                    "stage": string_prop("Filter by client stage (e.g., \"Active\", \"Prospect\")"),
                    "status": string_prop("Filter by client status (e.g., \"Paid\", \"Trial\")"),
                    "search": string_prop("Search by client name")
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_client_sites",
            "List all sites/locations for a specific client. Returns site details including address, timezone, and business hours configuration.",
            schema(
                paged(json!({"clientId": string_prop("The unique ID of the client")})),
                &["clientId"],
            ),
        ),
        ToolDefinition::new(
            "get_client_users",
            "List all contacts/users for a specific client. Returns user details including name, email, role, and site association.",
            schema(
                paged(json!({"clientId": string_prop("The unique ID of the client")})),
                &["clientId"],
            ),
        ),
        ToolDefinition::new(
            "get_client_contracts",
            "List all contracts for a specific client. Returns contract details including type, status, start/end dates.",
            schema(
                paged(json!({
                    "clientId": string_prop("Filter by client ID (optional - if not provided, returns all contracts)")
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "create_client",
            "Create a new client with headquarters site. The HQ site is required and created automatically with the client.",
            schema(
                json!({
                    "name": string_prop("Client name (required, must be unique)"),
                    "stage": string_prop("Client stage (default: \"Active\")"),
                    "status": string_prop("Client status (default: \"Paid\")"),
                    "emailDomains": string_list_prop("List of email domains for the client (e.g., [\"acme.com\"])"),
                    "accountManagerId": string_prop("User ID of the account manager (technician)"),
                    "hqSiteName": string_prop("Name of the headquarters site (required)"),
                    "hqSiteTimezone": string_prop("Timezone for HQ site in IANA format (required, e.g., \"America/New_York\")"),
                    "hqSiteWorking24x7": {
                        "type": "boolean",
                        "description": "Whether HQ site operates 24/7 (default: true)"
                    },
                    "hqSiteAddress": {
                        "type": "object",
                        "description": "Address for HQ site",
                        "properties": {
                            "line1": {"type": "string"},
                            "line2": {"type": "string"},
                            "city": {"type": "string"},
                            "postalCode": {"type": "string"},
                            "countryCode": string_prop("ISO 3166 two-letter country code"),
                            "stateCode": string_prop("ISO 3166 state/subdivision code")
                        }
                    },
                    "customFields": custom_fields_prop("Custom field values as key-value pairs")
                }),
                &["name", "hqSiteName", "hqSiteTimezone"],
            ),
        ),
        ToolDefinition::new(
            "create_client_user",
            "Add a new contact/user to a client. Creates a client user with specified role and site association.",
            schema(
                json!({
                    "firstName": string_prop("First name of the user (required)"),
                    "lastName": string_prop("Last name of the user"),
                    "email": string_prop("Email address (required, must be unique)"),
                    "contactNumber": string_prop("Phone number in format +[country][area][local]"),
                    "roleId": string_prop("Role ID for the user (required)"),
                    "clientId": string_prop("Client ID to associate the user with (required)"),
                    "siteId": string_prop("Site ID to associate the user with (required)"),
                    "reportingManagerId": string_prop("User ID of the reporting manager"),
                    "customFields": custom_fields_prop("Custom field values as key-value pairs")
                }),
                &["firstName", "email", "roleId", "clientId", "siteId"],
            ),
        ),
        ToolDefinition::new(
            "create_client_site",
            "Add a new site/location to an existing client.",
            schema(
                json!({
                    "clientId": string_prop("Client ID to add the site to (required)"),
                    "name": string_prop("Site name (required)"),
                    "timezoneCode": string_prop("Timezone in IANA format (required, e.g., \"America/New_York\")"),
                    "working24x7": {
                        "type": "boolean",
                        "description": "Whether site operates 24/7 (default: true)"
                    },
                    "line1": string_prop("Address line 1"),
                    "line2": string_prop("Address line 2"),
                    "line3": string_prop("Address line 3"),
                    "city": string_prop("City"),
                    "postalCode": string_prop("Postal/ZIP code"),
                    "countryCode": string_prop("ISO 3166 two-letter country code"),
                    "stateCode": string_prop("ISO 3166 state/subdivision code"),
                    "contactNumber": string_prop("Contact phone number")
                }),
                &["clientId", "name", "timezoneCode"],
            ),
        ),
        ToolDefinition::new(
            "update_client",
            "Update an existing client's information.",
            schema(
                json!({
                    "accountId": string_prop("Client ID to update (required)"),
                    "name": string_prop("New client name"),
                    "stage": string_prop("New client stage"),
                    "status": string_prop("New client status"),
                    "emailDomains": string_list_prop("Updated list of email domains"),
                    "accountManagerId": string_prop("New account manager user ID"),
                    "primaryContactId": string_prop("New primary contact user ID"),
                    "secondaryContactId": string_prop("New secondary contact user ID"),
                    "hqSiteId": string_prop("New HQ site ID"),
                    "addTechnicianGroupIds": string_list_prop("Technician group IDs to add"),
                    "deleteTechnicianGroupIds": string_list_prop("Technician group IDs to remove"),
                    "customFields": custom_fields_prop("Custom field values to update")
                }),
                &["accountId"],
            ),
        ),
        ToolDefinition::new(
            "update_client_user",
            "Update an existing client user/contact's information.",
            schema(
                json!({
                    "userId": string_prop("User ID to update (required)"),
                    "firstName": string_prop("New first name"),
                    "lastName": string_prop("New last name"),
                    "email": string_prop("New email address"),
                    "contactNumber": string_prop("New phone number"),
                    "reportingManagerId": string_prop("New reporting manager user ID"),
                    "siteId": string_prop("New site ID"),
                    "roleId": string_prop("New role ID"),
                    "customFields": custom_fields_prop("Custom field values to update")
                }),
                &["userId"],
            ),
        ),
        ToolDefinition::new(
            "search_contacts",
            "Search for contacts/users across all clients by name or email.",
            schema(
                paged(json!({
                    "search": string_prop("Search term to match against name or email (required)")
                })),
                &["search"],
            ),
        ),
        ToolDefinition::new(
            "get_alerts",
            "List all alerts with optional filtering. Returns paginated list of RMM alerts with status, severity, and asset info.",
            schema(
                paged(json!({
                    "status": string_prop("Filter by alert status (e.g., \"Open\", \"Resolved\")"),
                    "severity": string_prop("Filter by severity (e.g., \"Critical\", \"High\", \"Medium\", \"Low\")")
                })),
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_asset_alerts",
            "Get all alerts for a specific asset. Returns alert history including resolved alerts.",
            schema(
                paged(json!({"assetId": string_prop("The unique ID of the asset (required)")})),
                &["assetId"],
            ),
        ),
        ToolDefinition::new(
            "resolve_alerts",
            "Mark one or more alerts as resolved.",
            schema(
                json!({"alertIds": string_list_prop("Array of alert IDs to resolve (required)")}),
                &["alertIds"],
            ),
        ),
        ToolDefinition::new(
            "create_alert",
            "Create a manual alert on an asset. Use for custom monitoring or manual incident reporting.",
            schema(
                json!({
                    "assetId": string_prop("Asset ID to create the alert on (required)"),
                    "message": string_prop("Alert message/title (required)"),
                    "description": string_prop("Detailed description of the alert"),
                    "severity": string_prop("Alert severity (e.g., \"Critical\", \"High\", \"Medium\", \"Low\")")
                }),
                &["assetId", "message"],
            ),
        ),
    ]
}

/// Returns `true` if `name` is a client, contact or alert tool.
#[must_use]
pub fn is_client_tool(name: &str) -> bool {
    CLIENT_TOOLS.contains(&name)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Inserts `key: value` when `value` is a non-empty string.
fn insert_text(input: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        input.insert(key.to_string(), json!(value));
    }
}

/// Inserts `key: {id_key: value}` when `value` is a non-empty string.
fn insert_ref(input: &mut Map<String, Value>, key: &str, id_key: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        input.insert(key.to_string(), json!({ id_key: value }));
    }
}

fn insert_value(input: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value.filter(|v| !v.is_null()) {
        input.insert(key.to_string(), value);
    }
}

/// Picks the `{<key>: ..., pagination: ...}` shape out of a list response.
fn paged_result(list: &Value, items: &str, key: &str) -> Value {
    json!({ key: list[items], "pagination": list["listInfo"] })
}

async fn run(client: &GraphqlClient, operation: &str, input: Value) -> Result<Value, ToolError> {
    Ok(client.execute(operation, json!({ "input": input })).await?)
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Runs a client, contact or alert tool.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] when required arguments are
/// missing, [`ToolError::Client`] when the API call fails, and
/// [`ToolError::UnknownTool`] for names this module does not own.
#[allow(clippy::too_many_lines)]
pub async fn handle(name: &str, arguments: Value, client: &GraphqlClient) -> Result<Value, ToolError> {
    match name {
        "get_client" => {
            let args: AccountIdArgs = parse_args(name, arguments)?;
            let data = run(client, &get_client_query(), json!({"accountId": args.account_id})).await?;
            Ok(data["getClient"].clone())
        }

        "get_clients" => {
            let args: ClientListArgs = parse_args(name, arguments)?;
            let mut input = args.paging.list_info();

            // The list filter takes one condition; the first filter given wins.
            let filter = if let Some(stage) = present(&args.stage) {
                Some(condition("stage", "is", json!(stage)))
            } else if let Some(status) = present(&args.status) {
                Some(condition("status", "is", json!(status)))
            } else {
                present(&args.search).map(|search| condition("name", "contains", json!(search)))
            };
            if let Some(filter) = filter {
                input.insert("condition".to_string(), filter);
            }

            let data = run(client, &get_client_list_query(), Value::Object(input)).await?;
            Ok(paged_result(&data["getClientList"], "clients", "clients"))
        }

        "get_client_sites" => {
            let args: ClientScopedArgs = parse_args(name, arguments)?;
            let input = json!({"clientId": args.client_id, "listInfo": args.paging.list_info()});
            let data = run(client, &get_client_site_list_query(), input).await?;
            Ok(paged_result(&data["getClientSiteList"], "sites", "sites"))
        }

        "get_client_users" => {
            let args: ClientScopedArgs = parse_args(name, arguments)?;
            let input = json!({"clientId": args.client_id, "listInfo": args.paging.list_info()});
            let data = run(client, &get_client_user_list_query(), input).await?;
            Ok(paged_result(&data["getClientUserList"], "userList", "users"))
        }

        "get_client_contracts" => {
            let args: ContractListArgs = parse_args(name, arguments)?;
            let mut input = args.paging.list_info();
            if let Some(client_id) = present(&args.client_id) {
                input.insert(
                    "condition".to_string(),
                    condition("client.accountId", "is", json!(client_id)),
                );
            }

            let data = run(client, &get_client_contract_list_query(), Value::Object(input)).await?;
            Ok(paged_result(
                &data["getClientContractList"],
                "clientContracts",
                "contracts",
            ))
        }

        "create_client" => {
            let args: CreateClientArgs = parse_args(name, arguments)?;

            let mut hq_site = Map::new();
            hq_site.insert("name".to_string(), json!(args.hq_site_name));
            hq_site.insert("timezoneCode".to_string(), json!(args.hq_site_timezone));
            hq_site.insert(
                "working24x7".to_string(),
                json!(args.hq_site_working_24x7.unwrap_or(true)),
            );
            if let Some(address) = &args.hq_site_address {
                insert_text(&mut hq_site, "line1", &address.line1);
                insert_text(&mut hq_site, "line2", &address.line2);
                insert_text(&mut hq_site, "city", &address.city);
                insert_text(&mut hq_site, "postalCode", &address.postal_code);
                insert_text(&mut hq_site, "countryCode", &address.country_code);
                insert_text(&mut hq_site, "stateCode", &address.state_code);
            }

            let mut input = Map::new();
            input.insert("name".to_string(), json!(args.name));
            input.insert("hqSite".to_string(), Value::Object(hq_site));
            insert_text(&mut input, "stage", &args.stage);
            insert_text(&mut input, "status", &args.status);
            insert_value(&mut input, "emailDomains", args.email_domains.map(|d| json!(d)));
            insert_ref(&mut input, "accountManager", "userId", &args.account_manager_id);
            insert_value(&mut input, "customFields", args.custom_fields);

            let data = run(client, &create_client_mutation(), Value::Object(input)).await?;
            Ok(data["createClientV2"].clone())
        }

        "create_client_user" => {
            let args: CreateClientUserArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("firstName".to_string(), json!(args.first_name));
            input.insert("email".to_string(), json!(args.email));
            input.insert("role".to_string(), json!({"roleId": args.role_id}));
            input.insert(
                "addAssociations".to_string(),
                json!([{
                    "client": {"accountId": args.client_id},
                    "site": {"id": args.site_id},
                }]),
            );
            insert_text(&mut input, "lastName", &args.last_name);
            insert_text(&mut input, "contactNumber", &args.contact_number);
            insert_ref(&mut input, "reportingManager", "userId", &args.reporting_manager_id);
            insert_value(&mut input, "customFields", args.custom_fields);

            let data = run(client, &create_client_user_mutation(), Value::Object(input)).await?;
            Ok(data["createClientUser"].clone())
        }

        "create_client_site" => {
            let args: CreateClientSiteArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("client".to_string(), json!({"accountId": args.client_id}));
            input.insert("name".to_string(), json!(args.name));
            input.insert("timezoneCode".to_string(), json!(args.timezone_code));
            input.insert(
                "working24x7".to_string(),
                json!(args.working_24x7.unwrap_or(true)),
            );
            for (key, value) in [
                ("line1", &args.line1),
                ("line2", &args.line2),
                ("line3", &args.line3),
                ("city", &args.city),
                ("postalCode", &args.postal_code),
                ("countryCode", &args.country_code),
                ("stateCode", &args.state_code),
                ("contactNumber", &args.contact_number),
            ] {
                insert_text(&mut input, key, value);
            }

            let data = run(client, &create_client_site_mutation(), Value::Object(input)).await?;
            Ok(data["createClientSite"].clone())
        }

        "update_client" => {
            let args: UpdateClientArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("accountId".to_string(), json!(args.account_id));
            insert_text(&mut input, "name", &args.name);
            insert_text(&mut input, "stage", &args.stage);
            insert_text(&mut input, "status", &args.status);
            insert_value(&mut input, "emailDomains", args.email_domains.map(|d| json!(d)));
            insert_ref(&mut input, "accountManager", "userId", &args.account_manager_id);
            insert_ref(&mut input, "primaryContact", "userId", &args.primary_contact_id);
            insert_ref(&mut input, "secondaryContact", "userId", &args.secondary_contact_id);
            insert_ref(&mut input, "hqSite", "id", &args.hq_site_id);
            let groups = |ids: Vec<String>| -> Value {
                ids.into_iter().map(|id| json!({"groupId": id})).collect()
            };
            insert_value(
                &mut input,
                "addTechnicianGroups",
                args.add_technician_group_ids.map(groups),
            );
            insert_value(
                &mut input,
                "deleteTechnicianGroups",
                args.delete_technician_group_ids.map(groups),
            );
            insert_value(&mut input, "customFields", args.custom_fields);

            let data = run(client, &update_client_mutation(), Value::Object(input)).await?;
            Ok(data["updateClient"].clone())
        }

        "update_client_user" => {
            let args: UpdateClientUserArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("userId".to_string(), json!(args.user_id));
            insert_text(&mut input, "firstName", &args.first_name);
            insert_text(&mut input, "lastName", &args.last_name);
            insert_text(&mut input, "email", &args.email);
            insert_text(&mut input, "contactNumber", &args.contact_number);
            insert_ref(&mut input, "reportingManager", "userId", &args.reporting_manager_id);
            insert_ref(&mut input, "site", "id", &args.site_id);
            insert_ref(&mut input, "role", "roleId", &args.role_id);
            insert_value(&mut input, "customFields", args.custom_fields);

            let data = run(client, &update_client_user_mutation(), Value::Object(input)).await?;
            Ok(data["updateClientUser"].clone())
        }

        "search_contacts" => {
            let args: SearchContactsArgs = parse_args(name, arguments)?;
            let mut list_info = args.paging.list_info();
            list_info.insert(
                "condition".to_string(),
                condition("name", "contains", json!(args.search)),
            );

            let data = run(client, &get_client_user_list_query(), json!({"listInfo": list_info})).await?;
            let mut result = paged_result(&data["getClientUserList"], "userList", "users");
            result["searchTerm"] = json!(args.search);
            Ok(result)
        }

        "get_alerts" => {
            let args: AlertListArgs = parse_args(name, arguments)?;
            let mut input = args.paging.list_info();

            let filter = if let Some(status) = present(&args.status) {
                Some(condition("status", "is", json!(status)))
            } else {
                present(&args.severity).map(|severity| condition("severity", "is", json!(severity)))
            };
            if let Some(filter) = filter {
                input.insert("condition".to_string(), filter);
            }

            let data = run(client, &get_alert_list_query(), Value::Object(input)).await?;
            Ok(paged_result(&data["getAlertList"], "alerts", "alerts"))
        }

        "get_asset_alerts" => {
            let args: AssetAlertsArgs = parse_args(name, arguments)?;
            let input = json!({"assetId": args.asset_id, "listInfo": args.paging.list_info()});
            let data = run(client, &get_alerts_for_asset_query(), input).await?;
            Ok(paged_result(&data["getAlertsForAsset"], "alerts", "alerts"))
        }

        "resolve_alerts" => {
            let args: ResolveAlertsArgs = parse_args(name, arguments)?;
            let input: Vec<Value> = args.alert_ids.iter().map(|id| json!({"id": id})).collect();

            let data = run(client, RESOLVE_ALERTS_MUTATION, json!(input)).await?;
            Ok(json!({
                "success": data["resolveAlerts"],
                "resolvedCount": args.alert_ids.len(),
                "alertIds": args.alert_ids,
            }))
        }

        "create_alert" => {
            let args: CreateAlertArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("assetId".to_string(), json!(args.asset_id));
            input.insert("message".to_string(), json!(args.message));
            insert_text(&mut input, "description", &args.description);
            insert_text(&mut input, "severity", &args.severity);

            let data = run(client, &create_alert_mutation(), Value::Object(input)).await?;
            Ok(data["createAlert"].clone())
        }

        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

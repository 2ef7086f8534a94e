//! Reference data tools.
//!
//! These tools return the valid values other operations accept (statuses,
//! priorities, categories, technicians, ...). Most are parameter-less queries
//! returning a flat list, rendered as `{<key>: [...], count: n}`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::GraphqlClient;
use crate::tools::{page_number, page_size, parse_args, ToolDefinition, ToolError, MAX_PAGE_SIZE};

/// A parameter-less list query.
struct ListLookup {
    tool: &'static str,
    description: &'static str,
    query: &'static str,
    field: &'static str,
    key: &'static str,
}

const LIST_LOOKUPS: &[ListLookup] = &[
    ListLookup {
        tool: "get_statuses",
        description: "Get valid ticket statuses. Returns a list of status options that can be used when creating or updating tickets.",
        query: "query getStatusList {
  getStatusList { id name description }
}",
        field: "getStatusList",
        key: "statuses",
    },
    ListLookup {
        tool: "get_priorities",
        description: "Get priority levels for tickets. Returns a list of priority options with their color codes.",
        query: "query getPriorityList {
  getPriorityList { id name colorCode }
}",
        field: "getPriorityList",
        key: "priorities",
    },
    ListLookup {
        tool: "get_categories",
        description: "Get ticket categories and their subcategories. Returns a hierarchical list of categories for classifying tickets.",
        query: "query getCategoryList {
  getCategoryList { id name subCategories { id name } }
}",
        field: "getCategoryList",
        key: "categories",
    },
    ListLookup {
        tool: "get_causes",
        description: "Get ticket causes and their subcauses. Returns a hierarchical list of root causes for tickets.",
        query: "query getCauseList {
  getCauseList { id name subCauses { id name description } }
}",
        field: "getCauseList",
        key: "causes",
    },
    ListLookup {
        tool: "get_impacts",
        description: "Get impact levels for tickets. Returns a list of impact options (e.g., Low, Medium, High).",
        query: "query getImpactList {
  getImpactList { id name }
}",
        field: "getImpactList",
        key: "impacts",
    },
    ListLookup {
        tool: "get_urgencies",
        description: "Get urgency levels for tickets. Returns a list of urgency options (e.g., Low, Medium, High).",
        query: "query getUrgencyList {
  getUrgencyList { id name }
}",
        field: "getUrgencyList",
        key: "urgencies",
    },
    ListLookup {
        tool: "get_resolution_codes",
        description: "Get resolution codes for closing tickets. Returns a list of resolution options with descriptions.",
        query: "query getResolutionCodeList {
  getResolutionCodeList { id name description }
}",
        field: "getResolutionCodeList",
        key: "resolutionCodes",
    },
    ListLookup {
        tool: "get_slas",
        description: "Get available SLAs (Service Level Agreements). Returns a list of SLA options that can be assigned to tickets.",
        query: "query getSLAList {
  getSLAList { id name }
}",
        field: "getSLAList",
        key: "slas",
    },
    ListLookup {
        tool: "get_technician_groups",
        description: "Get technician groups. Returns a list of groups that technicians can belong to for ticket assignment.",
        query: "query getTechnicianGroupList {
  getTechnicianGroupList { groupId name }
}",
        field: "getTechnicianGroupList",
        key: "technicianGroups",
    },
    ListLookup {
        tool: "get_teams",
        description: "Get teams. Returns a list of teams that technicians can be assigned to.",
        query: "query getTeamList {
  getTeamList { teamId name }
}",
        field: "getTeamList",
        key: "teams",
    },
    ListLookup {
        tool: "get_client_stages",
        description: "Get client lifecycle stages and their statuses. Returns stages like Prospect, Active, Inactive with associated statuses.",
        query: "query getClientStageList {
  getClientStageList { stageId name constant statuses { statusId name constant } }
}",
        field: "getClientStageList",
        key: "clientStages",
    },
];

const GET_TECHNICIANS: &str = "get_technicians";
const GET_DEVICE_CATEGORIES: &str = "get_device_categories";

const TECHNICIAN_LIST_QUERY: &str = "query getTechnicianList($input: ListInfoInput!) {
  getTechnicianList(input: $input) {
    userList { userId firstName lastName name email contactNumber designation team role groups }
    listInfo { page pageSize totalCount hasMore }
  }
}";

const DEVICE_CATEGORIES_QUERY: &str = "query getDeviceCategories($input: DeviceCategoryIdentifierInput) {
  getDeviceCategories(input: $input) { deviceCategoryId name custom assetClass createdTime }
}";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TechnicianArgs {
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DeviceCategoryArgs {
    module: Option<Vec<String>>,
    custom: Option<bool>,
    class_id: Option<String>,
}

/// Returns the lookup tool definitions.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    let empty_schema = || json!({"type": "object", "properties": {}, "additionalProperties": false});

    let mut definitions: Vec<ToolDefinition> = LIST_LOOKUPS
        .iter()
        .map(|l| ToolDefinition::new(l.tool, l.description, empty_schema()))
        .collect();

    definitions.push(ToolDefinition::new(
        GET_TECHNICIANS,
        "Get list of technicians. Returns technicians with their contact info, team, role, and group memberships.",
        json!({
            "type": "object",
            "properties": {
                "page": {"type": "integer", "description": "Page number (default: 1)", "minimum": 1},
                "pageSize": {
                    "type": "integer",
                    "description": "Number of results per page (default: 100, max: 100)",
                    "minimum": 1,
                    "maximum": 100
                }
            },
            "additionalProperties": false
        }),
    ));

    definitions.push(ToolDefinition::new(
        GET_DEVICE_CATEGORIES,
        "Get device categories for assets. Optionally filter by module type (ENDPOINT or NM_ASSET) or custom/default status.",
        json!({
            "type": "object",
            "properties": {
                "module": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["ENDPOINT", "NM_ASSET"]},
                    "description": "Filter by module type(s): ENDPOINT (managed endpoints) or NM_ASSET (network assets)"
                },
                "custom": {"type": "boolean", "description": "Filter by custom (true) or default (false) categories"},
                "classId": {"type": "string", "description": "Filter by asset class ID"}
            },
            "additionalProperties": false
        }),
    ));

    definitions
}

/// Returns `true` if `name` is a lookup tool.
#[must_use]
pub fn is_lookup_tool(name: &str) -> bool {
    name == GET_TECHNICIANS
        || name == GET_DEVICE_CATEGORIES
        || LIST_LOOKUPS.iter().any(|l| l.tool == name)
}

/// Runs a lookup tool.
///
/// # Errors
///
/// Returns [`ToolError`] for unknown names, bad arguments or API failures.
pub async fn handle(name: &str, arguments: Value, client: &GraphqlClient) -> Result<Value, ToolError> {
    match name {
        GET_TECHNICIANS => {
            let args: TechnicianArgs = parse_args(name, arguments)?;
            let input = json!({
                "page": page_number(args.page),
                "pageSize": page_size(args.page_size, MAX_PAGE_SIZE).min(MAX_PAGE_SIZE),
            });

            let data = client
                .execute(TECHNICIAN_LIST_QUERY, json!({ "input": input }))
                .await?;
            let result = &data["getTechnicianList"];
            let info = &result["listInfo"];

            Ok(json!({
                "technicians": list_or_empty(&result["userList"]),
                "pagination": {
                    "page": info["page"],
                    "pageSize": info["pageSize"],
                    "totalCount": info["totalCount"],
                    "hasMore": info["hasMore"],
                }
            }))
        }
        GET_DEVICE_CATEGORIES => {
            let args: DeviceCategoryArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            if let Some(module) = args.module {
                input.insert("module".to_string(), json!(module));
            }
            if let Some(custom) = args.custom {
                input.insert("custom".to_string(), json!(custom));
            }
            if let Some(class_id) = args.class_id.filter(|c| !c.is_empty()) {
                input.insert("classId".to_string(), json!(class_id));
            }

            let variables = if input.is_empty() {
                json!({})
            } else {
                json!({ "input": input })
            };

            let data = client.execute(DEVICE_CATEGORIES_QUERY, variables).await?;
            Ok(format_result(&data["getDeviceCategories"], "deviceCategories"))
        }
        _ => {
            let lookup = LIST_LOOKUPS
                .iter()
                .find(|l| l.tool == name)
                .ok_or_else(|| ToolError::UnknownTool {
                    name: name.to_string(),
                })?;

            let data = client.execute(lookup.query, json!({})).await?;
            Ok(format_result(&data[lookup.field], lookup.key))
        }
    }
}

/// Renders a list as `{<key>: [...], count: n}`, treating a missing list as empty.
fn format_result(items: &Value, key: &str) -> Value {
    let list = list_or_empty(items);
    let count = list.as_array().map_or(0, Vec::len);

    let mut result = Map::new();
    result.insert(key.to_string(), list);
    result.insert("count".to_string(), json!(count));
    Value::Object(result)
}

fn list_or_empty(items: &Value) -> Value {
    if items.is_null() {
        json!([])
    } else {
        items.clone()
    }
}

//! Asset tools.
//!
//! Read tools return asset details, hardware summaries, installed software,
//! patches, disks and activity logs. Script and patch history are views of
//! the activity log filtered by module. `update_asset`,
//! `assign_device_category` and `delete_asset` are mutations.
//!
//! Asset tool arguments use snake_case names (`asset_id`, `page_size`).

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::GraphqlClient;
use crate::tools::{
    condition, page_number, page_size, parse_args, present, ToolDefinition, ToolError,
    MAX_PAGE_SIZE,
};

const ASSET_TOOLS: [&str; 14] = [
    "get_asset",
    "get_assets",
    "get_asset_summary",
    "get_asset_software",
    "get_asset_patches",
    "get_asset_disks",
    "get_asset_activity",
    "get_asset_script_history",
    "get_asset_patch_history",
    "get_asset_user_log",
    "get_unmonitored_assets",
    "update_asset",
    "assign_device_category",
    "delete_asset",
];

const DEFAULT_LIST_PAGE_SIZE: u32 = 25;
const DEFAULT_DETAIL_PAGE_SIZE: u32 = 50;

const SCRIPT_HISTORY_NOTE: &str =
    "Script output/stdout is not available via API - only execution metadata.";

const ASSET_FIELDS: &str = "assetId name assetClass client site requester primaryMac
      loggedInUser serialNumber manufacturer model hostName publicIp gateway platform
      domain status sysUptime lastCommunicatedTime agentVersion platformFamily
      platformCategory platformVersion patchStatus warrantyExpiryDate purchasedDate
      customFields lastReportedTime deviceCategory";

// The unmonitored list rejects some asset fields (primaryMac among them).
const UNMONITORED_ASSET_FIELDS: &str = "assetId name assetClass client site requester
      serialNumber manufacturer model hostName platform status lastCommunicatedTime
      deviceCategory";

const ASSET_SUMMARY_FIELDS: &str = "
      cpu { assetId cpuName currentSpeed maxSpeed physicalCore logicalCore architecture
            l1Cache l2Cache l3Cache processCount threadsCount handlesCount cpuUsage }
      memory { totalMemory usedMemory availableMemory cachedMemory pagedPoolByte
               nonPagedPoolByte memoryUsage swapTotalMemory swapAvailableMemory swapUsedMemory }
      disk { disks { drive discType fileSystem size freeSize driveUsage } totalFreeSpace totalSize }
      assetInterface { name mac ipv4Address ipv6Address infIndex mtu connectType lineSpeed
                       dataInPerSec dataOutPerSec adapterName }
      lastUserLog { id name lastLoginTime }";

const ASSET_SOFTWARE_FIELDS: &str = "id software version installedDate bitVersion installedPath";

const ASSET_PATCH_FIELDS: &str = "
      patchDetail { patchId patchKey title publishedDate category severity
                    kbNumbers { kbNumber } restartRequired }
      approvalStatus installationTime installationStatus failedMessage";

const ASSET_DISK_FIELDS: &str = "drive discType fileSystem maxFileLength autoMounted compressed
      pageFile indexed size freeSize activeTime responseTime readSpeed writeSpeed driveUsage";

const ASSET_ACTIVITY_FIELDS: &str = "activityId module activityType activityData createdBy createdTime";

const ASSET_USER_LOG_FIELDS: &str = "id name lastLoginTime";

const LIST_INFO_FIELDS: &str = "listInfo { page pageSize totalCount }";

/// Builds a query taking an `AssetIdentifierInput`.
fn asset_query(operation: &str, fields: &str) -> String {
    format!(
        "query {operation}($input: AssetIdentifierInput!) {{
  {operation}(input: $input) {{ {fields} }}
}}"
    )
}

/// Builds a paged query taking an `AssetDetailsListInput`.
fn asset_details_query(operation: &str, items: &str, fields: &str) -> String {
    format!(
        "query {operation}($input: AssetDetailsListInput!) {{
  {operation}(input: $input) {{
    {items} {{ {fields} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

/// Builds a paged query taking a `ListInfoInput`.
fn asset_list_query(operation: &str, fields: &str) -> String {
    format!(
        "query {operation}($input: ListInfoInput!) {{
  {operation}(input: $input) {{
    assets {{ {fields} }}
    {LIST_INFO_FIELDS}
  }}
}}"
    )
}

const UPDATE_ASSET_MUTATION: &str = "mutation updateAsset($input: UpdateAssetInput!) {
  updateAsset(input: $input) { assetId name assetClass client site requester customFields }
}";

const ASSIGN_DEVICE_CATEGORY_MUTATION: &str =
    "mutation assignDeviceCategory($input: AssignDeviceCategoryInput) {
  assignDeviceCategory(input: $input)
}";

const SOFT_DELETE_ASSET_MUTATION: &str = "mutation softDeleteAsset($input: AssetIdentifierInput) {
  softDeleteAsset(input: $input)
}";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct Paging {
    page: Option<u32>,
    page_size: Option<u32>,
}

impl Paging {
    /// `{page, pageSize}` with the given default size, uncapped.
    fn list_info(&self, default_size: u32) -> Map<String, Value> {
        let mut info = Map::new();
        info.insert("page".to_string(), json!(page_number(self.page)));
        info.insert(
            "pageSize".to_string(),
            json!(page_size(self.page_size, default_size)),
        );
        info
    }

    /// `{page, pageSize}` with the given default size, capped at the API maximum.
    fn capped_list_info(&self, default_size: u32) -> Map<String, Value> {
        let mut info = Map::new();
        info.insert("page".to_string(), json!(page_number(self.page)));
        info.insert(
            "pageSize".to_string(),
            json!(page_size(self.page_size, default_size).min(MAX_PAGE_SIZE)),
        );
        info
    }
}

#[derive(Debug, Deserialize)]
struct AssetIdArgs {
    asset_id: String,
}

#[derive(Debug, Deserialize)]
struct AssetPagedArgs {
    asset_id: String,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
struct AssetListArgs {
    client_id: Option<String>,
    site_id: Option<String>,
    status: Option<String>,
    platform_category: Option<String>,
    patch_status: Option<String>,
    #[serde(flatten)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
struct UpdateAssetArgs {
    asset_id: String,
    name: Option<String>,
    client_id: Option<String>,
    site_id: Option<String>,
    requester_id: Option<String>,
    warranty_expiry_date: Option<String>,
    purchased_date: Option<String>,
    custom_fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AssignCategoryArgs {
    asset_ids: Vec<String>,
    device_category_id: String,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

fn string_prop(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn asset_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {"asset_id": string_prop(description)},
        "required": ["asset_id"]
    })
}

fn paged(mut properties: Value, default_size: u32, required: &[&str]) -> Value {
    properties["page"] = json!({
        "type": "integer",
        "minimum": 1,
        "description": "Page number (default: 1)"
    });
    properties["page_size"] = json!({
        "type": "integer",
        "minimum": 1,
        "description": format!("Number of results per page (default: {default_size})")
    });
    json!({"type": "object", "properties": properties, "required": required})
}

fn asset_paged_schema(default_size: u32) -> Value {
    paged(
        json!({"asset_id": string_prop("The unique ID of the asset")}),
        default_size,
        &["asset_id"],
    )
}

/// Returns the asset tool definitions.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_asset",
            "Get full details of a specific asset by ID. Returns comprehensive information including hardware specs, client/site assignment, network details, patch status, and custom fields.",
            asset_id_schema("The unique ID of the asset"),
        ),
        ToolDefinition::new(
            "get_assets",
            "List assets with optional filters. Supports filtering by client, site, OS type, status, and more. Returns paginated results.",
            paged(
                json!({
                    "client_id": string_prop("Filter by client ID (accountId)"),
                    "site_id": string_prop("Filter by site ID"),
                    "status": {
                        "type": "string",
                        "enum": ["ONLINE", "OFFLINE"],
                        "description": "Filter by online/offline status"
                    },
                    "platform_category": {
                        "type": "string",
                        "enum": ["WORKSTATION", "SERVER"],
                        "description": "Filter by platform category"
                    },
                    "patch_status": string_prop("Filter by patch status (e.g., \"Fully Patched\", \"Patches Available\")")
                }),
                DEFAULT_LIST_PAGE_SIZE,
                &[],
            ),
        ),
        ToolDefinition::new(
            "get_asset_summary",
            "Get a quick overview of an asset including CPU usage, memory usage, disk space, network interface details, and last user login. Ideal for at-a-glance health checks.",
            asset_id_schema("The unique ID of the asset"),
        ),
        ToolDefinition::new(
            "get_asset_software",
            "List all installed software on an asset. Returns software name, version, install date, and path.",
            asset_paged_schema(DEFAULT_DETAIL_PAGE_SIZE),
        ),
        ToolDefinition::new(
            "get_asset_patches",
            "Get patch status and details for an asset. Shows available, installed, and failed patches with severity and approval status.",
            asset_paged_schema(DEFAULT_DETAIL_PAGE_SIZE),
        ),
        ToolDefinition::new(
            "get_asset_disks",
            "Get detailed disk and partition information for an asset including drive letters, file systems, sizes, free space, and I/O metrics.",
            asset_id_schema("The unique ID of the asset"),
        ),
        ToolDefinition::new(
            "get_asset_activity",
            "Get the full activity log for an asset. Shows all activities including script executions, patch operations, and other events.",
            asset_paged_schema(DEFAULT_LIST_PAGE_SIZE),
        ),
        ToolDefinition::new(
            "get_asset_script_history",
            "Get script execution history for an asset. Shows script names, execution status, who triggered them, and when. Note: Script output/stdout is not available via API.",
            asset_paged_schema(DEFAULT_LIST_PAGE_SIZE),
        ),
        ToolDefinition::new(
            "get_asset_patch_history",
            "Get patch operation history for an asset. Shows patch installations, scans, and their status.",
            asset_paged_schema(DEFAULT_LIST_PAGE_SIZE),
        ),
        ToolDefinition::new(
            "get_asset_user_log",
            "Get user login/logout history for an asset. Shows usernames and their last login times.",
            asset_id_schema("The unique ID of the asset"),
        ),
        ToolDefinition::new(
            "get_unmonitored_assets",
            "List assets that are not currently being monitored. Useful for identifying devices that may have gone offline or had their agent removed.",
            paged(json!({}), DEFAULT_LIST_PAGE_SIZE, &[]),
        ),
        ToolDefinition::new(
            "update_asset",
            "Update asset metadata including name, client/site assignment, requester, warranty dates, and custom fields.",
            json!({
                "type": "object",
                "properties": {
                    "asset_id": string_prop("The unique ID of the asset to update"),
                    "name": string_prop("New name for the asset"),
                    "client_id": string_prop("New client ID (accountId) to assign the asset to"),
                    "site_id": string_prop("New site ID to assign the asset to"),
                    "requester_id": string_prop("New requester user ID for the asset"),
                    "warranty_expiry_date": string_prop("Warranty expiration date (format: YYYY-MM-DD)"),
                    "purchased_date": string_prop("Purchase date (format: YYYY-MM-DD)"),
                    "custom_fields": {
                        "type": "object",
                        "description": "Custom field values as key-value pairs"
                    }
                },
                "required": ["asset_id"]
            }),
        ),
        ToolDefinition::new(
            "assign_device_category",
            "Assign a device category to one or more assets. Use get_device_categories to see available categories.",
            json!({
                "type": "object",
                "properties": {
                    "asset_ids": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of asset IDs to categorize"
                    },
                    "device_category_id": string_prop("The ID of the device category to assign")
                },
                "required": ["asset_ids", "device_category_id"]
            }),
        ),
        ToolDefinition::new(
            "delete_asset",
            "Soft delete an asset. The asset will be moved to trash and can potentially be recovered. Use with caution.",
            asset_id_schema("The unique ID of the asset to delete"),
        ),
    ]
}

/// Returns `true` if `name` is an asset tool.
#[must_use]
pub fn is_asset_tool(name: &str) -> bool {
    ASSET_TOOLS.contains(&name)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Picks the first filter given; the asset list takes a single condition.
fn asset_list_condition(args: &AssetListArgs) -> Option<Value> {
    [
        ("client.accountId", &args.client_id),
        ("site.id", &args.site_id),
        ("status", &args.status),
        ("platformCategory", &args.platform_category),
        ("patchStatus", &args.patch_status),
    ]
    .into_iter()
    .find_map(|(attribute, value)| present(value).map(|v| condition(attribute, "is", json!(v))))
}

/// Keeps the activity entries recorded by `module`.
fn activities_for_module(activity: &Value, module: &str) -> Vec<Value> {
    activity["activities"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry["module"] == module)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

async fn by_asset_id(
    client: &GraphqlClient,
    operation: &str,
    fields: &str,
    asset_id: &str,
) -> Result<Value, ToolError> {
    let data = client
        .execute(
            &asset_query(operation, fields),
            json!({ "input": { "assetId": asset_id } }),
        )
        .await?;
    Ok(data[operation].clone())
}

async fn asset_details(
    client: &GraphqlClient,
    operation: &str,
    items: &str,
    fields: &str,
    args: &AssetPagedArgs,
    default_size: u32,
) -> Result<Value, ToolError> {
    let input = json!({
        "assetId": args.asset_id,
        "listInfo": args.paging.list_info(default_size),
    });
    let data = client
        .execute(
            &asset_details_query(operation, items, fields),
            json!({ "input": input }),
        )
        .await?;
    Ok(data[operation].clone())
}

async fn asset_activity(client: &GraphqlClient, args: &AssetPagedArgs) -> Result<Value, ToolError> {
    asset_details(
        client,
        "getAssetActivity",
        "activities",
        ASSET_ACTIVITY_FIELDS,
        args,
        DEFAULT_LIST_PAGE_SIZE,
    )
    .await
}

/// Renders a boolean mutation outcome.
fn outcome(value: &Value, success: String, failure: &str) -> Value {
    let ok = value.as_bool().unwrap_or(false);
    let message = if ok { success } else { failure.to_string() };
    json!({"success": ok, "message": message})
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Runs an asset tool.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] when required arguments are
/// missing, [`ToolError::Client`] when the API call fails, and
/// [`ToolError::UnknownTool`] for names this module does not own.
#[allow(clippy::too_many_lines)]
pub async fn handle(name: &str, arguments: Value, client: &GraphqlClient) -> Result<Value, ToolError> {
    match name {
        "get_asset" => {
            let args: AssetIdArgs = parse_args(name, arguments)?;
            by_asset_id(client, "getAsset", ASSET_FIELDS, &args.asset_id).await
        }

        "get_assets" => {
            let args: AssetListArgs = parse_args(name, arguments)?;
            let mut input = args.paging.capped_list_info(DEFAULT_LIST_PAGE_SIZE);
            if let Some(filter) = asset_list_condition(&args) {
                input.insert("condition".to_string(), filter);
            }

            let data = client
                .execute(
                    &asset_list_query("getAssetList", ASSET_FIELDS),
                    json!({ "input": input }),
                )
                .await?;
            Ok(data["getAssetList"].clone())
        }

        "get_asset_summary" => {
            let args: AssetIdArgs = parse_args(name, arguments)?;
            by_asset_id(client, "getAssetSummary", ASSET_SUMMARY_FIELDS, &args.asset_id).await
        }

        "get_asset_software" => {
            let args: AssetPagedArgs = parse_args(name, arguments)?;
            asset_details(
                client,
                "getAssetSoftwareList",
                "assetSoftwares",
                ASSET_SOFTWARE_FIELDS,
                &args,
                DEFAULT_DETAIL_PAGE_SIZE,
            )
            .await
        }

        "get_asset_patches" => {
            let args: AssetPagedArgs = parse_args(name, arguments)?;
            asset_details(
                client,
                "getAssetPatchDetails",
                "assetPatches",
                ASSET_PATCH_FIELDS,
                &args,
                DEFAULT_DETAIL_PAGE_SIZE,
            )
            .await
        }

        "get_asset_disks" => {
            let args: AssetIdArgs = parse_args(name, arguments)?;
            by_asset_id(client, "getAssetDiskDetails", ASSET_DISK_FIELDS, &args.asset_id).await
        }

        "get_asset_activity" => {
            let args: AssetPagedArgs = parse_args(name, arguments)?;
            asset_activity(client, &args).await
        }

        "get_asset_script_history" => {
            let args: AssetPagedArgs = parse_args(name, arguments)?;
            let activity = asset_activity(client, &args).await?;
            Ok(json!({
                "activities": activities_for_module(&activity, "SCRIPT"),
                "listInfo": activity["listInfo"],
                "note": SCRIPT_HISTORY_NOTE,
            }))
        }

        "get_asset_patch_history" => {
            let args: AssetPagedArgs = parse_args(name, arguments)?;
            let activity = asset_activity(client, &args).await?;
            Ok(json!({
                "activities": activities_for_module(&activity, "PATCH"),
                "listInfo": activity["listInfo"],
            }))
        }

        "get_asset_user_log" => {
            let args: AssetIdArgs = parse_args(name, arguments)?;
            by_asset_id(client, "getAssetUserLog", ASSET_USER_LOG_FIELDS, &args.asset_id).await
        }

        "get_unmonitored_assets" => {
            let paging: Paging = parse_args(name, arguments)?;
            let input = paging.capped_list_info(DEFAULT_LIST_PAGE_SIZE);

            let data = client
                .execute(
                    &asset_list_query("getUnMonitoredAssetList", UNMONITORED_ASSET_FIELDS),
                    json!({ "input": input }),
                )
                .await?;
            Ok(data["getUnMonitoredAssetList"].clone())
        }

        "update_asset" => {
            let args: UpdateAssetArgs = parse_args(name, arguments)?;

            let mut input = Map::new();
            input.insert("assetId".to_string(), json!(args.asset_id));
            if let Some(name) = present(&args.name) {
                input.insert("name".to_string(), json!(name));
            }
            if let Some(client_id) = present(&args.client_id) {
                input.insert("client".to_string(), json!({"accountId": client_id}));
            }
            if let Some(site_id) = present(&args.site_id) {
                input.insert("site".to_string(), json!({"id": site_id}));
            }
            if let Some(requester_id) = present(&args.requester_id) {
                input.insert("requester".to_string(), json!({"userId": requester_id}));
            }
            if let Some(date) = present(&args.warranty_expiry_date) {
                input.insert("warrantyExpiryDate".to_string(), json!(date));
            }
            if let Some(date) = present(&args.purchased_date) {
                input.insert("purchasedDate".to_string(), json!(date));
            }
            if let Some(custom_fields) = args.custom_fields.filter(|v| !v.is_null()) {
                input.insert("customFields".to_string(), custom_fields);
            }

            let data = client
                .execute(UPDATE_ASSET_MUTATION, json!({ "input": input }))
                .await?;
            Ok(data["updateAsset"].clone())
        }

        "assign_device_category" => {
            let args: AssignCategoryArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    ASSIGN_DEVICE_CATEGORY_MUTATION,
                    json!({ "input": {
                        "assetIds": args.asset_ids,
                        "deviceCategoryId": args.device_category_id,
                    }}),
                )
                .await?;

            Ok(outcome(
                &data["assignDeviceCategory"],
                format!("Device category assigned to {} asset(s)", args.asset_ids.len()),
                "Failed to assign device category",
            ))
        }

        "delete_asset" => {
            let args: AssetIdArgs = parse_args(name, arguments)?;
            let data = client
                .execute(
                    SOFT_DELETE_ASSET_MUTATION,
                    json!({ "input": { "assetId": args.asset_id } }),
                )
                .await?;

            Ok(outcome(
                &data["softDeleteAsset"],
                format!("Asset {} has been deleted", args.asset_id),
                "Failed to delete asset",
            ))
        }

        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

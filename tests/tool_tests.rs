//! Integration tests for the tool catalog.
//!
//! Each test runs a tool through the [`ToolRegistry`] against a mock
//! SuperOps endpoint and checks both the GraphQL variables sent and the
//! shaped result.

use std::time::Duration;

use serde_json::{json, Value};
use superops_msp::{
    ApiToken, BaseUrl, ClientError, GraphqlClient, RetryPolicy, Subdomain, SuperOpsConfig,
    ToolError, ToolRegistry,
};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_registry(server: &MockServer, read_only: bool) -> ToolRegistry {
    let config = SuperOpsConfig::builder()
        .api_token(ApiToken::new("test-token").unwrap())
        .subdomain(Subdomain::new("acme").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .read_only(read_only)
        .build()
        .unwrap();

    let client = GraphqlClient::new(config)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(2, vec![Duration::from_millis(10)]));
    ToolRegistry::new(client)
}

async fn respond_with_data(server: &MockServer, data: Value) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Returns the `variables` of the only request the server received.
async fn sent_variables(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    let body: Value = requests[0].body_json().unwrap();
    body["variables"].clone()
}

async fn sent_query(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    body["query"].as_str().unwrap_or_default().to_string()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

fn ticket_list(tickets: Value) -> Value {
    json!({
        "getTicketList": {
            "tickets": tickets,
            "listInfo": {"page": 1, "pageSize": 25, "totalCount": 1, "hasMore": false}
        }
    })
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_unknown_tool_is_rejected() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(registry.call("get_weather", json!({})).await);
    assert!(matches!(error, ToolError::UnknownTool { ref name } if name == "get_weather"));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_missing_required_argument_is_rejected() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(registry.call("get_ticket", json!({})).await);
    assert!(matches!(error, ToolError::InvalidArguments { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[test]
fn test_registry_lists_all_tools() {
    let config = SuperOpsConfig::builder()
        .api_token(ApiToken::new("t").unwrap())
        .subdomain(Subdomain::new("acme").unwrap())
        .build()
        .unwrap();
    let registry = ToolRegistry::new(GraphqlClient::new(config).unwrap());

    let names: Vec<&str> = registry.definitions().iter().map(|d| d.name).collect();
    assert_eq!(names.len(), 61);
    assert!(names.contains(&"get_statuses"));
    assert!(names.contains(&"get_client_stages"));
    assert!(names.contains(&"delete_ticket"));
    assert!(names.contains(&"create_client"));
    assert!(names.contains(&"resolve_alerts"));
    assert!(names.contains(&"get_asset_summary"));
    assert!(names.contains(&"delete_asset"));
}

// ============================================================================
// Lookup Tools
// ============================================================================

#[tokio::test]
async fn test_get_statuses_counts_results() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getStatusList": [
            {"id": "1", "name": "Open", "description": null},
            {"id": "2", "name": "Closed", "description": null}
        ]}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_statuses", Value::Null).await);

    assert_eq!(result["count"], 2);
    assert_eq!(result["statuses"][1]["name"], "Closed");
    assert_eq!(sent_variables(&server).await, json!({}));
}

#[tokio::test]
async fn test_missing_lookup_list_is_empty() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getSLAList": null})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_slas", json!({})).await);

    assert_eq!(result, json!({"slas": [], "count": 0}));
}

#[tokio::test]
async fn test_get_technicians_caps_page_size() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getTechnicianList": {
            "userList": [{"userId": "5", "name": "Sam Smith", "email": "sam@example.com"}],
            "listInfo": {"page": 2, "pageSize": 100, "totalCount": 101, "hasMore": false}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_technicians", json!({"page": 2, "pageSize": 500}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"page": 2, "pageSize": 100}})
    );
    assert_eq!(result["technicians"][0]["email"], "sam@example.com");
    assert_eq!(result["pagination"]["totalCount"], 101);
}

#[tokio::test]
async fn test_get_technicians_treats_zero_paging_as_unset() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getTechnicianList": {"userList": [], "listInfo": {}}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("get_technicians", json!({"page": 0, "pageSize": 0}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"page": 1, "pageSize": 100}})
    );
}

#[tokio::test]
async fn test_get_device_categories_without_filters_sends_no_input() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getDeviceCategories": [{"deviceCategoryId": "1", "name": "Laptop"}]}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_device_categories", json!({})).await);

    assert_eq!(sent_variables(&server).await, json!({}));
    assert_eq!(result["deviceCategories"][0]["name"], "Laptop");
    assert_eq!(result["count"], 1);
}

#[tokio::test]
async fn test_get_device_categories_sends_filters() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getDeviceCategories": []})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("get_device_categories", json!({"module": ["ENDPOINT"], "custom": false}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"module": ["ENDPOINT"], "custom": false}})
    );
}

// ============================================================================
// Ticket Queue Tools
// ============================================================================

#[tokio::test]
async fn test_get_ticket_returns_full_ticket() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getTicket": {"ticketId": "42", "subject": "Printer", "customFields": {"a": 1}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_ticket", json!({"ticketId": "42"})).await);

    assert_eq!(result["ticket"]["customFields"]["a"], 1);
    assert_eq!(result["_meta"]["tool"], "get_ticket");
    assert_eq!(sent_variables(&server).await, json!({"input": {"ticketId": "42"}}));
}

#[tokio::test]
async fn test_get_ticket_reports_missing_ticket() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getTicket": null})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_ticket", json!({"ticketId": "404"})).await);

    assert_eq!(result, json!({"error": true, "message": "Ticket 404 not found"}));
}

#[tokio::test]
async fn test_get_open_tickets_combines_filters() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        ticket_list(json!([{
            "ticketId": "1",
            "displayId": "T-1",
            "subject": "Email down",
            "client": {"accountId": "9", "name": "Acme"},
            "technician": null
        }])),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_open_tickets", json!({"clientId": "9", "pageSize": 10}))
            .await
    );

    let variables = sent_variables(&server).await;
    let input = &variables["input"];
    assert_eq!(input["page"], 1);
    assert_eq!(input["pageSize"], 10);
    assert_eq!(input["condition"]["operator"], "AND");
    let conditions = input["condition"]["value"].as_array().unwrap();
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0]["attribute"], "status");
    assert_eq!(conditions[0]["operator"], "includes");
    assert_eq!(
        conditions[1],
        json!({"attribute": "client.accountId", "operator": "is", "value": "9"})
    );
    assert_eq!(input["sort"], json!([{"attribute": "createdTime", "order": "DESC"}]));

    assert_eq!(result["tickets"][0]["id"], "1");
    assert_eq!(result["tickets"][0]["client"], "Acme");
    assert_eq!(result["pagination"]["hasMore"], false);
    assert_eq!(result["_meta"]["tool"], "get_open_tickets");
}

#[tokio::test]
async fn test_ticket_lists_treat_zero_paging_as_unset() {
    let server = MockServer::start().await;
    respond_with_data(&server, ticket_list(json!([]))).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("get_open_tickets", json!({"page": 0, "pageSize": 0}))
            .await
    );

    let variables = sent_variables(&server).await;
    assert_eq!(variables["input"]["page"], 1);
    assert_eq!(variables["input"]["pageSize"], 25);
}

#[tokio::test]
async fn test_get_my_tickets_requires_technician() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(registry.call("get_my_tickets", json!({})).await);

    match error {
        ToolError::InvalidArguments { tool, message } => {
            assert_eq!(tool, "get_my_tickets");
            assert_eq!(message, "Either technicianId or technicianEmail is required");
        }
        other => panic!("Expected InvalidArguments, got: {other:?}"),
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_get_my_tickets_filters_by_email() {
    let server = MockServer::start().await;
    respond_with_data(&server, ticket_list(json!([]))).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("get_my_tickets", json!({"technicianEmail": "sam@example.com"}))
            .await
    );

    let variables = sent_variables(&server).await;
    let input = &variables["input"];
    assert_eq!(
        input["condition"]["value"][0],
        json!({"attribute": "technician.email", "operator": "is", "value": "sam@example.com"})
    );
    assert_eq!(input["sort"][0]["attribute"], "updatedTime");
}

#[tokio::test]
async fn test_get_new_tickets_defaults_to_one_day() {
    let server = MockServer::start().await;
    respond_with_data(&server, ticket_list(json!([]))).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_new_tickets", json!({})).await);

    assert_eq!(result["timeRange"]["hours"], 24);
    let since = result["timeRange"]["since"].as_str().unwrap();
    assert!(!since.ends_with('Z'));

    let variables = sent_variables(&server).await;
    let input = &variables["input"];
    assert_eq!(input["condition"]["attribute"], "createdTime");
    assert_eq!(input["condition"]["operator"], "greater than");
    assert_eq!(input["condition"]["value"], since);
}

#[tokio::test]
async fn test_get_urgent_tickets_requires_a_filter() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(
        registry
            .call(
                "get_urgent_tickets",
                json!({"includeHighPriority": false, "includeSLAViolated": false})
            )
            .await
    );

    assert!(matches!(error, ToolError::InvalidArguments { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_get_urgent_tickets_builds_or_group() {
    let server = MockServer::start().await;
    respond_with_data(&server, ticket_list(json!([]))).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("get_urgent_tickets", json!({"includeSLAViolated": false}))
            .await
    );

    let variables = sent_variables(&server).await;
    let input = &variables["input"];
    let any_of = &input["condition"]["value"][1];
    assert_eq!(any_of["operator"], "OR");
    assert_eq!(
        any_of["value"],
        json!([{"attribute": "priority", "operator": "is", "value": "High"}])
    );
}

#[tokio::test]
async fn test_get_ticket_notes_shapes_notes() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getTicketNoteList": [
            {"noteId": "n1", "content": "Rebooted", "addedBy": {"name": "Sam"}, "privacyType": "PRIVATE"}
        ]}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_ticket_notes", json!({"ticketId": "7"})).await);

    assert_eq!(result["ticketId"], "7");
    assert_eq!(result["noteCount"], 1);
    assert_eq!(result["notes"][0]["id"], "n1");
}

// ============================================================================
// Ticket Action Tools
// ============================================================================

#[tokio::test]
async fn test_create_ticket_sends_defaults() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"createTicket": {"ticketId": "100", "displayId": "T-100", "subject": "New laptop"}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "create_ticket",
                json!({"subject": "New laptop", "clientId": "9", "technicianId": "5", "priority": ""})
            )
            .await
    );

    assert!(sent_query(&server).await.trim_start().starts_with("mutation createTicket"));
    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "subject": "New laptop",
            "client": {"accountId": "9"},
            "source": "FORM",
            "technician": {"userId": "5"}
        }})
    );
    assert_eq!(result["success"], true);
    assert_eq!(result["message"], "Ticket T-100 created successfully");
}

#[tokio::test]
async fn test_mutation_tools_are_blocked_in_read_only_mode() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, true);

    let error = assert_err!(
        registry
            .call("create_ticket", json!({"subject": "x", "clientId": "9"}))
            .await
    );

    assert!(matches!(error, ToolError::Client(ClientError::ReadOnly)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_reply_to_ticket_adds_cc_users() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createTicketConversation": {"conversationId": "c1"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "reply_to_ticket",
                json!({"ticketId": "7", "content": "On it", "ccEmails": ["boss@example.com"]})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "ticket": {"ticketId": "7"},
            "content": "On it",
            "sendMail": true,
            "ccUsers": [{"email": "boss@example.com"}]
        }})
    );
    assert_eq!(result["emailSent"], true);
    assert_eq!(result["conversation"]["conversationId"], "c1");
}

#[tokio::test]
async fn test_add_ticket_note_defaults_to_private() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createTicketNote": {"noteId": "n2"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("add_ticket_note", json!({"ticketId": "7", "content": "internal"}))
            .await
    );

    assert_eq!(sent_variables(&server).await["input"]["privacyType"], "PRIVATE");
    assert_eq!(result["message"], "PRIVATE note added successfully");
}

#[tokio::test]
async fn test_update_ticket_category_requires_a_value() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(
        registry
            .call("update_ticket_category", json!({"ticketId": "7"}))
            .await
    );

    assert!(matches!(error, ToolError::InvalidArguments { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_assign_ticket_reports_assignees() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"updateTicket": {
            "ticketId": "7",
            "technician": {"userId": "5", "name": "Sam"},
            "techGroup": {"groupId": "3", "name": "Tier 2"}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("assign_ticket", json!({"ticketId": "7", "techGroupId": "3"}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"ticketId": "7", "techGroup": {"groupId": "3"}}})
    );
    assert_eq!(result["message"], "Ticket assigned to technician: Sam, group: Tier 2");
    assert_eq!(result["ticket"]["technician"], "Sam");
}

#[tokio::test]
async fn test_assign_ticket_requires_assignee() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(registry.call("assign_ticket", json!({"ticketId": "7"})).await);

    assert!(matches!(error, ToolError::InvalidArguments { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_change_ticket_requester_falls_back_to_id() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"updateTicket": {"ticketId": "7", "requester": null}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("change_ticket_requester", json!({"ticketId": "7", "requesterId": "u-9"}))
            .await
    );

    assert_eq!(result["message"], "Ticket requester changed to u-9");
}

#[tokio::test]
async fn test_add_ticket_follower_sends_follower_list() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"updateTicket": {"ticketId": "7"}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call("add_ticket_follower", json!({"ticketId": "7", "technicianId": "5"}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"ticketId": "7", "addFollowers": [{"userId": "5"}]}})
    );
}

#[tokio::test]
async fn test_close_ticket_with_resolution() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"updateTicket": {"ticketId": "7", "displayId": "T-7", "status": "Closed"}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "close_ticket",
                json!({"ticketId": "7", "resolutionCode": "Workaround", "suppressNotification": true})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "ticketId": "7",
            "status": "Closed",
            "resolutionCode": "Workaround",
            "suppressCloseNotification": true
        }})
    );
    assert_eq!(result["message"], "Ticket T-7 closed with resolution: Workaround");
    assert_eq!(result["ticket"]["status"], "Closed");
}

#[tokio::test]
async fn test_delete_ticket_reports_outcome() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"softDeleteTickets": true})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("delete_ticket", json!({"ticketId": "7"})).await);

    assert_eq!(sent_variables(&server).await, json!({"input": [{"ticketId": "7"}]}));
    assert_eq!(result["success"], true);
    assert_eq!(result["message"], "Ticket 7 moved to trash");
}

#[tokio::test]
async fn test_api_failures_propagate_as_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .mount(&server)
        .await;

    let registry = create_registry(&server, false);
    let error = assert_err!(registry.call("get_teams", json!({})).await);

    match error {
        ToolError::Client(ClientError::Api(api)) => assert!(api.is_auth_error()),
        other => panic!("Expected API error, got: {other:?}"),
    }
}

// ============================================================================
// Client and Contact Tools
// ============================================================================

#[tokio::test]
async fn test_get_client_returns_record() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getClient": {"accountId": "9", "name": "Acme"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_client", json!({"accountId": "9"})).await);

    assert_eq!(result, json!({"accountId": "9", "name": "Acme"}));
    assert_eq!(sent_variables(&server).await, json!({"input": {"accountId": "9"}}));
}

#[tokio::test]
async fn test_get_clients_uses_first_filter_only() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getClientList": {
            "clients": [{"accountId": "9", "name": "Acme"}],
            "listInfo": {"page": 1, "pageSize": 50, "totalCount": 1}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_clients", json!({"status": "Paid", "search": "Ac", "pageSize": 0}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "page": 1,
            "pageSize": 50,
            "condition": {"attribute": "status", "operator": "is", "value": "Paid"}
        }})
    );
    assert_eq!(result["clients"][0]["name"], "Acme");
    assert_eq!(result["pagination"]["totalCount"], 1);
}

#[tokio::test]
async fn test_get_client_users_nests_list_info() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getClientUserList": {
            "userList": [{"userId": "u1", "email": "ann@acme.com"}],
            "listInfo": {"page": 2, "pageSize": 100, "totalCount": 101}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_client_users", json!({"clientId": "9", "page": 2, "pageSize": 300}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"clientId": "9", "listInfo": {"page": 2, "pageSize": 100}}})
    );
    assert_eq!(result["users"][0]["email"], "ann@acme.com");
    assert_eq!(result["pagination"]["page"], 2);
}

#[tokio::test]
async fn test_get_client_contracts_filters_by_client() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getClientContractList": {"clientContracts": [{"contractId": "c1"}], "listInfo": {}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_client_contracts", json!({"clientId": "9"}))
            .await
    );

    let variables = sent_variables(&server).await;
    assert_eq!(
        variables["input"]["condition"],
        json!({"attribute": "client.accountId", "operator": "is", "value": "9"})
    );
    assert_eq!(result["contracts"][0]["contractId"], "c1");
}

#[tokio::test]
async fn test_create_client_builds_hq_site() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createClientV2": {"accountId": "10", "name": "Globex"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "create_client",
                json!({
                    "name": "Globex",
                    "hqSiteName": "Head Office",
                    "hqSiteTimezone": "Europe/Berlin",
                    "hqSiteAddress": {"city": "Berlin", "countryCode": "DE"},
                    "emailDomains": ["globex.com"],
                    "accountManagerId": "5"
                })
            )
            .await
    );

    assert!(sent_query(&server).await.trim_start().starts_with("mutation createClientV2"));
    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "name": "Globex",
            "hqSite": {
                "name": "Head Office",
                "timezoneCode": "Europe/Berlin",
                "working24x7": true,
                "city": "Berlin",
                "countryCode": "DE"
            },
            "emailDomains": ["globex.com"],
            "accountManager": {"userId": "5"}
        }})
    );
    assert_eq!(result["accountId"], "10");
}

#[tokio::test]
async fn test_create_client_user_associates_client_and_site() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createClientUser": {"userId": "u2"}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call(
                "create_client_user",
                json!({
                    "firstName": "Ann",
                    "email": "ann@acme.com",
                    "roleId": "r1",
                    "clientId": "9",
                    "siteId": "s1"
                })
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "firstName": "Ann",
            "email": "ann@acme.com",
            "role": {"roleId": "r1"},
            "addAssociations": [{"client": {"accountId": "9"}, "site": {"id": "s1"}}]
        }})
    );
}

#[tokio::test]
async fn test_create_client_site_honours_working_hours_flag() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createClientSite": {"id": "s2"}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call(
                "create_client_site",
                json!({
                    "clientId": "9",
                    "name": "Branch",
                    "timezoneCode": "America/Chicago",
                    "working24x7": false,
                    "line1": "1 Main St",
                    "line2": ""
                })
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "client": {"accountId": "9"},
            "name": "Branch",
            "timezoneCode": "America/Chicago",
            "working24x7": false,
            "line1": "1 Main St"
        }})
    );
}

#[tokio::test]
async fn test_update_client_maps_references() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"updateClient": {"accountId": "9"}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call(
                "update_client",
                json!({
                    "accountId": "9",
                    "primaryContactId": "u1",
                    "hqSiteId": "s1",
                    "addTechnicianGroupIds": ["g1", "g2"]
                })
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "accountId": "9",
            "primaryContact": {"userId": "u1"},
            "hqSite": {"id": "s1"},
            "addTechnicianGroups": [{"groupId": "g1"}, {"groupId": "g2"}]
        }})
    );
}

#[tokio::test]
async fn test_update_client_user_maps_references() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"updateClientUser": {"userId": "u1"}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(
        registry
            .call(
                "update_client_user",
                json!({"userId": "u1", "siteId": "s2", "roleId": "r2", "lastName": "Lee"})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "userId": "u1",
            "lastName": "Lee",
            "site": {"id": "s2"},
            "role": {"roleId": "r2"}
        }})
    );
}

#[tokio::test]
async fn test_search_contacts_echoes_search_term() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getClientUserList": {"userList": [{"userId": "u1"}], "listInfo": {"totalCount": 1}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("search_contacts", json!({"search": "ann"})).await);

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"listInfo": {
            "page": 1,
            "pageSize": 50,
            "condition": {"attribute": "name", "operator": "contains", "value": "ann"}
        }}})
    );
    assert_eq!(result["searchTerm"], "ann");
    assert_eq!(result["users"][0]["userId"], "u1");
}

#[tokio::test]
async fn test_client_mutations_are_blocked_in_read_only_mode() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, true);

    let error = assert_err!(
        registry
            .call("update_client", json!({"accountId": "9", "name": "New"}))
            .await
    );

    assert!(matches!(error, ToolError::Client(ClientError::ReadOnly)));
    assert_eq!(request_count(&server).await, 0);
}

// ============================================================================
// Alert Tools
// ============================================================================

#[tokio::test]
async fn test_get_alerts_prefers_status_filter() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getAlertList": {"alerts": [{"id": "a1", "severity": "High"}], "listInfo": {}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_alerts", json!({"status": "Open", "severity": "High"}))
            .await
    );

    let variables = sent_variables(&server).await;
    assert_eq!(
        variables["input"]["condition"],
        json!({"attribute": "status", "operator": "is", "value": "Open"})
    );
    assert_eq!(result["alerts"][0]["id"], "a1");
}

#[tokio::test]
async fn test_get_asset_alerts_scopes_to_asset() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getAlertsForAsset": {"alerts": [], "listInfo": {}}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_asset_alerts", json!({"assetId": "a9"})).await);

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"assetId": "a9", "listInfo": {"page": 1, "pageSize": 50}}})
    );
    assert_eq!(result["alerts"], json!([]));
}

#[tokio::test]
async fn test_resolve_alerts_reports_count() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"resolveAlerts": true})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("resolve_alerts", json!({"alertIds": ["a1", "a2"]}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": [{"id": "a1"}, {"id": "a2"}]})
    );
    assert_eq!(
        result,
        json!({"success": true, "resolvedCount": 2, "alertIds": ["a1", "a2"]})
    );
}

#[tokio::test]
async fn test_create_alert_sends_optional_fields() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"createAlert": {"id": "a3", "message": "Disk full"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "create_alert",
                json!({"assetId": "a9", "message": "Disk full", "severity": "Critical"})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"assetId": "a9", "message": "Disk full", "severity": "Critical"}})
    );
    assert_eq!(result["id"], "a3");
}

// ============================================================================
// Asset Tools
// ============================================================================

#[tokio::test]
async fn test_get_asset_uses_snake_case_arguments() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getAsset": {"assetId": "a9", "hostName": "ws-01"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("get_asset", json!({"asset_id": "a9"})).await);

    assert_eq!(sent_variables(&server).await, json!({"input": {"assetId": "a9"}}));
    assert_eq!(result["hostName"], "ws-01");
    assert!(sent_query(&server).await.contains("getAsset(input: $input)"));
}

#[tokio::test]
async fn test_get_asset_requires_asset_id() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, false);

    let error = assert_err!(registry.call("get_asset", json!({"assetId": "a9"})).await);

    assert!(matches!(error, ToolError::InvalidArguments { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_get_assets_filters_and_caps_page_size() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getAssetList": {"assets": [{"assetId": "a1"}], "listInfo": {"totalCount": 1}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "get_assets",
                json!({"platform_category": "SERVER", "patch_status": "Fully Patched", "page_size": 1000})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "page": 1,
            "pageSize": 100,
            "condition": {"attribute": "platformCategory", "operator": "is", "value": "SERVER"}
        }})
    );
    assert_eq!(result["assets"][0]["assetId"], "a1");
}

#[tokio::test]
async fn test_get_asset_software_pages_details() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getAssetSoftwareList": {"assetSoftwares": [{"software": "Firefox"}], "listInfo": {}}}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_asset_software", json!({"asset_id": "a9", "page": 3}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"assetId": "a9", "listInfo": {"page": 3, "pageSize": 50}}})
    );
    assert_eq!(result["assetSoftwares"][0]["software"], "Firefox");
}

#[tokio::test]
async fn test_get_asset_script_history_filters_activity() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getAssetActivity": {
            "activities": [
                {"activityId": "1", "module": "SCRIPT", "activityType": "EXECUTED"},
                {"activityId": "2", "module": "PATCH", "activityType": "INSTALLED"}
            ],
            "listInfo": {"page": 1, "pageSize": 25, "totalCount": 2}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_asset_script_history", json!({"asset_id": "a9"}))
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"assetId": "a9", "listInfo": {"page": 1, "pageSize": 25}}})
    );
    assert_eq!(result["activities"].as_array().unwrap().len(), 1);
    assert_eq!(result["activities"][0]["activityId"], "1");
    assert_eq!(result["listInfo"]["totalCount"], 2);
    assert!(result["note"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn test_get_asset_patch_history_filters_activity() {
    let server = MockServer::start().await;
    respond_with_data(
        &server,
        json!({"getAssetActivity": {
            "activities": [
                {"activityId": "1", "module": "SCRIPT"},
                {"activityId": "2", "module": "PATCH"}
            ],
            "listInfo": {}
        }}),
    )
    .await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call("get_asset_patch_history", json!({"asset_id": "a9"}))
            .await
    );

    assert_eq!(result["activities"], json!([{"activityId": "2", "module": "PATCH"}]));
    assert!(result.get("note").is_none());
}

#[tokio::test]
async fn test_get_unmonitored_assets_uses_reduced_fields() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"getUnMonitoredAssetList": {"assets": [], "listInfo": {}}})).await;

    let registry = create_registry(&server, false);
    assert_ok!(registry.call("get_unmonitored_assets", Value::Null).await);

    let query = sent_query(&server).await;
    assert!(query.contains("getUnMonitoredAssetList"));
    assert!(!query.contains("primaryMac"));
    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"page": 1, "pageSize": 25}})
    );
}

#[tokio::test]
async fn test_update_asset_maps_references() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"updateAsset": {"assetId": "a9", "name": "ws-02"}})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "update_asset",
                json!({
                    "asset_id": "a9",
                    "name": "ws-02",
                    "site_id": "s1",
                    "requester_id": "u1",
                    "warranty_expiry_date": "2027-01-31"
                })
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {
            "assetId": "a9",
            "name": "ws-02",
            "site": {"id": "s1"},
            "requester": {"userId": "u1"},
            "warrantyExpiryDate": "2027-01-31"
        }})
    );
    assert_eq!(result["name"], "ws-02");
}

#[tokio::test]
async fn test_assign_device_category_reports_outcome() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"assignDeviceCategory": true})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(
        registry
            .call(
                "assign_device_category",
                json!({"asset_ids": ["a1", "a2"], "device_category_id": "dc1"})
            )
            .await
    );

    assert_eq!(
        sent_variables(&server).await,
        json!({"input": {"assetIds": ["a1", "a2"], "deviceCategoryId": "dc1"}})
    );
    assert_eq!(
        result,
        json!({"success": true, "message": "Device category assigned to 2 asset(s)"})
    );
}

#[tokio::test]
async fn test_delete_asset_reports_failure() {
    let server = MockServer::start().await;
    respond_with_data(&server, json!({"softDeleteAsset": false})).await;

    let registry = create_registry(&server, false);
    let result = assert_ok!(registry.call("delete_asset", json!({"asset_id": "a9"})).await);

    assert_eq!(sent_variables(&server).await, json!({"input": {"assetId": "a9"}}));
    assert_eq!(result, json!({"success": false, "message": "Failed to delete asset"}));
}

#[tokio::test]
async fn test_asset_mutations_are_blocked_in_read_only_mode() {
    let server = MockServer::start().await;
    let registry = create_registry(&server, true);

    let error = assert_err!(registry.call("delete_asset", json!({"asset_id": "a9"})).await);

    assert!(matches!(error, ToolError::Client(ClientError::ReadOnly)));
    assert_eq!(request_count(&server).await, 0);
}

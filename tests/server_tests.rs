//! MCP protocol surface over the stdio transport

mod common;

use btcpay_mcp::gateway::McpServer;
use btcpay_mcp::transport;
use common::mcp_server;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Feed newline-delimited requests through the transport and collect replies
async fn exchange(server: &McpServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    transport::serve(server, input.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[tokio::test]
async fn initialize_then_list_tools() {
    let mock = MockServer::start().await;
    let server = mcp_server(&mock);
    let replies = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "2025-06-18"}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(replies.len(), 2, "notifications get no reply");
    assert_eq!(replies[0]["result"]["protocolVersion"], "2025-06-18");
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "btcpayserver-mcp");

    let names: Vec<&str> = replies[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, ["get_service_info", "get_method_info", "btcpay_request"]);
}

#[tokio::test]
async fn request_tool_round_trip() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/server/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "2.0.0"})))
        .expect(1)
        .mount(&mock)
        .await;

    let server = mcp_server(&mock);
    let replies = exchange(
        &server,
        &[tool_call(
            7,
            "btcpay_request",
            json!({"serviceName": "server-info", "methodName": "getInfo"}),
        )],
    )
    .await;

    let result = &replies[0]["result"];
    assert_eq!(replies[0]["id"], 7);
    assert_eq!(result["isError"], false);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("\"version\": \"2.0.0\""));
}

#[tokio::test]
async fn domain_failures_are_tool_errors_not_rpc_errors() {
    let mock = MockServer::start().await;
    let server = mcp_server(&mock);
    let replies = exchange(
        &server,
        &[tool_call(
            1,
            "get_method_info",
            json!({"serviceName": "invoices", "methodName": "explode"}),
        )],
    )
    .await;

    assert!(replies[0].get("error").is_none());
    assert_eq!(replies[0]["result"]["isError"], true);
}

#[tokio::test]
async fn protocol_failures_are_rpc_errors() {
    let mock = MockServer::start().await;
    let server = mcp_server(&mock);
    let replies = exchange(
        &server,
        &[
            tool_call(1, "delete_everything", json!({})),
            tool_call(2, "btcpay_request", json!({"methodName": "get"})),
            json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
        ],
    )
    .await;

    assert_eq!(replies[0]["error"]["code"], -32601);
    assert_eq!(replies[0]["error"]["message"], "Unknown tool: delete_everything");
    assert_eq!(replies[1]["error"]["code"], -32602);
    assert_eq!(replies[2]["error"]["code"], -32601);
}

#[tokio::test]
async fn malformed_line_gets_parse_error_and_serving_continues() {
    let mock = MockServer::start().await;
    let server = mcp_server(&mock);
    let input = "{not json\n\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n";
    let mut output = Vec::new();
    transport::serve(&server, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let replies: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[0].get("id"), Some(&Value::Null));
    assert_eq!(replies[1]["id"], 9);
}

#[tokio::test]
async fn unconfigured_server_rejects_tool_calls() {
    let server = McpServer::unconfigured(btcpay_mcp::config::MISSING_CONFIG_MESSAGE);
    let replies = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
            tool_call(2, "get_service_info", json!({})),
        ],
    )
    .await;

    assert_eq!(replies[0]["result"]["tools"].as_array().unwrap().len(), 3);
    assert_eq!(replies[1]["error"]["code"], -32600);
    assert!(
        replies[1]["error"]["message"]
            .as_str()
            .unwrap()
            .contains("BTCPAY_BASE_URL")
    );
}

//! Shared fixtures: a mock BTCPayServer and a dispatcher wired to it

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use btcpay_mcp::capability::{Arguments, CapabilityDirectory};
use btcpay_mcp::config::BtcPayConfig;
use btcpay_mcp::gateway::{Dispatcher, McpServer};
use serde_json::Value;
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

pub fn config(server: &MockServer) -> BtcPayConfig {
    BtcPayConfig {
        base_url: server.uri(),
        api_key: API_KEY.to_string(),
        store_id: None,
        timeout: Duration::from_secs(5),
    }
}

pub fn dispatcher(server: &MockServer) -> Dispatcher {
    let directory = CapabilityDirectory::connect(&config(server)).expect("valid mock config");
    Dispatcher::new(Arc::new(directory))
}

pub fn mcp_server(server: &MockServer) -> McpServer {
    McpServer::new(dispatcher(server))
}

pub fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap_or_default()
}

/// JSON payload inside a successful execution reply
pub fn fenced_json(text: &str) -> Value {
    let start = text.find("```json\n").expect("fenced block") + "```json\n".len();
    let end = text.rfind("\n```").expect("closing fence");
    serde_json::from_str(&text[start..end]).expect("valid JSON in reply")
}

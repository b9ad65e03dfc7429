//! MCP request handling on top of the dispatcher

use serde_json::Value;
use tracing::{debug, warn};

use super::dispatcher::{Dispatcher, Reply};
use super::helpers::{
    TOOL_METHOD_INFO, TOOL_REQUEST, TOOL_SERVICE_INFO, build_initialize_result, build_tools,
    extract_client_version, parse_tool_arguments,
};
use crate::error::rpc_codes;
use crate::protocol::{
    JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, RequestId, ToolsCallParams, ToolsCallResult,
    ToolsListResult, negotiate_version,
};
use crate::{Error, Result};

/// Whether the server can reach BTCPayServer
enum State {
    Ready(Dispatcher),
    /// Startup configuration was invalid; tool calls report this message
    Unconfigured(String),
}

/// MCP server exposing the three BTCPayServer tools
pub struct McpServer {
    state: State,
}

impl McpServer {
    /// Server backed by a connected dispatcher
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            state: State::Ready(dispatcher),
        }
    }

    /// Server whose tool calls fail with `reason`.
    ///
    /// `initialize` and `tools/list` still work so clients can connect and
    /// see what would be available.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            state: State::Unconfigured(reason.into()),
        }
    }

    /// Handle one raw line; `None` when nothing should be written back
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: JsonRpcMessage = match serde_json::from_str(line) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(
                    None,
                    rpc_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        match message {
            JsonRpcMessage::Request(request) => Some(self.handle_request(request).await),
            JsonRpcMessage::Notification(n) => {
                debug!(notification = %n.method, "Handling notification");
                None
            }
        }
    }

    /// Route one request to its handler
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        debug!(method = %method, id = %id, "Request");

        match method.as_str() {
            "initialize" => self.handle_initialize(id, params.as_ref()),
            "ping" => JsonRpcResponse::success(id, Value::Object(serde_json::Map::new())),
            "tools/list" => Self::handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params).await,
            other => JsonRpcResponse::error(
                Some(id),
                rpc_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }

    fn handle_initialize(&self, id: RequestId, params: Option<&Value>) -> JsonRpcResponse {
        let client_version = extract_client_version(params);
        let negotiated_version = negotiate_version(client_version);
        debug!(
            client = client_version,
            negotiated = negotiated_version,
            "Protocol version negotiation"
        );

        let default_store = match &self.state {
            State::Ready(d) => d.default_store(),
            State::Unconfigured(_) => None,
        };
        to_response(id, &build_initialize_result(negotiated_version, default_store))
    }

    fn handle_tools_list(id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: build_tools(),
            next_cursor: None,
        };
        to_response(id, &result)
    }

    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolsCallParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(
                    Some(id),
                    rpc_codes::INVALID_PARAMS,
                    "Missing params for tools/call",
                );
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    Some(id),
                    rpc_codes::INVALID_PARAMS,
                    format!("Invalid tools/call params: {e}"),
                );
            }
        };

        match self.call_tool(&params.name, params.arguments).await {
            Ok(reply) => to_response(id, &ToolsCallResult::text(reply.text, reply.is_error)),
            Err(e) => JsonRpcResponse::error(Some(id), e.to_rpc_code(), e.to_string()),
        }
    }

    /// Run a tool by name.
    ///
    /// # Errors
    ///
    /// Protocol-level failures only: unknown tool, malformed arguments, or a
    /// server without valid configuration.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Reply> {
        if !matches!(name, TOOL_SERVICE_INFO | TOOL_METHOD_INFO | TOOL_REQUEST) {
            return Err(Error::json_rpc(
                rpc_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {name}"),
            ));
        }

        let dispatcher = match &self.state {
            State::Ready(d) => d,
            State::Unconfigured(reason) => return Err(Error::Config(reason.clone())),
        };

        let args = parse_tool_arguments(arguments)?;
        let reply = match name {
            TOOL_SERVICE_INFO => dispatcher.list_capabilities(args.group()),
            TOOL_METHOD_INFO => {
                dispatcher.describe_operation(args.require_group()?, args.require_operation()?)
            }
            _ => {
                let group = args.require_group()?;
                let operation = args.require_operation()?;
                dispatcher.execute(group, operation, args.params()?).await
            }
        };
        Ok(reply)
    }
}

fn to_response<T: serde::Serialize>(id: RequestId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(Some(id), rpc_codes::INTERNAL_ERROR, e.to_string()),
    }
}

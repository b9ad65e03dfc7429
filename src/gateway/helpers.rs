//! Pure helper functions for the tool surface, extracted for testability.
//!
//! These are stateless functions with no async or remote dependencies: tool
//! definitions, argument parsing and the text renderings returned to clients.

use std::fmt::Write as _;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::capability::{Arguments, GroupDescriptor, OperationDescriptor};
use crate::error::rpc_codes;
use crate::protocol::{
    Info, InitializeResult, ServerCapabilities, Tool, ToolAnnotations, ToolsCapability,
};
use crate::{Error, Result};

/// Tool that lists groups or one group's operations
pub const TOOL_SERVICE_INFO: &str = "get_service_info";
/// Tool that describes one operation
pub const TOOL_METHOD_INFO: &str = "get_method_info";
/// Tool that executes an operation
pub const TOOL_REQUEST: &str = "btcpay_request";

const METHOD_INFO_HINT: &str = "Use get_method_info to check parameter requirements.";

// ============================================================================
// Protocol plumbing
// ============================================================================

/// Extract the client protocol version from initialize params.
///
/// Returns `"2024-11-05"` when params are `None` or missing `protocolVersion`.
pub(crate) fn extract_client_version(params: Option<&Value>) -> &str {
    params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or("2024-11-05")
}

/// Build the `InitializeResult` for a given negotiated protocol version.
pub(crate) fn build_initialize_result(
    negotiated_version: &str,
    default_store: Option<&str>,
) -> InitializeResult {
    InitializeResult {
        protocol_version: negotiated_version.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: false,
            }),
            ..Default::default()
        },
        server_info: Info {
            name: "btcpayserver-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("BTCPayServer MCP".to_string()),
        },
        instructions: Some(build_instructions(default_store)),
    }
}

/// Discovery workflow shown to clients on initialize
pub(crate) fn build_instructions(default_store: Option<&str>) -> String {
    let mut text = format!(
        "BTCPayServer service discovery:\n\
         1. {TOOL_SERVICE_INFO}: list service groups, or one group's methods\n\
         2. {TOOL_METHOD_INFO}: parameters and examples for one method\n\
         3. {TOOL_REQUEST}: execute a method with parameters\n"
    );
    if let Some(store) = default_store {
        let _ = write!(
            text,
            "\nDefault store: {store} (used when a method's storeId is omitted)\n"
        );
    }
    text
}

/// The three tools this server exposes.
pub(crate) fn build_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: TOOL_SERVICE_INFO.to_string(),
            title: Some("Service Info".to_string()),
            description: Some(
                "Discover available BTCPayServer services and their methods. Use this to explore what operations are available."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "serviceName": {
                        "type": "string",
                        "description": "Optional: Get info for a specific service (e.g., \"payment-requests\", \"invoices\", \"stores\"). If not provided, lists all services."
                    }
                }
            }),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(true),
                ..Default::default()
            }),
        },
        Tool {
            name: TOOL_METHOD_INFO.to_string(),
            title: Some("Method Info".to_string()),
            description: Some(
                "Get detailed parameter requirements and examples for a specific service method."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "serviceName": {
                        "type": "string",
                        "description": "Service name (e.g., \"payment-requests\", \"invoices\", \"stores\")"
                    },
                    "methodName": {
                        "type": "string",
                        "description": "Method name (e.g., \"create\", \"get\", \"list\", \"delete\")"
                    }
                },
                "required": ["serviceName", "methodName"]
            }),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(true),
                ..Default::default()
            }),
        },
        Tool {
            name: TOOL_REQUEST.to_string(),
            title: Some("BTCPayServer Request".to_string()),
            description: Some(
                "Execute a BTCPayServer API operation using the service-based approach."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "serviceName": {
                        "type": "string",
                        "description": "Service name (e.g., \"payment-requests\", \"invoices\", \"stores\")"
                    },
                    "methodName": {
                        "type": "string",
                        "description": "Method name (e.g., \"create\", \"get\", \"list\", \"delete\")"
                    },
                    "parameters": {
                        "type": "object",
                        "description": "Parameters for the method (use get_method_info to see required parameters)",
                        "default": {}
                    }
                },
                "required": ["serviceName", "methodName"]
            }),
            annotations: Some(ToolAnnotations {
                destructive_hint: Some(true),
                open_world_hint: Some(true),
                ..Default::default()
            }),
        },
    ]
}

/// Arguments shared by the three tools.
///
/// `groupName`/`operationName`/`args` are accepted alongside the
/// `serviceName`/`methodName`/`parameters` names advertised in the schemas.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ToolArguments {
    #[serde(rename = "serviceName", alias = "groupName")]
    pub group: Option<String>,
    #[serde(rename = "methodName", alias = "operationName")]
    pub operation: Option<String>,
    #[serde(rename = "parameters", alias = "args")]
    pub params: Option<Value>,
}

impl ToolArguments {
    /// Group name, treating an empty string as omitted
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref().filter(|s| !s.is_empty())
    }

    /// Required group name
    pub fn require_group(&self) -> Result<&str> {
        self.group()
            .ok_or_else(|| Error::json_rpc(rpc_codes::INVALID_PARAMS, "Missing 'serviceName' parameter"))
    }

    /// Required operation name
    pub fn require_operation(&self) -> Result<&str> {
        self.operation
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::json_rpc(rpc_codes::INVALID_PARAMS, "Missing 'methodName' parameter"))
    }

    /// Operation arguments; absent or `null` means none
    pub fn params(&self) -> Result<Arguments> {
        match &self.params {
            None | Some(Value::Null) => Ok(Arguments::new()),
            Some(value) => object_or_json_string(value.clone(), "parameters"),
        }
    }
}

/// Parse and validate tool invocation arguments.
///
/// Handles both JSON objects and stringified JSON objects (OpenAI-style).
/// Returns an error if arguments are neither.
pub(crate) fn parse_tool_arguments(arguments: Value) -> Result<ToolArguments> {
    let object = match arguments {
        Value::Null => return Ok(ToolArguments::default()),
        other => object_or_json_string(other, "arguments")?,
    };
    serde_json::from_value(Value::Object(object)).map_err(|e| {
        Error::json_rpc(
            rpc_codes::INVALID_PARAMS,
            format!("Invalid 'arguments': {e}"),
        )
    })
}

fn object_or_json_string(value: Value, what: &str) -> Result<Arguments> {
    // Accept OpenAI-style tool arguments passed as a JSON string.
    let value = match value {
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            Error::json_rpc(
                rpc_codes::INVALID_PARAMS,
                format!("Invalid '{what}' JSON string: {e}"),
            )
        })?,
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::json_rpc(
            rpc_codes::INVALID_PARAMS,
            format!("Invalid '{what}': expected object or JSON object string"),
        )),
    }
}

// ============================================================================
// Text renderings
// ============================================================================

/// Every group, sectioned by category in first-seen order
pub(crate) fn render_directory(groups: &[&GroupDescriptor]) -> String {
    let mut categories: Vec<&str> = Vec::new();
    for group in groups {
        if !categories.contains(&group.category.as_str()) {
            categories.push(&group.category);
        }
    }

    let mut out = String::from("**BTCPayServer Services Directory**\n\n");
    for category in categories {
        let _ = writeln!(out, "**{}:**", category.to_uppercase());
        for group in groups.iter().filter(|g| g.category == category) {
            let _ = writeln!(
                out,
                "• **{}**: {} ({} methods)",
                group.name,
                group.description,
                group.operations.len()
            );
        }
        out.push('\n');
    }
    out.push_str("Use get_service_info with a specific service name to see available methods.");
    out
}

/// One group with one-line operation summaries
pub(crate) fn render_group(group: &GroupDescriptor) -> String {
    let methods = group
        .operations
        .iter()
        .map(|op| format!("• **{}**: {}", op.name, op.description))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "**{}** (Category: {})\n\n{}\n\n**Available Methods:**\n{methods}\n\nUse get_method_info to see detailed parameters for each method.",
        group.name, group.category, group.description
    )
}

/// Parameter table and examples of one operation
pub(crate) fn render_operation(group: &str, op: &OperationDescriptor) -> String {
    let mut out = format!("**{group}.{}**\n\n{}\n\n**Parameters:**\n", op.name, op.description);
    if op.parameters.is_empty() {
        out.push_str("None\n");
    }
    for p in &op.parameters {
        let required = if p.required { "required" } else { "optional" };
        let default = p
            .default
            .as_ref()
            .map(|d| format!(" [default: {d}]"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "• **{}** ({}) ({required}){default}: {}",
            p.name, p.param_type, p.description
        );
    }

    if !op.examples.is_empty() {
        out.push_str("\n**Examples:**\n");
        for (i, example) in op.examples.iter().enumerate() {
            let _ = write!(
                out,
                "\n**{}. {}**\n{}\n```json\n{}\n```\n",
                i + 1,
                example.name,
                example.description,
                pretty(&example.parameters)
            );
        }
    }
    out
}

/// Successful execution with the result as fenced JSON
pub(crate) fn render_success(group: &str, operation: &str, result: &Value) -> String {
    format!(
        "**{group}.{operation}** executed successfully:\n\n```json\n{}\n```",
        pretty(result)
    )
}

/// Failed execution; only the error's message is shown
pub(crate) fn render_failure(group: &str, operation: &str, error: &Error) -> String {
    format!("**Error executing {group}.{operation}:**\n\n{error}\n\n{METHOD_INFO_HINT}")
}

pub(crate) fn group_not_found(name: &str, available: &[&str]) -> String {
    format!(
        "Group \"{name}\" not found.\n\nAvailable groups: {}",
        available.join(", ")
    )
}

pub(crate) fn operation_not_found(group: &str, operation: &str, available: &[String]) -> String {
    format!(
        "Operation \"{operation}\" not found in group \"{group}\".\n\nAvailable operations: {}",
        available.join(", ")
    )
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ParamType as T;
    use pretty_assertions::assert_eq;

    fn create_op() -> OperationDescriptor {
        OperationDescriptor::new("create", "Create a new invoice")
            .required("storeId", T::String, "Store ID")
            .with_default("currency", T::String, "Currency code", "USD")
            .example("Simple", "A basic invoice", json!({"storeId": "s1"}))
    }

    fn group(name: &str, category: &str) -> GroupDescriptor {
        GroupDescriptor {
            name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} things"),
            operations: vec![create_op()],
        }
    }

    // ── extract_client_version ────────────────────────────────────────

    #[test]
    fn client_version_defaults_when_missing() {
        assert_eq!(extract_client_version(None), "2024-11-05");
        let params = json!({"protocolVersion": "2025-06-18"});
        assert_eq!(extract_client_version(Some(&params)), "2025-06-18");
    }

    // ── build_initialize_result ───────────────────────────────────────

    #[test]
    fn initialize_result_mentions_default_store() {
        let result = build_initialize_result("2025-11-25", Some("store123"));
        assert_eq!(result.protocol_version, "2025-11-25");
        assert_eq!(result.server_info.name, "btcpayserver-mcp");
        assert!(result.instructions.unwrap().contains("store123"));
    }

    #[test]
    fn instructions_without_store_have_no_store_line() {
        assert!(!build_instructions(None).contains("Default store"));
    }

    // ── build_tools ───────────────────────────────────────────────────

    #[test]
    fn exactly_three_tools() {
        let names: Vec<_> = build_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, [TOOL_SERVICE_INFO, TOOL_METHOD_INFO, TOOL_REQUEST]);
    }

    #[test]
    fn request_tool_requires_service_and_method() {
        let tools = build_tools();
        assert_eq!(
            tools[2].input_schema["required"],
            json!(["serviceName", "methodName"])
        );
    }

    // ── parse_tool_arguments ──────────────────────────────────────────

    #[test]
    fn parses_reference_names() {
        let args = parse_tool_arguments(json!({
            "serviceName": "invoices",
            "methodName": "create",
            "parameters": {"storeId": "s1"}
        }))
        .unwrap();
        assert_eq!(args.group(), Some("invoices"));
        assert_eq!(args.require_operation().unwrap(), "create");
        assert_eq!(args.params().unwrap()["storeId"], "s1");
    }

    #[test]
    fn parses_alias_names() {
        let args = parse_tool_arguments(json!({
            "groupName": "invoices",
            "operationName": "get",
            "args": {"invoiceId": "i1"}
        }))
        .unwrap();
        assert_eq!(args.require_group().unwrap(), "invoices");
        assert_eq!(args.params().unwrap()["invoiceId"], "i1");
    }

    #[test]
    fn parses_stringified_arguments_and_parameters() {
        let args = parse_tool_arguments(json!(
            "{\"serviceName\":\"stores\",\"methodName\":\"list\",\"parameters\":\"{\\\"x\\\":1}\"}"
        ))
        .unwrap();
        assert_eq!(args.group(), Some("stores"));
        assert_eq!(args.params().unwrap()["x"], 1);
    }

    #[test]
    fn missing_params_are_empty() {
        let args = parse_tool_arguments(json!({"serviceName": "server-info"})).unwrap();
        assert!(args.params().unwrap().is_empty());
        let args = parse_tool_arguments(Value::Null).unwrap();
        assert!(args.group().is_none());
    }

    #[test]
    fn rejects_non_object_arguments() {
        let err = parse_tool_arguments(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_rpc_code(), -32602);
        let args = parse_tool_arguments(json!({"parameters": 5})).unwrap();
        assert_eq!(args.params().unwrap_err().to_rpc_code(), -32602);
    }

    #[test]
    fn empty_group_name_counts_as_omitted() {
        let args = parse_tool_arguments(json!({"serviceName": ""})).unwrap();
        assert!(args.group().is_none());
        assert!(args.require_group().is_err());
    }

    // ── renderings ────────────────────────────────────────────────────

    #[test]
    fn directory_sections_by_category() {
        let a = group("invoices", "payments");
        let b = group("stores", "store-management");
        let c = group("pull-payments", "payments");
        let text = render_directory(&[&a, &b, &c]);
        assert!(text.starts_with("**BTCPayServer Services Directory**\n\n**PAYMENTS:**\n"));
        assert!(text.contains("• **invoices**: invoices things (1 methods)\n• **pull-payments**"));
        assert!(text.find("**PAYMENTS:**") < text.find("**STORE-MANAGEMENT:**"));
    }

    #[test]
    fn group_rendering_lists_methods() {
        let text = render_group(&group("invoices", "payments"));
        assert!(text.starts_with("**invoices** (Category: payments)\n\ninvoices things"));
        assert!(text.contains("**Available Methods:**\n• **create**: Create a new invoice"));
    }

    #[test]
    fn operation_rendering_marks_required_and_defaults() {
        let text = render_operation("invoices", &create_op());
        assert!(text.starts_with("**invoices.create**\n\nCreate a new invoice\n\n**Parameters:**\n"));
        assert!(text.contains("• **storeId** (string) (required): Store ID"));
        assert!(text.contains("• **currency** (string) (optional) [default: \"USD\"]: Currency code"));
        assert!(text.contains("**1. Simple**\nA basic invoice\n```json\n{\n  \"storeId\": \"s1\"\n}\n```"));
    }

    #[test]
    fn success_and_failure_renderings() {
        let ok = render_success("server-info", "getInfo", &json!({"version": "2.0"}));
        assert_eq!(
            ok,
            "**server-info.getInfo** executed successfully:\n\n```json\n{\n  \"version\": \"2.0\"\n}\n```"
        );
        let err = render_failure("stores", "get", &Error::remote("boom"));
        assert_eq!(
            err,
            "**Error executing stores.get:**\n\nboom\n\nUse get_method_info to check parameter requirements."
        );
    }

    #[test]
    fn not_found_texts_list_alternatives() {
        assert_eq!(
            group_not_found("x", &["a", "b"]),
            "Group \"x\" not found.\n\nAvailable groups: a, b"
        );
        assert!(
            operation_not_found("invoices", "y", &["create".to_string()])
                .ends_with("Available operations: create")
        );
    }
}

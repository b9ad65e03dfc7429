//! Error types for the BTCPayServer MCP server

use std::io;

use thiserror::Error;

/// Result type alias for the BTCPayServer MCP server
pub type Result<T> = std::result::Result<T, Error>;

/// BTCPayServer MCP errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing base URL, credential, malformed values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation not declared by the resolved group
    #[error("Unknown operation '{operation}' in group '{group}'. Available operations: {}", available.join(", "))]
    UnknownOperation {
        /// Group that was searched
        group: String,
        /// Requested operation name
        operation: String,
        /// Operations the group declares
        available: Vec<String>,
    },

    /// A parameter marked `required` was absent from the arguments
    #[error("Required parameter '{parameter}' is missing for method '{operation}'")]
    MissingParameter {
        /// Parameter name
        parameter: String,
        /// Operation name
        operation: String,
    },

    /// Failure reported by the upstream API
    #[error("{message}")]
    Remote {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Human-readable message
        message: String,
    },

    /// Request the upstream API cannot serve, rejected before any call
    #[error("{0}")]
    Unsupported(String),

    /// Upstream response did not match the declared shape
    #[error("Unexpected response shape from {procedure}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Remote procedure that produced the response
        procedure: String,
        /// Declared shape
        expected: &'static str,
        /// Observed JSON kind
        actual: &'static str,
    },

    /// JSON-RPC error
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// Error code
        code: i32,
        /// Error message
        message: String,
        /// Optional data
        data: Option<serde_json::Value>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a JSON-RPC error
    pub fn json_rpc(code: i32, message: impl Into<String>) -> Self {
        Self::JsonRpc {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a remote failure without an HTTP status (network, decoding)
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Convert to JSON-RPC error code
    #[must_use]
    pub fn to_rpc_code(&self) -> i32 {
        match self {
            Self::JsonRpc { code, .. } => *code,
            Self::Json(_) => rpc_codes::PARSE_ERROR,
            Self::Config(_) => rpc_codes::INVALID_REQUEST,
            Self::MissingParameter { .. } => rpc_codes::INVALID_PARAMS,
            Self::UnknownOperation { .. } => rpc_codes::METHOD_NOT_FOUND,
            _ => rpc_codes::INTERNAL_ERROR,
        }
    }
}

/// Standard JSON-RPC error codes
pub mod rpc_codes {
    /// Parse error - Invalid JSON
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - Not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_message_names_parameter_and_operation() {
        let err = Error::MissingParameter {
            parameter: "storeId".to_string(),
            operation: "create".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Required parameter 'storeId' is missing for method 'create'"
        );
    }

    #[test]
    fn unknown_operation_lists_alternatives() {
        let err = Error::UnknownOperation {
            group: "invoices".to_string(),
            operation: "explode".to_string(),
            available: vec!["create".to_string(), "get".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("explode"));
        assert!(msg.contains("create, get"));
    }

    #[test]
    fn remote_error_displays_message_verbatim() {
        let err = Error::Remote {
            status: Some(404),
            message: "BTCPayServer API error: 404 - not found".to_string(),
        };
        assert_eq!(err.to_string(), "BTCPayServer API error: 404 - not found");
    }

    #[test]
    fn validation_errors_map_to_param_and_method_codes() {
        let missing = Error::MissingParameter {
            parameter: "a".into(),
            operation: "b".into(),
        };
        assert_eq!(missing.to_rpc_code(), rpc_codes::INVALID_PARAMS);
        let unknown = Error::UnknownOperation {
            group: "g".into(),
            operation: "o".into(),
            available: Vec::new(),
        };
        assert_eq!(unknown.to_rpc_code(), rpc_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn rpc_codes_mapping() {
        assert_eq!(
            Error::json_rpc(rpc_codes::METHOD_NOT_FOUND, "x").to_rpc_code(),
            -32601
        );
        assert_eq!(Error::Config("x".into()).to_rpc_code(), -32600);
        assert_eq!(Error::remote("x").to_rpc_code(), -32603);
    }
}

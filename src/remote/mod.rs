//! Remote collaborator: the seam between capability groups and the
//! BTCPayServer Greenfield API.
//!
//! Groups never talk HTTP directly. They describe the call as a
//! [`RemoteCall`] and hand it to a [`RemoteCollaborator`], which performs the
//! I/O and checks the response shape.

mod client;

pub use client::BtcPayClient;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::{Error, Result};

/// Expected top-level JSON kind of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Anything, including plain strings and the empty-body marker
    #[default]
    Any,
    /// A JSON object
    Object,
    /// A JSON array
    Array,
}

impl Shape {
    /// Check `value` against this shape
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] naming `procedure` when the kinds differ.
    pub fn check(self, procedure: &str, value: &Value) -> Result<()> {
        let ok = match self {
            Self::Any => true,
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        };
        if ok {
            return Ok(());
        }
        Err(Error::ShapeMismatch {
            procedure: procedure.to_string(),
            expected: self.as_str(),
            actual: json_kind(value),
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One fully-resolved upstream request
#[derive(Debug, Clone)]
pub struct RemoteCall {
    /// Remote procedure name, `"<group>.<operation>"`
    pub procedure: String,
    /// HTTP method
    pub method: Method,
    /// Path segments below `/api/v1`, unencoded
    pub segments: Vec<String>,
    /// Query pairs in order; repeated keys allowed
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
    /// Expected response shape
    pub shape: Shape,
}

impl RemoteCall {
    /// Create a call with no query, body or shape expectation
    pub fn new(procedure: impl Into<String>, method: Method, segments: Vec<String>) -> Self {
        Self {
            procedure: procedure.into(),
            method,
            segments,
            query: Vec::new(),
            body: None,
            shape: Shape::Any,
        }
    }

    /// Relative path, e.g. `/stores/abc/invoices`
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Path safe for logs: the segment after `api-keys` is masked
    #[must_use]
    pub fn redacted_path(&self) -> String {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut mask_next = false;
        for segment in &self.segments {
            if mask_next {
                out.push("***");
            } else {
                out.push(segment.as_str());
            }
            mask_next = segment == "api-keys";
        }
        format!("/{}", out.join("/"))
    }
}

/// Performs remote procedures on behalf of capability groups
#[async_trait]
pub trait RemoteCollaborator: Send + Sync {
    /// Perform `call` and return the shape-checked response value
    async fn call(&self, call: RemoteCall) -> Result<Value>;

    /// Public base URL of the upstream server (used for links, not requests)
    fn base_url(&self) -> &str;
}

/// Collaborator used when no server is configured.
///
/// Lets descriptors be listed and described offline; every call fails with the
/// stored configuration message.
pub struct Unconfigured {
    reason: String,
}

impl Unconfigured {
    /// Create with the reason calls will fail
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RemoteCollaborator for Unconfigured {
    async fn call(&self, _call: RemoteCall) -> Result<Value> {
        Err(Error::Config(self.reason.clone()))
    }

    fn base_url(&self) -> &str {
        ""
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording collaborator for unit tests

    use std::sync::Mutex;

    use super::*;

    /// Echoes each call back as JSON and remembers it
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Mutex<Vec<RemoteCall>>,
        failure: Option<String>,
    }

    impl Recorder {
        /// Remembers calls but answers each with a remote failure
        pub fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::default(),
                failure: Some(message.to_string()),
            }
        }

        pub fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last(&self) -> RemoteCall {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl RemoteCollaborator for Recorder {
        async fn call(&self, call: RemoteCall) -> Result<Value> {
            let echo = serde_json::json!({
                "procedure": call.procedure,
                "method": call.method.as_str(),
                "path": call.path(),
                "query": call.query,
                "body": call.body,
            });
            self.calls.lock().unwrap().push(call);
            match &self.failure {
                Some(message) => Err(Error::Remote {
                    status: Some(500),
                    message: message.clone(),
                }),
                None => Ok(echo),
            }
        }

        fn base_url(&self) -> &str {
            "https://btcpay.example.com"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(segments: &[&str]) -> RemoteCall {
        RemoteCall::new(
            "api-keys.delete",
            Method::DELETE,
            segments.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn path_joins_segments() {
        assert_eq!(call(&["stores", "s1", "invoices"]).path(), "/stores/s1/invoices");
    }

    #[test]
    fn redacted_path_masks_api_key() {
        let c = call(&["users", "bob", "api-keys", "secret-key"]);
        assert_eq!(c.redacted_path(), "/users/bob/api-keys/***");
        assert_eq!(call(&["api-keys"]).redacted_path(), "/api-keys");
    }

    #[test]
    fn shape_check_reports_kinds() {
        assert!(Shape::Array.check("invoices.list", &json!([])).is_ok());
        assert!(Shape::Any.check("x", &json!("text")).is_ok());
        let err = Shape::Object.check("invoices.get", &json!([1])).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch { expected: "object", actual: "array", .. }
        ));
        assert!(err.to_string().contains("invoices.get"));
    }

    #[tokio::test]
    async fn unconfigured_collaborator_fails_every_call() {
        let remote = Unconfigured::new("BTCPAY_BASE_URL is not set");
        let err = remote.call(call(&["server", "info"])).await.unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("BTCPAY_BASE_URL")));
    }
}

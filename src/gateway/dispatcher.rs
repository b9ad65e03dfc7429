//! Dispatcher: the three discovery and execution operations

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::helpers::{
    group_not_found, operation_not_found, render_directory, render_failure, render_group,
    render_operation, render_success,
};
use crate::capability::{Arguments, CapabilityDirectory};

/// Parameter filled from the configured default store
const STORE_PARAM: &str = "storeId";

/// Text produced by a dispatcher operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Human-readable payload
    pub text: String,
    /// Whether the payload describes a failure
    pub is_error: bool,
}

impl Reply {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn failure(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// Resolves and runs discovery and execution requests against a directory.
///
/// Domain failures (unknown names, missing parameters, upstream errors) never
/// escape as errors; they come back as [`Reply`] text with `is_error` set.
pub struct Dispatcher {
    directory: Arc<CapabilityDirectory>,
    default_store: Option<String>,
}

impl Dispatcher {
    /// Create a dispatcher over `directory`
    pub fn new(directory: Arc<CapabilityDirectory>) -> Self {
        Self {
            directory,
            default_store: None,
        }
    }

    /// Store id used when an operation requires `storeId` and it is omitted
    #[must_use]
    pub fn with_default_store(mut self, store: Option<String>) -> Self {
        self.default_store = store.filter(|s| !s.is_empty());
        self
    }

    /// Configured default store
    #[must_use]
    pub fn default_store(&self) -> Option<&str> {
        self.default_store.as_deref()
    }

    /// Underlying directory
    #[must_use]
    pub fn directory(&self) -> &CapabilityDirectory {
        &self.directory
    }

    /// Describe every group, or one group when `group` is given
    pub fn list_capabilities(&self, group: Option<&str>) -> Reply {
        let Some(name) = group else {
            return Reply::ok(render_directory(&self.directory.describe_all()));
        };
        match self.directory.lookup(name) {
            Some(g) => Reply::ok(render_group(g.describe())),
            None => Reply::failure(group_not_found(name, &self.directory.list_names())),
        }
    }

    /// Parameter table and examples for one operation
    pub fn describe_operation(&self, group: &str, operation: &str) -> Reply {
        let Some(g) = self.directory.lookup(group) else {
            return Reply::failure(group_not_found(group, &self.directory.list_names()));
        };
        match g.operation(operation) {
            Some(op) => Reply::ok(render_operation(group, op)),
            None => Reply::failure(operation_not_found(
                group,
                operation,
                &g.describe().operation_names(),
            )),
        }
    }

    /// Validate and execute one operation against the upstream server
    pub async fn execute(&self, group: &str, operation: &str, mut args: Arguments) -> Reply {
        let Some(g) = self.directory.lookup(group) else {
            return Reply::failure(group_not_found(group, &self.directory.list_names()));
        };
        let Some(op) = g.operation(operation) else {
            return Reply::failure(operation_not_found(
                group,
                operation,
                &g.describe().operation_names(),
            ));
        };

        if let Some(store) = &self.default_store {
            let needs_store = op.parameter(STORE_PARAM).is_some_and(|p| p.required);
            if needs_store && args.get(STORE_PARAM).is_none_or(Value::is_null) {
                debug!(store = %store, "Using default store");
                args.insert(STORE_PARAM.to_string(), Value::String(store.clone()));
            }
        }

        match g.invoke(operation, args).await {
            Ok(result) => {
                info!(group, operation, "Operation executed");
                Reply::ok(render_success(group, operation, &result))
            }
            Err(e) => {
                warn!(group, operation, error = %e, "Operation failed");
                Reply::failure(render_failure(group, operation, &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::Recorder;
    use serde_json::json;

    fn dispatcher(remote: Arc<Recorder>) -> Dispatcher {
        Dispatcher::new(Arc::new(CapabilityDirectory::new(remote)))
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn unknown_group_in_listing_is_text() {
        let d = dispatcher(Arc::new(Recorder::default()));
        let reply = d.list_capabilities(Some("nope"));
        assert!(reply.is_error);
        assert!(reply.text.contains("Group \"nope\" not found."));
        assert!(reply.text.contains("invoices"));
    }

    #[test]
    fn describe_unknown_operation_lists_operations() {
        let d = dispatcher(Arc::new(Recorder::default()));
        let reply = d.describe_operation("invoices", "explode");
        assert!(reply.text.contains("not found in group \"invoices\""));
        assert!(reply.text.contains("create"));
    }

    #[tokio::test]
    async fn default_store_fills_omitted_store_id() {
        let remote = Arc::new(Recorder::default());
        let d = dispatcher(Arc::clone(&remote)).with_default_store(Some("store9".to_string()));
        let reply = d.execute("invoices", "list", Arguments::new()).await;
        assert!(!reply.is_error, "{}", reply.text);
        assert_eq!(remote.last().path(), "/stores/store9/invoices");
    }

    #[tokio::test]
    async fn explicit_store_id_wins_over_default() {
        let remote = Arc::new(Recorder::default());
        let d = dispatcher(Arc::clone(&remote)).with_default_store(Some("store9".to_string()));
        d.execute("invoices", "list", args(json!({"storeId": "mine"}))).await;
        assert_eq!(remote.last().path(), "/stores/mine/invoices");
    }

    #[tokio::test]
    async fn default_store_not_injected_into_unrelated_operations() {
        let remote = Arc::new(Recorder::default());
        let d = dispatcher(Arc::clone(&remote)).with_default_store(Some("store9".to_string()));
        d.execute("server-info", "getInfo", Arguments::new()).await;
        assert!(remote.last().body.is_none());
        assert!(remote.last().query.is_empty());
    }

    #[tokio::test]
    async fn default_store_skips_optional_store_scope() {
        let remote = Arc::new(Recorder::default());
        let d = dispatcher(Arc::clone(&remote)).with_default_store(Some("store9".to_string()));
        let reply = d
            .execute(
                "api-keys",
                "create",
                args(json!({"permissions": ["btcpay.store.canviewinvoices"]})),
            )
            .await;
        assert!(!reply.is_error, "{}", reply.text);
        assert!(remote.last().body.unwrap().get("storeId").is_none());
    }

    #[tokio::test]
    async fn remote_failure_is_reported_once() {
        let remote = Arc::new(Recorder::failing("BTCPayServer API error: 500 - boom"));
        let d = dispatcher(Arc::clone(&remote));
        let reply = d
            .execute("stores", "get", args(json!({"storeId": "s1"})))
            .await;
        assert!(reply.is_error);
        assert_eq!(remote.count(), 1);
        assert!(reply.text.starts_with("**Error executing stores.get:**"));
        assert!(reply.text.contains("500 - boom"));
    }

    #[tokio::test]
    async fn validation_failure_makes_no_call() {
        let remote = Arc::new(Recorder::default());
        let d = dispatcher(Arc::clone(&remote));
        let reply = d.execute("stores", "get", Arguments::new()).await;
        assert!(reply.is_error);
        assert!(reply.text.contains("'storeId'"));
        assert_eq!(remote.count(), 0);
    }
}

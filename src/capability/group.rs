//! Capability groups: descriptors plus their handlers

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::debug;

use super::{GroupDescriptor, OperationDescriptor, Route};
use crate::remote::RemoteCollaborator;
use crate::{Error, Result};

/// Argument object of an invocation
pub type Arguments = Map<String, Value>;

/// Everything a custom handler gets to work with
pub struct Invocation {
    /// `"<group>.<operation>"`
    pub procedure: String,
    /// Validated arguments with defaults applied
    pub args: Arguments,
    /// The group's collaborator
    pub remote: Arc<dyn RemoteCollaborator>,
}

/// Handler closure for operations a [`Route`] cannot express
pub type CustomHandler = Arc<dyn Fn(Invocation) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Route(Route),
    Custom(CustomHandler),
}

/// A named set of operations sharing one remote collaborator.
///
/// Built through [`GroupBuilder`], which registers each descriptor together
/// with its handler: every described operation is invokable and nothing else is.
pub struct CapabilityGroup {
    descriptor: GroupDescriptor,
    handlers: HashMap<String, Handler>,
    remote: Arc<dyn RemoteCollaborator>,
}

impl CapabilityGroup {
    /// Start building a group
    pub fn builder(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            category: category.into(),
            description: description.into(),
            operations: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Group name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Discovery category
    #[must_use]
    pub fn category(&self) -> &str {
        &self.descriptor.category
    }

    /// Full descriptor
    #[must_use]
    pub fn describe(&self) -> &GroupDescriptor {
        &self.descriptor
    }

    /// Look up one operation's descriptor
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.descriptor.operation(name)
    }

    /// Names of the operations this group can invoke
    #[must_use]
    pub fn invokable(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Validate `args` and run the operation.
    ///
    /// Required parameters are checked before anything is sent upstream, then
    /// declared defaults are filled in for omitted optional parameters.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownOperation`] and [`Error::MissingParameter`] before any
    /// remote call; otherwise whatever the collaborator reports.
    pub async fn invoke(&self, operation: &str, mut args: Arguments) -> Result<Value> {
        let (Some(op), Some(handler)) = (self.operation(operation), self.handlers.get(operation))
        else {
            return Err(Error::UnknownOperation {
                group: self.name().to_string(),
                operation: operation.to_string(),
                available: self.descriptor.operation_names(),
            });
        };

        if let Some(missing) = op.find_missing(&args) {
            return Err(Error::MissingParameter {
                parameter: missing.name.clone(),
                operation: op.name.clone(),
            });
        }
        op.apply_defaults(&mut args);

        let procedure = format!("{}.{}", self.name(), op.name);
        debug!(procedure = %procedure, "Invoking operation");

        match handler {
            Handler::Route(route) => {
                let call = route.to_call(&procedure, op, args)?;
                self.remote.call(call).await
            }
            Handler::Custom(handler) => {
                handler(Invocation {
                    procedure,
                    args,
                    remote: Arc::clone(&self.remote),
                })
                .await
            }
        }
    }
}

/// Builder pairing each operation descriptor with its handler
pub struct GroupBuilder {
    name: String,
    category: String,
    description: String,
    operations: Vec<OperationDescriptor>,
    handlers: HashMap<String, Handler>,
}

impl GroupBuilder {
    /// Register an operation served by an HTTP route
    #[must_use]
    pub fn route(self, operation: OperationDescriptor, route: Route) -> Self {
        self.register(operation, Handler::Route(route))
    }

    /// Register an operation served by a custom handler
    #[must_use]
    pub fn custom<F, Fut>(self, operation: OperationDescriptor, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let handler: CustomHandler = Arc::new(move |inv| Box::pin(handler(inv)));
        self.register(operation, Handler::Custom(handler))
    }

    fn register(mut self, operation: OperationDescriptor, handler: Handler) -> Self {
        // Re-registering a name replaces the earlier operation in place.
        let name = operation.name.clone();
        match self.operations.iter_mut().find(|op| op.name == name) {
            Some(existing) => *existing = operation,
            None => self.operations.push(operation),
        }
        self.handlers.insert(name, handler);
        self
    }

    /// Wire the group to its collaborator
    #[must_use]
    pub fn build(self, remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
        CapabilityGroup {
            descriptor: GroupDescriptor {
                name: self.name,
                category: self.category,
                description: self.description,
                operations: self.operations,
            },
            handlers: self.handlers,
            remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ParamType as T;
    use crate::remote::testing::Recorder;
    use serde_json::json;

    fn group(remote: Arc<Recorder>) -> CapabilityGroup {
        CapabilityGroup::builder("invoices", "payments", "Invoices")
            .route(
                OperationDescriptor::new("create", "Create invoice")
                    .required("storeId", T::String, "Store ID")
                    .optional("amount", T::String, "Amount")
                    .with_default("currency", T::String, "Currency", "USD"),
                Route::post("/stores/{storeId}/invoices"),
            )
            .custom(
                OperationDescriptor::new("echo", "Echo arguments"),
                |inv: Invocation| async move { Ok(Value::Object(inv.args)) },
            )
            .build(remote)
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn described_operations_are_exactly_invokable() {
        let g = group(Arc::new(Recorder::default()));
        let mut described = g.describe().operation_names();
        let mut invokable: Vec<String> = g.invokable().into_iter().map(String::from).collect();
        described.sort();
        invokable.sort();
        assert_eq!(described, invokable);
    }

    #[tokio::test]
    async fn missing_required_parameter_makes_no_call() {
        let remote = Arc::new(Recorder::default());
        let g = group(Arc::clone(&remote));
        let err = g.invoke("create", args(json!({"amount": "10"}))).await.unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref parameter, .. } if parameter == "storeId"));
        assert_eq!(remote.count(), 0);
    }

    #[tokio::test]
    async fn defaults_reach_the_remote_call() {
        let remote = Arc::new(Recorder::default());
        let g = group(Arc::clone(&remote));
        g.invoke("create", args(json!({"storeId": "s1", "amount": "10.00"})))
            .await
            .unwrap();
        let call = remote.last();
        assert_eq!(call.procedure, "invoices.create");
        assert_eq!(call.body.unwrap()["currency"], "USD");
    }

    #[tokio::test]
    async fn unknown_operation_lists_valid_names() {
        let g = group(Arc::new(Recorder::default()));
        let err = g.invoke("nope", Arguments::new()).await.unwrap_err();
        match err {
            Error::UnknownOperation { available, .. } => assert_eq!(available, ["create", "echo"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_handler_receives_arguments() {
        let g = group(Arc::new(Recorder::default()));
        let out = g.invoke("echo", args(json!({"x": 1}))).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[test]
    fn reregistering_replaces_operation() {
        let g = CapabilityGroup::builder("g", "c", "d")
            .route(OperationDescriptor::new("a", "first"), Route::get("/a"))
            .route(OperationDescriptor::new("a", "second"), Route::get("/a2"))
            .build(Arc::new(Recorder::default()));
        assert_eq!(g.describe().operations.len(), 1);
        assert_eq!(g.operation("a").unwrap().description, "second");
    }
}

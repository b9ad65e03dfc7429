//! Declarative mapping from validated arguments to a [`RemoteCall`]

use reqwest::Method;
use serde_json::{Map, Value};

use super::{Arguments, OperationDescriptor};
use crate::remote::{RemoteCall, Shape};
use crate::{Error, Result};

/// Argument rewrite run before mapping (date conversion, derived fields)
pub type Prepare = fn(&mut Arguments) -> Result<()>;

/// HTTP route of an operation.
///
/// `{param}` placeholders in the path consume parameters. Remaining declared
/// parameters go to the query for GET/DELETE and to the JSON body otherwise,
/// unless pinned with [`Route::query`] or [`Route::body`]. Absent and `null`
/// values are omitted; undeclared argument keys are never forwarded.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    template: &'static str,
    query: Vec<&'static str>,
    body: Vec<&'static str>,
    renames: Vec<(&'static str, &'static str)>,
    spread: Option<&'static str>,
    fixed: Vec<(&'static str, Value)>,
    prepare: Option<Prepare>,
    shape: Shape,
}

impl Route {
    fn new(method: Method, template: &'static str) -> Self {
        Self {
            method,
            template,
            query: Vec::new(),
            body: Vec::new(),
            renames: Vec::new(),
            spread: None,
            fixed: Vec::new(),
            prepare: None,
            shape: Shape::Any,
        }
    }

    /// GET route
    #[must_use]
    pub fn get(template: &'static str) -> Self {
        Self::new(Method::GET, template)
    }

    /// POST route
    #[must_use]
    pub fn post(template: &'static str) -> Self {
        Self::new(Method::POST, template)
    }

    /// PUT route
    #[must_use]
    pub fn put(template: &'static str) -> Self {
        Self::new(Method::PUT, template)
    }

    /// PATCH route
    #[must_use]
    pub fn patch(template: &'static str) -> Self {
        Self::new(Method::PATCH, template)
    }

    /// DELETE route
    #[must_use]
    pub fn delete(template: &'static str) -> Self {
        Self::new(Method::DELETE, template)
    }

    /// Send these parameters in the query string
    #[must_use]
    pub fn query(mut self, params: &[&'static str]) -> Self {
        self.query.extend_from_slice(params);
        self
    }

    /// Send these parameters in the JSON body, path parameters included
    #[must_use]
    pub fn body(mut self, params: &[&'static str]) -> Self {
        self.body.extend_from_slice(params);
        self
    }

    /// Forward parameter `from` under the upstream name `to`
    #[must_use]
    pub fn rename(mut self, from: &'static str, to: &'static str) -> Self {
        self.renames.push((from, to));
        self
    }

    /// Merge the object value of `param` into the top level of the body
    #[must_use]
    pub fn spread(mut self, param: &'static str) -> Self {
        self.spread = Some(param);
        self
    }

    /// Constant body field, overridable by an argument of the same name
    #[must_use]
    pub fn fixed(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.fixed.push((field, value.into()));
        self
    }

    /// Rewrite arguments before they are mapped
    #[must_use]
    pub fn prepare(mut self, prepare: Prepare) -> Self {
        self.prepare = Some(prepare);
        self
    }

    /// Expected response shape
    #[must_use]
    pub fn expect(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    fn upstream_name(&self, param: &str) -> String {
        self.renames
            .iter()
            .find(|(from, _)| *from == param)
            .map_or_else(|| param.to_string(), |(_, to)| (*to).to_string())
    }

    fn defaults_to_query(&self) -> bool {
        matches!(self.method, Method::GET | Method::DELETE)
    }

    /// Resolve `args` into a call for `procedure`
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] when a path placeholder has no
    /// value, or whatever the route's prepare hook reports.
    pub fn to_call(
        &self,
        procedure: &str,
        operation: &OperationDescriptor,
        mut args: Arguments,
    ) -> Result<RemoteCall> {
        if let Some(prepare) = self.prepare {
            prepare(&mut args)?;
        }

        let mut consumed = Vec::new();
        let mut segments = Vec::new();
        for part in self.template.split('/').filter(|s| !s.is_empty()) {
            let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) else {
                segments.push(part.to_string());
                continue;
            };
            let value = args
                .get(name)
                .filter(|v| !v.is_null())
                .ok_or_else(|| Error::MissingParameter {
                    parameter: name.to_string(),
                    operation: operation.name.clone(),
                })?;
            segments.push(scalar_text(value));
            consumed.push(name);
        }

        let mut query = Vec::new();
        let mut body: Map<String, Value> = self
            .fixed
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();

        for spec in &operation.parameters {
            let name = spec.name.as_str();
            // Path parameters reach the body only when pinned there.
            if consumed.contains(&name) && !self.body.contains(&name) {
                continue;
            }
            let Some(value) = args.get(name).filter(|v| !v.is_null()) else {
                continue;
            };

            if self.spread == Some(name) {
                if let Value::Object(fields) = value {
                    body.extend(fields.clone());
                    continue;
                }
            }

            let to_query = if self.query.contains(&name) {
                true
            } else if self.body.contains(&name) {
                false
            } else {
                self.defaults_to_query()
            };

            let key = self.upstream_name(name);
            if to_query {
                push_query(&mut query, &key, value);
            } else {
                body.insert(key, value.clone());
            }
        }

        let mut call = RemoteCall::new(procedure, self.method.clone(), segments);
        call.query = query;
        call.body = (!body.is_empty()).then_some(Value::Object(body));
        call.shape = self.shape;
        Ok(call)
    }
}

/// Text form of a path or query value
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Arrays repeat the key once per element
fn push_query(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items.iter().filter(|v| !v.is_null()) {
                query.push((key.to_string(), scalar_text(item)));
            }
        }
        other => query.push((key.to_string(), scalar_text(other))),
    }
}

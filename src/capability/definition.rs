//! Operation and group descriptors
//!
//! Pure data describing what a capability group offers. Descriptors are built
//! once when a group is constructed and never mutated afterwards.

use serde::Serialize;
use serde_json::{Map, Value};

/// Semantic type tag of a parameter.
///
/// Shown to callers in discovery output; argument values are not checked
/// against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Text value
    String,
    /// Numeric value
    Number,
    /// true / false
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl ParamType {
    /// Lowercase tag as rendered in discovery text
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared parameter of an operation
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    /// Parameter name (argument key)
    pub name: String,
    /// Semantic type tag
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Human-readable description
    pub description: String,
    /// Whether the key must be present on invocation
    pub required: bool,
    /// Value applied when an optional parameter is omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Documented example invocation
#[derive(Debug, Clone, Serialize)]
pub struct OperationExample {
    /// Short title
    pub name: String,
    /// What the example demonstrates
    pub description: String,
    /// Concrete argument values
    pub parameters: Value,
}

/// Static metadata for one callable operation.
///
/// Parameters keep insertion order, which is also their display order.
#[derive(Debug, Clone, Serialize)]
pub struct OperationDescriptor {
    /// Operation name, unique within its group
    pub name: String,
    /// Human-readable summary
    pub description: String,
    /// Declared parameters in display order
    pub parameters: Vec<ParameterSpec>,
    /// Example invocations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<OperationExample>,
}

impl OperationDescriptor {
    /// Start a descriptor with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Declare a required parameter
    #[must_use]
    pub fn required(self, name: &str, param_type: ParamType, description: &str) -> Self {
        self.param(name, param_type, description, true, None)
    }

    /// Declare an optional parameter without default
    #[must_use]
    pub fn optional(self, name: &str, param_type: ParamType, description: &str) -> Self {
        self.param(name, param_type, description, false, None)
    }

    /// Declare an optional parameter with a default value
    #[must_use]
    pub fn with_default(
        self,
        name: &str,
        param_type: ParamType,
        description: &str,
        default: impl Into<Value>,
    ) -> Self {
        self.param(name, param_type, description, false, Some(default.into()))
    }

    /// Append an example invocation
    #[must_use]
    pub fn example(mut self, name: &str, description: &str, parameters: Value) -> Self {
        self.examples.push(OperationExample {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        });
        self
    }

    fn param(
        mut self,
        name: &str,
        param_type: ParamType,
        description: &str,
        required: bool,
        default: Option<Value>,
    ) -> Self {
        // Redeclaring a name replaces the earlier spec in place.
        let spec = ParameterSpec {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required,
            default,
        };
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = spec,
            None => self.parameters.push(spec),
        }
        self
    }

    /// Look up a declared parameter
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// First required parameter missing from `args`.
    ///
    /// A key counts as missing when absent or explicitly `null`. Other falsy
    /// values (`false`, `0`, `""`, empty containers) are present.
    #[must_use]
    pub fn find_missing(&self, args: &Map<String, Value>) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .find(|p| args.get(&p.name).is_none_or(Value::is_null))
    }

    /// Fill declared defaults for omitted optional parameters
    pub fn apply_defaults(&self, args: &mut Map<String, Value>) {
        for spec in &self.parameters {
            let Some(default) = &spec.default else {
                continue;
            };
            if args.get(&spec.name).is_none_or(Value::is_null) {
                args.insert(spec.name.clone(), default.clone());
            }
        }
    }
}

/// Full description of a capability group
#[derive(Debug, Clone, Serialize)]
pub struct GroupDescriptor {
    /// Group name (directory key)
    pub name: String,
    /// Discovery category
    pub category: String,
    /// Summary
    pub description: String,
    /// Operations in declaration order
    pub operations: Vec<OperationDescriptor>,
}

impl GroupDescriptor {
    /// Find an operation by name
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Operation names in declaration order
    #[must_use]
    pub fn operation_names(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_invoice() -> OperationDescriptor {
        OperationDescriptor::new("create", "Create a new invoice")
            .required("storeId", ParamType::String, "Store ID")
            .optional("amount", ParamType::String, "Amount")
            .with_default("currency", ParamType::String, "Currency code", "USD")
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let op = create_invoice();
        let names: Vec<_> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["storeId", "amount", "currency"]);
    }

    #[test]
    fn redeclared_parameter_replaces_in_place() {
        let op = create_invoice().required("amount", ParamType::Number, "Now required");
        assert_eq!(op.parameters.len(), 3);
        assert!(op.parameter("amount").unwrap().required);
        assert_eq!(op.parameters[1].name, "amount");
    }

    #[test]
    fn absent_and_null_are_missing() {
        let op = create_invoice();
        assert_eq!(op.find_missing(&args(json!({}))).unwrap().name, "storeId");
        assert_eq!(
            op.find_missing(&args(json!({"storeId": null}))).unwrap().name,
            "storeId"
        );
    }

    #[test]
    fn falsy_values_are_present() {
        let op = create_invoice();
        for value in [json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(
                op.find_missing(&args(json!({"storeId": value.clone()}))).is_none(),
                "{value} should count as present"
            );
        }
    }

    #[test]
    fn defaults_fill_only_omitted_parameters() {
        let op = create_invoice();
        let mut a = args(json!({"storeId": "s1"}));
        op.apply_defaults(&mut a);
        assert_eq!(a["currency"], "USD");
        assert!(!a.contains_key("amount"));

        let mut b = args(json!({"storeId": "s1", "currency": "EUR"}));
        op.apply_defaults(&mut b);
        assert_eq!(b["currency"], "EUR");
    }

    #[test]
    fn descriptor_serializes_type_tag() {
        let json = serde_json::to_value(create_invoice()).unwrap();
        assert_eq!(json["parameters"][0]["type"], "string");
        assert_eq!(json["parameters"][2]["default"], "USD");
        assert!(json["parameters"][0].get("default").is_none());
    }
}

use crate::error::{NodeError, Result};
use crate::expressions::create_environment;
use crate::node_registry::{self, FieldDescriptor, FieldKind};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn default_resource() -> String {
    node_registry::RESOURCE_CREATE_ORDER.to_string()
}

fn default_operation() -> String {
    node_registry::OPERATION_POST.to_string()
}

/// Node configuration as supplied by the workflow.
///
/// `fields` maps a field name to either a literal or a template such as
/// `"{{ json.customer.name }}"`, evaluated against each item. Fields left out
/// are read from the item's key of the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeParameters {
    #[serde(default = "default_resource")]
    pub resource: String,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Default for NodeParameters {
    fn default() -> Self {
        Self {
            resource: default_resource(),
            operation: default_operation(),
            fields: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ResolvedParams {
    pub fn text(&self, index: usize, name: &str) -> Result<String> {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => Ok(s.clone()),
            Some(ParamValue::Integer(_)) => Err(NodeError::parameter(index, name, "expected a string")),
            None => Err(NodeError::parameter(index, name, "is required")),
        }
    }

    pub fn integer(&self, index: usize, name: &str) -> Result<i64> {
        match self.values.get(name) {
            Some(ParamValue::Integer(n)) => Ok(*n),
            Some(ParamValue::Text(_)) => Err(NodeError::parameter(index, name, "expected an integer")),
            None => Err(NodeError::parameter(index, name, "is required")),
        }
    }
}

pub struct ParameterResolver {
    params: NodeParameters,
    fields: &'static [FieldDescriptor],
    env: Environment<'static>,
}

impl ParameterResolver {
    pub fn new(params: NodeParameters) -> Result<Self> {
        let fields = node_registry::fields_for(&params.resource, &params.operation).ok_or_else(|| {
            NodeError::Configuration(format!(
                "Unsupported resource/operation: {}/{}",
                params.resource, params.operation
            ))
        })?;

        for name in params.fields.keys() {
            if !fields.iter().any(|f| f.name == name.as_str()) {
                return Err(NodeError::Configuration(format!(
                    "Unknown field '{}' for {}/{}",
                    name, params.resource, params.operation
                )));
            }
        }

        Ok(Self {
            params,
            fields,
            env: create_environment(),
        })
    }

    pub fn parameters(&self) -> &NodeParameters {
        &self.params
    }

    /// Reads every field of the operation for one item, failing on the first
    /// absent or out-of-bounds value.
    pub fn resolve(&self, index: usize, item: &Value) -> Result<ResolvedParams> {
        let mut resolved = ResolvedParams::default();
        for field in self.fields {
            let raw = self.raw_value(index, field, item)?;
            let value = coerce(index, field, raw)?;
            resolved.values.insert(field.name, value);
        }
        Ok(resolved)
    }

    fn raw_value(&self, index: usize, field: &FieldDescriptor, item: &Value) -> Result<Value> {
        match self.params.fields.get(field.name) {
            Some(Value::String(s)) if s.contains("{{") => {
                let template = s.strip_prefix('=').unwrap_or(s);
                let ctx = json!({ "json": item, "index": index });
                let rendered = self
                    .env
                    .render_str(template, &ctx)
                    .map_err(|e| NodeError::parameter(index, field.name, format!("expression failed: {}", e)))?;
                Ok(Value::String(rendered))
            }
            Some(v) => Ok(v.clone()),
            None => Ok(item.get(field.name).cloned().unwrap_or(Value::Null)),
        }
    }
}

fn coerce(index: usize, field: &FieldDescriptor, raw: Value) -> Result<ParamValue> {
    match field.kind {
        FieldKind::Text => match raw {
            Value::String(s) if !s.trim().is_empty() => Ok(ParamValue::Text(s)),
            Value::Number(n) => Ok(ParamValue::Text(n.to_string())),
            Value::Null | Value::String(_) => Err(NodeError::parameter(index, field.name, "is required")),
            other => Err(NodeError::parameter(
                index,
                field.name,
                format!("expected a string, got {}", other),
            )),
        },
        FieldKind::Integer { min, max } => {
            let n = match raw {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => i,
                    None => match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                        _ => return Err(NodeError::parameter(index, field.name, format!("must be an integer, got {}", n))),
                    },
                },
                Value::String(s) if s.trim().is_empty() => {
                    return Err(NodeError::parameter(index, field.name, "is required"));
                }
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| NodeError::parameter(index, field.name, format!("must be an integer, got '{}'", s)))?,
                Value::Null => return Err(NodeError::parameter(index, field.name, "is required")),
                other => {
                    return Err(NodeError::parameter(
                        index,
                        field.name,
                        format!("must be an integer, got {}", other),
                    ))
                }
            };

            if n < min || n > max {
                return Err(NodeError::parameter(
                    index,
                    field.name,
                    format!("must be between {} and {}, got {}", min, max, n),
                ));
            }
            Ok(ParamValue::Integer(n))
        }
    }
}

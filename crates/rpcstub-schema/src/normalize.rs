//! Rewrites a service definition into complete per-method schemas.
//!
//! Shorthand type names become `{"type": <name>}` objects, and each method's
//! argument map is wrapped into a single object schema carrying the
//! `required` list. No shorthand survives this pass.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::SchemaConfig;
use crate::definition::{MethodDescriptor, ServiceDefinition};
use crate::error::Result;

/// Complete schemas for one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMethod {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Object schema for the argument envelope. `None` when the method takes no arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    /// Result schema. `None` when the method returns nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// A service definition after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDefinition {
    pub name: String,
    pub namespace: String,
    pub methods: Vec<NormalizedMethod>,
}

impl NormalizedDefinition {
    /// Look up a method by unqualified name.
    pub fn method(&self, name: &str) -> Option<&NormalizedMethod> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// Normalize a parsed definition.
pub fn normalize(definition: &ServiceDefinition, config: &SchemaConfig) -> NormalizedDefinition {
    NormalizedDefinition {
        name: definition.name().to_string(),
        namespace: definition.namespace().to_string(),
        methods: definition
            .methods()
            .iter()
            .map(|method| normalize_method(method, config))
            .collect(),
    }
}

/// Parse and normalize raw definition bytes.
pub fn normalize_source(source: &[u8], config: &SchemaConfig) -> Result<NormalizedDefinition> {
    let definition = ServiceDefinition::parse(source)?;
    Ok(normalize(&definition, config))
}

fn normalize_method(method: &MethodDescriptor, config: &SchemaConfig) -> NormalizedMethod {
    let mut args = method.args.as_ref().map(|args| {
        let properties: Map<String, Value> = args
            .iter()
            .map(|(name, ty)| (name.clone(), Value::Object(ty.to_schema())))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        if let Some(required) = &method.required_args {
            schema.insert(
                "required".to_string(),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(schema)
    });
    let mut result = method
        .result
        .as_ref()
        .map(|ty| Value::Object(ty.to_schema()));

    if config.strict_mode {
        for schema in args.iter_mut().chain(result.iter_mut()) {
            close_object_schemas(schema);
        }
    }

    NormalizedMethod {
        name: method.name.clone(),
        doc: method.doc.clone(),
        args,
        result,
    }
}

/// Keywords whose value is a map of name → subschema.
const SCHEMA_MAPS: [&str; 5] = [
    "properties",
    "patternProperties",
    "dependentSchemas",
    "$defs",
    "definitions",
];

/// Keywords whose value is a single subschema.
const SCHEMA_SLOTS: [&str; 11] = [
    "propertyNames",
    "additionalProperties",
    "unevaluatedProperties",
    "items",
    "contains",
    "additionalItems",
    "unevaluatedItems",
    "not",
    "if",
    "then",
    "else",
];

/// Keywords whose value is a list of subschemas.
const SCHEMA_LISTS: [&str; 4] = ["prefixItems", "allOf", "anyOf", "oneOf"];

/// Keywords that only make sense on object schemas.
const OBJECT_KEYWORDS: [&str; 8] = [
    "properties",
    "patternProperties",
    "additionalProperties",
    "unevaluatedProperties",
    "required",
    "dependentRequired",
    "dependentSchemas",
    "propertyNames",
];

/// Add `additionalProperties: false` to every object schema that leaves it unset.
fn close_object_schemas(schema: &mut Value) {
    let map = match schema {
        Value::Object(map) => map,
        Value::Array(items) => {
            items.iter_mut().for_each(close_object_schemas);
            return;
        }
        _ => return,
    };

    if describes_object(map) && !map.contains_key("additionalProperties") {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    for key in SCHEMA_MAPS {
        if let Some(Value::Object(children)) = map.get_mut(key) {
            children.values_mut().for_each(close_object_schemas);
        }
    }
    for key in SCHEMA_SLOTS.iter().chain(SCHEMA_LISTS.iter()) {
        if let Some(child) = map.get_mut(*key) {
            close_object_schemas(child);
        }
    }
}

fn describes_object(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == "object"),
        _ => OBJECT_KEYWORDS.iter().any(|keyword| map.contains_key(*keyword)),
    }
}

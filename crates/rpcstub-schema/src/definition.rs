use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};

/// A declared argument or result type as written in the definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Bare type name, e.g. `"integer"`.
    Shorthand(String),
    /// Full schema object (`type`, `properties`, `items`, `doc`, ...).
    Schema(Map<String, Value>),
}

impl TypeDescriptor {
    fn from_value(context: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Shorthand(name)),
            Value::Object(schema) => Ok(Self::Schema(schema)),
            other => Err(SchemaError::Malformed(format!(
                "{context}: expected a type name or schema object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns true for the bare type-name form.
    pub fn is_shorthand(&self) -> bool {
        matches!(self, Self::Shorthand(_))
    }

    /// The canonical schema object for this descriptor.
    pub fn to_schema(&self) -> Map<String, Value> {
        match self {
            Self::Shorthand(name) => {
                let mut schema = Map::new();
                schema.insert("type".to_string(), Value::String(name.clone()));
                schema
            }
            Self::Schema(schema) => schema.clone(),
        }
    }
}

/// One method of a service definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Method name, unqualified (`Read`, not `I2C.Read`).
    pub name: String,
    /// Human-readable description.
    pub doc: Option<String>,
    /// Arguments in declaration order. `None` means the method takes no arguments.
    pub args: Option<Vec<(String, TypeDescriptor)>>,
    /// Argument names that must be present.
    pub required_args: Option<Vec<String>>,
    /// Result type. `None` means the method returns nothing.
    pub result: Option<TypeDescriptor>,
}

/// A parsed, structurally checked service definition.
///
/// The document is never mutated after parsing; normalization works on copies.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    name: String,
    namespace: String,
    methods: Vec<MethodDescriptor>,
}

impl ServiceDefinition {
    /// Parse a definition from JSON bytes.
    pub fn parse(source: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(source).map_err(SchemaError::ParseFailed)?;
        Self::from_value(root)
    }

    /// Build a definition from an already parsed document tree.
    pub fn from_value(root: Value) -> Result<Self> {
        let Value::Object(mut root) = root else {
            return Err(SchemaError::Malformed(
                "definition root must be an object".to_string(),
            ));
        };

        let name = match root.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            Some(_) => {
                return Err(SchemaError::Malformed(
                    "`name` must be a non-empty string".to_string(),
                ))
            }
            None => return Err(SchemaError::Malformed("`name` is missing".to_string())),
        };
        let namespace = match root.remove("namespace") {
            Some(Value::String(namespace)) => namespace,
            None => String::new(),
            Some(_) => {
                return Err(SchemaError::Malformed(
                    "`namespace` must be a string".to_string(),
                ))
            }
        };
        let methods = match root.remove("methods") {
            Some(Value::Object(methods)) => methods,
            Some(_) => {
                return Err(SchemaError::Malformed(
                    "`methods` must be an object".to_string(),
                ))
            }
            None => return Err(SchemaError::Malformed("`methods` is missing".to_string())),
        };

        let methods = methods
            .into_iter()
            .map(|(method, body)| parse_method(method, body))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            namespace,
            methods,
        })
    }

    /// Load a definition file, refusing symlinks and oversized files.
    pub fn from_file(path: &Path, config: &SchemaConfig) -> Result<Self> {
        let path_metadata = std::fs::symlink_metadata(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        if path_metadata.file_type().is_symlink() {
            return Err(SchemaError::LoadFailed(format!(
                "refusing to load definition symlink: {}",
                path.display()
            )));
        }
        if !path_metadata.is_file() {
            return Err(SchemaError::LoadFailed(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        if path_metadata.len() > config.max_definition_size as u64 {
            return Err(SchemaError::LoadFailed(format!(
                "definition too large ({} bytes, max {}): {}",
                path_metadata.len(),
                config.max_definition_size,
                path.display()
            )));
        }

        let file = std::fs::File::open(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        // The file may grow between the metadata check and the read.
        let read_limit = u64::try_from(config.max_definition_size.saturating_add(1))
            .unwrap_or(u64::MAX);
        let mut content = Vec::new();
        file.take(read_limit)
            .read_to_end(&mut content)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        if content.len() > config.max_definition_size {
            return Err(SchemaError::LoadFailed(format!(
                "definition too large while reading: {}",
                path.display()
            )));
        }

        Self::parse(&content)
    }

    /// Service name, e.g. `I2C`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service namespace, e.g. `http://mongoose-iot.com/fw`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace-qualified service identifier.
    pub fn service_id(&self) -> String {
        format!("{}{}", self.namespace, self.name)
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Look up a method by unqualified name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }
}

fn parse_method(name: String, body: Value) -> Result<MethodDescriptor> {
    let Value::Object(mut body) = body else {
        return Err(SchemaError::Malformed(format!(
            "method {name} must be an object"
        )));
    };

    let doc = match body.remove("doc") {
        None => None,
        Some(Value::String(doc)) => Some(doc),
        Some(_) => {
            return Err(SchemaError::Malformed(format!(
                "method {name}: `doc` must be a string"
            )))
        }
    };

    let args = match body.remove("args") {
        None => None,
        Some(Value::Object(args)) => Some(
            args.into_iter()
                .map(|(arg, ty)| {
                    let context = format!("method {name}, argument {arg}");
                    TypeDescriptor::from_value(&context, ty).map(|ty| (arg, ty))
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(_) => {
            return Err(SchemaError::Malformed(format!(
                "method {name}: `args` must be an object"
            )))
        }
    };

    let required_args = match body.remove("required_args") {
        None => None,
        Some(value) => Some(parse_required_args(&name, value, args.as_deref())?),
    };

    let result = body
        .remove("result")
        .map(|ty| TypeDescriptor::from_value(&format!("method {name}, result"), ty))
        .transpose()?;

    Ok(MethodDescriptor {
        name,
        doc,
        args,
        required_args,
        result,
    })
}

fn parse_required_args(
    method: &str,
    value: Value,
    args: Option<&[(String, TypeDescriptor)]>,
) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(SchemaError::Malformed(format!(
            "method {method}: `required_args` must be a list"
        )));
    };

    let mut required = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(arg) = item else {
            return Err(SchemaError::Malformed(format!(
                "method {method}: `required_args` entries must be strings"
            )));
        };
        let declared = args.is_some_and(|args| args.iter().any(|(name, _)| *name == arg));
        if !declared {
            return Err(SchemaError::Malformed(format!(
                "method {method}: required argument {arg} is not declared in `args`"
            )));
        }
        required.push(arg);
    }
    Ok(required)
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

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::normalize::{normalize_source, NormalizedDefinition};

/// Which half of a call a validator checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The argument envelope sent by the caller.
    Args,
    /// The result returned by the implementation.
    Result,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Args => f.write_str("args"),
            Direction::Result => f.write_str("result"),
        }
    }
}

/// A compiled schema for one (method, direction) pair.
///
/// Stateless after construction; validating the same value twice gives the
/// same outcome.
pub struct MethodValidator {
    method: String,
    direction: Direction,
    schema: Value,
    compiled: jsonschema::Validator,
}

impl MethodValidator {
    /// Compile a normalized schema.
    pub fn compile(method: &str, direction: Direction, schema: &Value) -> Result<Self> {
        let compiled =
            jsonschema::validator_for(schema).map_err(|err| SchemaError::CompileFailed {
                method: method.to_string(),
                direction,
                message: err.to_string(),
            })?;

        Ok(Self {
            method: method.to_string(),
            direction,
            schema: schema.clone(),
            compiled,
        })
    }

    /// Validate a parsed JSON value.
    ///
    /// Reports the first violation plus up to three more.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let mut errors = self.compiled.iter_errors(value);
        if let Some(first) = errors.next() {
            let mut message = first.to_string();
            for err in errors.take(3) {
                message.push_str("; ");
                message.push_str(&err.to_string());
            }
            return Err(SchemaError::ValidationFailed {
                method: self.method.clone(),
                direction: self.direction,
                message,
            });
        }

        Ok(())
    }

    /// Parse raw JSON bytes and validate them.
    pub fn validate_payload(&self, payload: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(payload)?;
        self.validate(&value)
    }

    /// Cheap yes/no check without building violation messages.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.compiled.is_valid(value)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The normalized schema this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl fmt::Debug for MethodValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodValidator")
            .field("method", &self.method)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct MethodValidators {
    args: Option<MethodValidator>,
    result: Option<MethodValidator>,
}

/// Compiled validators for every method of one service.
///
/// Built in one pass; any schema that fails to compile fails the whole set.
#[derive(Debug)]
pub struct ValidatorSet {
    name: String,
    namespace: String,
    order: Vec<String>,
    methods: HashMap<String, MethodValidators>,
}

impl ValidatorSet {
    /// Compile validators for a normalized definition.
    pub fn build(definition: &NormalizedDefinition) -> Result<Self> {
        let mut order = Vec::with_capacity(definition.methods.len());
        let mut methods = HashMap::with_capacity(definition.methods.len());

        for method in &definition.methods {
            let args = method
                .args
                .as_ref()
                .map(|schema| MethodValidator::compile(&method.name, Direction::Args, schema))
                .transpose()?;
            let result = method
                .result
                .as_ref()
                .map(|schema| MethodValidator::compile(&method.name, Direction::Result, schema))
                .transpose()?;

            order.push(method.name.clone());
            methods.insert(method.name.clone(), MethodValidators { args, result });
        }

        tracing::debug!(
            service = %definition.name,
            methods = order.len(),
            "compiled service validators"
        );

        Ok(Self {
            name: definition.name.clone(),
            namespace: definition.namespace.clone(),
            order,
            methods,
        })
    }

    /// Parse, normalize and compile definition bytes.
    pub fn from_source(source: &[u8], config: &SchemaConfig) -> Result<Self> {
        let definition = normalize_source(source, config)?;
        Self::build(&definition)
    }

    /// Validator for a method direction.
    ///
    /// `None` when the method is unknown or declares nothing for that direction.
    pub fn get(&self, method: &str, direction: Direction) -> Option<&MethodValidator> {
        let validators = self.methods.get(method)?;
        match direction {
            Direction::Args => validators.args.as_ref(),
            Direction::Result => validators.result.as_ref(),
        }
    }

    /// Check whether the service declares a method.
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Validate a value, failing for methods the service does not declare.
    ///
    /// Directions with no declared schema accept any value.
    pub fn validate(&self, method: &str, direction: Direction, value: &Value) -> Result<()> {
        if !self.contains(method) {
            return Err(SchemaError::UnknownMethod(method.to_string()));
        }
        match self.get(method, direction) {
            Some(validator) => validator.validate(value),
            None => Ok(()),
        }
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualified method identifier used on the wire, e.g. `I2C.Read`.
    pub fn method_id(&self, method: &str) -> String {
        format!("{}.{method}", self.name)
    }

    /// Method names in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const LAMP: &str = r#"{
        "name": "Lamp",
        "methods": {
            "Set": {
                "args": { "on": "boolean", "level": "integer" },
                "required_args": ["on"],
                "result": { "type": "object", "properties": { "ok": { "type": "boolean" } } }
            },
            "Levels": { "result": { "type": "array", "items": { "type": "integer" } } },
            "Off": {}
        }
    }"#;

    fn lamp() -> ValidatorSet {
        ValidatorSet::from_source(LAMP.as_bytes(), &SchemaConfig::default()).unwrap()
    }

    #[test]
    fn validates_args_and_result() {
        let set = lamp();
        let args = set.get("Set", Direction::Args).unwrap();
        assert!(args.validate(&json!({ "on": true, "level": 3 })).is_ok());
        assert!(args.validate(&json!({ "on": true, "level": "high" })).is_err());

        let result = set.get("Set", Direction::Result).unwrap();
        assert!(result.validate(&json!({ "ok": true })).is_ok());
        assert!(result.validate(&json!("ok")).is_err());
    }

    #[test]
    fn missing_required_arg_names_method() {
        let set = lamp();
        let err = set
            .get("Set", Direction::Args)
            .unwrap()
            .validate(&json!({ "level": 1 }))
            .unwrap_err();
        match err {
            SchemaError::ValidationFailed {
                method, direction, ..
            } => {
                assert_eq!(method, "Set");
                assert_eq!(direction, Direction::Args);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undeclared_directions_have_no_validator() {
        let set = lamp();
        assert!(set.get("Levels", Direction::Args).is_none());
        assert!(set.get("Off", Direction::Args).is_none());
        assert!(set.get("Off", Direction::Result).is_none());
        assert!(set.contains("Off"));
        assert!(set.validate("Off", Direction::Result, &json!(42)).is_ok());
    }

    #[test]
    fn unknown_method_is_reported() {
        let set = lamp();
        assert!(set.get("Dim", Direction::Args).is_none());
        assert!(matches!(
            set.validate("Dim", Direction::Args, &json!({})),
            Err(SchemaError::UnknownMethod(name)) if name == "Dim"
        ));
    }

    #[test]
    fn validation_is_idempotent() {
        let set = lamp();
        let validator = set.get("Levels", Direction::Result).unwrap();
        let good = json!([1, 2]);
        let bad = json!([1, "two"]);
        for _ in 0..2 {
            assert!(validator.validate(&good).is_ok());
            assert!(validator.is_valid(&good));
            assert!(validator.validate(&bad).is_err());
            assert!(!validator.is_valid(&bad));
        }
    }

    #[test]
    fn validate_payload_rejects_non_json() {
        let set = lamp();
        let validator = set.get("Set", Direction::Args).unwrap();
        assert!(validator.validate_payload(br#"{"on":false}"#).is_ok());
        assert!(matches!(
            validator.validate_payload(b"not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn one_bad_schema_fails_the_whole_set() {
        let source = br#"{
            "name": "Broken",
            "methods": {
                "Good": { "result": "integer" },
                "Bad": { "args": { "x": "definitely-not-a-type" } }
            }
        }"#;
        let err = ValidatorSet::from_source(source, &SchemaConfig::default()).unwrap_err();
        match err {
            SchemaError::CompileFailed {
                method, direction, ..
            } => {
                assert_eq!(method, "Bad");
                assert_eq!(direction, Direction::Args);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_set_rejects_extra_args() {
        let set = ValidatorSet::from_source(LAMP.as_bytes(), &SchemaConfig::strict()).unwrap();
        let args = set.get("Set", Direction::Args).unwrap();
        assert!(args.validate(&json!({ "on": true })).is_ok());
        assert!(args.validate(&json!({ "on": true, "colour": "red" })).is_err());
    }

    #[test]
    fn method_ids_and_order() {
        let set = lamp();
        assert_eq!(set.name(), "Lamp");
        assert_eq!(set.method_id("Set"), "Lamp.Set");
        assert_eq!(set.methods().collect::<Vec<_>>(), vec!["Set", "Levels", "Off"]);
    }
}

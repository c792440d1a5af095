//! Service definitions and per-method JSON Schema validators.
//!
//! A service definition names a set of methods with their argument and result
//! shapes, optionally in shorthand (`"addr": "integer"`). This crate parses the
//! definition, normalizes it into complete JSON Schema 2020-12 documents and
//! compiles one validator per (method, direction), once per process.

pub mod config;
pub mod definition;
pub mod error;
pub mod lazy;
pub mod normalize;
pub mod validator;

pub use config::SchemaConfig;
pub use definition::{MethodDescriptor, ServiceDefinition, TypeDescriptor};
pub use error::{Result, SchemaError};
pub use lazy::LazyValidators;
pub use normalize::{normalize, normalize_source, NormalizedDefinition, NormalizedMethod};
pub use validator::{Direction, MethodValidator, ValidatorSet};

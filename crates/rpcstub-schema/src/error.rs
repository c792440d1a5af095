use crate::validator::Direction;

/// Errors raised while loading a service definition or validating payloads.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The definition file could not be read.
    #[error("failed to load service definition: {0}")]
    LoadFailed(String),

    /// The definition bytes are not a JSON document.
    #[error("failed to parse service definition: {0}")]
    ParseFailed(#[source] serde_json::Error),

    /// The definition parsed but does not have the expected structure.
    #[error("malformed service definition: {0}")]
    Malformed(String),

    /// A normalized method schema could not be compiled.
    #[error("failed to compile {direction} schema for {method}: {message}")]
    CompileFailed {
        method: String,
        direction: Direction,
        message: String,
    },

    /// The payload failed schema validation.
    #[error("invalid {direction} for {method}: {message}")]
    ValidationFailed {
        method: String,
        direction: Direction,
        message: String,
    },

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The method is not declared by the service.
    #[error("method {0} is not declared by the service")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

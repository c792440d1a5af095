/// Errors that can occur while converting payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A typed value could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// A payload could not be deserialized into the expected type.
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// Freshly encoded bytes could not be parsed back into a JSON value.
    #[error("failed to re-parse payload: {0}")]
    Reparse(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

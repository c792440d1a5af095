use rpcstub_envelope::{CodecError, STATUS_OK};
use rpcstub_schema::Direction;
use rpcstub_transport::TransportError;

/// Response status for arguments that failed validation or decoding.
pub const STATUS_INVALID_REQUEST: i32 = 400;
/// Response status for a method the dispatcher does not serve.
pub const STATUS_UNKNOWN_METHOD: i32 = 404;
/// Response status for failures inside the serving side.
pub const STATUS_INTERNAL: i32 = 500;

/// Failure reported by a service implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ServiceError {
    /// Status code sent to the caller. `0` is reserved for success.
    pub status: i32,
    pub message: String,
}

impl ServiceError {
    pub fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A failure with the generic internal status.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(STATUS_INTERNAL, message)
    }
}

/// Errors surfaced by the client proxy and the server dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Arguments do not match the method's schema.
    #[error("invalid args for {method}: {message}")]
    InvalidRequest { method: String, message: String },

    /// The transport failed to deliver the call.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote end answered with a non-zero status.
    #[error("remote error (status {status}): {message}")]
    Remote { status: i32, message: String },

    /// The remote end returned a result that does not match the schema.
    #[error("invalid response for {method}: {message}")]
    InvalidResponse { method: String, message: String },

    /// The local implementation produced a result that does not match the schema.
    #[error("server generated invalid response for {method}: {message}")]
    ServerInvalidResponse { method: String, message: String },

    /// A typed value could not be encoded.
    #[error("failed to encode {direction} for {method}: {source}")]
    Marshal {
        method: String,
        direction: Direction,
        #[source]
        source: CodecError,
    },

    /// A schema-valid payload could not be decoded into the typed struct.
    #[error("unmarshaling {direction} for {method}: {source}")]
    Unmarshal {
        method: String,
        direction: Direction,
        #[source]
        source: CodecError,
    },

    /// The method is not part of the service.
    #[error("unknown method {0}")]
    UnknownMethod(String),

    /// The implementation reported a failure.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

impl RpcError {
    /// Wire status used when this error answers a command.
    pub fn status(&self) -> i32 {
        match self {
            RpcError::InvalidRequest { .. } => STATUS_INVALID_REQUEST,
            RpcError::Unmarshal {
                direction: Direction::Args,
                ..
            } => STATUS_INVALID_REQUEST,
            RpcError::UnknownMethod(_) => STATUS_UNKNOWN_METHOD,
            RpcError::Remote { status, .. } => *status,
            RpcError::Service(err) if err.status != STATUS_OK => err.status,
            _ => STATUS_INTERNAL,
        }
    }

    /// True for the schema-violation kinds.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RpcError::InvalidRequest { .. }
                | RpcError::InvalidResponse { .. }
                | RpcError::ServerInvalidResponse { .. }
        )
    }

    /// The method this error is about, when known.
    pub fn method(&self) -> Option<&str> {
        match self {
            RpcError::InvalidRequest { method, .. }
            | RpcError::InvalidResponse { method, .. }
            | RpcError::ServerInvalidResponse { method, .. }
            | RpcError::Marshal { method, .. }
            | RpcError::Unmarshal { method, .. } => Some(method),
            RpcError::UnknownMethod(method) => Some(method),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

use bytes::Bytes;

/// Status code of a successful call.
pub const STATUS_OK: i32 = 0;

/// Outbound call: method identifier plus raw JSON arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Qualified method identifier, e.g. `I2C.Read`.
    pub method: String,
    /// Raw JSON arguments. Empty when the method takes none.
    pub args: Bytes,
}

impl Command {
    /// Create a command carrying arguments.
    pub fn new(method: impl Into<String>, args: impl Into<Bytes>) -> Self {
        Self {
            method: method.into(),
            args: args.into(),
        }
    }

    /// Create a command with no arguments.
    pub fn without_args(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Bytes::new(),
        }
    }

    /// True when no argument payload is attached.
    pub fn has_args(&self) -> bool {
        !crate::codec::is_absent(&self.args)
    }
}

/// Reply to a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// `0` on success, anything else is a remote failure.
    pub status: i32,
    /// Human-readable failure description.
    pub status_msg: Option<String>,
    /// Raw JSON result. Empty for methods that return nothing or on failure.
    pub payload: Bytes,
}

impl Response {
    /// Successful reply carrying a result payload.
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self {
            status: STATUS_OK,
            status_msg: None,
            payload: payload.into(),
        }
    }

    /// Successful reply with no result.
    pub fn empty() -> Self {
        Self::ok(Bytes::new())
    }

    /// Failed reply.
    pub fn error(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            status_msg: Some(message.into()),
            payload: Bytes::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The status message, or an empty string.
    pub fn message(&self) -> &str {
        self.status_msg.as_deref().unwrap_or_default()
    }
}

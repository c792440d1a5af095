/// Errors reported by a transport while delivering a call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No endpoint is reachable at the destination.
    #[error("destination unreachable: {0}")]
    Unreachable(String),

    /// The caller cancelled the call.
    #[error("call cancelled")]
    Cancelled,

    /// The caller's deadline passed before the call completed.
    #[error("call deadline exceeded")]
    DeadlineExceeded,

    /// An I/O error occurred on the underlying channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has been shut down.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;

//! Transport contract for rpcstub.
//!
//! The stub layer hands a [`Command`](rpcstub_envelope::Command) and the
//! caller's [`CallContext`] to a [`Transport`] and gets a
//! [`Response`](rpcstub_envelope::Response) back. Real network transports live
//! outside this workspace; [`LoopbackTransport`] routes calls to in-process
//! [`CommandHandler`]s.

pub mod context;
pub mod error;
pub mod loopback;
pub mod traits;

pub use context::CallContext;
pub use error::{Result, TransportError};
pub use loopback::{LoopbackTransport, LOOPBACK_SOURCE};
#[cfg(feature = "async")]
pub use traits::AsyncTransport;
pub use traits::{CommandHandler, Transport};

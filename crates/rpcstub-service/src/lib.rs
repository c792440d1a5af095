//! Schema-validated client proxy and server dispatcher.
//!
//! Both sides share one pipeline parameterized by the [`Method`] trait:
//!
//! - client: encode args, validate, call the transport, check status,
//!   validate the result, decode;
//! - server: validate args, decode, run the implementation, encode the
//!   result, validate it, reply.
//!
//! Validation failures never reach the other side: invalid arguments are not
//! sent and invalid results are not returned.

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod error;
pub mod method;
mod pipeline;
pub mod server;

#[cfg(feature = "async")]
pub use async_client::AsyncClient;
pub use client::Client;
pub use error::{
    Result, RpcError, ServiceError, STATUS_INTERNAL, STATUS_INVALID_REQUEST, STATUS_UNKNOWN_METHOD,
};
pub use method::Method;
pub use server::Dispatcher;

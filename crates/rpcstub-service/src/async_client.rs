use std::sync::Arc;

use bytes::Bytes;
use rpcstub_schema::ValidatorSet;
use rpcstub_transport::{AsyncTransport, CallContext};

use crate::error::Result;
use crate::method::Method;
use crate::pipeline;

/// Async client proxy. Same pipeline as [`Client`](crate::Client), awaiting
/// the transport instead of blocking on it.
pub struct AsyncClient<T> {
    transport: T,
    destination: String,
    validators: Arc<ValidatorSet>,
}

impl<T: AsyncTransport> AsyncClient<T> {
    pub fn new(transport: T, destination: impl Into<String>, validators: Arc<ValidatorSet>) -> Self {
        Self {
            transport,
            destination: destination.into(),
            validators,
        }
    }

    /// Invoke a typed method.
    pub async fn call<M: Method>(&self, ctx: &CallContext, args: &M::Args) -> Result<M::Output> {
        let command = pipeline::outbound_command(&self.validators, M::NAME, args)?;
        tracing::debug!(destination = %self.destination, method = %command.method, "calling");

        let response = self.transport.call(ctx, &self.destination, command).await?;
        let payload = pipeline::accept_response(&self.validators, M::NAME, response)?;
        pipeline::decode_output(M::NAME, payload)
    }

    /// Invoke a method with a raw JSON argument payload.
    pub async fn call_raw(&self, ctx: &CallContext, method: &str, args: Bytes) -> Result<Bytes> {
        let command = pipeline::outbound_raw(&self.validators, method, args)?;
        let response = self.transport.call(ctx, &self.destination, command).await?;
        let payload = pipeline::accept_response(&self.validators, method, response)?;
        Ok(payload.unwrap_or_default())
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

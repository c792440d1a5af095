use std::sync::Arc;

use bytes::Bytes;
use rpcstub_schema::ValidatorSet;
use rpcstub_transport::{CallContext, Transport};

use crate::error::Result;
use crate::method::Method;
use crate::pipeline;

/// Client proxy for one service instance behind a transport.
///
/// Every call validates its arguments before anything reaches the transport
/// and validates the result before decoding it.
pub struct Client<T> {
    transport: T,
    destination: String,
    validators: Arc<ValidatorSet>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, destination: impl Into<String>, validators: Arc<ValidatorSet>) -> Self {
        Self {
            transport,
            destination: destination.into(),
            validators,
        }
    }

    /// Invoke a typed method.
    pub fn call<M: Method>(&self, ctx: &CallContext, args: &M::Args) -> Result<M::Output> {
        let command = pipeline::outbound_command(&self.validators, M::NAME, args)?;
        tracing::debug!(destination = %self.destination, method = %command.method, "calling");

        let response = self.transport.call(ctx, &self.destination, command)?;
        let payload = pipeline::accept_response(&self.validators, M::NAME, response)?;
        pipeline::decode_output(M::NAME, payload)
    }

    /// Invoke a method with a raw JSON argument payload.
    ///
    /// Runs the same validation as [`Client::call`]. The returned bytes are
    /// empty for methods without a declared result.
    pub fn call_raw(&self, ctx: &CallContext, method: &str, args: impl Into<Bytes>) -> Result<Bytes> {
        let command = pipeline::outbound_raw(&self.validators, method, args.into())?;
        tracing::debug!(destination = %self.destination, method = %command.method, "calling");

        let response = self.transport.call(ctx, &self.destination, command)?;
        let payload = pipeline::accept_response(&self.validators, method, response)?;
        Ok(payload.unwrap_or_default())
    }
}

impl<T> Client<T> {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn validators(&self) -> &Arc<ValidatorSet> {
        &self.validators
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

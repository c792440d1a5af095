use std::sync::Arc;

use rpcstub_envelope::{Command, Response};

use crate::context::CallContext;
use crate::error::Result;

/// Delivers a command to a destination and returns its response.
///
/// Implementations own connection management, framing and retries. The
/// context must be honoured for cancellation and deadlines.
pub trait Transport: Send + Sync {
    fn call(&self, ctx: &CallContext, destination: &str, command: Command) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn call(&self, ctx: &CallContext, destination: &str, command: Command) -> Result<Response> {
        (**self).call(ctx, destination, command)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, ctx: &CallContext, destination: &str, command: Command) -> Result<Response> {
        (**self).call(ctx, destination, command)
    }
}

/// Receives commands on the serving side of a transport.
///
/// Failures are expressed in the response status, never as a transport error.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, ctx: &CallContext, source: &str, command: Command) -> Response;
}

impl<F> CommandHandler for F
where
    F: Fn(&CallContext, &str, Command) -> Response + Send + Sync,
{
    fn handle(&self, ctx: &CallContext, source: &str, command: Command) -> Response {
        self(ctx, source, command)
    }
}

/// Async counterpart of [`Transport`].
#[cfg(feature = "async")]
pub trait AsyncTransport: Send + Sync {
    fn call(
        &self,
        ctx: &CallContext,
        destination: &str,
        command: Command,
    ) -> impl std::future::Future<Output = Result<Response>> + Send;
}

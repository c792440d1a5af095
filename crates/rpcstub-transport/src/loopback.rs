use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rpcstub_envelope::{Command, Response};

use crate::context::CallContext;
use crate::error::{Result, TransportError};
use crate::traits::{CommandHandler, Transport};

/// Default source name reported to handlers.
pub const LOOPBACK_SOURCE: &str = "loopback";

/// In-process transport routing commands straight to registered handlers.
///
/// Delivery happens on the caller's thread. Cancellation and deadlines are
/// checked before delivery and again before the response is handed back.
pub struct LoopbackTransport {
    source: String,
    routes: HashMap<String, Arc<dyn CommandHandler>>,
}

impl LoopbackTransport {
    /// A transport with no routes.
    pub fn new() -> Self {
        Self {
            source: LOOPBACK_SOURCE.to_string(),
            routes: HashMap::new(),
        }
    }

    /// Override the source name handlers see.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Add a route and return the transport.
    pub fn with_route(
        mut self,
        destination: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        self.add_route(destination, handler);
        self
    }

    /// Add or replace a route.
    pub fn add_route(&mut self, destination: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.routes.insert(destination.into(), handler);
    }

    /// Registered destinations, sorted.
    pub fn destinations(&self) -> Vec<&str> {
        let mut destinations: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        destinations.sort_unstable();
        destinations
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackTransport")
            .field("source", &self.source)
            .field("destinations", &self.destinations())
            .finish()
    }
}

impl Transport for LoopbackTransport {
    fn call(&self, ctx: &CallContext, destination: &str, command: Command) -> Result<Response> {
        ctx.check()?;
        let handler = self
            .routes
            .get(destination)
            .ok_or_else(|| TransportError::Unreachable(destination.to_string()))?;

        tracing::trace!(destination, method = %command.method, "loopback delivery");
        let response = handler.handle(ctx, &self.source, command);

        // A caller that gave up while the handler ran does not get the response.
        ctx.check()?;
        Ok(response)
    }
}

#[cfg(feature = "async")]
impl crate::traits::AsyncTransport for LoopbackTransport {
    async fn call(
        &self,
        ctx: &CallContext,
        destination: &str,
        command: Command,
    ) -> Result<Response> {
        Transport::call(self, ctx, destination, command)
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;

    fn echo() -> Arc<dyn CommandHandler> {
        Arc::new(|_ctx: &CallContext, source: &str, command: Command| {
            assert_eq!(source, "bench");
            Response::ok(command.args)
        })
    }

    #[test]
    fn routes_to_registered_handler() {
        let transport = LoopbackTransport::new()
            .with_source("bench")
            .with_route("dev1", echo());

        let response = transport
            .call(
                &CallContext::new(),
                "dev1",
                Command::new("Echo.Echo", br#"{"x":1}"#.to_vec()),
            )
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.payload.as_ref(), br#"{"x":1}"#);
    }

    #[test]
    fn unknown_destination_is_unreachable() {
        let transport = LoopbackTransport::new().with_route("dev1", echo());
        let err = transport
            .call(&CallContext::new(), "dev2", Command::without_args("Echo.Echo"))
            .unwrap_err();
        assert!(matches!(err, TransportError::Unreachable(dest) if dest == "dev2"));
    }

    #[test]
    fn cancelled_context_is_not_delivered() {
        let token = CancellationToken::new();
        token.cancel();
        let handler: Arc<dyn CommandHandler> =
            Arc::new(|_ctx: &CallContext, _source: &str, _command: Command| -> Response {
                panic!("handler must not run for a cancelled call")
            });
        let transport = LoopbackTransport::new().with_route("dev1", handler);

        let err = transport
            .call(
                &CallContext::with_cancellation(token),
                "dev1",
                Command::without_args("Echo.Echo"),
            )
            .unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
    }

    #[test]
    fn cancellation_during_delivery_drops_response() {
        let token = CancellationToken::new();
        let inner = token.clone();
        let handler: Arc<dyn CommandHandler> =
            Arc::new(move |_ctx: &CallContext, _source: &str, _command: Command| {
                inner.cancel();
                Response::empty()
            });
        let transport = LoopbackTransport::new().with_route("dev1", handler);

        let err = transport
            .call(
                &CallContext::with_cancellation(token),
                "dev1",
                Command::without_args("Echo.Echo"),
            )
            .unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
    }

    #[test]
    fn destinations_are_sorted() {
        let mut transport = LoopbackTransport::new();
        transport.add_route("b", echo());
        transport.add_route("a", echo());
        assert_eq!(transport.destinations(), vec!["a", "b"]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_call_uses_same_routing() {
        use crate::traits::AsyncTransport;

        let transport = LoopbackTransport::new()
            .with_source("bench")
            .with_route("dev1", echo());
        let response = AsyncTransport::call(
            &transport,
            &CallContext::new(),
            "dev1",
            Command::new("Echo.Echo", b"[1]".to_vec()),
        )
        .await
        .unwrap();
        assert_eq!(response.payload.as_ref(), b"[1]");
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use rpcstub_envelope::{codec, Command, Response};
use rpcstub_schema::{Direction, ValidatorSet};
use rpcstub_transport::{CallContext, CommandHandler};

use crate::error::{Result, RpcError, ServiceError};
use crate::method::Method;
use crate::pipeline::{self, Checkpoint};

type Handler = Box<dyn Fn(&CallContext, &[u8]) -> Result<Bytes> + Send + Sync>;

/// Server-side dispatcher: routes commands to registered implementations.
///
/// Arguments are validated before the implementation runs and results are
/// validated before they leave. The handler table is filled before serving
/// and only read afterwards.
pub struct Dispatcher {
    validators: Arc<ValidatorSet>,
    handlers: HashMap<String, Handler>,
}

impl Dispatcher {
    pub fn new(validators: Arc<ValidatorSet>) -> Self {
        Self {
            validators,
            handlers: HashMap::new(),
        }
    }

    /// Install the implementation of `M`.
    ///
    /// Fails with [`RpcError::UnknownMethod`] when the definition does not
    /// declare `M`. Registering the same method twice replaces the handler.
    pub fn register<M, F>(&mut self, handler: F) -> Result<&mut Self>
    where
        M: Method + 'static,
        F: Fn(&CallContext, M::Args) -> std::result::Result<M::Output, ServiceError>
            + Send
            + Sync
            + 'static,
    {
        let id = self.validators.method_id(M::NAME);
        if !self.validators.contains(M::NAME) {
            return Err(RpcError::UnknownMethod(id));
        }

        let validators = Arc::clone(&self.validators);
        let serve = move |ctx: &CallContext, args: &[u8]| {
            serve_method::<M, F>(&validators, &handler, ctx, args)
        };
        if self.handlers.insert(id.clone(), Box::new(serve)).is_some() {
            tracing::debug!(method = %id, "replaced handler");
        }
        Ok(self)
    }

    /// Run the full server pipeline for one command and return the result payload.
    pub fn serve(&self, ctx: &CallContext, source: &str, command: &Command) -> Result<Bytes> {
        let handler = self
            .handlers
            .get(&command.method)
            .ok_or_else(|| RpcError::UnknownMethod(command.method.clone()))?;
        tracing::debug!(source, method = %command.method, "dispatching");
        handler(ctx, &command.args)
    }

    /// Serve a command and express the outcome as a response.
    pub fn dispatch(&self, ctx: &CallContext, source: &str, command: Command) -> Response {
        match self.serve(ctx, source, &command) {
            Ok(payload) => Response::ok(payload),
            Err(err) => {
                let status = err.status();
                tracing::debug!(source, method = %command.method, status, error = %err, "call failed");
                match err {
                    RpcError::Service(service) if service.status == status => {
                        Response::error(status, service.message)
                    }
                    other => Response::error(status, other.to_string()),
                }
            }
        }
    }

    /// Method ids with a registered handler, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub fn validators(&self) -> &Arc<ValidatorSet> {
        &self.validators
    }
}

impl CommandHandler for Dispatcher {
    fn handle(&self, ctx: &CallContext, source: &str, command: Command) -> Response {
        self.dispatch(ctx, source, command)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("service", &self.validators.name())
            .field("methods", &self.methods())
            .finish()
    }
}

fn serve_method<M, F>(
    validators: &ValidatorSet,
    handler: &F,
    ctx: &CallContext,
    args: &[u8],
) -> Result<Bytes>
where
    M: Method,
    F: Fn(&CallContext, M::Args) -> std::result::Result<M::Output, ServiceError>,
{
    let args = match validators.get(M::NAME, Direction::Args) {
        None => M::Args::default(),
        Some(validator) => {
            pipeline::check(validator, args, Checkpoint::ServerArgs)?;
            codec::decode(args).map_err(|source| {
                tracing::warn!(method = M::NAME, error = %source, "failed to unmarshal args");
                RpcError::Unmarshal {
                    method: M::NAME.to_string(),
                    direction: Direction::Args,
                    source,
                }
            })?
        }
    };

    let output = handler(ctx, args)?;

    let Some(validator) = validators.get(M::NAME, Direction::Result) else {
        return Ok(Bytes::new());
    };
    let payload = codec::encode(&output).map_err(|source| {
        tracing::error!(method = M::NAME, error = %source, "failed to marshal result");
        RpcError::Marshal {
            method: M::NAME.to_string(),
            direction: Direction::Result,
            source,
        }
    })?;
    // The implementation already ran; only the result is withheld.
    pipeline::check(validator, &payload, Checkpoint::ServerResult)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rpcstub_schema::SchemaConfig;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::error::{STATUS_INTERNAL, STATUS_INVALID_REQUEST, STATUS_UNKNOWN_METHOD};

    const LAMP: &str = r#"{
        "name": "Lamp",
        "methods": {
            "Set": {
                "args": { "level": "integer", "label": "string" },
                "required_args": ["level"],
                "result": { "type": "object", "properties": { "level": { "type": "integer" } } }
            },
            "Levels": { "result": { "type": "array", "items": { "type": "integer" } } },
            "Off": {}
        }
    }"#;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct SetArgs {
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct SetResult {
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<i64>,
    }

    struct Set;

    impl Method for Set {
        const NAME: &'static str = "Set";
        type Args = SetArgs;
        type Output = SetResult;
    }

    struct Levels;

    impl Method for Levels {
        const NAME: &'static str = "Levels";
        type Args = ();
        type Output = serde_json::Value;
    }

    struct Off;

    impl Method for Off {
        const NAME: &'static str = "Off";
        type Args = ();
        type Output = ();
    }

    struct Dim;

    impl Method for Dim {
        const NAME: &'static str = "Dim";
        type Args = ();
        type Output = ();
    }

    fn dispatcher() -> Dispatcher {
        let set = ValidatorSet::from_source(LAMP.as_bytes(), &SchemaConfig::default()).unwrap();
        Dispatcher::new(Arc::new(set))
    }

    fn call(dispatcher: &Dispatcher, method: &str, args: &'static [u8]) -> Response {
        dispatcher.dispatch(&CallContext::new(), "test", Command::new(method, args))
    }

    #[test]
    fn valid_call_returns_encoded_result() {
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Set, _>(|_ctx, args| {
                assert_eq!(args.label.as_deref(), Some("desk"));
                Ok(SetResult { level: args.level })
            })
            .unwrap();

        let response = call(&dispatcher, "Lamp.Set", br#"{"level":3,"label":"desk"}"#);
        assert!(response.is_success(), "{response:?}");
        assert_eq!(response.payload.as_ref(), br#"{"level":3}"#);
    }

    #[test]
    fn invalid_args_never_invoke_implementation() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Set, _>(move |_ctx, _args| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(SetResult::default())
            })
            .unwrap();

        let response = call(&dispatcher, "Lamp.Set", br#"{"level":"high"}"#);
        assert_eq!(response.status, STATUS_INVALID_REQUEST);
        assert!(response.message().starts_with("invalid args for Set"));

        // Empty payload stands for `{}`, which misses the required `level`.
        let response = call(&dispatcher, "Lamp.Set", b"");
        assert_eq!(response.status, STATUS_INVALID_REQUEST);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unparseable_args_fail_at_decode() {
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Set, _>(|_ctx, _args| Ok(SetResult::default()))
            .unwrap();

        let response = call(&dispatcher, "Lamp.Set", b"{level");
        assert_eq!(response.status, STATUS_INVALID_REQUEST);
        assert!(response.message().starts_with("unmarshaling args for Set"));
    }

    #[test]
    fn invalid_result_is_suppressed() {
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Levels, _>(|_ctx, ()| Ok(serde_json::json!("not-an-array")))
            .unwrap();

        let response = call(&dispatcher, "Lamp.Levels", b"");
        assert_eq!(response.status, STATUS_INTERNAL);
        assert!(response.payload.is_empty());
        assert!(response
            .message()
            .starts_with("server generated invalid response for Levels"));
    }

    #[test]
    fn service_error_status_is_verbatim() {
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Off, _>(|_ctx, ()| Err(ServiceError::new(5, "bus timeout")))
            .unwrap();

        let response = call(&dispatcher, "Lamp.Off", b"");
        assert_eq!(response.status, 5);
        assert_eq!(response.message(), "bus timeout");
    }

    #[test]
    fn service_error_with_ok_status_becomes_internal() {
        let mut dispatcher = dispatcher();
        dispatcher
            .register::<Off, _>(|_ctx, ()| Err(ServiceError::new(0, "confused")))
            .unwrap();

        let response = call(&dispatcher, "Lamp.Off", b"");
        assert_eq!(response.status, STATUS_INTERNAL);
    }

    #[test]
    fn unknown_method_is_404() {
        let dispatcher = dispatcher();
        let response = call(&dispatcher, "Lamp.Blink", b"");
        assert_eq!(response.status, STATUS_UNKNOWN_METHOD);
        assert_eq!(response.message(), "unknown method Lamp.Blink");
    }

    #[test]
    fn register_rejects_undeclared_method() {
        let mut dispatcher = dispatcher();
        let err = dispatcher.register::<Dim, _>(|_ctx, ()| Ok(())).unwrap_err();
        assert!(matches!(err, RpcError::UnknownMethod(ref id) if id == "Lamp.Dim"));
    }

    #[test]
    fn no_result_method_sends_empty_payload() {
        let mut dispatcher = dispatcher();
        dispatcher.register::<Off, _>(|_ctx, ()| Ok(())).unwrap();
        assert_eq!(dispatcher.methods(), vec!["Lamp.Off"]);

        let response = call(&dispatcher, "Lamp.Off", b"{\"ignored\":true}");
        assert!(response.is_success());
        assert!(response.payload.is_empty());
    }
}

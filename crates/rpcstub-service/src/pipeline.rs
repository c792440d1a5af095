//! Validation and codec stages shared by the client and server paths.

use bytes::Bytes;
use rpcstub_envelope::{codec, Command, Response};
use rpcstub_schema::{Direction, MethodValidator, SchemaError, ValidatorSet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, RpcError};

/// The four points where a payload crosses the schema boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Checkpoint {
    ClientArgs,
    ClientResult,
    ServerArgs,
    ServerResult,
}

impl Checkpoint {
    fn reject(self, method: &str, message: String) -> RpcError {
        let method = method.to_string();
        match self {
            Checkpoint::ClientArgs | Checkpoint::ServerArgs => {
                RpcError::InvalidRequest { method, message }
            }
            Checkpoint::ClientResult => RpcError::InvalidResponse { method, message },
            Checkpoint::ServerResult => RpcError::ServerInvalidResponse { method, message },
        }
    }

    fn log_violation(self, method: &str, message: &str) {
        match self {
            Checkpoint::ClientArgs => tracing::warn!(method, error = message, "sending invalid args"),
            Checkpoint::ClientResult => tracing::warn!(method, error = message, "got invalid result"),
            Checkpoint::ServerArgs => tracing::warn!(method, error = message, "got invalid args"),
            Checkpoint::ServerResult => {
                tracing::warn!(method, error = message, "returned invalid response")
            }
        }
    }

    /// What an absent payload stands for at this point.
    fn absent_value(self) -> Value {
        match self {
            Checkpoint::ClientArgs | Checkpoint::ServerArgs => Value::Object(Map::new()),
            Checkpoint::ClientResult | Checkpoint::ServerResult => Value::Null,
        }
    }
}

/// Validate a raw payload at a checkpoint.
///
/// A payload that cannot be re-parsed is logged and let through: internal
/// serialization inconsistencies must not block calls, real schema
/// violations still do.
pub(crate) fn check(validator: &MethodValidator, payload: &[u8], checkpoint: Checkpoint) -> Result<()> {
    let method = validator.method();
    let value = if codec::is_absent(payload) {
        checkpoint.absent_value()
    } else {
        match codec::reparse(payload) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(
                    method,
                    error = %err,
                    payload = %String::from_utf8_lossy(payload),
                    "failed to re-parse payload, skipping validation"
                );
                return Ok(());
            }
        }
    };

    validator.validate(&value).map_err(|err| {
        let message = violation_message(err);
        checkpoint.log_violation(method, &message);
        checkpoint.reject(method, message)
    })
}

fn violation_message(err: SchemaError) -> String {
    match err {
        SchemaError::ValidationFailed { message, .. } => message,
        other => other.to_string(),
    }
}

fn method_id(validators: &ValidatorSet, method: &str) -> Result<String> {
    if validators.contains(method) {
        Ok(validators.method_id(method))
    } else {
        Err(RpcError::UnknownMethod(validators.method_id(method)))
    }
}

/// Build the outbound command for a typed call.
pub(crate) fn outbound_command<A: Serialize + ?Sized>(
    validators: &ValidatorSet,
    method: &str,
    args: &A,
) -> Result<Command> {
    let id = method_id(validators, method)?;
    let Some(validator) = validators.get(method, Direction::Args) else {
        return Ok(Command::without_args(id));
    };

    let payload = codec::encode(args).map_err(|source| {
        tracing::error!(method, error = %source, "failed to marshal args");
        RpcError::Marshal {
            method: method.to_string(),
            direction: Direction::Args,
            source,
        }
    })?;
    check(validator, &payload, Checkpoint::ClientArgs)?;
    Ok(Command::new(id, payload))
}

/// Build the outbound command for an untyped call.
pub(crate) fn outbound_raw(validators: &ValidatorSet, method: &str, payload: Bytes) -> Result<Command> {
    let id = method_id(validators, method)?;
    if let Some(validator) = validators.get(method, Direction::Args) {
        check(validator, &payload, Checkpoint::ClientArgs)?;
    }
    Ok(Command::new(id, payload))
}

/// Check a response and hand back its payload.
///
/// `None` means the method declares no result and nothing is to be decoded.
pub(crate) fn accept_response(
    validators: &ValidatorSet,
    method: &str,
    response: Response,
) -> Result<Option<Bytes>> {
    if !response.is_success() {
        return Err(RpcError::Remote {
            status: response.status,
            message: response.status_msg.unwrap_or_default(),
        });
    }

    let Some(validator) = validators.get(method, Direction::Result) else {
        return Ok(None);
    };
    check(validator, &response.payload, Checkpoint::ClientResult)?;
    Ok(Some(response.payload))
}

/// Decode an accepted response payload.
pub(crate) fn decode_output<R: DeserializeOwned + Default>(
    method: &str,
    payload: Option<Bytes>,
) -> Result<R> {
    match payload {
        None => Ok(R::default()),
        Some(payload) => codec::decode(&payload).map_err(|source| RpcError::Unmarshal {
            method: method.to_string(),
            direction: Direction::Result,
            source,
        }),
    }
}

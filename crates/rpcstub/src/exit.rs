use std::fmt;

use rpcstub_schema::SchemaError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    let code = match &err {
        SchemaError::LoadFailed(_) => FAILURE,
        SchemaError::ParseFailed(_)
        | SchemaError::Malformed(_)
        | SchemaError::CompileFailed { .. }
        | SchemaError::ValidationFailed { .. }
        | SchemaError::InvalidJson(_) => DATA_INVALID,
        SchemaError::UnknownMethod(_) => USAGE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use rpcstub_schema::Direction;

    use super::*;

    #[test]
    fn schema_errors_map_to_exit_codes() {
        assert_eq!(
            schema_error("load", SchemaError::LoadFailed("gone".into())).code,
            FAILURE
        );
        assert_eq!(
            schema_error("load", SchemaError::Malformed("no name".into())).code,
            DATA_INVALID
        );
        let err = schema_error(
            "check",
            SchemaError::ValidationFailed {
                method: "Read".into(),
                direction: Direction::Args,
                message: "bad".into(),
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "check: invalid args for Read: bad");
        assert_eq!(
            schema_error("check", SchemaError::UnknownMethod("Nope".into())).code,
            USAGE
        );
    }
}

use rpcstub_schema::{normalize, Direction, SchemaError, ValidatorSet};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cmd::CheckArgs;
use crate::exit::{schema_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_json, print_json_pretty, OutputFormat};

#[derive(Serialize)]
struct CheckOutput {
    schema_id: &'static str,
    method: String,
    direction: String,
    valid: bool,
    /// False when the method declares nothing for this direction.
    checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let definition = args.definition.load()?;
    let normalized = normalize(&definition, &args.definition.config());
    let set =
        ValidatorSet::build(&normalized).map_err(|err| schema_error("compile definition", err))?;

    let method = args
        .method
        .strip_prefix(&format!("{}.", set.name()))
        .unwrap_or(&args.method);
    if !set.contains(method) {
        return Err(schema_error(
            "check",
            SchemaError::UnknownMethod(set.method_id(method)),
        ));
    }

    let (direction, payload) = match (args.args, args.result) {
        (Some(payload), None) => (Direction::Args, payload),
        (None, Some(payload)) => (Direction::Result, payload),
        _ => {
            return Err(CliError::new(
                USAGE,
                "exactly one of --args or --result is required",
            ))
        }
    };
    let value = parse_payload(&payload, direction)?;

    let (checked, error) = match set.get(method, direction) {
        None => (false, None),
        Some(validator) => match validator.validate(&value) {
            Ok(()) => (true, None),
            Err(SchemaError::ValidationFailed { message, .. }) => (true, Some(message)),
            Err(other) => return Err(schema_error("check", other)),
        },
    };

    let out = CheckOutput {
        schema_id: "https://schemas.3leaps.dev/rpcstub/cli/v1/check-result.schema.json",
        method: set.method_id(method),
        direction: direction.to_string(),
        valid: error.is_none(),
        checked,
        error,
    };
    print_check(&out, format);

    Ok(if out.valid { SUCCESS } else { DATA_INVALID })
}

/// Blank payloads mean "nothing sent": `{}` for args, `null` for a result.
fn parse_payload(payload: &str, direction: Direction) -> CliResult<Value> {
    if payload.trim().is_empty() {
        return Ok(match direction {
            Direction::Args => Value::Object(Map::new()),
            Direction::Result => Value::Null,
        });
    }
    serde_json::from_str(payload).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!("{direction} payload is not valid JSON: {err}"),
        )
    })
}

fn print_check(out: &CheckOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Pretty => print_json_pretty(out),
        OutputFormat::Table | OutputFormat::Raw => match (&out.error, out.checked) {
            (Some(err), _) => println!("{} {}: invalid: {err}", out.method, out.direction),
            (None, true) => println!("{} {}: valid", out.method, out.direction),
            (None, false) => println!("{} {}: no schema declared", out.method, out.direction),
        },
    }
}

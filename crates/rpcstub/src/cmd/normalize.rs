use rpcstub_schema::{normalize, NormalizedMethod, ValidatorSet};
use serde::Serialize;

use crate::cmd::NormalizeArgs;
use crate::exit::{json_error, schema_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, print_json_pretty, print_raw, print_table, OutputFormat};

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    schema_id: &'static str,
    service_id: String,
    strict: bool,
    methods: Vec<&'a NormalizedMethod>,
}

pub fn run(args: NormalizeArgs, format: OutputFormat) -> CliResult<i32> {
    let definition = args.definition.load()?;
    let config = args.definition.config();
    let normalized = normalize(&definition, &config);

    // Surface schemas the validator cannot compile, not just shape errors.
    ValidatorSet::build(&normalized).map_err(|err| schema_error("compile definition", err))?;

    let methods: Vec<&NormalizedMethod> = match args.method.as_deref() {
        None => normalized.methods.iter().collect(),
        Some(name) => {
            let bare = name
                .strip_prefix(&format!("{}.", normalized.name))
                .unwrap_or(name);
            let method = normalized.method(bare).ok_or_else(|| {
                CliError::new(
                    USAGE,
                    format!("method {name} is not declared by {}", normalized.name),
                )
            })?;
            vec![method]
        }
    };

    let out = NormalizeOutput {
        schema_id: "https://schemas.3leaps.dev/rpcstub/cli/v1/normalized-definition.schema.json",
        service_id: definition.service_id(),
        strict: config.strict_mode,
        methods,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Pretty => print_json_pretty(&out),
        OutputFormat::Table => {
            let rows = out
                .methods
                .iter()
                .map(|m| {
                    vec![
                        format!("{}.{}", normalized.name, m.name),
                        schema_cell(m.args.as_ref()),
                        schema_cell(m.result.as_ref()),
                    ]
                })
                .collect();
            print_table(&["METHOD", "ARGS SCHEMA", "RESULT SCHEMA"], rows);
        }
        OutputFormat::Raw => {
            let bytes = serde_json::to_vec(&out.methods)
                .map_err(|err| json_error("encode normalized schemas", err))?;
            print_raw(&bytes);
            println!();
        }
    }
    Ok(SUCCESS)
}

fn schema_cell(schema: Option<&serde_json::Value>) -> String {
    schema
        .map(|value| serde_json::to_string_pretty(value).unwrap_or_default())
        .unwrap_or_else(|| "-".to_string())
}

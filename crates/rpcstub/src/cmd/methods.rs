use rpcstub_schema::{MethodDescriptor, ServiceDefinition, TypeDescriptor};
use serde::Serialize;

use crate::cmd::MethodsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_json_pretty, print_table, OutputFormat};

#[derive(Serialize)]
struct MethodInfo<'a> {
    id: String,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<&'a str>,
    args: Vec<&'a str>,
    required_args: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
}

#[derive(Serialize)]
struct MethodsOutput<'a> {
    schema_id: &'static str,
    service_id: String,
    name: &'a str,
    namespace: &'a str,
    methods: Vec<MethodInfo<'a>>,
}

pub fn run(args: MethodsArgs, format: OutputFormat) -> CliResult<i32> {
    let definition = args.definition.load()?;
    let methods = definition
        .methods()
        .iter()
        .map(|method| method_info(&definition, method))
        .collect();

    let out = MethodsOutput {
        schema_id: "https://schemas.3leaps.dev/rpcstub/cli/v1/methods.schema.json",
        service_id: definition.service_id(),
        name: definition.name(),
        namespace: definition.namespace(),
        methods,
    };
    print_methods(&out, format);
    Ok(SUCCESS)
}

fn method_info<'a>(definition: &ServiceDefinition, method: &'a MethodDescriptor) -> MethodInfo<'a> {
    MethodInfo {
        id: format!("{}.{}", definition.name(), method.name),
        name: &method.name,
        doc: method.doc.as_deref(),
        args: method
            .args
            .iter()
            .flatten()
            .map(|(name, _)| name.as_str())
            .collect(),
        required_args: method
            .required_args
            .iter()
            .flatten()
            .map(String::as_str)
            .collect(),
        result: method.result.as_ref().map(type_summary),
    }
}

/// Short label for a result shape: the shorthand name or the schema's `type`.
fn type_summary(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Shorthand(name) => name.clone(),
        TypeDescriptor::Schema(schema) => match schema.get("type") {
            Some(serde_json::Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => "schema".to_string(),
        },
    }
}

fn print_methods(out: &MethodsOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Pretty => print_json_pretty(out),
        OutputFormat::Table => {
            let rows = out
                .methods
                .iter()
                .map(|m| {
                    let args = m
                        .args
                        .iter()
                        .map(|name| {
                            if m.required_args.contains(name) {
                                format!("{name}*")
                            } else {
                                (*name).to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    vec![
                        m.id.clone(),
                        args,
                        m.result.clone().unwrap_or_else(|| "-".to_string()),
                        m.doc.unwrap_or_default().to_string(),
                    ]
                })
                .collect();
            print_table(&["METHOD", "ARGS", "RESULT", "DOC"], rows);
        }
        OutputFormat::Raw => {
            for method in &out.methods {
                println!("{}", method.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summarizes_result_types() {
        assert_eq!(
            type_summary(&TypeDescriptor::Shorthand("integer".into())),
            "integer"
        );
        let schema = json!({ "type": "array", "items": { "type": "integer" } });
        let serde_json::Value::Object(map) = schema else {
            unreachable!()
        };
        assert_eq!(type_summary(&TypeDescriptor::Schema(map)), "array");
    }

    #[test]
    fn method_info_lists_args_in_order() {
        let definition = ServiceDefinition::parse(
            br#"{"name":"I2C","methods":{"Read":{"doc":"Read bytes.","args":{"addr":"integer","len":"integer"},"required_args":["addr"],"result":{"type":"object"}}}}"#,
        )
        .unwrap();
        let info = method_info(&definition, &definition.methods()[0]);
        assert_eq!(info.id, "I2C.Read");
        assert_eq!(info.args, vec!["addr", "len"]);
        assert_eq!(info.required_args, vec!["addr"]);
        assert_eq!(info.result.as_deref(), Some("object"));
        assert_eq!(info.doc, Some("Read bytes."));
    }
}

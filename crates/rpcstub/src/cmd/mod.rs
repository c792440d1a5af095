use std::path::PathBuf;

use clap::{Args, Subcommand};
use rpcstub_schema::config::DEFAULT_MAX_DEFINITION_SIZE;
use rpcstub_schema::{SchemaConfig, ServiceDefinition};

use crate::exit::{schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod methods;
pub mod normalize;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the methods a definition declares.
    Methods(MethodsArgs),
    /// Print the normalized per-method schemas.
    Normalize(NormalizeArgs),
    /// Validate an args or result payload against a method.
    Check(CheckArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Methods(args) => methods::run(args, format),
        Command::Normalize(args) => normalize::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DefinitionArgs {
    /// Service definition file (JSON).
    #[arg(value_name = "DEF", env = "RPCSTUB_DEFINITION")]
    pub definition: PathBuf,
    /// Reject properties an object schema does not declare.
    #[arg(long)]
    pub strict: bool,
    /// Largest definition file accepted, in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_DEFINITION_SIZE)]
    pub max_size: usize,
}

impl DefinitionArgs {
    pub fn config(&self) -> SchemaConfig {
        SchemaConfig {
            strict_mode: self.strict,
            max_definition_size: self.max_size,
        }
    }

    pub fn load(&self) -> CliResult<ServiceDefinition> {
        ServiceDefinition::from_file(&self.definition, &self.config())
            .map_err(|err| schema_error("load definition", err))
    }
}

#[derive(Args, Debug)]
pub struct MethodsArgs {
    #[command(flatten)]
    pub definition: DefinitionArgs,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub definition: DefinitionArgs,
    /// Only print this method.
    #[arg(long, value_name = "METHOD")]
    pub method: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub definition: DefinitionArgs,
    /// Method name, bare (`Read`) or qualified (`I2C.Read`).
    pub method: String,
    /// Arguments payload (JSON).
    #[arg(long, value_name = "JSON", conflicts_with = "result", required_unless_present = "result")]
    pub args: Option<String>,
    /// Result payload (JSON).
    #[arg(long, value_name = "JSON")]
    pub result: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rpcstub", version, about = "Inspect and check RPC service definitions")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "rpcstub",
            "check",
            "i2c.json",
            "Read",
            "--args",
            r#"{"addr":80}"#,
        ])
        .expect("check args should parse");

        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.method, "Read");
        assert!(args.result.is_none());
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "rpcstub", "check", "i2c.json", "Read", "--args", "{}", "--result", "{}",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn check_requires_a_payload() {
        let err = Cli::try_parse_from(["rpcstub", "check", "i2c.json", "Read"])
            .expect_err("missing payload should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_strict_methods() {
        let cli = Cli::try_parse_from(["rpcstub", "methods", "i2c.json", "--strict"])
            .expect("methods args should parse");
        let Command::Methods(args) = cli.command else {
            panic!("expected methods command");
        };
        assert!(args.definition.config().strict_mode);
    }
}

#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cli;
pub mod config;
pub mod openapi;

pub use config::{ConfigError, DEFAULT_CONFIG_FILE, GeneratorConfig};
pub use openapi::{
    DocumentFormat, GenerateOptions, OpenApiSpec, TransformError, TransformOutput, generate,
    generate_transforms,
};

/// Environment variable holding the log level or filter spec
pub const LOG_ENV_VAR: &str = "DATE_CODEGEN_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "date-codegen",
    version,
    about = "Generate TypeScript functions that revive OpenAPI date-time strings as Date objects"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate response transforms from an OpenAPI document
    Generate(cli::generate::GenerateArgs),
}

/// Parse `args` (including the program name) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::generate::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr log subscriber.
pub fn init_tracing() {
    let crate_root = module_path!().to_string();

    // DATE_CODEGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "openapi_date_codegen=debug"
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(level) if is_plain_level(&level) => {
            format!("{crate_root}={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("{crate_root}=info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("openapi_date_codegen=debug"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "date-codegen",
            "generate",
            "--schema",
            "openapi.yaml",
            "--type",
            "Order",
            "--type",
            "Pet",
            "--no-operations",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            unreachable!("generate subcommand expected");
        };
        assert_eq!(args.types, ["Order", "Pet"]);
        assert!(args.no_operations);
        assert!(!args.all_types);
    }

    #[test]
    fn test_unknown_flag_fails() {
        let code = run_cli(vec!["date-codegen".into(), "generate".into(), "--bogus".into()]);
        assert_eq!(code, 2);
    }
}

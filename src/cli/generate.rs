use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::run_cli;
use crate::config::GeneratorConfig;
use crate::openapi::{DocumentFormat, OpenApiSpec, generate_transforms};

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[arg(
        long = "schema",
        value_name = "SCHEMA_FILE",
        help = "OpenAPI document (JSON or YAML). Overrides schema_file from the config"
    )]
    pub schema_file: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "OUTPUT_FILE",
        help = "Where to write the generated TypeScript. Defaults to stdout"
    )]
    pub output_file: Option<PathBuf>,
    #[arg(
        long = "config",
        value_name = "CONFIG_FILE",
        help = "Config file. Defaults to date-codegen.toml in the current directory, if present"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "type",
        value_name = "TYPE_NAME",
        help = "Component type to generate a transform for (repeatable)"
    )]
    pub types: Vec<String>,
    #[arg(long = "all-types", help = "Generate transforms for every component schema")]
    pub all_types: bool,
    #[arg(
        long = "no-operations",
        help = "Skip the per-operation response transforms"
    )]
    pub no_operations: bool,
    #[arg(
        long = "require-all-properties",
        help = "Treat every property as present; only null is checked"
    )]
    pub require_all_properties: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let config = resolve_config(&args)?;

    let schema_file = config
        .schema_file
        .as_deref()
        .ok_or("No schema file given. Pass --schema or set schema_file in the config")?;
    let text = fs::read_to_string(schema_file)
        .map_err(|err| format!("Failed to read {}: {err}", schema_file.display()))?;
    let format = DocumentFormat::from_path(schema_file);
    debug!(
        schema_file = %schema_file.display(),
        ?format,
        "Read OpenAPI document."
    );

    let spec = OpenApiSpec::parse(&text, format).map_err(|err| err.to_string())?;
    let output = generate_transforms(&spec, &config.generate_options()).map_err(|err| err.to_string())?;
    let ts_code = output.render();

    match &config.output_file {
        Some(path) => {
            write_output(path, &ts_code)?;
            info!(
                output_file = %path.display(),
                functions = output.method_functions.len() + output.operation_functions.len(),
                "Wrote date transforms."
            );
        }
        None => print!("{ts_code}"),
    }

    Ok(())
}

/// Config file values, overridden by whatever was passed on the command line.
fn resolve_config(args: &GenerateArgs) -> Result<GeneratorConfig, String> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path),
        None => {
            let cwd = std::env::current_dir()
                .map_err(|err| format!("Failed to determine current directory: {err}"))?;
            GeneratorConfig::discover(&cwd)
        }
    }
    .map_err(|err| err.to_string())?;

    if let Some(schema_file) = &args.schema_file {
        config.schema_file = Some(schema_file.clone());
    }
    if let Some(output_file) = &args.output_file {
        config.output_file = Some(output_file.clone());
    }
    if !args.types.is_empty() {
        config.types = args.types.clone();
    }
    config.all_types |= args.all_types;
    config.require_all_properties |= args.require_all_properties;
    if args.no_operations {
        config.include_operations = false;
    }
    Ok(config)
}

fn write_output(path: &Path, ts_code: &str) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create output directory: {err}"))?;
    }
    fs::write(path, ts_code).map_err(|err| format!("Failed to write {}: {err}", path.display()))
}

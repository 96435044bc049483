//! Speclint CLI
//!
//! Command-line interface for validating OpenAPI documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use speclint::{
    available_validators, common_fields, load_spec_auto, run_validation, CommonFieldRegistry,
    Issue, Severity, ValidateOptions, ValidationRun, ValidatorSelection,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speclint")]
#[command(about = "Rule-based consistency checks for OpenAPI documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an OpenAPI document
    Validate {
        /// Document source: file path or URL (http:// or https://)
        spec: String,

        /// Common field definitions (JSON or YAML)
        #[arg(long, env = "SPECLINT_COMMON_FIELDS")]
        common_fields: Option<PathBuf>,

        /// Report issues at least this severe: error, warning or info
        #[arg(long, default_value = "info")]
        min_severity: Severity,

        /// Validators to run: "all" or a comma separated list of names
        #[arg(long, default_value = "all")]
        validators: String,

        /// Strategy tag echoed into the result
        #[arg(long, default_value = "default")]
        strategy: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// List available validators
    Validators {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the loaded common field definitions
    Fields {
        /// Common field definitions (JSON or YAML)
        #[arg(long, env = "SPECLINT_COMMON_FIELDS")]
        common_fields: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Summary,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            spec,
            common_fields,
            min_severity,
            validators,
            strategy,
            format,
            quiet,
        } => {
            let options = ValidateOptions::new()
                .strategy(strategy)
                .min_severity(min_severity)
                .validators(ValidatorSelection::parse(&validators))
                .file_name(spec.as_str());
            run_validate(&spec, common_fields.as_deref(), &options, format, quiet)
        }
        Commands::Validators { json } => run_validators(json),
        Commands::Fields {
            common_fields,
            json,
        } => run_fields(&common_fields, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("SPECLINT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("speclint=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the registry, degrading to an empty one when the source is unusable.
fn load_registry(path: Option<&Path>) -> CommonFieldRegistry {
    let Some(path) = path else {
        return CommonFieldRegistry::empty();
    };
    CommonFieldRegistry::load(path).unwrap_or_else(|e| {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "ignoring common field definitions"
        );
        CommonFieldRegistry::empty()
    })
}

fn run_validate(
    source: &str,
    common_fields: Option<&Path>,
    options: &ValidateOptions,
    format: Format,
    quiet: bool,
) -> Result<(), u8> {
    let spec = load_spec_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let registry = load_registry(common_fields);

    let run = run_validation(&spec, &registry, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    match format {
        Format::Json => {
            let output = serde_json::to_string_pretty(&run).map_err(|e| {
                eprintln!("Error serializing output: {}", e);
                2u8
            })?;
            println!("{}", output);
        }
        Format::Summary => print_summary(&run),
        Format::Text => print_text(&run, quiet),
    }

    if run.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[36m",
    }
}

fn print_issue(issue: &Issue) {
    println!(
        "  {}{}\x1b[0m [{}] {}: {}",
        severity_color(issue.severity),
        issue.severity,
        issue.validator_name,
        issue.location,
        issue.message
    );
    if let Some(suggestion) = &issue.suggestion {
        println!("      → {}", suggestion);
    }
}

fn print_text(run: &ValidationRun, quiet: bool) {
    if !quiet {
        println!("Validating {} ...\n", run.file);
    }

    for issue in &run.issues {
        if !quiet || issue.severity == Severity::Error {
            print_issue(issue);
        }
    }

    if !run.issues.is_empty() {
        println!();
    }
    print_summary(run);
}

fn print_summary(run: &ValidationRun) {
    let summary = &run.summary;
    if summary.total == 0 {
        println!("\x1b[32m✓ {}: no issues\x1b[0m", run.file);
        return;
    }
    let color = if run.is_ok() { "\x1b[33m" } else { "\x1b[31m" };
    println!(
        "{}{}: {} issue(s): {} error(s), {} warning(s), {} info\x1b[0m",
        color, run.file, summary.total, summary.errors, summary.warnings, summary.info
    );
}

fn run_validators(json: bool) -> Result<(), u8> {
    let validators = available_validators();

    if json {
        let output = serde_json::to_string_pretty(&validators).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
        return Ok(());
    }

    let width = validators.iter().map(|v| v.name.len()).max().unwrap_or(0);
    for validator in &validators {
        println!("{:<width$}  {}", validator.name, validator.description, width = width);
    }
    Ok(())
}

fn run_fields(path: &Path, json: bool) -> Result<(), u8> {
    let registry = CommonFieldRegistry::load(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    let summary = common_fields(&registry);

    if json {
        let output = serde_json::to_string_pretty(&summary).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
        return Ok(());
    }

    println!("{} common field(s)", summary.count);
    for field in &summary.fields {
        let mut line = format!("  {}", field.name);
        if let Some(field_type) = &field.field_type {
            line.push_str(&format!(": {}", field_type));
        }
        if let Some(format) = &field.format {
            line.push_str(&format!(" ({})", format));
        }
        println!("{}", line);
    }
    Ok(())
}

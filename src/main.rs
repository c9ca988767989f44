#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use sharpgen::{GeneratorConfig, generate, write_files};

/// Generate a typed C# API client from a schema document.
#[derive(Parser)]
#[command(name = "sharpgen", version, about)]
struct Cli {
    /// Path to the schema document (JSON).
    schema: PathBuf,

    /// Output directory for the generated sources.
    #[arg(long, default_value = "generated")]
    out_dir: PathBuf,

    /// Optional generator config file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the model namespace.
    #[arg(long)]
    model_namespace: Option<String>,

    /// Override the client namespace.
    #[arg(long)]
    client_namespace: Option<String>,

    /// Exclude an additional top-level operation group (repeatable).
    #[arg(long = "exclude-group")]
    exclude_groups: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(message) => {
            error!("{message}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(ns) = cli.model_namespace {
        config.model_namespace = ns;
    }
    if let Some(ns) = cli.client_namespace {
        config.client_namespace = ns;
    }
    config.excluded_groups.extend(cli.exclude_groups);

    let json = match fs::read_to_string(&cli.schema) {
        Ok(json) => json,
        Err(err) => {
            error!("failed to read {}: {err}", cli.schema.display());
            return ExitCode::FAILURE;
        }
    };

    let generation = match generate(&json, &config) {
        Ok(generation) => generation,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    for failure in &generation.failures {
        warn!(unit = failure.unit.as_str(), "skipped: {}", failure.error);
    }

    if let Err(err) = write_files(&cli.out_dir, &generation.files) {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    println!(
        "Generated {} files into {} ({} units skipped)",
        generation.files.len(),
        cli.out_dir.display(),
        generation.failures.len()
    );
    ExitCode::SUCCESS
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig, String> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse config {}: {err}", path.display()))
}

fn init_tracing() {
    // SHARPGEN_LOG controls log level: "trace", "debug", "info", "warn",
    // "error", or a full tracing filter spec like "sharpgen=debug".
    let filter = match std::env::var("SHARPGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("sharpgen={level}"),
        Ok(spec) => spec,
        Err(_) => "sharpgen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
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

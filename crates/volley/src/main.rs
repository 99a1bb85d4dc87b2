//! Volley CLI
//!
//! Runs YAML-described HTTP requests and validates responses against their
//! `expect:` blocks.
//!
//! Usage:
//!   volley <PATH>... [OPTIONS]

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use volley::config::{ExecutionMode, OutputFormat};
use volley::{discover_files, output, resolve_requests, RunFile, Runner};

/// Volley - YAML-driven HTTP request runner
#[derive(Parser, Debug)]
#[command(name = "volley")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run files or directories containing run files (.yaml/.yml)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Run all requests in parallel, overriding the files' execution mode
    #[arg(short, long)]
    parallel: bool,

    /// Output format: pretty (default), json, raw
    #[arg(short, long, env = "VOLLEY_OUTPUT")]
    output: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Keep going after a failed request in sequential mode
    #[arg(long)]
    continue_on_error: bool,

    /// Save the JSON report to this file
    #[arg(long, value_name = "FILE", env = "VOLLEY_SAVE")]
    save: Option<String>,

    /// Suppress terminal output (exit code and --save still apply)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,volley=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format_override = match args.output.as_deref() {
        None => None,
        Some("pretty") => Some(OutputFormat::Pretty),
        Some("json") => Some(OutputFormat::Json),
        Some("raw") => Some(OutputFormat::Raw),
        Some(other) => anyhow::bail!("unknown output format '{other}' (expected pretty, json or raw)"),
    };

    let mut files = Vec::new();
    for path in &args.paths {
        files.extend(discover_files(path));
    }
    if files.is_empty() {
        anyhow::bail!("no .yaml/.yml run files found under the given paths");
    }

    let runner = Runner::new().context("failed to build HTTP client")?;
    let mut any_failed = false;

    for file in &files {
        let run_file = RunFile::from_file(file)?;
        let requests = resolve_requests(&run_file)?;
        let global = run_file.global();

        let mode = if args.parallel {
            ExecutionMode::Parallel
        } else {
            global.execution
        };
        let continue_on_error = args.continue_on_error || global.continue_on_error;

        let mut settings = global.output.clone();
        if let Some(format) = format_override {
            settings.format = format;
        }
        if args.verbose {
            settings.verbose = true;
        }
        if let Some(save) = &args.save {
            settings.save_to_file = Some(save.clone());
        }

        let outcomes = runner.run_all(&requests, mode, continue_on_error).await;
        any_failed |= outcomes.iter().any(|outcome| !outcome.succeeded());

        if args.quiet {
            if let Some(path) = &settings.save_to_file {
                output::save_report(&outcomes, path);
            }
        } else {
            output::render(&outcomes, &settings);
        }
    }

    if any_failed {
        std::process::exit(1);
    }
    Ok(())
}

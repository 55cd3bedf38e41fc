//! Cost plan diagnosis CLI
//!
//! A command-line tool that diagnoses a workload profile against the playbook
//! rule catalog and prints a ranked, phased cost-optimization plan.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diagnosis_lib::{
    EngineMetrics, OutputFormat, RenderError, StructuredLogger, ValidationError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{batch, catalog, diagnose, Session};

/// Exit status for rejected input (validation or unsupported format)
const EXIT_INVALID_INPUT: u8 = 2;
/// Exit status for catalog and other fatal errors
const EXIT_FAILURE: u8 = 1;

/// Cost plan diagnosis
#[derive(Parser)]
#[command(name = "costplan")]
#[command(author, version, about = "Diagnose cloud and software cost plans", long_about = None)]
pub struct Cli {
    /// Rule catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, short, global = true)]
    pub format: Option<String>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    pub emit_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose one workload profile
    Diagnose(diagnose::DiagnoseArgs),

    /// Diagnose a JSON array of profiles concurrently
    Batch {
        /// JSON file holding an array of profiles
        #[arg(long, short, value_name = "FILE")]
        input: PathBuf,
    },

    /// Show the loaded rule catalog
    Catalog,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;
    init_tracing(cli.verbose, config.log_json);

    let format: OutputFormat = cli
        .format
        .as_deref()
        .or(config.default_format.as_deref())
        .unwrap_or("text")
        .parse()?;

    let logger = StructuredLogger::new(command_name(&cli.command));
    let catalog_path = cli.catalog.clone().or(config.catalog_path.clone());
    let session = Session {
        catalog: commands::load_catalog(catalog_path.as_deref(), &logger)?,
        format,
        batch_concurrency: config.batch_concurrency,
        metrics: EngineMetrics::new(),
        logger,
    };

    let result = match &cli.command {
        Commands::Diagnose(args) => diagnose::run(&session, args),
        Commands::Batch { input } => batch::run(&session, input).await,
        Commands::Catalog => catalog::run(&session),
    };

    if cli.emit_metrics {
        let text = session
            .metrics
            .encode_text()
            .context("Failed to encode metrics")?;
        eprint!("{}", text);
    }

    result
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Diagnose(_) => "diagnose",
        Commands::Batch { .. } => "batch",
        Commands::Catalog => "catalog",
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ValidationError>().is_some() {
        return EXIT_INVALID_INPUT;
    }
    match err.downcast_ref::<RenderError>() {
        Some(RenderError::UnsupportedFormat(_)) => EXIT_INVALID_INPUT,
        _ => EXIT_FAILURE,
    }
}

// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Flowdeck CLI - n8n workflow caching and fetching from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Register an instance
//! flowdeck instance add https://flows.example.com --api-key n8n_api_...
//!
//! # Fetch workflows for the selected instance (cache permitting)
//! flowdeck
//!
//! # Force a refresh
//! flowdeck fetch --refresh
//!
//! # Verify connectivity and credential
//! flowdeck check
//!
//! # JSON output
//! flowdeck --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{cache, fetch, instance};
use output::{CheckOutput, JsonFormatter, TextFormatter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Flowdeck CLI - cached access to n8n workflow instances.
#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(about = "n8n workflow caching and fetching CLI")]
#[command(long_about = r#"
Flowdeck keeps a local, per-instance cache of n8n workflow collections.

Fetches are served from the cache while fresh (5 minutes by default) and
hit the remote API on a miss or forced refresh. Instance profiles live in
the config directory; the cache mirror lives in the cache directory and
survives restarts.

Examples:
  flowdeck instance add https://flows.example.com --api-key KEY
  flowdeck instance select <id>
  flowdeck                       # Fetch for the selected instance
  flowdeck fetch --refresh       # Bypass and rebuild the cache
  flowdeck check                 # Probe reachability and credential
  flowdeck cache clear           # Drop every cached collection
"#)]
#[command(version)]
#[command(author = "Flowdeck Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'fetch' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the workflow collection (default if no command specified).
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),

    /// Manage instance profiles.
    #[command(visible_alias = "i")]
    Instance(instance::InstanceArgs),

    /// Check that an instance is reachable and its credential accepted.
    Check(CheckArgs),

    /// Inspect or clear the workflow cache.
    Cache(cache::CacheArgs),
}

/// Arguments for the check command.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Instance to check (defaults to the selected one).
    #[arg(long, short)]
    pub instance: Option<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Instance not found or not configured.
    InstanceMissing = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("flowdeck=debug,info")
    } else {
        EnvFilter::new("flowdeck=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Fetch(args)) => fetch::run(args, &cli).await,
        Some(Commands::Instance(args)) => instance::run(args, &cli).await,
        Some(Commands::Check(args)) => run_check(args, &cli).await,
        Some(Commands::Cache(args)) => cache::run(args, &cli).await,
        None => {
            // Default to fetching for the selected instance
            fetch::run(&fetch::FetchArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}

/// Runs the check command.
async fn run_check(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let service = commands::build_service().await?;
    let id = commands::resolve_instance_id(&service, args.instance.as_deref()).await?;

    let outcome = service.test_connection(&id).await?;
    let output = CheckOutput {
        ok: true,
        instance_id: id,
        workflow_count: outcome.workflow_count,
        response_time_ms: outcome.response_time_ms,
    };

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.no_color);
            println!("{}", formatter.check(&output));
        }
    }

    Ok(())
}

//! Cache command - inspect or clear the workflow cache.

use anyhow::Result;
use clap::{Args, Subcommand};
use flowdeck_store::{default_mirror_path, default_registry_path};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheAction {
    /// Drop cached workflow collections.
    Clear {
        /// Only drop the entry for this instance.
        #[arg(long, short)]
        instance: Option<String>,
    },

    /// Show storage paths.
    Path,
}

/// Runs the cache command.
pub async fn run(args: &CacheArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        CacheAction::Clear { instance } => clear(instance.as_deref()).await,
        CacheAction::Path => show_paths(cli),
    }
}

async fn clear(instance: Option<&str>) -> Result<()> {
    let service = super::build_service().await?;
    service.invalidate_cache(instance).await;

    match instance {
        Some(id) => {
            info!(id = %id, "Cache entry cleared");
            println!("Cleared cache for instance: {id}");
        }
        None => {
            info!("Cache cleared");
            println!("Cleared the workflow cache");
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let registry_path = default_registry_path();
    let mirror_path = default_mirror_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Storage Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Instances file: {}", registry_path.display());
            println!("Cache mirror:   {}", mirror_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "instancesFile": registry_path.display().to_string(),
                "cacheMirror": mirror_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

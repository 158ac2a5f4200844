//! Instance command - manage instance profiles.

use anyhow::Result;
use clap::{Args, Subcommand};
use flowdeck_core::InstanceDraft;
use tracing::info;

use crate::output::{InstanceOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the instance command.
#[derive(Args)]
pub struct InstanceArgs {
    #[command(subcommand)]
    pub action: InstanceAction,
}

/// Instance subcommands.
#[derive(Subcommand)]
pub enum InstanceAction {
    /// Register a new instance, or update one with --id.
    Add {
        /// Any URL within the instance; its origin becomes the base URL.
        url: String,

        /// API key for the instance's REST API.
        #[arg(long)]
        api_key: String,

        /// Display name (auto-generated if omitted).
        #[arg(long)]
        name: Option<String>,

        /// Existing profile id to update.
        #[arg(long)]
        id: Option<String>,
    },

    /// List configured instances.
    List,

    /// Show the instance owning a URL's origin.
    Resolve {
        /// Any URL within the instance.
        url: String,
    },

    /// Remove an instance and its cached workflows.
    Remove {
        /// Profile id to remove.
        id: String,
    },

    /// Select the default instance for fetch and check.
    Select {
        /// Profile id to select, or omit with --clear.
        id: Option<String>,

        /// Clear the selection instead.
        #[arg(long)]
        clear: bool,
    },
}

/// Runs the instance command.
pub async fn run(args: &InstanceArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        InstanceAction::Add {
            url,
            api_key,
            name,
            id,
        } => add(url, api_key, name.clone(), id.clone(), cli).await,
        InstanceAction::List => list(cli).await,
        InstanceAction::Resolve { url } => resolve(url, cli).await,
        InstanceAction::Remove { id } => remove(id, cli).await,
        InstanceAction::Select { id, clear } => select(id.clone(), *clear).await,
    }
}

async fn add(
    url: &str,
    api_key: &str,
    name: Option<String>,
    id: Option<String>,
    cli: &Cli,
) -> Result<()> {
    let service = super::build_service().await?;

    let saved_id = service
        .save_instance(InstanceDraft {
            id,
            name,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
        .await?;

    info!(id = %saved_id, "Instance saved");
    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(&serde_json::json!({ "instanceId": saved_id }))?
            );
        }
        OutputFormat::Text => println!("Saved instance: {saved_id}"),
    }

    Ok(())
}

async fn list(cli: &Cli) -> Result<()> {
    let service = super::build_service().await?;

    let instances = service.get_all_instances().await?;
    let selected = service.selected_instance_id().await?;

    let mut outputs: Vec<InstanceOutput> = instances
        .values()
        .map(|profile| InstanceOutput::new(profile, selected.as_deref()))
        .collect();
    outputs.sort_by(|a, b| a.name.cmp(&b.name));

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&outputs)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.no_color);
            println!("{}", formatter.instances(&outputs));
        }
    }

    Ok(())
}

async fn resolve(url: &str, cli: &Cli) -> Result<()> {
    let service = super::build_service().await?;

    let Some(profile) = service.get_instance_by_origin(url).await? else {
        anyhow::bail!("No instance configured for the origin of: {url}");
    };

    let selected = service.selected_instance_id().await?;
    let output = InstanceOutput::new(&profile, selected.as_deref());

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.no_color);
            println!("{}", formatter.instances(std::slice::from_ref(&output)));
        }
    }

    Ok(())
}

async fn remove(id: &str, _cli: &Cli) -> Result<()> {
    let service = super::build_service().await?;

    service.delete_instance(id).await?;

    info!(id = %id, "Instance removed");
    println!("Removed instance: {id}");

    Ok(())
}

async fn select(id: Option<String>, clear: bool) -> Result<()> {
    let service = super::build_service().await?;

    if clear {
        service.set_selected_instance(None).await?;
        println!("Selection cleared");
        return Ok(());
    }

    let Some(id) = id else {
        anyhow::bail!("Pass an instance id to select, or --clear to unset");
    };

    service.set_selected_instance(Some(id.clone())).await?;
    println!("Selected instance: {id}");

    Ok(())
}

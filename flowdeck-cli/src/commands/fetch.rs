//! Fetch command - the workflow collection for one instance.

use anyhow::Result;
use clap::Args;

use crate::output::{JsonFormatter, TextFormatter, WorkflowListOutput};
use crate::{Cli, OutputFormat};

/// Arguments for the fetch command.
#[derive(Args, Default)]
pub struct FetchArgs {
    /// Instance to fetch for (defaults to the selected one).
    #[arg(long, short)]
    pub instance: Option<String>,

    /// Invalidate the cache entry and fetch from the remote.
    #[arg(long, short)]
    pub refresh: bool,
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, cli: &Cli) -> Result<()> {
    let service = super::build_service().await?;
    let id = super::resolve_instance_id(&service, args.instance.as_deref()).await?;

    let outcome = if args.refresh {
        service.refresh_workflows(&id).await?
    } else {
        service.fetch_workflows(&id, false).await?
    };

    let output = WorkflowListOutput::new(&id, &outcome);

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.no_color);
            println!("{}", formatter.workflows(&output));
        }
    }

    Ok(())
}

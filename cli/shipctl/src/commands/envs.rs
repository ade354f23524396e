//! Environment commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::models::Environment;
use crate::output::{display_option, print_output, print_single, OutputFormat};
use crate::resolve::{list_environments, resolve_organization, resolve_project};

use super::CommandContext;

/// Environment commands.
#[derive(Debug, Args)]
pub struct EnvironmentCommand {
    #[command(subcommand)]
    command: EnvironmentSubcommand,
}

#[derive(Debug, Subcommand)]
enum EnvironmentSubcommand {
    /// List environments in a project.
    List,
}

impl EnvironmentCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            EnvironmentSubcommand::List => list(ctx).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct EnvironmentRow {
    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Mode", display = "display_option")]
    mode: Option<String>,

    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Environment> for EnvironmentRow {
    fn from(env: &Environment) -> Self {
        Self {
            name: env.name.clone(),
            mode: env.mode.clone(),
            status: env
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

async fn list(ctx: CommandContext) -> Result<()> {
    let client = ctx.authenticated_client()?;
    let org = resolve_organization(&client, ctx.require_organization()?).await?;
    let project = resolve_project(&client, &org.id, ctx.require_project()?).await?;
    let environments = list_environments(&client, &project.id).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<EnvironmentRow> =
                environments.iter().map(EnvironmentRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&environments, ctx.format),
    }
    Ok(())
}

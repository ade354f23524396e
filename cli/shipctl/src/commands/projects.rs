//! Project commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::models::Project;
use crate::output::{display_option, print_output, print_single, OutputFormat};
use crate::resolve::{list_projects, resolve_organization};

use super::CommandContext;

/// Project commands.
#[derive(Debug, Args)]
pub struct ProjectCommand {
    #[command(subcommand)]
    command: ProjectSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProjectSubcommand {
    /// List projects in an organization.
    List,
}

impl ProjectCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ProjectSubcommand::List => list(ctx).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Description", display = "display_option")]
    description: Option<String>,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            id: project.id.to_string(),
            description: project.description.clone(),
        }
    }
}

async fn list(ctx: CommandContext) -> Result<()> {
    let client = ctx.authenticated_client()?;
    let org = resolve_organization(&client, ctx.require_organization()?).await?;
    let projects = list_projects(&client, &org.id).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ProjectRow> = projects.iter().map(ProjectRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&projects, ctx.format),
    }

    Ok(())
}

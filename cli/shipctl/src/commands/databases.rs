//! Database commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::models::Database;
use crate::output::{display_option, print_output, print_single, OutputFormat};
use crate::resolve::{list_branch_databases, resolve_organization, resolve_project};

use super::CommandContext;

/// Database commands.
#[derive(Debug, Args)]
pub struct DatabaseCommand {
    #[command(subcommand)]
    command: DatabaseSubcommand,
}

#[derive(Debug, Subcommand)]
enum DatabaseSubcommand {
    /// List databases attached to a project branch.
    ///
    /// With no flags, the project comes from .ship.toml and the branch from
    /// the current git checkout.
    List(ListDatabasesArgs),
}

#[derive(Debug, Args)]
struct ListDatabasesArgs {
    /// Branch name (defaults to the current git branch).
    #[arg(short, long)]
    branch: Option<String>,

    /// Show passwords instead of masking them.
    #[arg(long)]
    show_credentials: bool,
}

impl DatabaseCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            DatabaseSubcommand::List(args) => list(ctx, args).await,
        }
    }
}

const MASK: &str = "********";

/// Table row for a database.
#[derive(Debug, Serialize, Tabled)]
struct DatabaseRow {
    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Type")]
    kind: String,

    #[tabled(rename = "Version", display = "display_option")]
    version: Option<String>,

    #[tabled(rename = "Endpoint", display = "display_option")]
    endpoint: Option<String>,

    #[tabled(rename = "Port", display = "display_option")]
    port: Option<String>,

    #[tabled(rename = "Username", display = "display_option")]
    username: Option<String>,

    #[tabled(rename = "Password", display = "display_option")]
    password: Option<String>,

    #[tabled(rename = "Application")]
    application: String,
}

impl DatabaseRow {
    fn new(db: &Database, show_credentials: bool) -> Self {
        let mask = |value: &Option<String>| {
            if show_credentials {
                value.clone()
            } else {
                value.as_ref().map(|_| MASK.to_string())
            }
        };

        Self {
            name: db.name.clone(),
            status: db
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            kind: db.kind.clone(),
            version: db.version.clone(),
            endpoint: db.fqdn.clone(),
            port: db.port.map(|p| p.to_string()),
            username: db.username.clone(),
            password: mask(&db.password),
            application: db
                .application
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "none".to_string()),
        }
    }
}

async fn list(ctx: CommandContext, args: ListDatabasesArgs) -> Result<()> {
    let (Some(project), Some(branch)) = (
        ctx.resolve_project(),
        ctx.resolve_branch(args.branch.as_deref()),
    ) else {
        println!("The current directory is not a ship project (-h for help)");
        return Ok(());
    };

    let client = ctx.authenticated_client()?;
    let org = resolve_organization(&client, ctx.require_organization()?).await?;
    let project = resolve_project(&client, &org.id, project).await?;
    let databases = list_branch_databases(&client, &project.id, branch).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<DatabaseRow> = databases
                .iter()
                .map(|db| DatabaseRow::new(db, args.show_credentials))
                .collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&databases, ctx.format),
    }
    Ok(())
}

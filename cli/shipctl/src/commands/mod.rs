//! CLI commands.

pub mod apps;
mod auth;
mod context;
mod databases;
mod envs;
mod projects;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::ApiClient;
use crate::config::{Config, Credentials};
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::project::LocalContext;

/// ship - Deploy and manage applications on the platform.
#[derive(Debug, Parser)]
#[command(name = "ship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Organization name.
    #[arg(long, global = true, env = "SHIP_ORGANIZATION")]
    organization: Option<String>,

    /// Project name.
    #[arg(long, global = true, env = "SHIP_PROJECT")]
    project: Option<String>,

    /// Environment name.
    #[arg(long, global = true, env = "SHIP_ENVIRONMENT")]
    environment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Authenticate with the platform.
    Auth(auth::AuthCommand),

    /// Show, set or clear saved CLI context.
    Context(context::ContextCommand),

    /// Manage projects.
    Project(projects::ProjectCommand),

    /// Manage environments.
    Environment(envs::EnvironmentCommand),

    /// Manage applications.
    Application(apps::ApplicationCommand),

    /// Manage databases.
    Database(databases::DatabaseCommand),

    /// Show CLI version.
    Version,
}

impl Commands {
    /// Whether the command reads defaults from `.ship.toml` and git.
    fn uses_local_context(&self) -> bool {
        !matches!(self, Commands::Auth(_) | Commands::Version)
    }
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        if let Commands::Version = self.command {
            println!("ship {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        let config = Config::load()?;
        let credentials = Credentials::load()?;
        let local = if self.command.uses_local_context() {
            LocalContext::discover(&std::env::current_dir()?)?
        } else {
            LocalContext::default()
        };

        let ctx = CommandContext {
            config,
            credentials,
            local,
            format: self.format,
            organization: self.organization,
            project: self.project,
            environment: self.environment,
        };

        match self.command {
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Context(cmd) => cmd.run(ctx).await,
            Commands::Project(cmd) => cmd.run(ctx).await,
            Commands::Environment(cmd) => cmd.run(ctx).await,
            Commands::Application(cmd) => cmd.run(ctx).await,
            Commands::Database(cmd) => cmd.run(ctx).await,
            Commands::Version => Ok(()),
        }
    }
}

/// Shared command context.
///
/// Everything a handler needs is carried here explicitly: flags, saved
/// configuration, credentials and what was discovered in the working tree.
pub struct CommandContext {
    pub config: Config,
    pub credentials: Option<Credentials>,
    pub local: LocalContext,
    pub format: OutputFormat,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub environment: Option<String>,
}

impl CommandContext {
    /// Get an API client, failing before any request if not logged in.
    pub fn authenticated_client(&self) -> Result<ApiClient> {
        match self.credentials.as_ref() {
            Some(creds) if !creds.is_expired() => ApiClient::new(&self.config, Some(creds)),
            _ => Err(CliError::NotAuthenticated.into()),
        }
    }

    /// Resolve the organization: flag, then project file, then saved context.
    pub fn resolve_organization(&self) -> Option<&str> {
        self.organization
            .as_deref()
            .or(self.local.organization())
            .or(self.config.context.organization.as_deref())
    }

    /// Resolve the project: flag, then project file, then saved context.
    pub fn resolve_project(&self) -> Option<&str> {
        self.project
            .as_deref()
            .or(self.local.project())
            .or(self.config.context.project.as_deref())
    }

    /// Resolve the environment: flag, project file, saved context, then the
    /// current git branch.
    pub fn resolve_environment(&self) -> Option<&str> {
        self.environment
            .as_deref()
            .or(self.local.environment())
            .or(self.config.context.environment.as_deref())
            .or(self.local.branch.as_deref())
    }

    /// Resolve the branch: explicit value, then the current git branch.
    pub fn resolve_branch<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.local.branch.as_deref())
    }

    /// Require an organization to be specified.
    pub fn require_organization(&self) -> Result<&str> {
        self.resolve_organization().ok_or_else(|| {
            anyhow::anyhow!(
                "No organization specified. Use --organization, a .ship.toml file, or `ship context set`."
            )
        })
    }

    /// Require a project to be specified.
    pub fn require_project(&self) -> Result<&str> {
        self.resolve_project().ok_or_else(|| {
            anyhow::anyhow!(
                "No project specified. Use --project, a .ship.toml file, or `ship context set`."
            )
        })
    }

    /// Require an environment to be specified.
    pub fn require_environment(&self) -> Result<&str> {
        self.resolve_environment().ok_or_else(|| {
            anyhow::anyhow!(
                "No environment specified. Use --environment, a .ship.toml file, or check out a git branch."
            )
        })
    }
}

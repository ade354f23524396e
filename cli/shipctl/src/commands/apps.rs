//! Application commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use ship_id::ApplicationId;
use tabled::Tabled;
use tracing::info;

use crate::client::ApiClient;
use crate::edit::{
    build_edit_request, edit_application, ApplicationEditRequest, ApplicationOverrides,
};
use crate::error::CliError;
use crate::gate::ensure_terminal_state;
use crate::models::{Application, Named};
use crate::output::{
    display_count, display_option, print_info, print_output, print_receipt, print_single,
    OutputFormat, Receipt, ReceiptNextStep,
};
use crate::resolve::{
    find_by_name, get_application, list_applications, list_branch_applications,
    resolve_environment_chain, resolve_organization, resolve_project,
};

use super::CommandContext;

/// Application commands.
#[derive(Debug, Args)]
pub struct ApplicationCommand {
    #[command(subcommand)]
    command: ApplicationSubcommand,
}

#[derive(Debug, Subcommand)]
enum ApplicationSubcommand {
    /// List applications deployed from a project branch.
    List(ListApplicationsArgs),

    /// Get application details.
    Get(GetApplicationArgs),

    /// Update an application.
    Update(UpdateApplicationArgs),
}

#[derive(Debug, Args)]
struct ListApplicationsArgs {
    /// Branch name (defaults to the current git branch).
    #[arg(short, long)]
    branch: Option<String>,
}

#[derive(Debug, Args)]
struct GetApplicationArgs {
    /// Application name (defaults to the name in .ship.toml).
    #[arg(short = 'n', long = "application")]
    application: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateApplicationArgs {
    /// Application name.
    #[arg(short = 'n', long = "application", required = true)]
    application: String,

    /// Application git branch.
    #[arg(long)]
    branch: Option<String>,

    /// Path of the application inside the git repository.
    #[arg(long)]
    root_path: Option<String>,

    /// New application name.
    #[arg(long)]
    rename: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// CPU in millicores.
    #[arg(long)]
    cpu: Option<u32>,

    /// Memory in MB.
    #[arg(long)]
    memory: Option<u32>,

    #[arg(long)]
    min_instances: Option<u32>,

    #[arg(long)]
    max_instances: Option<u32>,

    /// Enable or disable preview environments.
    #[arg(long)]
    auto_preview: Option<bool>,
}

impl UpdateApplicationArgs {
    fn overrides(&self) -> ApplicationOverrides {
        ApplicationOverrides {
            name: self.rename.clone(),
            description: self.description.clone(),
            branch: self.branch.clone(),
            root_path: self.root_path.clone(),
            cpu: self.cpu,
            memory: self.memory,
            min_running_instances: self.min_instances,
            max_running_instances: self.max_instances,
            auto_preview: self.auto_preview,
        }
    }
}

impl ApplicationCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ApplicationSubcommand::List(args) => list(ctx, args).await,
            ApplicationSubcommand::Get(args) => get(ctx, args).await,
            ApplicationSubcommand::Update(args) => update(ctx, args).await,
        }
    }
}

/// Table row for an application.
#[derive(Debug, Serialize, Tabled)]
struct ApplicationRow {
    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Endpoint", display = "display_option")]
    connection_uri: Option<String>,

    #[tabled(rename = "Databases", display = "display_count")]
    total_databases: Option<u32>,

    #[tabled(rename = "Brokers", display = "display_count")]
    total_brokers: Option<u32>,

    #[tabled(rename = "Storage", display = "display_count")]
    total_storage: Option<u32>,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            status: app
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            connection_uri: app.connection_uri.clone(),
            total_databases: app.total_databases,
            total_brokers: app.total_brokers,
            total_storage: app.total_storage,
        }
    }
}

/// List applications on a project branch.
async fn list(ctx: CommandContext, args: ListApplicationsArgs) -> Result<()> {
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
    let apps = list_branch_applications(&client, &project.id, branch).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ApplicationRow> = apps.iter().map(ApplicationRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&apps, ctx.format),
    }
    Ok(())
}

/// Show one application.
async fn get(ctx: CommandContext, args: GetApplicationArgs) -> Result<()> {
    let name = args
        .application
        .as_deref()
        .or(ctx.local.application_name())
        .ok_or_else(|| anyhow::anyhow!("No application specified. Use -n/--application."))?;

    let client = ctx.authenticated_client()?;
    let chain = resolve_environment_chain(
        &client,
        ctx.require_organization()?,
        ctx.require_project()?,
        ctx.require_environment()?,
    )
    .await?;

    let apps = list_applications(&client, &chain.env_id).await?;
    let found = find_by_name(&apps, name)
        .ok_or_else(|| CliError::not_found(Application::KIND, name))?;
    let application = get_application(&client, &found.id).await?;

    print_single(&application, ctx.format);
    Ok(())
}

/// Names identifying the application to update.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationTarget<'a> {
    pub organization: &'a str,
    pub project: &'a str,
    pub environment: &'a str,
    pub application: &'a str,
}

/// Result of a successful application update.
#[derive(Debug, Clone)]
pub struct UpdatedApplication {
    pub id: ApplicationId,
    /// The replacement that was submitted.
    pub request: ApplicationEditRequest,
    /// The application echoed back by the platform, if it sent one.
    pub application: Option<Application>,
}

impl UpdatedApplication {
    pub fn name(&self) -> &str {
        self.application
            .as_ref()
            .map_or(self.request.name.as_str(), |app| app.name.as_str())
    }
}

/// Resolve, gate, read, merge and replace an application.
///
/// Each step depends on the previous one and the first failure aborts the
/// whole update: no edit request is built unless the environment is in a
/// terminal state and the application exists.
pub async fn update_application(
    client: &ApiClient,
    target: ApplicationTarget<'_>,
    overrides: &ApplicationOverrides,
) -> Result<UpdatedApplication> {
    let chain = resolve_environment_chain(
        client,
        target.organization,
        target.project,
        target.environment,
    )
    .await?;

    ensure_terminal_state(client, &chain.env_id).await?;

    let applications = list_applications(client, &chain.env_id).await?;
    let current = find_by_name(&applications, target.application)
        .ok_or_else(|| CliError::not_found(Application::KIND, target.application))?;

    overrides.validate(current)?;
    let request = build_edit_request(current, overrides);

    info!(application_id = %current.id, "submitting application edit");
    let application = edit_application(client, &current.id, &request).await?;

    Ok(UpdatedApplication {
        id: current.id.clone(),
        request,
        application,
    })
}

async fn update(ctx: CommandContext, args: UpdateApplicationArgs) -> Result<()> {
    let client = ctx.authenticated_client()?;
    let overrides = args.overrides();
    if overrides.is_empty() {
        print_info("No changes requested; re-submitting the current configuration.");
    }

    let target = ApplicationTarget {
        organization: ctx.require_organization()?,
        project: ctx.require_project()?,
        environment: ctx.require_environment()?,
        application: &args.application,
    };

    let updated = update_application(&client, target, &overrides).await?;

    let next = vec![ReceiptNextStep {
        label: "Next",
        cmd: format!("ship application get -n {}", updated.name()),
    }];

    let resource = match &updated.application {
        Some(app) => serde_json::to_value(app)?,
        None => serde_json::to_value(&updated.request)?,
    };

    print_receipt(
        ctx.format,
        Receipt {
            message: format!("Application {} updated!", args.application.blue()),
            status: "accepted",
            kind: "application.update",
            resource_key: "application",
            resource: &resource,
            ids: serde_json::json!({ "application_id": updated.id }),
            next: &next,
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_marks_missing_totals() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "name": "web",
            "status": { "state": "RUNNING" },
            "total_databases": 0
        }))
        .unwrap();
        let row = ApplicationRow::from(&app);
        assert_eq!(row.status, "RUNNING");
        assert_eq!(display_count(&row.total_databases), "0");
        assert_eq!(display_count(&row.total_brokers), "-");
    }

    #[test]
    fn updated_name_falls_back_to_submitted_request() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "name": "web"
        }))
        .unwrap();
        let overrides = ApplicationOverrides {
            name: Some("web-v2".to_string()),
            ..Default::default()
        };
        let mut updated = UpdatedApplication {
            id: app.id.clone(),
            request: build_edit_request(&app, &overrides),
            application: None,
        };
        assert_eq!(updated.name(), "web-v2");

        updated.application = Some(app);
        assert_eq!(updated.name(), "web");
    }

    #[test]
    fn update_args_map_to_overrides() {
        let args = UpdateApplicationArgs {
            application: "web".to_string(),
            branch: Some("release".to_string()),
            root_path: None,
            rename: None,
            description: None,
            cpu: Some(250),
            memory: None,
            min_instances: None,
            max_instances: Some(4),
            auto_preview: None,
        };
        let overrides = args.overrides();
        assert_eq!(overrides.branch.as_deref(), Some("release"));
        assert_eq!(overrides.cpu, Some(250));
        assert_eq!(overrides.max_running_instances, Some(4));
        assert!(overrides.name.is_none());
    }
}

//! Context commands (saved defaults for organization, project and environment).

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{print_info, print_single, print_success, OutputFormat};

use super::CommandContext;

/// Manage saved CLI context.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the saved context and what the current directory resolves to.
    Show,

    /// Save --organization, --project and --environment as defaults.
    Set,

    /// Clear the saved context.
    Clear,
}

#[derive(Debug, Serialize)]
struct ContextView<'a> {
    api_url: &'a str,
    organization: Option<&'a str>,
    project: Option<&'a str>,
    environment: Option<&'a str>,
    branch: Option<&'a str>,
}

impl ContextCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(&ctx),
            ContextSubcommand::Set => set(ctx),
            ContextSubcommand::Clear => clear(ctx),
        }
    }
}

fn show(ctx: &CommandContext) -> Result<()> {
    let view = ContextView {
        api_url: ctx.config.api_url(),
        organization: ctx.resolve_organization(),
        project: ctx.resolve_project(),
        environment: ctx.resolve_environment(),
        branch: ctx.local.branch.as_deref(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view, ctx.format),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("organization: {}", view.organization.unwrap_or("-"));
            println!("project: {}", view.project.unwrap_or("-"));
            println!("environment: {}", view.environment.unwrap_or("-"));
            println!("branch: {}", view.branch.unwrap_or("-"));
        }
    }

    Ok(())
}

fn set(mut ctx: CommandContext) -> Result<()> {
    if ctx.organization.is_none() && ctx.project.is_none() && ctx.environment.is_none() {
        print_info("Nothing to save. Pass --organization, --project or --environment.");
        return Ok(());
    }

    let saved = &mut ctx.config.context;
    if let Some(org) = ctx.organization.take() {
        saved.organization = Some(org);
    }
    if let Some(project) = ctx.project.take() {
        saved.project = Some(project);
    }
    if let Some(env) = ctx.environment.take() {
        saved.environment = Some(env);
    }
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&ctx.config.context, ctx.format),
        OutputFormat::Table => print_success("Saved context"),
    }

    Ok(())
}

fn clear(mut ctx: CommandContext) -> Result<()> {
    ctx.config.context = Default::default();
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true }), ctx.format),
        OutputFormat::Table => print_success("Cleared saved context"),
    }

    Ok(())
}

//! Authentication commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::client::ApiClient;
use crate::config::Credentials;
use crate::models::Account;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Store an API token after checking it against the platform.
    Login(LoginArgs),

    /// Remove stored credentials.
    Logout,

    /// Show current authentication status.
    Status,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// API token.
    #[arg(long, env = "SHIP_TOKEN", hide_env_values = true)]
    token: String,

    /// Authorization scheme sent with the token.
    #[arg(long, default_value = "Bearer")]
    token_type: String,
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(),
            AuthSubcommand::Status => status(ctx),
        }
    }
}

async fn login(ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let mut creds = Credentials::new(args.token.trim().to_string(), args.token_type);

    // A rejected token surfaces as NotAuthenticated before anything is written.
    let client = ApiClient::new(&ctx.config, Some(&creds))?;
    let account: Account = client.get("/account").await?;
    creds.account_id = Some(account.id.clone());
    creds.email = account.email.clone();

    creds.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&account, ctx.format),
        OutputFormat::Table => {
            let who = account.email.as_deref().unwrap_or(&account.id);
            print_success(&format!("Logged in as {}", who.cyan()));
        }
    }
    Ok(())
}

fn logout() -> Result<()> {
    Credentials::delete()?;
    print_success("Logged out successfully.");
    Ok(())
}

fn status(ctx: CommandContext) -> Result<()> {
    let Some(creds) = ctx.credentials else {
        println!("{} Not authenticated", "Status:".red().bold());
        println!("\nRun {} to log in.", "ship auth login --token <TOKEN>".cyan());
        return Ok(());
    };

    println!("{} Authenticated", "Status:".green().bold());
    if let Some(email) = &creds.email {
        println!("  Email: {}", email);
    }
    if let Some(account_id) = &creds.account_id {
        println!("  Account ID: {}", account_id);
    }

    if creds.is_expired() {
        println!(
            "  {} Token has expired. Run `ship auth login`.",
            "Warning:".yellow()
        );
    } else if let Some(expires_at) = creds.expires_at {
        println!("  Expires: {}", expires_at);
    }

    Ok(())
}

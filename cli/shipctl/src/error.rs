//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not authenticated. Run `ship auth login` to authenticate.")]
    NotAuthenticated,

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error(
        "environment id '{env_id}' is not in a terminal state. The request is not queued and you \
         must wait for the end of the current operation to run your command. Try again in a few moments"
    )]
    NotTerminalState { env_id: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error from response details.
    pub fn api(
        status: u16,
        code: Option<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
            request_id,
        }
    }

    /// Create a not-found error for a named resource.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// The command that lists resources of the given kind.
    fn list_command(kind: &str) -> Option<&'static str> {
        match kind {
            "Organization" => None,
            "Project" => Some("ship project list"),
            "Environment" => Some("ship environment list"),
            "Application" => Some("ship application list"),
            "Database" => Some("ship database list"),
            _ => None,
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        if let Some(hint) = hint_for(cli_err) {
            eprintln!("\n{}", hint.yellow());
        }
        if let CliError::Api {
            request_id: Some(request_id),
            ..
        } = cli_err
        {
            eprintln!("\nRequest ID: {}", request_id);
        }
    }
}

/// Follow-up advice for an error, if any.
pub fn hint_for(err: &CliError) -> Option<String> {
    match err {
        CliError::NotAuthenticated => Some("Hint: Run `ship auth login` to authenticate.".into()),
        CliError::Api { status: 403, .. } => {
            Some("Hint: You may not have permission for this operation.".into())
        }
        CliError::Api { status: 422, .. } | CliError::Api { status: 400, .. } => {
            Some("Hint: The platform rejected the request; nothing was changed.".into())
        }
        CliError::Network(e) if e.is_timeout() => Some(
            "Hint: The request timed out. Raise `request_timeout_secs` or SHIP_REQUEST_TIMEOUT."
                .into(),
        ),
        CliError::Network(_) => {
            Some("Hint: Check your network connection and API endpoint.".into())
        }
        CliError::NotFound { kind, .. } => CliError::list_command(kind)
            .map(|cmd| format!("You can list all {}s with: {}", kind.to_lowercase(), cmd)),
        CliError::NotTerminalState { .. } => {
            Some("Hint: Check progress with `ship environment list`.".into())
        }
        _ => None,
    }
}

//! Environment state gate.
//!
//! Mutations must not race an operation already in flight on the platform, so
//! the environment status is fetched right before a mutating call. This is a
//! single check: there is no polling and no retry. The window between the
//! check and the mutation is not closed.

use ship_id::EnvironmentId;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::CliError;
use crate::models::EnvironmentStatus;
use crate::resolve::segment;

/// Fetch the current status of an environment.
pub async fn environment_status(
    client: &ApiClient,
    env_id: &EnvironmentId,
) -> Result<EnvironmentStatus, CliError> {
    let path = format!("/environment/{}/status", segment(env_id.as_str()));
    client.get(&path).await.map_err(|e| match e {
        CliError::Api { status: 404, .. } => CliError::not_found("Environment", env_id.as_str()),
        other => other,
    })
}

/// Whether the environment has no operation in flight.
pub async fn is_terminal_state(
    client: &ApiClient,
    env_id: &EnvironmentId,
) -> Result<bool, CliError> {
    let status = environment_status(client, env_id).await?;
    let terminal = status.state.is_terminal();
    debug!(env_id = %env_id, state = %status.state, terminal, "checked environment state");
    Ok(terminal)
}

/// Refuse to continue unless the environment is in a terminal state.
pub async fn ensure_terminal_state(
    client: &ApiClient,
    env_id: &EnvironmentId,
) -> Result<(), CliError> {
    if is_terminal_state(client, env_id).await? {
        Ok(())
    } else {
        Err(CliError::NotTerminalState {
            env_id: env_id.to_string(),
        })
    }
}

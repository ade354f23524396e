//! Resource representations returned by the platform API.
//!
//! Everything here is a plain DTO fetched fresh per invocation. Fields that
//! the API may omit are `Option`s; an absent value is never conflated with a
//! zero or an empty string.

use serde::{Deserialize, Deserializer, Serialize};
use ship_id::{ApplicationId, DatabaseId, EnvironmentId, OrgId, ProjectId, StorageId};

/// A resource with a human-readable name, unique only within its parent scope.
pub trait Named {
    /// The resource kind, as shown to users ("Application", "Database", ...).
    const KIND: &'static str;

    fn name(&self) -> &str;

    /// The raw server-assigned ID.
    fn id_str(&self) -> &str;
}

/// List envelope used by every collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lifecycle state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Running,
    Deployed,
    Stopped,
    Ready,
    Deleted,
    Canceled,

    Queued,
    Building,
    Deploying,
    Restarting,
    Stopping,
    Deleting,
    Canceling,
    BuildQueued,
    DeploymentQueued,
    RestartQueued,
    StopQueued,
    DeleteQueued,

    BuildError,
    DeploymentError,
    StopError,
    DeleteError,
    RestartError,
    CancelError,

    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Coarse classification of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Stable; nothing in flight.
    Terminal,
    /// An operation is in progress or queued.
    Transitioning,
    /// The last operation failed; nothing in flight.
    Error,
}

impl State {
    pub fn phase(self) -> Phase {
        match self {
            State::Running
            | State::Deployed
            | State::Stopped
            | State::Ready
            | State::Deleted
            | State::Canceled => Phase::Terminal,
            State::BuildError
            | State::DeploymentError
            | State::StopError
            | State::DeleteError
            | State::RestartError
            | State::CancelError => Phase::Error,
            // Unknown states are assumed to be busy.
            State::Queued
            | State::Building
            | State::Deploying
            | State::Restarting
            | State::Stopping
            | State::Deleting
            | State::Canceling
            | State::BuildQueued
            | State::DeploymentQueued
            | State::RestartQueued
            | State::StopQueued
            | State::DeleteQueued
            | State::Unknown => Phase::Transitioning,
        }
    }

    /// True when no operation is in flight, i.e. a mutation may be issued.
    pub fn is_terminal(self) -> bool {
        matches!(self.phase(), Phase::Terminal | Phase::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::Running => "RUNNING",
            State::Deployed => "DEPLOYED",
            State::Stopped => "STOPPED",
            State::Ready => "READY",
            State::Deleted => "DELETED",
            State::Canceled => "CANCELED",
            State::Queued => "QUEUED",
            State::Building => "BUILDING",
            State::Deploying => "DEPLOYING",
            State::Restarting => "RESTARTING",
            State::Stopping => "STOPPING",
            State::Deleting => "DELETING",
            State::Canceling => "CANCELING",
            State::BuildQueued => "BUILD_QUEUED",
            State::DeploymentQueued => "DEPLOYMENT_QUEUED",
            State::RestartQueued => "RESTART_QUEUED",
            State::StopQueued => "STOP_QUEUED",
            State::DeleteQueued => "DELETE_QUEUED",
            State::BuildError => "BUILD_ERROR",
            State::DeploymentError => "DEPLOYMENT_ERROR",
            State::StopError => "STOP_ERROR",
            State::DeleteError => "DELETE_ERROR",
            State::RestartError => "RESTART_ERROR",
            State::CancelError => "CANCEL_ERROR",
            State::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => write!(f, "{} ({})", self.state, message),
            _ => write!(f, "{}", self.state),
        }
    }
}

/// Status of an environment as returned by `/environment/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentStatus {
    pub id: EnvironmentId,
    pub state: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The account a token belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Keys the platform returns on a nested group that this client does not
/// model. They are sent back untouched on edit.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Git source of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A storage volume attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub id: StorageId,
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in GB.
    pub size: u32,
    pub mount_point: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub internal_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicly_accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Healthcheck {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Full representation of an application.
///
/// `total_*` counters distinguish "not reported" (`None`) from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub connection_uri: Option<String>,
    #[serde(default)]
    pub git_repository: Option<GitRepository>,
    #[serde(default)]
    pub build_mode: Option<String>,
    #[serde(default)]
    pub dockerfile_path: Option<String>,
    /// Millicores.
    #[serde(default)]
    pub cpu: Option<u32>,
    /// MB.
    #[serde(default)]
    pub memory: Option<u32>,
    #[serde(default)]
    pub min_running_instances: Option<u32>,
    #[serde(default)]
    pub max_running_instances: Option<u32>,
    #[serde(default)]
    pub healthcheck: Option<Healthcheck>,
    #[serde(default)]
    pub auto_preview: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ports: Vec<Port>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub storage: Vec<Storage>,
    #[serde(default)]
    pub total_databases: Option<u32>,
    #[serde(default)]
    pub total_brokers: Option<u32>,
    #[serde(default)]
    pub total_storage: Option<u32>,
}

/// Application a database is attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedApplication {
    pub id: ApplicationId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    pub name: String,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub fqdn: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub application: Option<LinkedApplication>,
}

macro_rules! impl_named {
    ($ty:ty, $kind:literal) => {
        impl Named for $ty {
            const KIND: &'static str = $kind;

            fn name(&self) -> &str {
                &self.name
            }

            fn id_str(&self) -> &str {
                self.id.as_str()
            }
        }
    };
}

impl_named!(Organization, "Organization");
impl_named!(Project, "Project");
impl_named!(Environment, "Environment");
impl_named!(Application, "Application");
impl_named!(Database, "Database");

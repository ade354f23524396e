//! Read-modify-write edits of applications.
//!
//! The platform replaces the whole application on edit: any field missing
//! from the request is reset server-side. An edit therefore starts from the
//! freshly fetched application, copies every field, and only then applies the
//! user's overrides.

use serde::{Deserialize, Serialize};
use ship_id::{ApplicationId, StorageId};

use crate::client::ApiClient;
use crate::error::CliError;
use crate::models::{Application, Extra, GitRepository, Healthcheck, Port, Storage};
use crate::resolve::segment;

/// Full replacement payload for `PUT /application/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEditRequest {
    pub name: String,
    pub description: Option<String>,
    pub git_repository: Option<GitRepositoryRequest>,
    pub build_mode: Option<String>,
    pub dockerfile_path: Option<String>,
    pub cpu: Option<u32>,
    pub memory: Option<u32>,
    pub min_running_instances: Option<u32>,
    pub max_running_instances: Option<u32>,
    pub healthcheck: Option<Healthcheck>,
    pub auto_preview: Option<bool>,
    pub ports: Vec<Port>,
    pub storage: Vec<StorageRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepositoryRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl From<&GitRepository> for GitRepositoryRequest {
    fn from(repo: &GitRepository) -> Self {
        Self {
            url: repo.url.clone(),
            branch: repo.branch.clone(),
            root_path: repo.root_path.clone(),
            extra: repo.extra.clone(),
        }
    }
}

/// A storage volume as sent back on edit; existing volumes keep their ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StorageId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u32,
    pub mount_point: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl From<&Storage> for StorageRequest {
    fn from(storage: &Storage) -> Self {
        Self {
            id: Some(storage.id.clone()),
            kind: storage.kind.clone(),
            size: storage.size,
            mount_point: storage.mount_point.clone(),
            extra: storage.extra.clone(),
        }
    }
}

/// User-supplied changes. Unset fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub branch: Option<String>,
    pub root_path: Option<String>,
    pub cpu: Option<u32>,
    pub memory: Option<u32>,
    pub min_running_instances: Option<u32>,
    pub max_running_instances: Option<u32>,
    pub auto_preview: Option<bool>,
}

impl ApplicationOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether any override targets the git repository.
    pub fn touches_git(&self) -> bool {
        self.branch.is_some() || self.root_path.is_some()
    }

    /// Check the overrides can be applied to `current`.
    pub fn validate(&self, current: &Application) -> anyhow::Result<()> {
        if self.touches_git() && current.git_repository.is_none() {
            anyhow::bail!(
                "Application '{}' is not deployed from a git repository; --branch and --root-path do not apply",
                current.name
            );
        }

        if let Some(name) = self.name.as_deref() {
            if name.trim().is_empty() {
                anyhow::bail!("Application name cannot be empty");
            }
        }

        let min = self.min_running_instances.or(current.min_running_instances);
        let max = self.max_running_instances.or(current.max_running_instances);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                anyhow::bail!(
                    "Minimum running instances ({}) cannot exceed maximum ({})",
                    min,
                    max
                );
            }
        }

        Ok(())
    }
}

/// Build the replacement payload: every field from `current`, then overrides.
pub fn build_edit_request(
    current: &Application,
    overrides: &ApplicationOverrides,
) -> ApplicationEditRequest {
    let mut request = ApplicationEditRequest {
        name: current.name.clone(),
        description: current.description.clone(),
        git_repository: current.git_repository.as_ref().map(GitRepositoryRequest::from),
        build_mode: current.build_mode.clone(),
        dockerfile_path: current.dockerfile_path.clone(),
        cpu: current.cpu,
        memory: current.memory,
        min_running_instances: current.min_running_instances,
        max_running_instances: current.max_running_instances,
        healthcheck: current.healthcheck.clone(),
        auto_preview: current.auto_preview,
        ports: current.ports.to_vec(),
        storage: current.storage.iter().map(StorageRequest::from).collect(),
    };

    if let Some(name) = &overrides.name {
        request.name = name.clone();
    }
    if let Some(description) = &overrides.description {
        request.description = Some(description.clone());
    }
    if let Some(git) = request.git_repository.as_mut() {
        if let Some(branch) = &overrides.branch {
            git.branch = Some(branch.clone());
        }
        if let Some(root_path) = &overrides.root_path {
            git.root_path = Some(root_path.clone());
        }
    }
    if let Some(cpu) = overrides.cpu {
        request.cpu = Some(cpu);
    }
    if let Some(memory) = overrides.memory {
        request.memory = Some(memory);
    }
    if let Some(min) = overrides.min_running_instances {
        request.min_running_instances = Some(min);
    }
    if let Some(max) = overrides.max_running_instances {
        request.max_running_instances = Some(max);
    }
    if let Some(auto_preview) = overrides.auto_preview {
        request.auto_preview = Some(auto_preview);
    }

    request
}

/// Submit a full replacement of an application.
///
/// Returns the application echoed by the platform, or `None` when the edit
/// was accepted without a body.
pub async fn edit_application(
    client: &ApiClient,
    app_id: &ApplicationId,
    request: &ApplicationEditRequest,
) -> Result<Option<Application>, CliError> {
    let path = format!("/application/{}", segment(app_id.as_str()));
    client.put(&path, request).await
}

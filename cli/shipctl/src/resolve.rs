//! Name → ID resolution and typed list accessors.
//!
//! The API is ID-addressed. For UX, the CLI accepts names and resolves them by
//! listing within the appropriate scope and scanning for a match. Nothing is
//! cached: every invocation lists afresh.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use ship_id::{ApplicationId, EnvironmentId, OrgId, ProjectId};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::CliError;
use crate::models::{
    Application, Database, Environment, ListResponse, Named, Organization, Project,
};

/// Return the first resource whose name equals `name` exactly.
///
/// Matching is case-sensitive. Names are only unique within a scope, so when
/// several resources share a name the first one in server order wins; no
/// ambiguity is reported.
pub fn find_by_name<'a, R: Named>(items: &'a [R], name: &str) -> Option<&'a R> {
    items.iter().find(|item| item.name() == name)
}

/// Like [`find_by_name`], falling back to an exact ID match.
pub fn find_by_name_or_id<'a, R: Named>(items: &'a [R], ident: &str) -> Option<&'a R> {
    find_by_name(items, ident).or_else(|| items.iter().find(|item| item.id_str() == ident))
}

/// Pick a resource out of an already-fetched list or report it missing.
///
/// The identifier is matched exactly as given; only an all-blank value is
/// rejected up front.
pub fn select<R: Named + Clone>(items: &[R], ident: &str) -> Result<R, CliError> {
    if ident.trim().is_empty() {
        return Err(CliError::Other(anyhow::anyhow!(
            "{} cannot be empty",
            R::KIND
        )));
    }

    match find_by_name_or_id(items, ident) {
        Some(found) => {
            debug!(kind = R::KIND, name = ident, id = found.id_str(), "resolved");
            Ok(found.clone())
        }
        None => Err(CliError::not_found(R::KIND, ident)),
    }
}

/// Everything except RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one URL path segment.
pub(crate) fn segment(raw: &str) -> String {
    percent_encode(raw.as_bytes(), SEGMENT).to_string()
}

pub async fn list_organizations(client: &ApiClient) -> Result<Vec<Organization>, CliError> {
    let response: ListResponse<Organization> = client.get("/organization").await?;
    Ok(response.results)
}

pub async fn list_projects(client: &ApiClient, org_id: &OrgId) -> Result<Vec<Project>, CliError> {
    let path = format!("/organization/{}/project", segment(org_id.as_str()));
    let response: ListResponse<Project> = client.get(&path).await?;
    Ok(response.results)
}

pub async fn list_environments(
    client: &ApiClient,
    project_id: &ProjectId,
) -> Result<Vec<Environment>, CliError> {
    let path = format!("/project/{}/environment", segment(project_id.as_str()));
    let response: ListResponse<Environment> = client.get(&path).await?;
    Ok(response.results)
}

pub async fn list_applications(
    client: &ApiClient,
    env_id: &EnvironmentId,
) -> Result<Vec<Application>, CliError> {
    let path = format!("/environment/{}/application", segment(env_id.as_str()));
    let response: ListResponse<Application> = client.get(&path).await?;
    Ok(response.results)
}

/// Applications deployed from a project branch.
pub async fn list_branch_applications(
    client: &ApiClient,
    project_id: &ProjectId,
    branch: &str,
) -> Result<Vec<Application>, CliError> {
    let path = format!(
        "/project/{}/branch/{}/application",
        segment(project_id.as_str()),
        segment(branch)
    );
    let response: ListResponse<Application> = client.get(&path).await?;
    Ok(response.results)
}

/// Databases attached to a project branch.
pub async fn list_branch_databases(
    client: &ApiClient,
    project_id: &ProjectId,
    branch: &str,
) -> Result<Vec<Database>, CliError> {
    let path = format!(
        "/project/{}/branch/{}/database",
        segment(project_id.as_str()),
        segment(branch)
    );
    let response: ListResponse<Database> = client.get(&path).await?;
    Ok(response.results)
}

pub async fn get_application(
    client: &ApiClient,
    app_id: &ApplicationId,
) -> Result<Application, CliError> {
    let path = format!("/application/{}", segment(app_id.as_str()));
    client.get(&path).await.map_err(|e| match e {
        CliError::Api { status: 404, .. } => CliError::not_found(Application::KIND, app_id.as_str()),
        other => other,
    })
}

pub async fn resolve_organization(
    client: &ApiClient,
    org_ident: &str,
) -> Result<Organization, CliError> {
    let orgs = list_organizations(client).await?;
    select(&orgs, org_ident)
}

pub async fn resolve_project(
    client: &ApiClient,
    org_id: &OrgId,
    project_ident: &str,
) -> Result<Project, CliError> {
    let projects = list_projects(client, org_id).await?;
    select(&projects, project_ident)
}

pub async fn resolve_environment(
    client: &ApiClient,
    project_id: &ProjectId,
    env_ident: &str,
) -> Result<Environment, CliError> {
    let envs = list_environments(client, project_id).await?;
    select(&envs, env_ident)
}

pub async fn resolve_application(
    client: &ApiClient,
    env_id: &EnvironmentId,
    app_ident: &str,
) -> Result<Application, CliError> {
    let apps = list_applications(client, env_id).await?;
    select(&apps, app_ident)
}

/// IDs of the organization → project → environment chain.
#[derive(Debug, Clone)]
pub struct ResolvedEnvironment {
    pub org_id: OrgId,
    pub project_id: ProjectId,
    pub env_id: EnvironmentId,
}

/// Resolve a full organization/project/environment chain by name, in order.
///
/// Stops at the first failure; later lookups depend on earlier IDs.
pub async fn resolve_environment_chain(
    client: &ApiClient,
    organization: &str,
    project: &str,
    environment: &str,
) -> Result<ResolvedEnvironment, CliError> {
    let org = resolve_organization(client, organization).await?;
    let project = resolve_project(client, &org.id, project).await?;
    let env = resolve_environment(client, &project.id, environment).await?;

    Ok(ResolvedEnvironment {
        org_id: org.id,
        project_id: project.id,
        env_id: env.id,
    })
}

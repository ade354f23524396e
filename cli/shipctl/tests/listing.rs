//! Branch-scoped listings and the environment gate against a mock platform API.

mod common;

use serde_json::json;
use ship_id::{EnvironmentId, OrgId, ProjectId};
use shipctl::error::CliError;
use shipctl::gate::{ensure_terminal_state, is_terminal_state};
use shipctl::resolve::{list_branch_applications, list_branch_databases, resolve_project};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, list, mount_env_state, mount_get, web_application};

fn project_id() -> ProjectId {
    ProjectId::parse("p1").unwrap()
}

fn env_id() -> EnvironmentId {
    EnvironmentId::parse("e1").unwrap()
}

#[tokio::test]
async fn branch_databases_use_escaped_branch_segment() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/project/p1/branch/feature%2Flogin/database",
        list(json!([{
            "id": "db-1",
            "name": "orders",
            "status": { "state": "RUNNING" },
            "type": "POSTGRESQL",
            "version": "15",
            "fqdn": "orders.internal",
            "port": 5432,
            "username": "app",
            "password": "s3cret",
            "application": { "id": "a1", "name": "web" }
        }])),
    )
    .await;

    let client = client_for(&server);
    let databases = list_branch_databases(&client, &project_id(), "feature/login")
        .await
        .unwrap();

    assert_eq!(databases.len(), 1);
    assert_eq!(databases[0].name, "orders");
    assert_eq!(databases[0].application.as_ref().unwrap().name, "web");
}

#[tokio::test]
async fn branch_applications_are_listed_in_server_order() {
    let server = MockServer::start().await;
    let mut api = web_application();
    api["id"] = json!("a2");
    api["name"] = json!("api");
    mount_get(
        &server,
        "/project/p1/branch/main/application",
        list(json!([web_application(), api])),
    )
    .await;

    let client = client_for(&server);
    let apps = list_branch_applications(&client, &project_id(), "main")
        .await
        .unwrap();

    let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["web", "api"]);
}

#[tokio::test]
async fn null_results_are_an_empty_list() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/project/p1/branch/main/database",
        json!({ "results": null }),
    )
    .await;

    let client = client_for(&server);
    let databases = list_branch_databases(&client, &project_id(), "main")
        .await
        .unwrap();
    assert!(databases.is_empty());
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let server = MockServer::start().await;
    mount_get(&server, "/organization/o1/project", list(json!([]))).await;

    let client = client_for(&server);
    let err = resolve_project(&client, &OrgId::parse("o1").unwrap(), "shop")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::NotFound { kind: "Project", ref name } if name == "shop"
    ));
}

#[tokio::test]
async fn gate_reports_terminal_states() {
    let server = MockServer::start().await;
    mount_env_state(&server, "RUNNING").await;

    let client = client_for(&server);
    assert!(is_terminal_state(&client, &env_id()).await.unwrap());
    ensure_terminal_state(&client, &env_id()).await.unwrap();
}

#[tokio::test]
async fn gate_treats_unknown_state_as_in_progress() {
    let server = MockServer::start().await;
    mount_env_state(&server, "SOMETHING_NEW").await;

    let client = client_for(&server);
    assert!(!is_terminal_state(&client, &env_id()).await.unwrap());
    assert!(matches!(
        ensure_terminal_state(&client, &env_id()).await,
        Err(CliError::NotTerminalState { .. })
    ));
}

#[tokio::test]
async fn gate_on_missing_environment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/environment/e1/status"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no such environment" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        is_terminal_state(&client, &env_id()).await,
        Err(CliError::NotFound { kind: "Environment", .. })
    ));
}

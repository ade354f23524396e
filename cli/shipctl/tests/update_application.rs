//! `ship application update` against a mock platform API.

mod common;

use std::time::Duration;

use serde_json::json;
use shipctl::commands::apps::{update_application, ApplicationTarget};
use shipctl::edit::ApplicationOverrides;
use shipctl::error::CliError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, client_with_timeout, list, mount_chain, mount_env_state, mount_get, web_application};

const TARGET: ApplicationTarget<'static> = ApplicationTarget {
    organization: "acme",
    project: "shop",
    environment: "production",
    application: "web",
};

fn branch_override(branch: &str) -> ApplicationOverrides {
    ApplicationOverrides {
        branch: Some(branch.to_string()),
        ..Default::default()
    }
}

fn cli_error(err: &anyhow::Error) -> &CliError {
    err.downcast_ref::<CliError>()
        .unwrap_or_else(|| panic!("expected a CliError, got: {err}"))
}

#[tokio::test]
async fn update_replaces_application_with_every_field_preserved() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "RUNNING").await;
    mount_get(&server, "/environment/e1/application", list(json!([web_application()]))).await;

    let mut updated = web_application();
    updated["git_repository"]["branch"] = json!("release");

    Mock::given(method("PUT"))
        .and(path("/application/a1"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "name": "web",
            "description": "storefront",
            "git_repository": {
                "url": "https://github.com/acme/shop.git",
                "branch": "release",
                "root_path": "/"
            },
            "cpu": 500,
            "memory": 512,
            "min_running_instances": 1,
            "max_running_instances": 3,
            "auto_preview": false,
            "healthcheck": { "type": "HTTP", "port": 8080, "path": "/health" },
            "storage": [
                { "id": "st-1", "type": "FAST_SSD", "size": 10, "mount_point": "/data" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let updated = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap();

    assert_eq!(updated.name(), "web");
    let app = updated.application.unwrap();
    assert_eq!(
        app.git_repository.unwrap().branch.as_deref(),
        Some("release")
    );
}

#[tokio::test]
async fn replace_accepted_without_body_is_success() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "RUNNING").await;
    mount_get(&server, "/environment/e1/application", list(json!([web_application()]))).await;

    Mock::given(method("PUT"))
        .and(path("/application/a1"))
        .and(body_partial_json(json!({
            "git_repository": { "branch": "release" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let updated = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap();

    assert!(updated.application.is_none());
    assert_eq!(updated.id.as_str(), "a1");
    assert_eq!(updated.name(), "web");
    assert_eq!(
        updated.request.git_repository.unwrap().branch.as_deref(),
        Some("release")
    );
}

#[tokio::test]
async fn unknown_nested_keys_survive_the_replace() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "RUNNING").await;

    let mut app = web_application();
    app["ports"] = json!([{ "id": "p", "internal_port": 80, "name": "http", "is_default": true }]);
    app["healthcheck"]["initial_delay_seconds"] = json!(30);
    mount_get(&server, "/environment/e1/application", list(json!([app]))).await;

    Mock::given(method("PUT"))
        .and(path("/application/a1"))
        .and(body_partial_json(json!({
            "ports": [{ "id": "p", "internal_port": 80, "name": "http", "is_default": true }],
            "healthcheck": { "type": "HTTP", "initial_delay_seconds": 30 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let updated = update_application(&client, TARGET, &ApplicationOverrides::default())
        .await
        .unwrap();

    let port = serde_json::to_value(&updated.request.ports[0]).unwrap();
    assert!(port.get("external_port").is_none());
    assert!(port.get("publicly_accessible").is_none());
}

#[tokio::test]
async fn update_refused_while_environment_is_deploying() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "DEPLOYING").await;

    Mock::given(method("GET"))
        .and(path("/environment/e1/application"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([web_application()]))))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap_err();

    assert!(matches!(
        cli_error(&err),
        CliError::NotTerminalState { env_id } if env_id == "e1"
    ));
}

#[tokio::test]
async fn update_allowed_after_failed_deployment() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "DEPLOYMENT_ERROR").await;
    mount_get(&server, "/environment/e1/application", list(json!([web_application()]))).await;

    Mock::given(method("PUT"))
        .and(path("/application/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_application()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    update_application(&client, TARGET, &ApplicationOverrides::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_application_is_not_found() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "STOPPED").await;
    mount_get(&server, "/environment/e1/application", list(json!([web_application()]))).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let target = ApplicationTarget {
        application: "worker",
        ..TARGET
    };
    let err = update_application(&client, target, &branch_override("release"))
        .await
        .unwrap_err();

    assert!(matches!(
        cli_error(&err),
        CliError::NotFound { kind: "Application", name } if name == "worker"
    ));
}

#[tokio::test]
async fn unknown_environment_stops_before_state_check() {
    let server = MockServer::start().await;
    mount_chain(&server).await;

    Mock::given(method("GET"))
        .and(path("/environment/e1/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let target = ApplicationTarget {
        environment: "preview",
        ..TARGET
    };
    let err = update_application(&client, target, &branch_override("release"))
        .await
        .unwrap_err();

    assert!(matches!(
        cli_error(&err),
        CliError::NotFound { kind: "Environment", name } if name == "preview"
    ));
}

#[tokio::test]
async fn rejected_token_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap_err();

    assert!(matches!(cli_error(&err), CliError::NotAuthenticated));
}

#[tokio::test]
async fn server_rejection_carries_platform_message() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "RUNNING").await;
    mount_get(&server, "/environment/e1/application", list(json!([web_application()]))).await;

    Mock::given(method("PUT"))
        .and(path("/application/a1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "branch 'nope' does not exist",
            "request_id": "req-42"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = update_application(&client, TARGET, &branch_override("nope"))
        .await
        .unwrap_err();

    match cli_error(&err) {
        CliError::Api {
            status,
            message,
            request_id,
            ..
        } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "branch 'nope' does not exist");
            assert_eq!(request_id.as_deref(), Some("req-42"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_body_uses_status_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organization"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API error (503): Service Unavailable");
}

#[tokio::test]
async fn slow_server_is_a_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list(json!([])))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server, 1);
    let err = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap_err();

    match cli_error(&err) {
        CliError::Network(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn git_override_on_image_application_is_rejected_locally() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_env_state(&server, "RUNNING").await;

    let mut app = web_application();
    app["git_repository"] = json!(null);
    mount_get(&server, "/environment/e1/application", list(json!([app]))).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = update_application(&client, TARGET, &branch_override("release"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not deployed from a git repository"));
}

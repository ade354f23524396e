//! Shared fixtures for tests that run against a mock platform API.

#![allow(dead_code)]

use serde_json::{json, Value};
use shipctl::client::ApiClient;
use shipctl::config::{Config, Credentials};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn client_for(server: &MockServer) -> ApiClient {
    client_with_timeout(server, 5)
}

pub fn client_with_timeout(server: &MockServer, secs: u64) -> ApiClient {
    let config = Config {
        api_url: server.uri(),
        request_timeout_secs: secs,
        context: Default::default(),
    };
    let creds = Credentials::new("test-token".to_string(), "Bearer".to_string());
    ApiClient::new(&config, Some(&creds)).unwrap()
}

pub fn list(items: Value) -> Value {
    json!({ "results": items })
}

pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Organization `acme` (o1) → project `shop` (p1) → environment `production` (e1).
pub async fn mount_chain(server: &MockServer) {
    mount_get(
        server,
        "/organization",
        list(json!([
            { "id": "o0", "name": "other" },
            { "id": "o1", "name": "acme" }
        ])),
    )
    .await;
    mount_get(
        server,
        "/organization/o1/project",
        list(json!([{ "id": "p1", "name": "shop" }])),
    )
    .await;
    mount_get(
        server,
        "/project/p1/environment",
        list(json!([
            { "id": "e0", "name": "staging" },
            { "id": "e1", "name": "production" }
        ])),
    )
    .await;
}

pub async fn mount_env_state(server: &MockServer, state: &str) {
    mount_get(
        server,
        "/environment/e1/status",
        json!({ "id": "e1", "state": state }),
    )
    .await;
}

pub fn web_application() -> Value {
    json!({
        "id": "a1",
        "name": "web",
        "description": "storefront",
        "status": { "state": "RUNNING" },
        "git_repository": {
            "url": "https://github.com/acme/shop.git",
            "branch": "main",
            "root_path": "/"
        },
        "build_mode": "DOCKER",
        "dockerfile_path": "Dockerfile",
        "cpu": 500,
        "memory": 512,
        "min_running_instances": 1,
        "max_running_instances": 3,
        "healthcheck": { "type": "HTTP", "port": 8080, "path": "/health" },
        "auto_preview": false,
        "ports": [
            { "id": "port-1", "internal_port": 8080, "external_port": 443, "publicly_accessible": true, "protocol": "HTTP" }
        ],
        "storage": [
            { "id": "st-1", "type": "FAST_SSD", "size": 10, "mount_point": "/data" }
        ]
    })
}

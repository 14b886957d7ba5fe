//! HTTP API tests.
//!
//! Drives the full router (handlers, error mapping, OpenAPI) against an
//! in-memory store.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::*;
use identity_admin::api::{AppState, router};
use identity_admin::config::AppConfig;
use identity_admin::dto::{ApiResourceDto, ApiScopeDto, ApiSecretDto, PagedList};
use serde_json::{Value, json};
use std::sync::Arc;

async fn test_server() -> TestServer {
    let db = test_db().await;
    let state = AppState {
        service: Arc::new(service_for(db.clone())),
        config: Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            listen_addr: "127.0.0.1:0".into(),
            default_page_size: 2,
            max_page_size: 5,
        }),
        db,
    };
    TestServer::new(router(state)).expect("create test server")
}

async fn create_resource(server: &TestServer, name: &str) -> i32 {
    let response = server
        .post("/api/api-resources")
        .json(&json!({ "name": name, "user_claims": ["email"] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["id"].as_i64().expect("id") as i32
}

#[tokio::test]
async fn health_reports_ok() {
    let server = test_server().await;
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = test_server().await;
    let response = server.get("/api-docs").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn create_and_fetch_api_resource() {
    let server = test_server().await;
    let id = create_resource(&server, "payments-api").await;

    let response = server.get(&format!("/api/api-resources/{id}")).await;
    response.assert_status_ok();
    let dto: ApiResourceDto = response.json();
    assert_eq!(dto.id, id);
    assert_eq!(dto.name, "payments-api");
    assert!(dto.enabled);
    assert_eq!(dto.user_claims, ["email"]);
}

#[tokio::test]
async fn missing_api_resource_is_404_with_kind() {
    let server = test_server().await;
    let response = server.get("/api/api-resources/9000").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["kind"], "api_resource_does_not_exist");
    assert_eq!(body["error"], "The API resource does not exist");
}

#[tokio::test]
async fn duplicate_name_is_409() {
    let server = test_server().await;
    create_resource(&server, "orders-api").await;

    let response = server
        .post("/api/api-resources")
        .json(&json!({ "name": "orders-api" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["kind"], "api_resource_exists");
}

#[tokio::test]
async fn update_uses_identifier_from_path() {
    let server = test_server().await;
    let id = create_resource(&server, "catalog-api").await;

    let response = server
        .put(&format!("/api/api-resources/{id}"))
        .json(&json!({ "id": 0, "name": "catalog-v2", "enabled": false }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let dto: ApiResourceDto = server.get(&format!("/api/api-resources/{id}")).await.json();
    assert_eq!(dto.name, "catalog-v2");
    assert!(!dto.enabled);
    assert!(dto.user_claims.is_empty());
}

#[tokio::test]
async fn delete_is_idempotent_over_http() {
    let server = test_server().await;
    let id = create_resource(&server, "temp-api").await;

    server
        .delete(&format!("/api/api-resources/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/api-resources/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/api-resources/{id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn list_uses_configured_page_sizes() {
    let server = test_server().await;
    for name in ["a-api", "b-api", "c-api"] {
        create_resource(&server, name).await;
    }

    let page: PagedList<ApiResourceDto> = server.get("/api/api-resources").await.json();
    assert_eq!(page.page_size, 2);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items[0].name, "c-api");

    let capped: PagedList<ApiResourceDto> = server
        .get("/api/api-resources")
        .add_query_param("page_size", 50)
        .await
        .json();
    assert_eq!(capped.page_size, 5);
    assert_eq!(capped.items.len(), 3);
}

#[tokio::test]
async fn huge_page_number_returns_empty_page() {
    let server = test_server().await;
    create_resource(&server, "only-api").await;

    let response = server
        .get("/api/api-resources")
        .add_query_param("page", u64::MAX)
        .await;
    response.assert_status_ok();
    let page: PagedList<ApiResourceDto> = response.json();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn scope_routes_round_trip() {
    let server = test_server().await;
    let id = create_resource(&server, "payments-api").await;

    let response = server
        .post(&format!("/api/api-resources/{id}/scopes"))
        .json(&json!({
            "name": "payments.read",
            "description": "Read access to payments",
            "required": true
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let scope_id = response.json::<Value>()["id"].as_i64().expect("id") as i32;

    let scope: ApiScopeDto = server
        .get(&format!("/api/api-resources/{id}/scopes/{scope_id}"))
        .await
        .json();
    assert_eq!(scope.name, "payments.read");
    assert!(scope.required);
    assert!(scope.show_in_discovery_document);
    assert_eq!(scope.resource_name.as_deref(), Some("payments-api"));

    server
        .post(&format!("/api/api-resources/{id}/scopes"))
        .json(&json!({ "name": "payments.read" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .delete(&format!("/api/api-resources/{id}/scopes/{scope_id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/api-resources/{id}/scopes/{scope_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn shared_secret_is_stored_hashed() {
    let server = test_server().await;
    let id = create_resource(&server, "vault-api").await;

    let response = server
        .post(&format!("/api/api-resources/{id}/secrets"))
        .json(&json!({ "type": "SharedSecret", "value": "secret" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let secret_id = response.json::<Value>()["id"].as_i64().expect("id") as i32;

    let secret: ApiSecretDto = server.get(&format!("/api/api-secrets/{secret_id}")).await.json();
    assert_eq!(secret.value, "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols=");
    assert_eq!(secret.api_resource_name.as_deref(), Some("vault-api"));
    assert!(secret.created.is_some());
}

#[tokio::test]
async fn unknown_secret_type_is_400() {
    let server = test_server().await;
    let id = create_resource(&server, "vault-api").await;

    let response = server
        .post(&format!("/api/api-resources/{id}/secrets"))
        .json(&json!({ "type": "Telepathy", "value": "x" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["kind"], "api_secret_type_unknown");
}

#[tokio::test]
async fn secret_options_lists_catalog() {
    let server = test_server().await;
    let body: Value = server.get("/api/secret-options").await.json();
    assert_eq!(body["hash_types"], json!(["Sha256", "Sha512"]));
    assert!(
        body["secret_types"]
            .as_array()
            .expect("array")
            .contains(&json!("SharedSecret"))
    );
}

#[tokio::test]
async fn property_routes_round_trip() {
    let server = test_server().await;
    let id = create_resource(&server, "meta-api").await;

    let response = server
        .post(&format!("/api/api-resources/{id}/properties"))
        .json(&json!({ "key": "owner", "value": "platform" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let property_id = response.json::<Value>()["id"].as_i64().expect("id");

    let body: Value = server
        .get(&format!("/api/api-resource-properties/{property_id}"))
        .await
        .json();
    assert_eq!(body["key"], "owner");
    assert_eq!(body["api_resource_name"], "meta-api");

    server
        .delete(&format!("/api/api-resource-properties/{property_id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/api-resource-properties/{property_id}"))
        .await
        .assert_status_not_found();
}

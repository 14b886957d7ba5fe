//! Shared fixtures for the integration tests.
//!
//! Every test gets its own in-memory SQLite store, so tests never observe
//! each other's rows.
#![allow(dead_code)]

use identity_admin::client::StandardClientCatalog;
use identity_admin::dto::{ApiResourceDto, ApiScopeDto, ApiSecretDto};
use identity_admin::localization::EnglishLocalizer;
use identity_admin::repository::SeaOrmApiResourceRepository;
use identity_admin::schema::ensure_schema;
use identity_admin::service::ApiResourceService;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use time::macros::datetime;
use uuid::Uuid;

pub type TestService = ApiResourceService<SeaOrmApiResourceRepository>;

/// Fresh store with the schema in place.
pub async fn test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.expect("connect");
    ensure_schema(&db).await.expect("create schema");
    Arc::new(db)
}

pub fn service_for(db: Arc<DatabaseConnection>) -> TestService {
    ApiResourceService::new(
        SeaOrmApiResourceRepository::new(db),
        Arc::new(EnglishLocalizer),
        Arc::new(StandardClientCatalog),
    )
}

pub async fn test_service() -> (TestService, Arc<DatabaseConnection>) {
    let db = test_db().await;
    (service_for(db.clone()), db)
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub fn api_resource_dto() -> ApiResourceDto {
    ApiResourceDto {
        id: 0,
        name: unique("api"),
        display_name: Some(unique("display")),
        description: Some(unique("description")),
        enabled: true,
        user_claims: vec![unique("claim"), unique("claim")],
        scopes: Vec::new(),
        secrets: Vec::new(),
    }
}

pub fn api_scope_dto(api_resource_id: i32) -> ApiScopeDto {
    ApiScopeDto {
        api_resource_id,
        api_scope_id: 0,
        name: unique("scope"),
        display_name: Some(unique("display")),
        description: Some(unique("description")),
        required: true,
        emphasize: false,
        show_in_discovery_document: true,
        user_claims: vec![unique("claim")],
        resource_name: None,
    }
}

/// A certificate thumbprint secret; its value is stored as given.
pub fn api_secret_dto(api_resource_id: i32) -> ApiSecretDto {
    ApiSecretDto {
        api_resource_id,
        api_secret_id: 0,
        secret_type: "X509Thumbprint".into(),
        description: Some(unique("description")),
        value: unique("thumbprint"),
        expiration: Some(datetime!(2031-03-01 12:00 UTC)),
        hash_type: None,
        created: None,
        api_resource_name: None,
    }
}

/// Compare every caller-supplied field. Identifiers are assigned by the store.
pub fn assert_api_resource_eq(expected: &ApiResourceDto, actual: &ApiResourceDto) {
    assert_eq!(actual.name, expected.name, "name");
    assert_eq!(actual.display_name, expected.display_name, "display_name");
    assert_eq!(actual.description, expected.description, "description");
    assert_eq!(actual.enabled, expected.enabled, "enabled");
    assert_eq!(actual.user_claims, expected.user_claims, "user_claims");
}

/// Compare a scope, ignoring identifiers and the denormalized resource name.
pub fn assert_api_scope_eq(expected: &ApiScopeDto, actual: &ApiScopeDto) {
    assert_eq!(actual.name, expected.name, "name");
    assert_eq!(actual.display_name, expected.display_name, "display_name");
    assert_eq!(actual.description, expected.description, "description");
    assert_eq!(actual.required, expected.required, "required");
    assert_eq!(actual.emphasize, expected.emphasize, "emphasize");
    assert_eq!(
        actual.show_in_discovery_document, expected.show_in_discovery_document,
        "show_in_discovery_document"
    );
    assert_eq!(actual.user_claims, expected.user_claims, "user_claims");
}

/// Compare a secret, ignoring identifiers, timestamps and the resource name.
pub fn assert_api_secret_eq(expected: &ApiSecretDto, actual: &ApiSecretDto) {
    assert_eq!(actual.secret_type, expected.secret_type, "type");
    assert_eq!(actual.description, expected.description, "description");
    assert_eq!(actual.value, expected.value, "value");
    assert_eq!(actual.expiration, expected.expiration, "expiration");
}

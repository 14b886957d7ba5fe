//! API resource property tests.

mod common;

use common::*;
use identity_admin::dto::ApiResourcePropertyDto;
use identity_admin::error::FailureKind;

fn property(api_resource_id: i32, key: &str, value: &str) -> ApiResourcePropertyDto {
    ApiResourcePropertyDto {
        api_resource_id,
        key: key.into(),
        value: value.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn add_property_then_get() {
    let (service, _db) = test_service().await;
    let resource = api_resource_dto();
    let resource_id = service.add_api_resource(resource.clone()).await.expect("add");

    let id = service
        .add_api_resource_property(property(resource_id, "owner", "payments-team"))
        .await
        .expect("add property");

    let fetched = service.get_api_resource_property(id).await.expect("get");
    assert_eq!(fetched.api_resource_property_id, id);
    assert_eq!(fetched.api_resource_id, resource_id);
    assert_eq!(fetched.key, "owner");
    assert_eq!(fetched.value, "payments-team");
    assert_eq!(fetched.api_resource_name.as_deref(), Some(resource.name.as_str()));
}

#[tokio::test]
async fn duplicate_property_key_is_rejected() {
    let (service, _db) = test_service().await;
    let first = service.add_api_resource(api_resource_dto()).await.expect("add");
    let second = service.add_api_resource(api_resource_dto()).await.expect("add");

    service
        .add_api_resource_property(property(first, "tier", "gold"))
        .await
        .expect("add");

    let dup = property(first, "tier", "silver");
    assert!(!service.can_insert_api_resource_property(&dup).await.expect("check"));
    let err = service.add_api_resource_property(dup).await.unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::ApiResourcePropertyExists));

    service
        .add_api_resource_property(property(second, "tier", "silver"))
        .await
        .expect("same key on another resource");
}

#[tokio::test]
async fn property_under_missing_resource_is_not_found() {
    let (service, _db) = test_service().await;
    let err = service
        .add_api_resource_property(property(404, "k", "v"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.kind(), Some(FailureKind::ApiResourceDoesNotExist));
}

#[tokio::test]
async fn properties_are_listed_newest_first() {
    let (service, _db) = test_service().await;
    let resource_id = service.add_api_resource(api_resource_dto()).await.expect("add");
    for key in ["a", "b", "c"] {
        service
            .add_api_resource_property(property(resource_id, key, "v"))
            .await
            .expect("add");
    }

    let page = service
        .get_api_resource_properties(resource_id, 1, 10)
        .await
        .expect("list");
    let keys: Vec<&str> = page.items.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["c", "b", "a"]);
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn delete_property_is_idempotent() {
    let (service, _db) = test_service().await;
    let resource_id = service.add_api_resource(api_resource_dto()).await.expect("add");
    let id = service
        .add_api_resource_property(property(resource_id, "owner", "x"))
        .await
        .expect("add");
    let dto = ApiResourcePropertyDto {
        api_resource_property_id: id,
        ..Default::default()
    };

    service.delete_api_resource_property(&dto).await.expect("delete");
    service
        .delete_api_resource_property(&dto)
        .await
        .expect("delete again");

    let err = service.get_api_resource_property(id).await.unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::ApiResourcePropertyDoesNotExist));
}

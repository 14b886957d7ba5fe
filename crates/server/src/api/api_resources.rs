//! API resource management endpoints.
//!
//! - `/api/api-resources` - List and create API resources
//! - `/api/api-resources/{id}` - Read, update and delete one API resource
//! - `/api/api-resources/{id}/scopes[/{scope_id}]` - Scope lifecycle
//! - `/api/api-resources/{id}/secrets` and `/api/api-secrets/{secret_id}` - Secret lifecycle
//! - `/api/api-resources/{id}/properties` and `/api/api-resource-properties/{property_id}` - Properties
//! - `/api/secret-options` - Secret types and hash types accepted by the service

use super::{ApiError, AppState, ErrorBody};
use crate::dto::{
    ApiResourceDto, ApiResourcePropertyDto, ApiScopeDto, ApiSecretDto, PagedList, SecretOptions,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const API_RESOURCES_TAG: &str = "API Resources";

/// Paging parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Substring the resource name must contain (resource list only)
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Identifier assigned to a newly created record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Created {
    pub id: i32,
}

type ApiResult<T> = Result<T, ApiError>;

/// Creates the API resources router.
pub fn router(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_api_resources, add_api_resource))
        .routes(routes!(
            get_api_resource,
            update_api_resource,
            delete_api_resource
        ))
        .routes(routes!(list_api_scopes, add_api_scope))
        .routes(routes!(get_api_scope, update_api_scope, delete_api_scope))
        .routes(routes!(list_api_secrets, add_api_secret))
        .routes(routes!(get_api_secret, delete_api_secret))
        .routes(routes!(list_api_resource_properties, add_api_resource_property))
        .routes(routes!(
            get_api_resource_property,
            delete_api_resource_property
        ))
        .routes(routes!(secret_options))
        .with_state(state)
}

fn paging(state: &AppState, params: &ListParams) -> (u64, u64) {
    (
        params.page.unwrap_or(1).max(1),
        state.config.page_size(params.page_size),
    )
}

// ---------------------------------------------------------------------------
// API resources
// ---------------------------------------------------------------------------

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources",
    params(ListParams),
    tag = API_RESOURCES_TAG,
    operation_id = "List API Resources",
    summary = "List API resources, newest first",
    responses(
        (status = 200, description = "One page of API resources", body = PagedList<ApiResourceDto>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn list_api_resources(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PagedList<ApiResourceDto>>> {
    let (page, page_size) = paging(&state, &params);
    let search = params.search.as_deref().unwrap_or_default();
    Ok(Json(
        state
            .service
            .get_api_resources(search, page, page_size)
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload), fields(name = %payload.name))]
#[utoipa::path(
    post,
    path = "/api/api-resources",
    tag = API_RESOURCES_TAG,
    operation_id = "Add API Resource",
    summary = "Register a new API resource",
    description = "Creates the resource together with any scopes and secrets supplied inline. \
                   Shared secrets are hashed before they are stored.",
    request_body(content = ApiResourceDto, description = "The resource to create"),
    responses(
        (status = 201, description = "Resource created", body = Created),
        (status = 400, description = "Invalid secret type or hash type", body = ErrorBody),
        (status = 409, description = "A resource with this name already exists", body = ErrorBody)
    )
)]
async fn add_api_resource(
    State(state): State<AppState>,
    Json(payload): Json<ApiResourceDto>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let id = state.service.add_api_resource(payload).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources/{id}",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Get API Resource",
    summary = "Get an API resource with its scopes and secrets",
    responses(
        (status = 200, description = "The API resource", body = ApiResourceDto),
        (status = 404, description = "The API resource does not exist", body = ErrorBody)
    )
)]
async fn get_api_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResourceDto>> {
    Ok(Json(state.service.get_api_resource(id).await?))
}

#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/api-resources/{id}",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Update API Resource",
    summary = "Overwrite an API resource's fields and claims",
    description = "Scopes and secrets in the body are ignored; use their own endpoints.",
    request_body(content = ApiResourceDto),
    responses(
        (status = 204, description = "Resource updated"),
        (status = 404, description = "The API resource does not exist", body = ErrorBody),
        (status = 409, description = "Another resource already uses this name", body = ErrorBody)
    )
)]
async fn update_api_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<ApiResourceDto>,
) -> ApiResult<StatusCode> {
    payload.id = id;
    state.service.update_api_resource(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/api-resources/{id}",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Delete API Resource",
    summary = "Delete an API resource with its scopes, secrets and properties",
    description = "Deleting a resource that does not exist succeeds.",
    responses((status = 204, description = "Resource deleted or already absent"))
)]
async fn delete_api_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let dto = ApiResourceDto {
        id,
        ..Default::default()
    };
    state.service.delete_api_resource(&dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// API scopes
// ---------------------------------------------------------------------------

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources/{id}/scopes",
    params(("id" = i32, Path, description = "API resource identifier"), ListParams),
    tag = API_RESOURCES_TAG,
    operation_id = "List API Scopes",
    responses(
        (status = 200, description = "One page of scopes", body = PagedList<ApiScopeDto>),
        (status = 404, description = "The API resource does not exist", body = ErrorBody)
    )
)]
async fn list_api_scopes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PagedList<ApiScopeDto>>> {
    let (page, page_size) = paging(&state, &params);
    Ok(Json(
        state.service.get_api_scopes(id, page, page_size).await?,
    ))
}

#[tracing::instrument(skip(state, payload), fields(name = %payload.name))]
#[utoipa::path(
    post,
    path = "/api/api-resources/{id}/scopes",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Add API Scope",
    request_body(content = ApiScopeDto),
    responses(
        (status = 201, description = "Scope created", body = Created),
        (status = 404, description = "The API resource does not exist", body = ErrorBody),
        (status = 409, description = "The resource already has a scope with this name", body = ErrorBody)
    )
)]
async fn add_api_scope(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<ApiScopeDto>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    payload.api_resource_id = id;
    let id = state.service.add_api_scope(payload).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources/{id}/scopes/{scope_id}",
    params(
        ("id" = i32, Path, description = "API resource identifier"),
        ("scope_id" = i32, Path, description = "API scope identifier")
    ),
    tag = API_RESOURCES_TAG,
    operation_id = "Get API Scope",
    responses(
        (status = 200, description = "The scope", body = ApiScopeDto),
        (status = 404, description = "The resource or scope does not exist", body = ErrorBody)
    )
)]
async fn get_api_scope(
    State(state): State<AppState>,
    Path((id, scope_id)): Path<(i32, i32)>,
) -> ApiResult<Json<ApiScopeDto>> {
    Ok(Json(state.service.get_api_scope(id, scope_id).await?))
}

#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/api-resources/{id}/scopes/{scope_id}",
    params(
        ("id" = i32, Path, description = "API resource identifier"),
        ("scope_id" = i32, Path, description = "API scope identifier")
    ),
    tag = API_RESOURCES_TAG,
    operation_id = "Update API Scope",
    request_body(content = ApiScopeDto),
    responses(
        (status = 204, description = "Scope updated"),
        (status = 404, description = "The resource or scope does not exist", body = ErrorBody),
        (status = 409, description = "The resource already has a scope with this name", body = ErrorBody)
    )
)]
async fn update_api_scope(
    State(state): State<AppState>,
    Path((id, scope_id)): Path<(i32, i32)>,
    Json(mut payload): Json<ApiScopeDto>,
) -> ApiResult<StatusCode> {
    payload.api_resource_id = id;
    payload.api_scope_id = scope_id;
    state.service.update_api_scope(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/api-resources/{id}/scopes/{scope_id}",
    params(
        ("id" = i32, Path, description = "API resource identifier"),
        ("scope_id" = i32, Path, description = "API scope identifier")
    ),
    tag = API_RESOURCES_TAG,
    operation_id = "Delete API Scope",
    responses((status = 204, description = "Scope deleted or already absent"))
)]
async fn delete_api_scope(
    State(state): State<AppState>,
    Path((id, scope_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let dto = ApiScopeDto {
        api_resource_id: id,
        api_scope_id: scope_id,
        ..Default::default()
    };
    state.service.delete_api_scope(&dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// API secrets
// ---------------------------------------------------------------------------

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources/{id}/secrets",
    params(("id" = i32, Path, description = "API resource identifier"), ListParams),
    tag = API_RESOURCES_TAG,
    operation_id = "List API Secrets",
    responses(
        (status = 200, description = "One page of secrets", body = PagedList<ApiSecretDto>),
        (status = 404, description = "The API resource does not exist", body = ErrorBody)
    )
)]
async fn list_api_secrets(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PagedList<ApiSecretDto>>> {
    let (page, page_size) = paging(&state, &params);
    Ok(Json(
        state.service.get_api_secrets(id, page, page_size).await?,
    ))
}

#[tracing::instrument(skip(state, payload), fields(secret_type = %payload.secret_type))]
#[utoipa::path(
    post,
    path = "/api/api-resources/{id}/secrets",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Add API Secret",
    description = "Shared secrets are hashed with the requested hash type (SHA-256 by default) before they are stored.",
    request_body(content = ApiSecretDto),
    responses(
        (status = 201, description = "Secret created", body = Created),
        (status = 400, description = "Unknown secret type or hash type", body = ErrorBody),
        (status = 404, description = "The API resource does not exist", body = ErrorBody)
    )
)]
async fn add_api_secret(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<ApiSecretDto>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    payload.api_resource_id = id;
    let id = state.service.add_api_secret(payload).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-secrets/{secret_id}",
    params(("secret_id" = i32, Path, description = "API secret identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Get API Secret",
    responses(
        (status = 200, description = "The secret", body = ApiSecretDto),
        (status = 404, description = "The secret does not exist", body = ErrorBody)
    )
)]
async fn get_api_secret(
    State(state): State<AppState>,
    Path(secret_id): Path<i32>,
) -> ApiResult<Json<ApiSecretDto>> {
    Ok(Json(state.service.get_api_secret(secret_id).await?))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/api-secrets/{secret_id}",
    params(("secret_id" = i32, Path, description = "API secret identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Delete API Secret",
    responses((status = 204, description = "Secret deleted or already absent"))
)]
async fn delete_api_secret(
    State(state): State<AppState>,
    Path(secret_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let dto = ApiSecretDto {
        api_secret_id: secret_id,
        ..Default::default()
    };
    state.service.delete_api_secret(&dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/secret-options",
    tag = API_RESOURCES_TAG,
    operation_id = "Get Secret Options",
    summary = "Secret types and hash types accepted when adding a secret",
    responses((status = 200, description = "Accepted secret vocabulary", body = SecretOptions))
)]
async fn secret_options(State(state): State<AppState>) -> Json<SecretOptions> {
    Json(state.service.secret_options())
}

// ---------------------------------------------------------------------------
// API resource properties
// ---------------------------------------------------------------------------

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resources/{id}/properties",
    params(("id" = i32, Path, description = "API resource identifier"), ListParams),
    tag = API_RESOURCES_TAG,
    operation_id = "List API Resource Properties",
    responses(
        (status = 200, description = "One page of properties", body = PagedList<ApiResourcePropertyDto>),
        (status = 404, description = "The API resource does not exist", body = ErrorBody)
    )
)]
async fn list_api_resource_properties(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PagedList<ApiResourcePropertyDto>>> {
    let (page, page_size) = paging(&state, &params);
    Ok(Json(
        state
            .service
            .get_api_resource_properties(id, page, page_size)
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload), fields(key = %payload.key))]
#[utoipa::path(
    post,
    path = "/api/api-resources/{id}/properties",
    params(("id" = i32, Path, description = "API resource identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Add API Resource Property",
    request_body(content = ApiResourcePropertyDto),
    responses(
        (status = 201, description = "Property created", body = Created),
        (status = 404, description = "The API resource does not exist", body = ErrorBody),
        (status = 409, description = "The resource already has a property with this key", body = ErrorBody)
    )
)]
async fn add_api_resource_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<ApiResourcePropertyDto>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    payload.api_resource_id = id;
    let id = state.service.add_api_resource_property(payload).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/api-resource-properties/{property_id}",
    params(("property_id" = i32, Path, description = "Property identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Get API Resource Property",
    responses(
        (status = 200, description = "The property", body = ApiResourcePropertyDto),
        (status = 404, description = "The property does not exist", body = ErrorBody)
    )
)]
async fn get_api_resource_property(
    State(state): State<AppState>,
    Path(property_id): Path<i32>,
) -> ApiResult<Json<ApiResourcePropertyDto>> {
    Ok(Json(
        state.service.get_api_resource_property(property_id).await?,
    ))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/api-resource-properties/{property_id}",
    params(("property_id" = i32, Path, description = "Property identifier")),
    tag = API_RESOURCES_TAG,
    operation_id = "Delete API Resource Property",
    responses((status = 204, description = "Property deleted or already absent"))
)]
async fn delete_api_resource_property(
    State(state): State<AppState>,
    Path(property_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let dto = ApiResourcePropertyDto {
        api_resource_property_id: property_id,
        ..Default::default()
    };
    state.service.delete_api_resource_property(&dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

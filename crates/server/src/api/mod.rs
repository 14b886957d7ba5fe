//! HTTP API for managing API resource configuration.
//!
//! This module is organized into submodules:
//! - `api_resources` - API resource, scope, secret and property endpoints (/api/*)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod api_resources;
pub mod health;
pub mod openapi;

pub use api_resources::API_RESOURCES_TAG;
pub use health::MISC_TAG;

use crate::config::AppConfig;
use crate::error::{FailureKind, ServiceError};
use crate::repository::SeaOrmApiResourceRepository;
use crate::service::ApiResourceService;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_redoc::{Redoc, Servable};

/// The service as wired against the SeaORM repository.
pub type AdminService = ApiResourceService<SeaOrmApiResourceRepository>;

/// Shared state for all API endpoints.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AdminService>,
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

/// A [`ServiceError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let (status, error) = match self.0 {
            ServiceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message),
            ServiceError::Validation { kind, message } if kind.is_conflict() => {
                (StatusCode::CONFLICT, message)
            }
            ServiceError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message),
            ServiceError::Store(e) => {
                tracing::error!(
                    name = "api.store_failure",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    error = ?e,
                    message = "Store operation failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error, kind })).into_response()
    }
}

/// Build the application router with OpenAPI documentation attached.
pub fn router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .merge(health::router(state.clone()))
        .merge(api_resources::router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(state))]
pub async fn start_webserver(state: AppState) -> color_eyre::Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}

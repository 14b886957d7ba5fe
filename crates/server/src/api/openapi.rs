//! OpenAPI/Utoipa configuration.

use crate::api::{api_resources::API_RESOURCES_TAG, health::MISC_TAG};
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity Admin API",
        version = "1.0.0",
        description = "Administration API for the API resources, scopes, secrets and properties of an OAuth2/OpenID Connect identity provider."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = API_RESOURCES_TAG, description = "API resource configuration endpoints")
    )
)]
pub struct ApiDoc;

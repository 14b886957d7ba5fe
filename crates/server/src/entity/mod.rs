//! SeaORM entities for the API resource configuration store.
//!
//! An `api_resource` owns its claims, scopes, secrets and properties; every
//! child table references its parent with `ON DELETE CASCADE`.

pub mod api_resource;
pub mod api_resource_claim;
pub mod api_resource_property;
pub mod api_scope;
pub mod api_scope_claim;
pub mod api_secret;

pub use api_resource::Entity as ApiResource;
pub use api_resource_claim::Entity as ApiResourceClaim;
pub use api_resource_property::Entity as ApiResourceProperty;
pub use api_scope::Entity as ApiScope;
pub use api_scope_claim::Entity as ApiScopeClaim;
pub use api_secret::Entity as ApiSecret;

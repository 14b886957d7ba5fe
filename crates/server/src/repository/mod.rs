//! Persistence gateway for the API resource aggregate.
//!
//! The trait hides every ORM detail from the service layer. Each call is one
//! unit of work against the store; calls that touch more than one table run
//! inside a single transaction. Deletes are idempotent.

mod database;

pub use database::SeaOrmApiResourceRepository;

use crate::dto::PagedList;
use crate::entity::{
    api_resource, api_resource_claim, api_resource_property, api_scope, api_scope_claim,
    api_secret,
};
use crate::error::RepositoryError;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// An API resource together with the rows it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceGraph {
    pub resource: api_resource::Model,
    pub claims: Vec<api_resource_claim::Model>,
    pub scopes: Vec<ApiScopeGraph>,
    pub secrets: Vec<api_secret::Model>,
}

/// An API scope together with its user claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiScopeGraph {
    pub scope: api_scope::Model,
    pub claims: Vec<api_scope_claim::Model>,
}

pub trait ApiResourceRepository: Send + Sync {
    /// Page through resources whose name contains `search`, newest first.
    /// Claims are loaded; scopes and secrets are left empty.
    fn get_api_resources(
        &self,
        search: &str,
        page: u64,
        page_size: u64,
    ) -> impl Future<Output = RepositoryResult<PagedList<ApiResourceGraph>>> + Send;
    /// Load a resource with its claims, scopes and secrets.
    fn get_api_resource(
        &self,
        id: i32,
    ) -> impl Future<Output = RepositoryResult<ApiResourceGraph>> + Send;
    fn get_api_resource_name(&self, id: i32)
    -> impl Future<Output = RepositoryResult<String>> + Send;
    /// Whether a resource other than `except_id` already uses `name`.
    /// An `except_id` of 0 checks against every resource.
    fn api_resource_name_exists(
        &self,
        name: &str,
        except_id: i32,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
    /// Insert a resource and any scopes and secrets supplied inline.
    fn add_api_resource(
        &self,
        resource: ApiResourceGraph,
    ) -> impl Future<Output = RepositoryResult<i32>> + Send;
    /// Overwrite scalar fields and claims. Scopes and secrets are untouched.
    fn update_api_resource(
        &self,
        resource: ApiResourceGraph,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
    fn delete_api_resource(&self, id: i32) -> impl Future<Output = RepositoryResult<()>> + Send;

    fn get_api_scopes(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> impl Future<Output = RepositoryResult<PagedList<ApiScopeGraph>>> + Send;
    fn get_api_scope(
        &self,
        api_resource_id: i32,
        api_scope_id: i32,
    ) -> impl Future<Output = RepositoryResult<ApiScopeGraph>> + Send;
    fn api_scope_name_exists(
        &self,
        api_resource_id: i32,
        name: &str,
        except_id: i32,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
    fn add_api_scope(
        &self,
        scope: ApiScopeGraph,
    ) -> impl Future<Output = RepositoryResult<i32>> + Send;
    fn update_api_scope(
        &self,
        scope: ApiScopeGraph,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
    fn delete_api_scope(
        &self,
        api_resource_id: i32,
        api_scope_id: i32,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;

    fn get_api_secrets(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> impl Future<Output = RepositoryResult<PagedList<api_secret::Model>>> + Send;
    fn get_api_secret(
        &self,
        api_secret_id: i32,
    ) -> impl Future<Output = RepositoryResult<api_secret::Model>> + Send;
    /// Insert a secret. The `created` timestamp is assigned by the store.
    fn add_api_secret(
        &self,
        secret: api_secret::Model,
    ) -> impl Future<Output = RepositoryResult<i32>> + Send;
    fn delete_api_secret(
        &self,
        api_secret_id: i32,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;

    fn get_api_resource_properties(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> impl Future<Output = RepositoryResult<PagedList<api_resource_property::Model>>> + Send;
    fn get_api_resource_property(
        &self,
        property_id: i32,
    ) -> impl Future<Output = RepositoryResult<api_resource_property::Model>> + Send;
    fn api_resource_property_key_exists(
        &self,
        api_resource_id: i32,
        key: &str,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
    fn add_api_resource_property(
        &self,
        property: api_resource_property::Model,
    ) -> impl Future<Output = RepositoryResult<i32>> + Send;
    fn delete_api_resource_property(
        &self,
        property_id: i32,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
}

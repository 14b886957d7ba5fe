//! Transfer objects exchanged with callers of the API resource service.
//!
//! Identifiers of `0` mean "not yet stored"; the store assigns the real
//! value on creation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiResourceDto {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Claim types included in access tokens for this API
    #[serde(default)]
    pub user_claims: Vec<String>,
    /// Inserted together with the resource on creation; ignored by updates
    #[serde(default)]
    pub scopes: Vec<ApiScopeDto>,
    #[serde(default)]
    pub secrets: Vec<ApiSecretDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiScopeDto {
    #[serde(default)]
    pub api_resource_id: i32,
    #[serde(default)]
    pub api_scope_id: i32,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub emphasize: bool,
    #[serde(default = "default_enabled")]
    pub show_in_discovery_document: bool,
    #[serde(default)]
    pub user_claims: Vec<String>,
    /// Name of the owning resource, filled in on reads only
    #[serde(default)]
    pub resource_name: Option<String>,
}

/// Hash algorithm applied to shared secrets before they are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum HashType {
    #[default]
    Sha256,
    Sha512,
}

impl std::fmt::Display for HashType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashType::Sha256 => write!(f, "Sha256"),
            HashType::Sha512 => write!(f, "Sha512"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiSecretDto {
    #[serde(default)]
    pub api_resource_id: i32,
    #[serde(default)]
    pub api_secret_id: i32,
    #[serde(rename = "type")]
    pub secret_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub value: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration: Option<OffsetDateTime>,
    /// Only consulted when hashing a shared secret on creation
    #[serde(default)]
    pub hash_type: Option<HashType>,
    /// Server-assigned, present on reads only
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(default)]
    pub api_resource_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiResourcePropertyDto {
    #[serde(default)]
    pub api_resource_id: i32,
    #[serde(default)]
    pub api_resource_property_id: i32,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub api_resource_name: Option<String>,
}

/// Secret types and hash types a caller may choose from when adding a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SecretOptions {
    pub secret_types: Vec<String>,
    pub hash_types: Vec<HashType>,
}

/// One page of a larger result set. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> PagedList<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn default_enabled() -> bool {
    true
}

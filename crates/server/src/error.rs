use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failure kinds the service reports to callers. Each kind maps to exactly
/// one localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ApiResourceExists,
    ApiResourceDoesNotExist,
    ApiScopeExists,
    ApiScopeDoesNotExist,
    ApiSecretExists,
    ApiSecretDoesNotExist,
    ApiSecretTypeUnknown,
    ApiSecretHashTypeUnknown,
    ApiResourcePropertyExists,
    ApiResourcePropertyDoesNotExist,
    IdentifierRequired,
}

impl FailureKind {
    /// Whether this kind describes a conflict with an existing record.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            FailureKind::ApiResourceExists
                | FailureKind::ApiScopeExists
                | FailureKind::ApiSecretExists
                | FailureKind::ApiResourcePropertyExists
        )
    }
}

/// The kinds of record owned by the API resource aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    ApiResource,
    ApiScope,
    ApiSecret,
    ApiResourceProperty,
}

impl RecordKind {
    pub fn missing(self) -> FailureKind {
        match self {
            RecordKind::ApiResource => FailureKind::ApiResourceDoesNotExist,
            RecordKind::ApiScope => FailureKind::ApiScopeDoesNotExist,
            RecordKind::ApiSecret => FailureKind::ApiSecretDoesNotExist,
            RecordKind::ApiResourceProperty => FailureKind::ApiResourcePropertyDoesNotExist,
        }
    }

    pub fn duplicate(self) -> FailureKind {
        match self {
            RecordKind::ApiResource => FailureKind::ApiResourceExists,
            RecordKind::ApiScope => FailureKind::ApiScopeExists,
            RecordKind::ApiSecret => FailureKind::ApiSecretExists,
            RecordKind::ApiResourceProperty => FailureKind::ApiResourcePropertyExists,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::ApiResource => write!(f, "api_resource"),
            RecordKind::ApiScope => write!(f, "api_scope"),
            RecordKind::ApiSecret => write!(f, "api_secret"),
            RecordKind::ApiResourceProperty => write!(f, "api_resource_property"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: RecordKind, id: i32 },
    #[error("{entity} with key {key} already exists")]
    DuplicateKey { entity: RecordKind, key: String },
    #[error("Store error: {0}")]
    Store(#[from] DbErr),
}

impl RepositoryError {
    /// Classify a store error raised while writing `entity` identified by `key`.
    pub fn from_write(err: DbErr, entity: RecordKind, key: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::DuplicateKey {
                entity,
                key: key.into(),
            },
            _ => RepositoryError::Store(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    NotFound { kind: FailureKind, message: String },
    #[error("{message}")]
    Validation { kind: FailureKind, message: String },
    #[error("Store failure: {0}")]
    Store(#[from] DbErr),
}

impl ServiceError {
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ServiceError::NotFound { kind, .. } | ServiceError::Validation { kind, .. } => {
                Some(*kind)
            }
            ServiceError::Store(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

//! API resource service: business rules on top of the repository.
//!
//! The service owns the aggregate-level invariants (unique resource names,
//! unique scope names and property keys within a resource, known secret
//! vocabulary, hashing of shared secrets) and is the boundary where
//! repository failures become typed, localized [`ServiceError`]s. It keeps
//! no state between calls.

use crate::client::{ClientCatalog, SHARED_SECRET};
use crate::dto::{
    ApiResourceDto, ApiResourcePropertyDto, ApiScopeDto, ApiSecretDto, HashType, PagedList,
    SecretOptions,
};
use crate::error::{FailureKind, RepositoryError, ServiceError, ServiceResult};
use crate::localization::ApiResourceLocalizer;
use crate::mapper;
use crate::repository::ApiResourceRepository;
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256, Sha512};
use std::sync::Arc;

pub struct ApiResourceService<R> {
    repository: R,
    localizer: Arc<dyn ApiResourceLocalizer>,
    clients: Arc<dyn ClientCatalog>,
}

/// Hash a shared secret the way the token service expects to find it:
/// base64 of the raw digest.
pub fn hash_secret(value: &str, hash_type: HashType) -> String {
    match hash_type {
        HashType::Sha256 => STANDARD.encode(Sha256::digest(value.as_bytes())),
        HashType::Sha512 => STANDARD.encode(Sha512::digest(value.as_bytes())),
    }
}

impl<R: ApiResourceRepository> ApiResourceService<R> {
    pub fn new(
        repository: R,
        localizer: Arc<dyn ApiResourceLocalizer>,
        clients: Arc<dyn ClientCatalog>,
    ) -> Self {
        Self {
            repository,
            localizer,
            clients,
        }
    }

    fn not_found(&self, kind: FailureKind) -> ServiceError {
        ServiceError::NotFound {
            kind,
            message: self.localizer.message(kind),
        }
    }

    fn invalid(&self, kind: FailureKind) -> ServiceError {
        tracing::warn!(kind = ?kind, "rejected api resource operation");
        ServiceError::Validation {
            kind,
            message: self.localizer.message(kind),
        }
    }

    fn translate(&self, err: RepositoryError) -> ServiceError {
        match err {
            RepositoryError::NotFound { entity, .. } => self.not_found(entity.missing()),
            RepositoryError::DuplicateKey { entity, .. } => self.invalid(entity.duplicate()),
            RepositoryError::Store(e) => ServiceError::Store(e),
        }
    }

    async fn api_resource_name(&self, id: i32) -> ServiceResult<String> {
        self.repository
            .get_api_resource_name(id)
            .await
            .map_err(|e| self.translate(e))
    }

    /// Validate the secret vocabulary and hash shared secrets in place.
    fn prepare_secret(&self, secret: &mut ApiSecretDto) -> ServiceResult<()> {
        if !self.clients.is_known_secret_type(&secret.secret_type) {
            return Err(self.invalid(FailureKind::ApiSecretTypeUnknown));
        }
        let hash_type = secret.hash_type.unwrap_or_default();
        if !self.clients.is_supported_hash_type(hash_type) {
            return Err(self.invalid(FailureKind::ApiSecretHashTypeUnknown));
        }
        if secret.secret_type == SHARED_SECRET {
            secret.value = hash_secret(&secret.value, hash_type);
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // API resources
    // -------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn get_api_resources(
        &self,
        search: &str,
        page: u64,
        page_size: u64,
    ) -> ServiceResult<PagedList<ApiResourceDto>> {
        let page = self
            .repository
            .get_api_resources(search, page, page_size)
            .await
            .map_err(|e| self.translate(e))?;
        Ok(page.map(mapper::api_resource_to_dto))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_resource(&self, id: i32) -> ServiceResult<ApiResourceDto> {
        let graph = self
            .repository
            .get_api_resource(id)
            .await
            .map_err(|e| self.translate(e))?;
        Ok(mapper::api_resource_to_dto(graph))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_resource_name(&self, id: i32) -> ServiceResult<String> {
        self.api_resource_name(id).await
    }

    /// Whether `dto` can be stored without clashing with another resource's name.
    #[tracing::instrument(skip(self, dto), fields(id = dto.id, name = %dto.name))]
    pub async fn can_insert_api_resource(&self, dto: &ApiResourceDto) -> ServiceResult<bool> {
        let exists = self
            .repository
            .api_resource_name_exists(&dto.name, dto.id)
            .await
            .map_err(|e| self.translate(e))?;
        Ok(!exists)
    }

    #[tracing::instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn add_api_resource(&self, mut dto: ApiResourceDto) -> ServiceResult<i32> {
        dto.id = 0;
        if !self.can_insert_api_resource(&dto).await? {
            return Err(self.invalid(FailureKind::ApiResourceExists));
        }
        for secret in &mut dto.secrets {
            self.prepare_secret(secret)?;
        }

        let id = self
            .repository
            .add_api_resource(mapper::api_resource_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(id, name = %dto.name, "added api resource");
        Ok(id)
    }

    /// Overwrite the resource's fields and claims. Scopes and secrets are
    /// managed through their own operations.
    #[tracing::instrument(skip(self, dto), fields(id = dto.id, name = %dto.name))]
    pub async fn update_api_resource(&self, dto: ApiResourceDto) -> ServiceResult<()> {
        if dto.id == 0 {
            return Err(self.invalid(FailureKind::IdentifierRequired));
        }
        self.api_resource_name(dto.id).await?;
        if !self.can_insert_api_resource(&dto).await? {
            return Err(self.invalid(FailureKind::ApiResourceExists));
        }

        // A row deleted between the check above and this write surfaces as NotFound.
        self.repository
            .update_api_resource(mapper::api_resource_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(id = dto.id, "updated api resource");
        Ok(())
    }

    /// Delete the resource with everything it owns. Deleting a missing
    /// resource succeeds.
    #[tracing::instrument(skip(self, dto), fields(id = dto.id))]
    pub async fn delete_api_resource(&self, dto: &ApiResourceDto) -> ServiceResult<()> {
        self.repository
            .delete_api_resource(dto.id)
            .await
            .map_err(|e| self.translate(e))?;
        tracing::info!(id = dto.id, "deleted api resource");
        Ok(())
    }

    // -------------------------------------------------------------------
    // API scopes
    // -------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn get_api_scopes(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> ServiceResult<PagedList<ApiScopeDto>> {
        let resource_name = self.api_resource_name(api_resource_id).await?;
        let page = self
            .repository
            .get_api_scopes(api_resource_id, page, page_size)
            .await
            .map_err(|e| self.translate(e))?;

        Ok(page.map(|graph| ApiScopeDto {
            resource_name: Some(resource_name.clone()),
            ..mapper::api_scope_to_dto(graph)
        }))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_scope(
        &self,
        api_resource_id: i32,
        api_scope_id: i32,
    ) -> ServiceResult<ApiScopeDto> {
        let resource_name = self.api_resource_name(api_resource_id).await?;
        let graph = self
            .repository
            .get_api_scope(api_resource_id, api_scope_id)
            .await
            .map_err(|e| self.translate(e))?;

        Ok(ApiScopeDto {
            resource_name: Some(resource_name),
            ..mapper::api_scope_to_dto(graph)
        })
    }

    /// Whether `dto`'s name is free within its resource.
    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, name = %dto.name))]
    pub async fn can_insert_api_scope(&self, dto: &ApiScopeDto) -> ServiceResult<bool> {
        let exists = self
            .repository
            .api_scope_name_exists(dto.api_resource_id, &dto.name, dto.api_scope_id)
            .await
            .map_err(|e| self.translate(e))?;
        Ok(!exists)
    }

    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, name = %dto.name))]
    pub async fn add_api_scope(&self, mut dto: ApiScopeDto) -> ServiceResult<i32> {
        dto.api_scope_id = 0;
        self.api_resource_name(dto.api_resource_id).await?;
        if !self.can_insert_api_scope(&dto).await? {
            return Err(self.invalid(FailureKind::ApiScopeExists));
        }

        let id = self
            .repository
            .add_api_scope(mapper::api_scope_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(
            api_resource_id = dto.api_resource_id,
            api_scope_id = id,
            "added api scope"
        );
        Ok(id)
    }

    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, api_scope_id = dto.api_scope_id))]
    pub async fn update_api_scope(&self, dto: ApiScopeDto) -> ServiceResult<()> {
        if dto.api_resource_id == 0 || dto.api_scope_id == 0 {
            return Err(self.invalid(FailureKind::IdentifierRequired));
        }
        self.api_resource_name(dto.api_resource_id).await?;
        self.repository
            .get_api_scope(dto.api_resource_id, dto.api_scope_id)
            .await
            .map_err(|e| self.translate(e))?;
        if !self.can_insert_api_scope(&dto).await? {
            return Err(self.invalid(FailureKind::ApiScopeExists));
        }

        self.repository
            .update_api_scope(mapper::api_scope_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(
            api_resource_id = dto.api_resource_id,
            api_scope_id = dto.api_scope_id,
            "updated api scope"
        );
        Ok(())
    }

    /// Delete a scope of a resource. Deleting a missing scope succeeds and
    /// never touches the parent resource.
    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, api_scope_id = dto.api_scope_id))]
    pub async fn delete_api_scope(&self, dto: &ApiScopeDto) -> ServiceResult<()> {
        self.repository
            .delete_api_scope(dto.api_resource_id, dto.api_scope_id)
            .await
            .map_err(|e| self.translate(e))?;
        tracing::info!(
            api_resource_id = dto.api_resource_id,
            api_scope_id = dto.api_scope_id,
            "deleted api scope"
        );
        Ok(())
    }

    // -------------------------------------------------------------------
    // API secrets
    // -------------------------------------------------------------------

    /// The secret vocabulary published by the client subsystem.
    pub fn secret_options(&self) -> SecretOptions {
        SecretOptions {
            secret_types: self.clients.secret_types(),
            hash_types: self.clients.hash_types(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_secrets(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> ServiceResult<PagedList<ApiSecretDto>> {
        let resource_name = self.api_resource_name(api_resource_id).await?;
        let page = self
            .repository
            .get_api_secrets(api_resource_id, page, page_size)
            .await
            .map_err(|e| self.translate(e))?;

        Ok(page.map(|secret| ApiSecretDto {
            api_resource_name: Some(resource_name.clone()),
            ..mapper::api_secret_to_dto(secret)
        }))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_secret(&self, api_secret_id: i32) -> ServiceResult<ApiSecretDto> {
        let secret = self
            .repository
            .get_api_secret(api_secret_id)
            .await
            .map_err(|e| self.translate(e))?;
        let resource_name = self.api_resource_name(secret.api_resource_id).await?;

        Ok(ApiSecretDto {
            api_resource_name: Some(resource_name),
            ..mapper::api_secret_to_dto(secret)
        })
    }

    /// Store a new secret. Shared secrets are hashed first; the plain value
    /// is never persisted.
    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, secret_type = %dto.secret_type))]
    pub async fn add_api_secret(&self, mut dto: ApiSecretDto) -> ServiceResult<i32> {
        dto.api_secret_id = 0;
        self.api_resource_name(dto.api_resource_id).await?;
        self.prepare_secret(&mut dto)?;

        let id = self
            .repository
            .add_api_secret(mapper::api_secret_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(
            api_resource_id = dto.api_resource_id,
            api_secret_id = id,
            "added api secret"
        );
        Ok(id)
    }

    #[tracing::instrument(skip(self, dto), fields(api_secret_id = dto.api_secret_id))]
    pub async fn delete_api_secret(&self, dto: &ApiSecretDto) -> ServiceResult<()> {
        self.repository
            .delete_api_secret(dto.api_secret_id)
            .await
            .map_err(|e| self.translate(e))?;
        tracing::info!(api_secret_id = dto.api_secret_id, "deleted api secret");
        Ok(())
    }

    // -------------------------------------------------------------------
    // API resource properties
    // -------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn get_api_resource_properties(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> ServiceResult<PagedList<ApiResourcePropertyDto>> {
        let resource_name = self.api_resource_name(api_resource_id).await?;
        let page = self
            .repository
            .get_api_resource_properties(api_resource_id, page, page_size)
            .await
            .map_err(|e| self.translate(e))?;

        Ok(page.map(|property| ApiResourcePropertyDto {
            api_resource_name: Some(resource_name.clone()),
            ..mapper::api_resource_property_to_dto(property)
        }))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_api_resource_property(
        &self,
        property_id: i32,
    ) -> ServiceResult<ApiResourcePropertyDto> {
        let property = self
            .repository
            .get_api_resource_property(property_id)
            .await
            .map_err(|e| self.translate(e))?;
        let resource_name = self.api_resource_name(property.api_resource_id).await?;

        Ok(ApiResourcePropertyDto {
            api_resource_name: Some(resource_name),
            ..mapper::api_resource_property_to_dto(property)
        })
    }

    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, key = %dto.key))]
    pub async fn can_insert_api_resource_property(
        &self,
        dto: &ApiResourcePropertyDto,
    ) -> ServiceResult<bool> {
        let exists = self
            .repository
            .api_resource_property_key_exists(dto.api_resource_id, &dto.key)
            .await
            .map_err(|e| self.translate(e))?;
        Ok(!exists)
    }

    #[tracing::instrument(skip(self, dto), fields(api_resource_id = dto.api_resource_id, key = %dto.key))]
    pub async fn add_api_resource_property(
        &self,
        mut dto: ApiResourcePropertyDto,
    ) -> ServiceResult<i32> {
        dto.api_resource_property_id = 0;
        self.api_resource_name(dto.api_resource_id).await?;
        if !self.can_insert_api_resource_property(&dto).await? {
            return Err(self.invalid(FailureKind::ApiResourcePropertyExists));
        }

        let id = self
            .repository
            .add_api_resource_property(mapper::api_resource_property_to_entity(&dto))
            .await
            .map_err(|e| self.translate(e))?;

        tracing::info!(
            api_resource_id = dto.api_resource_id,
            api_resource_property_id = id,
            "added api resource property"
        );
        Ok(id)
    }

    #[tracing::instrument(skip(self, dto), fields(api_resource_property_id = dto.api_resource_property_id))]
    pub async fn delete_api_resource_property(
        &self,
        dto: &ApiResourcePropertyDto,
    ) -> ServiceResult<()> {
        self.repository
            .delete_api_resource_property(dto.api_resource_property_id)
            .await
            .map_err(|e| self.translate(e))?;
        tracing::info!(
            api_resource_property_id = dto.api_resource_property_id,
            "deleted api resource property"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hash_matches_known_digest() {
        // echo -n secret | openssl dgst -sha256 -binary | base64
        assert_eq!(
            hash_secret("secret", HashType::Sha256),
            "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols="
        );
    }

    #[test]
    fn sha512_hash_differs_from_sha256() {
        let a = hash_secret("secret", HashType::Sha256);
        let b = hash_secret("secret", HashType::Sha512);
        assert_ne!(a, b);
        // 64 raw bytes encode to 88 base64 characters
        assert_eq!(b.len(), 88);
        assert_eq!(a.len(), 44);
    }
}

//! Conversion between stored entities and transfer objects.
//!
//! Every entity built from caller input goes through this module. Mapping
//! is pure: identifiers assigned by the store are copied, never invented,
//! and a dto -> entity -> dto round trip preserves every populated field.

use crate::dto::{ApiResourceDto, ApiResourcePropertyDto, ApiScopeDto, ApiSecretDto};
use crate::entity::{
    api_resource, api_resource_claim, api_resource_property, api_scope, api_scope_claim,
    api_secret,
};
use crate::repository::{ApiResourceGraph, ApiScopeGraph};
use time::OffsetDateTime;

pub fn api_resource_to_dto(graph: ApiResourceGraph) -> ApiResourceDto {
    let ApiResourceGraph {
        resource,
        claims,
        scopes,
        secrets,
    } = graph;

    ApiResourceDto {
        id: resource.id,
        name: resource.name,
        display_name: resource.display_name,
        description: resource.description,
        enabled: resource.enabled,
        user_claims: claims.into_iter().map(|c| c.claim_type).collect(),
        scopes: scopes.into_iter().map(api_scope_to_dto).collect(),
        secrets: secrets.into_iter().map(api_secret_to_dto).collect(),
    }
}

pub fn api_resource_to_entity(dto: &ApiResourceDto) -> ApiResourceGraph {
    ApiResourceGraph {
        resource: api_resource::Model {
            id: dto.id,
            name: dto.name.clone(),
            display_name: dto.display_name.clone(),
            description: dto.description.clone(),
            enabled: dto.enabled,
        },
        claims: dto
            .user_claims
            .iter()
            .map(|claim_type| api_resource_claim::Model {
                id: 0,
                api_resource_id: dto.id,
                claim_type: claim_type.clone(),
            })
            .collect(),
        scopes: dto
            .scopes
            .iter()
            .map(|scope| {
                let mut graph = api_scope_to_entity(scope);
                graph.scope.api_resource_id = dto.id;
                graph
            })
            .collect(),
        secrets: dto
            .secrets
            .iter()
            .map(|secret| api_secret::Model {
                api_resource_id: dto.id,
                ..api_secret_to_entity(secret)
            })
            .collect(),
    }
}

pub fn api_scope_to_dto(graph: ApiScopeGraph) -> ApiScopeDto {
    let ApiScopeGraph { scope, claims } = graph;

    ApiScopeDto {
        api_resource_id: scope.api_resource_id,
        api_scope_id: scope.id,
        name: scope.name,
        display_name: scope.display_name,
        description: scope.description,
        required: scope.required,
        emphasize: scope.emphasize,
        show_in_discovery_document: scope.show_in_discovery_document,
        user_claims: claims.into_iter().map(|c| c.claim_type).collect(),
        resource_name: None,
    }
}

pub fn api_scope_to_entity(dto: &ApiScopeDto) -> ApiScopeGraph {
    ApiScopeGraph {
        scope: api_scope::Model {
            id: dto.api_scope_id,
            api_resource_id: dto.api_resource_id,
            name: dto.name.clone(),
            display_name: dto.display_name.clone(),
            description: dto.description.clone(),
            required: dto.required,
            emphasize: dto.emphasize,
            show_in_discovery_document: dto.show_in_discovery_document,
        },
        claims: dto
            .user_claims
            .iter()
            .map(|claim_type| api_scope_claim::Model {
                id: 0,
                api_scope_id: dto.api_scope_id,
                claim_type: claim_type.clone(),
            })
            .collect(),
    }
}

pub fn api_secret_to_dto(secret: api_secret::Model) -> ApiSecretDto {
    ApiSecretDto {
        api_resource_id: secret.api_resource_id,
        api_secret_id: secret.id,
        secret_type: secret.secret_type,
        description: secret.description,
        value: secret.value,
        expiration: secret.expiration,
        hash_type: None,
        created: Some(secret.created),
        api_resource_name: None,
    }
}

pub fn api_secret_to_entity(dto: &ApiSecretDto) -> api_secret::Model {
    api_secret::Model {
        id: dto.api_secret_id,
        api_resource_id: dto.api_resource_id,
        value: dto.value.clone(),
        secret_type: dto.secret_type.clone(),
        description: dto.description.clone(),
        expiration: dto.expiration,
        // replaced by the store on insert
        created: dto.created.unwrap_or(OffsetDateTime::UNIX_EPOCH),
    }
}

pub fn api_resource_property_to_dto(property: api_resource_property::Model) -> ApiResourcePropertyDto {
    ApiResourcePropertyDto {
        api_resource_id: property.api_resource_id,
        api_resource_property_id: property.id,
        key: property.key,
        value: property.value,
        api_resource_name: None,
    }
}

pub fn api_resource_property_to_entity(dto: &ApiResourcePropertyDto) -> api_resource_property::Model {
    api_resource_property::Model {
        id: dto.api_resource_property_id,
        api_resource_id: dto.api_resource_id,
        key: dto.key.clone(),
        value: dto.value.clone(),
    }
}

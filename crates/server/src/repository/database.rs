//! SeaORM implementation of [`ApiResourceRepository`].

use super::{ApiResourceGraph, ApiResourceRepository, ApiScopeGraph, RepositoryResult};
use crate::dto::PagedList;
use crate::entity::{
    api_resource, api_resource_claim, api_resource_property, api_scope, api_scope_claim,
    api_secret,
};
use crate::error::{RecordKind, RepositoryError};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, LoaderTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    TransactionTrait,
};
use sea_orm::sea_query::LikeExpr;
use std::sync::Arc;
use time::OffsetDateTime;

/// Repository backed by any database SeaORM can talk to.
#[derive(Clone, Debug)]
pub struct SeaOrmApiResourceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmApiResourceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: u64,
    page_size: u64,
) -> Result<PagedList<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let page = page.max(1);
    let page_size = page_size.max(1);
    let paginator = select.paginate(db, page_size);
    let total_count = paginator.num_items().await?;
    // Pages whose offset overflows or lies past the end are empty.
    let items = match (page - 1).checked_mul(page_size) {
        Some(offset) if offset < total_count => paginator.fetch_page(page - 1).await?,
        _ => Vec::new(),
    };
    Ok(PagedList {
        items,
        total_count,
        page,
        page_size,
    })
}

/// `LIKE` pattern matching `search` literally anywhere in the value.
fn name_contains(search: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

async fn require_api_resource<C: ConnectionTrait>(db: &C, id: i32) -> RepositoryResult<()> {
    match api_resource::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(RepositoryError::NotFound {
            entity: RecordKind::ApiResource,
            id,
        }),
    }
}

async fn insert_resource_claims<C: ConnectionTrait>(
    db: &C,
    api_resource_id: i32,
    claims: &[api_resource_claim::Model],
) -> Result<(), DbErr> {
    for claim in claims {
        api_resource_claim::ActiveModel {
            api_resource_id: Set(api_resource_id),
            claim_type: Set(claim.claim_type.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn insert_scope_claims<C: ConnectionTrait>(
    db: &C,
    api_scope_id: i32,
    claims: &[api_scope_claim::Model],
) -> Result<(), DbErr> {
    for claim in claims {
        api_scope_claim::ActiveModel {
            api_scope_id: Set(api_scope_id),
            claim_type: Set(claim.claim_type.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn insert_scope<C: ConnectionTrait>(
    db: &C,
    api_resource_id: i32,
    graph: ApiScopeGraph,
) -> RepositoryResult<i32> {
    let ApiScopeGraph { scope, claims } = graph;
    let name = scope.name.clone();
    let inserted = api_scope::ActiveModel {
        api_resource_id: Set(api_resource_id),
        name: Set(scope.name),
        display_name: Set(scope.display_name),
        description: Set(scope.description),
        required: Set(scope.required),
        emphasize: Set(scope.emphasize),
        show_in_discovery_document: Set(scope.show_in_discovery_document),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| RepositoryError::from_write(e, RecordKind::ApiScope, name))?;

    insert_scope_claims(db, inserted.id, &claims).await?;
    Ok(inserted.id)
}

async fn insert_secret<C: ConnectionTrait>(
    db: &C,
    api_resource_id: i32,
    secret: api_secret::Model,
) -> Result<i32, DbErr> {
    let inserted = api_secret::ActiveModel {
        api_resource_id: Set(api_resource_id),
        value: Set(secret.value),
        secret_type: Set(secret.secret_type),
        description: Set(secret.description),
        expiration: Set(secret.expiration),
        created: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(inserted.id)
}

/// Attach claims to a page of scopes, keeping the page order.
async fn with_scope_claims(
    db: &DatabaseConnection,
    scopes: Vec<api_scope::Model>,
) -> Result<Vec<ApiScopeGraph>, DbErr> {
    let claims = scopes
        .load_many(
            api_scope_claim::Entity::find().order_by_asc(api_scope_claim::Column::Id),
            db,
        )
        .await?;
    Ok(scopes
        .into_iter()
        .zip(claims)
        .map(|(scope, claims)| ApiScopeGraph { scope, claims })
        .collect())
}

impl ApiResourceRepository for SeaOrmApiResourceRepository {
    #[tracing::instrument(skip(self))]
    async fn get_api_resources(
        &self,
        search: &str,
        page: u64,
        page_size: u64,
    ) -> RepositoryResult<PagedList<ApiResourceGraph>> {
        let db = self.db.as_ref();
        let mut select = api_resource::Entity::find().order_by_desc(api_resource::Column::Id);
        if !search.is_empty() {
            select = select.filter(api_resource::Column::Name.like(name_contains(search)));
        }

        let page = fetch_page(db, select, page, page_size).await?;
        let claims = page
            .items
            .load_many(
                api_resource_claim::Entity::find().order_by_asc(api_resource_claim::Column::Id),
                db,
            )
            .await?;

        let mut claims = claims.into_iter();
        Ok(page.map(|resource| ApiResourceGraph {
            resource,
            claims: claims.next().unwrap_or_default(),
            scopes: Vec::new(),
            secrets: Vec::new(),
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_resource(&self, id: i32) -> RepositoryResult<ApiResourceGraph> {
        let db = self.db.as_ref();
        let resource = api_resource::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: RecordKind::ApiResource,
                id,
            })?;

        let claims = resource
            .find_related(api_resource_claim::Entity)
            .order_by_asc(api_resource_claim::Column::Id)
            .all(db)
            .await?;
        let scopes = resource
            .find_related(api_scope::Entity)
            .order_by_asc(api_scope::Column::Id)
            .all(db)
            .await?;
        let scopes = with_scope_claims(db, scopes).await?;
        let secrets = resource
            .find_related(api_secret::Entity)
            .order_by_asc(api_secret::Column::Id)
            .all(db)
            .await?;

        Ok(ApiResourceGraph {
            resource,
            claims,
            scopes,
            secrets,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_resource_name(&self, id: i32) -> RepositoryResult<String> {
        api_resource::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(|r| r.name)
            .ok_or(RepositoryError::NotFound {
                entity: RecordKind::ApiResource,
                id,
            })
    }

    #[tracing::instrument(skip(self))]
    async fn api_resource_name_exists(&self, name: &str, except_id: i32) -> RepositoryResult<bool> {
        let mut select = api_resource::Entity::find().filter(api_resource::Column::Name.eq(name));
        if except_id != 0 {
            select = select.filter(api_resource::Column::Id.ne(except_id));
        }
        Ok(select.count(self.db.as_ref()).await? > 0)
    }

    #[tracing::instrument(skip(self, graph), fields(name = %graph.resource.name))]
    async fn add_api_resource(&self, graph: ApiResourceGraph) -> RepositoryResult<i32> {
        let ApiResourceGraph {
            resource,
            claims,
            scopes,
            secrets,
        } = graph;
        let name = resource.name.clone();

        let txn = self.db.begin().await?;
        let inserted = api_resource::ActiveModel {
            name: Set(resource.name),
            display_name: Set(resource.display_name),
            description: Set(resource.description),
            enabled: Set(resource.enabled),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| RepositoryError::from_write(e, RecordKind::ApiResource, name))?;

        insert_resource_claims(&txn, inserted.id, &claims).await?;
        for scope in scopes {
            insert_scope(&txn, inserted.id, scope).await?;
        }
        for secret in secrets {
            insert_secret(&txn, inserted.id, secret).await?;
        }
        txn.commit().await?;

        Ok(inserted.id)
    }

    #[tracing::instrument(skip(self, graph), fields(id = graph.resource.id))]
    async fn update_api_resource(&self, graph: ApiResourceGraph) -> RepositoryResult<()> {
        let ApiResourceGraph {
            resource, claims, ..
        } = graph;
        let id = resource.id;
        let name = resource.name.clone();

        let txn = self.db.begin().await?;
        let result = api_resource::Entity::update_many()
            .set(api_resource::ActiveModel {
                name: Set(resource.name),
                display_name: Set(resource.display_name),
                description: Set(resource.description),
                enabled: Set(resource.enabled),
                ..Default::default()
            })
            .filter(api_resource::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| RepositoryError::from_write(e, RecordKind::ApiResource, name))?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: RecordKind::ApiResource,
                id,
            });
        }

        api_resource_claim::Entity::delete_many()
            .filter(api_resource_claim::Column::ApiResourceId.eq(id))
            .exec(&txn)
            .await?;
        insert_resource_claims(&txn, id, &claims).await?;
        txn.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_api_resource(&self, id: i32) -> RepositoryResult<()> {
        let txn = self.db.begin().await?;

        let scope_ids: Vec<i32> = api_scope::Entity::find()
            .filter(api_scope::Column::ApiResourceId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if !scope_ids.is_empty() {
            api_scope_claim::Entity::delete_many()
                .filter(api_scope_claim::Column::ApiScopeId.is_in(scope_ids))
                .exec(&txn)
                .await?;
        }
        api_scope::Entity::delete_many()
            .filter(api_scope::Column::ApiResourceId.eq(id))
            .exec(&txn)
            .await?;
        api_secret::Entity::delete_many()
            .filter(api_secret::Column::ApiResourceId.eq(id))
            .exec(&txn)
            .await?;
        api_resource_claim::Entity::delete_many()
            .filter(api_resource_claim::Column::ApiResourceId.eq(id))
            .exec(&txn)
            .await?;
        api_resource_property::Entity::delete_many()
            .filter(api_resource_property::Column::ApiResourceId.eq(id))
            .exec(&txn)
            .await?;
        let result = api_resource::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected == 0 {
            tracing::debug!(id, "api resource already absent");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_scopes(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> RepositoryResult<PagedList<ApiScopeGraph>> {
        let db = self.db.as_ref();
        let select = api_scope::Entity::find()
            .filter(api_scope::Column::ApiResourceId.eq(api_resource_id))
            .order_by_desc(api_scope::Column::Id);
        let page = fetch_page(db, select, page, page_size).await?;
        let PagedList {
            items,
            total_count,
            page,
            page_size,
        } = page;

        Ok(PagedList {
            items: with_scope_claims(db, items).await?,
            total_count,
            page,
            page_size,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_scope(
        &self,
        api_resource_id: i32,
        api_scope_id: i32,
    ) -> RepositoryResult<ApiScopeGraph> {
        let db = self.db.as_ref();
        let scope = api_scope::Entity::find_by_id(api_scope_id)
            .filter(api_scope::Column::ApiResourceId.eq(api_resource_id))
            .one(db)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: RecordKind::ApiScope,
                id: api_scope_id,
            })?;
        let claims = scope
            .find_related(api_scope_claim::Entity)
            .order_by_asc(api_scope_claim::Column::Id)
            .all(db)
            .await?;
        Ok(ApiScopeGraph { scope, claims })
    }

    #[tracing::instrument(skip(self))]
    async fn api_scope_name_exists(
        &self,
        api_resource_id: i32,
        name: &str,
        except_id: i32,
    ) -> RepositoryResult<bool> {
        let mut select = api_scope::Entity::find()
            .filter(api_scope::Column::ApiResourceId.eq(api_resource_id))
            .filter(api_scope::Column::Name.eq(name));
        if except_id != 0 {
            select = select.filter(api_scope::Column::Id.ne(except_id));
        }
        Ok(select.count(self.db.as_ref()).await? > 0)
    }

    #[tracing::instrument(skip(self, graph), fields(api_resource_id = graph.scope.api_resource_id, name = %graph.scope.name))]
    async fn add_api_scope(&self, graph: ApiScopeGraph) -> RepositoryResult<i32> {
        let api_resource_id = graph.scope.api_resource_id;

        let txn = self.db.begin().await?;
        require_api_resource(&txn, api_resource_id).await?;
        let id = insert_scope(&txn, api_resource_id, graph).await?;
        txn.commit().await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self, graph), fields(api_resource_id = graph.scope.api_resource_id, api_scope_id = graph.scope.id))]
    async fn update_api_scope(&self, graph: ApiScopeGraph) -> RepositoryResult<()> {
        let ApiScopeGraph { scope, claims } = graph;
        let id = scope.id;
        let name = scope.name.clone();

        let txn = self.db.begin().await?;
        let result = api_scope::Entity::update_many()
            .set(api_scope::ActiveModel {
                name: Set(scope.name),
                display_name: Set(scope.display_name),
                description: Set(scope.description),
                required: Set(scope.required),
                emphasize: Set(scope.emphasize),
                show_in_discovery_document: Set(scope.show_in_discovery_document),
                ..Default::default()
            })
            .filter(api_scope::Column::Id.eq(id))
            .filter(api_scope::Column::ApiResourceId.eq(scope.api_resource_id))
            .exec(&txn)
            .await
            .map_err(|e| RepositoryError::from_write(e, RecordKind::ApiScope, name))?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: RecordKind::ApiScope,
                id,
            });
        }

        api_scope_claim::Entity::delete_many()
            .filter(api_scope_claim::Column::ApiScopeId.eq(id))
            .exec(&txn)
            .await?;
        insert_scope_claims(&txn, id, &claims).await?;
        txn.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_api_scope(&self, api_resource_id: i32, api_scope_id: i32) -> RepositoryResult<()> {
        let txn = self.db.begin().await?;
        let owned = api_scope::Entity::find_by_id(api_scope_id)
            .filter(api_scope::Column::ApiResourceId.eq(api_resource_id))
            .one(&txn)
            .await?;
        if owned.is_none() {
            tracing::debug!(api_resource_id, api_scope_id, "api scope already absent");
            return Ok(());
        }

        api_scope_claim::Entity::delete_many()
            .filter(api_scope_claim::Column::ApiScopeId.eq(api_scope_id))
            .exec(&txn)
            .await?;
        api_scope::Entity::delete_by_id(api_scope_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_secrets(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> RepositoryResult<PagedList<api_secret::Model>> {
        let select = api_secret::Entity::find()
            .filter(api_secret::Column::ApiResourceId.eq(api_resource_id))
            .order_by_desc(api_secret::Column::Id);
        Ok(fetch_page(self.db.as_ref(), select, page, page_size).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_secret(&self, api_secret_id: i32) -> RepositoryResult<api_secret::Model> {
        api_secret::Entity::find_by_id(api_secret_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: RecordKind::ApiSecret,
                id: api_secret_id,
            })
    }

    #[tracing::instrument(skip(self, secret), fields(api_resource_id = secret.api_resource_id, secret_type = %secret.secret_type))]
    async fn add_api_secret(&self, secret: api_secret::Model) -> RepositoryResult<i32> {
        let api_resource_id = secret.api_resource_id;

        let txn = self.db.begin().await?;
        require_api_resource(&txn, api_resource_id).await?;
        let id = insert_secret(&txn, api_resource_id, secret).await?;
        txn.commit().await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_api_secret(&self, api_secret_id: i32) -> RepositoryResult<()> {
        api_secret::Entity::delete_by_id(api_secret_id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_resource_properties(
        &self,
        api_resource_id: i32,
        page: u64,
        page_size: u64,
    ) -> RepositoryResult<PagedList<api_resource_property::Model>> {
        let select = api_resource_property::Entity::find()
            .filter(api_resource_property::Column::ApiResourceId.eq(api_resource_id))
            .order_by_desc(api_resource_property::Column::Id);
        Ok(fetch_page(self.db.as_ref(), select, page, page_size).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_api_resource_property(
        &self,
        property_id: i32,
    ) -> RepositoryResult<api_resource_property::Model> {
        api_resource_property::Entity::find_by_id(property_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: RecordKind::ApiResourceProperty,
                id: property_id,
            })
    }

    #[tracing::instrument(skip(self))]
    async fn api_resource_property_key_exists(
        &self,
        api_resource_id: i32,
        key: &str,
    ) -> RepositoryResult<bool> {
        let count = api_resource_property::Entity::find()
            .filter(api_resource_property::Column::ApiResourceId.eq(api_resource_id))
            .filter(api_resource_property::Column::Key.eq(key))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    #[tracing::instrument(skip(self, property), fields(api_resource_id = property.api_resource_id, key = %property.key))]
    async fn add_api_resource_property(
        &self,
        property: api_resource_property::Model,
    ) -> RepositoryResult<i32> {
        let api_resource_id = property.api_resource_id;
        let key = property.key.clone();

        let txn = self.db.begin().await?;
        require_api_resource(&txn, api_resource_id).await?;
        let inserted = api_resource_property::ActiveModel {
            api_resource_id: Set(api_resource_id),
            key: Set(property.key),
            value: Set(property.value),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| RepositoryError::from_write(e, RecordKind::ApiResourceProperty, key))?;
        txn.commit().await?;

        Ok(inserted.id)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_api_resource_property(&self, property_id: i32) -> RepositoryResult<()> {
        api_resource_property::Entity::delete_by_id(property_id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

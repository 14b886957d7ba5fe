//! Schema bootstrap for the configuration store.
//!
//! Tables are derived from the entity definitions so the column layout, the
//! cascading foreign keys and the single-column unique constraints cannot
//! drift from the models. Composite unique indexes are declared here.
//! Every statement is `IF NOT EXISTS`, so running this against an already
//! provisioned database is a no-op.

use crate::entity::{
    api_resource, api_resource_claim, api_resource_property, api_scope, api_scope_claim,
    api_secret,
};
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

/// Create any missing table or index.
#[tracing::instrument(skip(db))]
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children so foreign keys resolve on every backend.
    create_table(db, &schema, api_resource::Entity).await?;
    create_table(db, &schema, api_resource_claim::Entity).await?;
    create_table(db, &schema, api_resource_property::Entity).await?;
    create_table(db, &schema, api_scope::Entity).await?;
    create_table(db, &schema, api_scope_claim::Entity).await?;
    create_table(db, &schema, api_secret::Entity).await?;

    for index in composite_indexes() {
        db.execute(backend.build(&index)).await?;
    }

    tracing::info!(backend = ?backend, "configuration store schema ready");
    Ok(())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}

fn composite_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_api_scope_resource_name")
            .table(api_scope::Entity)
            .col(api_scope::Column::ApiResourceId)
            .col(api_scope::Column::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_api_resource_property_resource_key")
            .table(api_resource_property::Entity)
            .col(api_resource_property::Column::ApiResourceId)
            .col(api_resource_property::Column::Key)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_api_secret_resource")
            .table(api_secret::Entity)
            .col(api_secret::Column::ApiResourceId)
            .if_not_exists()
            .to_owned(),
    ]
}

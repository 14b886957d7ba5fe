//! API secret entity - credential material authenticating an API resource.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_secret")]
pub struct Model {
    /// Globally unique, not scoped by resource
    #[sea_orm(primary_key)]
    pub id: i32,
    pub api_resource_id: i32,
    /// Hashed for shared secrets, stored as given for certificate references
    pub value: String,
    /// Secret type discriminator (e.g. "SharedSecret", "X509Thumbprint")
    #[sea_orm(column_name = "type")]
    pub secret_type: String,
    pub description: Option<String>,
    pub expiration: Option<OffsetDateTime>,
    pub created: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::api_resource::Entity",
        from = "Column::ApiResourceId",
        to = "super::api_resource::Column::Id",
        on_delete = "Cascade"
    )]
    ApiResource,
}

impl Related<super::api_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiResource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

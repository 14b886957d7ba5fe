//! Free-form key/value metadata attached to an API resource.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_resource_property")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub api_resource_id: i32,
    /// Unique within the owning resource
    pub key: String,
    pub value: String,
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

//! API scope entity - a named permission issued under an API resource.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_scope")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Reference to api_resource.id
    pub api_resource_id: i32,
    /// Unique within the owning resource
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    pub emphasize: bool,
    pub show_in_discovery_document: bool,
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
    #[sea_orm(has_many = "super::api_scope_claim::Entity")]
    Claims,
}

impl Related<super::api_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiResource.def()
    }
}

impl Related<super::api_scope_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

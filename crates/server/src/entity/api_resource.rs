//! API resource entity - a protected API registered with the identity provider.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_resource")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique across the whole table
    #[sea_orm(unique)]
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::api_resource_claim::Entity")]
    Claims,
    #[sea_orm(has_many = "super::api_scope::Entity")]
    Scopes,
    #[sea_orm(has_many = "super::api_secret::Entity")]
    Secrets,
    #[sea_orm(has_many = "super::api_resource_property::Entity")]
    Properties,
}

impl Related<super::api_resource_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claims.def()
    }
}

impl Related<super::api_scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scopes.def()
    }
}

impl Related<super::api_secret::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Secrets.def()
    }
}

impl Related<super::api_resource_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

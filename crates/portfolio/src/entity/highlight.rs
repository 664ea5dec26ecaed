//! Highlight entity - curated achievements shown on the landing page.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "highlights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub tag: Option<String>,
    pub year: Option<i32>,
    #[sea_orm(column_type = "Json")]
    pub technologies: serde_json::Value,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub links: serde_json::Value,
    /// Display order; position in the fixture file.
    pub sort_order: i32,
    #[sea_orm(column_type = "Json")]
    pub raw: serde_json::Value,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! FunctionLog entity - invocation records of the deployed handlers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "function_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub logged_at: Option<DateTimeWithTimeZone>,
    pub environment: Option<String>,
    pub node_version: Option<String>,
    pub region: Option<String>,
    pub function_instance_id: Option<String>,
    pub memory_limit: Option<i32>,
    pub success: Option<bool>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub stats: serde_json::Value,
    #[sea_orm(column_type = "Json")]
    pub raw: serde_json::Value,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

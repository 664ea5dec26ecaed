//! NotificationItem entity - entries of the notification feed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    #[sea_orm(default_value = false)]
    pub persistent: bool,
    #[sea_orm(column_type = "Json")]
    pub tags: serde_json::Value,
    pub occurred_at: Option<DateTimeWithTimeZone>,
    /// `YYYY-MM-DD` taken from the batch file name.
    pub batch_date: Option<String>,
    pub source_file: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub raw: serde_json::Value,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! BlogPost entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub slug: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    pub author: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub status: Option<String>,
    #[sea_orm(default_value = false)]
    pub visibility_private: bool,
    #[sea_orm(default_value = false)]
    pub featured: bool,
    #[sea_orm(default_value = false)]
    pub draft: bool,
    pub thumbnail: Option<String>,
    pub load_readme_from_this_repo: Option<String>,
    /// Category labels (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub categories: serde_json::Value,
    /// Tag labels (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub tags: serde_json::Value,
    pub published_at: Option<DateTimeWithTimeZone>,
    /// `{ "index": ..., "detail": ... }` as read from the fixtures.
    #[sea_orm(column_type = "Json")]
    pub raw: serde_json::Value,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

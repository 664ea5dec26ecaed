//! ContentDocument entity - keyed JSON documents (profile, resume, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key of the profile document.
pub const PROFILE_KEY: &str = "profile";

/// Key of the resume document.
pub const RESUME_KEY: &str = "resume";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "Json")]
    pub payload: serde_json::Value,
    pub source_file: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Publication status for projects.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a project is shown publicly.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "published")]
    #[default]
    Published,
    #[sea_orm(string_value = "draft")]
    Draft,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Published => write!(f, "published"),
            ProjectStatus::Draft => write!(f, "draft"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "published" => Ok(ProjectStatus::Published),
            "draft" => Ok(ProjectStatus::Draft),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

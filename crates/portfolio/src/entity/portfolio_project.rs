//! PortfolioProject entity - one showcased project, either synced from GitHub or imported.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::project_status::ProjectStatus;

/// Prefix of `project_key` for rows created by the GitHub sync.
pub const GITHUB_KEY_PREFIX: &str = "github:";

/// Source label stored for rows created by the GitHub sync.
pub const GITHUB_SOURCE: &str = "github";

/// PortfolioProject model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio_projects")]
pub struct Model {
    /// Stable natural key (`github:<id>`, `legacy:<key>`, `personal:<key>`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_key: String,

    // ─── Provenance ──────────────────────────────────────────────────────────
    /// Where the row came from (`github`, `legacy-projects`, `personal-projects`).
    pub source: Option<String>,
    /// Numeric id carried by imported fixtures.
    pub external_id: Option<i64>,
    /// GitHub repository id. Unique, never rewritten once set.
    #[sea_orm(unique)]
    pub github_id: Option<i64>,

    // ─── Content ─────────────────────────────────────────────────────────────
    pub slug: Option<String>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub thumbnail: Option<String>,
    pub repo_url: Option<String>,
    /// Technology labels (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub tech: serde_json::Value,
    /// Related links (JSON array).
    #[sea_orm(column_type = "Json")]
    pub links: serde_json::Value,

    // ─── Presentation ────────────────────────────────────────────────────────
    pub status: Option<ProjectStatus>,
    #[sea_orm(default_value = false)]
    pub visibility_private: bool,
    pub priority_score: Option<i32>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,

    // ─── Captured payloads ───────────────────────────────────────────────────
    /// Verbatim source payload the row was built from.
    #[sea_orm(column_type = "Json", nullable)]
    pub raw: Option<serde_json::Value>,
    /// Curated GitHub subset (fork, id, html_url, created_at, updated_at, pushed_at).
    #[sea_orm(column_type = "Json", nullable)]
    pub github_raw: Option<serde_json::Value>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the row is visible without `includeDrafts`.
    pub fn is_published(&self) -> bool {
        self.status == Some(ProjectStatus::Published)
    }

    /// Technology labels as plain strings.
    pub fn tech_labels(&self) -> Vec<String> {
        self.tech
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build the `project_key` for a GitHub repository id.
pub fn github_project_key(github_id: i64) -> String {
    format!("{GITHUB_KEY_PREFIX}{github_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_test_model(status: Option<ProjectStatus>) -> Model {
        Model {
            project_key: github_project_key(42),
            source: Some(GITHUB_SOURCE.to_string()),
            external_id: None,
            github_id: Some(42),
            slug: Some("demo".to_string()),
            title: "demo".to_string(),
            description: None,
            body: None,
            thumbnail: None,
            repo_url: Some("https://github.com/octocat/demo".to_string()),
            tech: serde_json::json!(["cli", 7, "rust"]),
            links: serde_json::json!([]),
            status,
            visibility_private: false,
            priority_score: None,
            updated_at: None,
            created_at: Utc::now().fixed_offset(),
            raw: None,
            github_raw: None,
        }
    }

    #[test]
    fn github_project_key_uses_prefix() {
        assert_eq!(github_project_key(42), "github:42");
    }

    #[test]
    fn is_published_requires_published_status() {
        assert!(make_test_model(Some(ProjectStatus::Published)).is_published());
        assert!(!make_test_model(Some(ProjectStatus::Draft)).is_published());
        assert!(!make_test_model(None).is_published());
    }

    #[test]
    fn tech_labels_skips_non_strings() {
        let model = make_test_model(None);
        assert_eq!(model.tech_labels(), vec!["cli", "rust"]);
    }
}

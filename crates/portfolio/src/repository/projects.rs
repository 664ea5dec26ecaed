use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use crate::entity::portfolio_project::{Column, Entity as PortfolioProject, Model};
use crate::entity::project_status::ProjectStatus;

use super::errors::Result;

/// Filters for [`list_projects`].
#[derive(Debug, Clone)]
pub struct ProjectFilter {
    /// Include rows that are not published.
    pub include_drafts: bool,
    /// Restrict to published (`true`) or unpublished (`false`) rows.
    pub is_published: Option<bool>,
    pub slug: Option<String>,
    pub limit: u64,
}

impl Default for ProjectFilter {
    fn default() -> Self {
        Self {
            include_drafts: false,
            is_published: None,
            slug: None,
            limit: 100,
        }
    }
}

/// Public projection of a project row; omits the captured payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub project_key: String,
    pub slug: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub body: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: bool,
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub priority_score: Option<i32>,
    pub tech: serde_json::Value,
    pub repo_url: Option<String>,
    pub github_raw: Option<serde_json::Value>,
    pub github_id: Option<i64>,
    pub links: serde_json::Value,
}

impl From<Model> for ProjectSummary {
    fn from(model: Model) -> Self {
        let is_published = model.is_published();
        Self {
            project_key: model.project_key,
            slug: model.slug,
            title: model.title,
            description: model.description,
            body: model.body,
            thumbnail: model.thumbnail,
            is_published,
            updated_at: model.updated_at,
            priority_score: model.priority_score,
            tech: model.tech,
            repo_url: model.repo_url,
            github_raw: model.github_raw,
            github_id: model.github_id,
            links: model.links,
        }
    }
}

fn published_condition(published: bool) -> Condition {
    if published {
        Condition::all().add(Column::Status.eq(ProjectStatus::Published))
    } else {
        Condition::any()
            .add(Column::Status.is_null())
            .add(Column::Status.ne(ProjectStatus::Published))
    }
}

/// List projects, most recently updated first.
pub async fn list_projects(
    db: &DatabaseConnection,
    filter: &ProjectFilter,
) -> Result<Vec<ProjectSummary>> {
    let mut query = PortfolioProject::find()
        .order_by_desc(Column::UpdatedAt)
        .order_by_desc(Column::CreatedAt)
        .limit(filter.limit);

    if let Some(published) = filter.is_published {
        query = query.filter(published_condition(published));
    }
    if !filter.include_drafts {
        query = query.filter(published_condition(true));
    }
    if let Some(slug) = filter.slug.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::Slug.eq(slug));
    }

    let rows = query.all(db).await?;
    Ok(rows.into_iter().map(ProjectSummary::from).collect())
}

/// Find a project by `project_key`, falling back to `slug`.
pub async fn find_project(db: &DatabaseConnection, key: &str) -> Result<Option<ProjectSummary>> {
    if let Some(row) = PortfolioProject::find_by_id(key.to_string()).one(db).await? {
        return Ok(Some(row.into()));
    }

    let by_slug = PortfolioProject::find()
        .filter(Column::Slug.eq(key))
        .order_by_asc(Column::ProjectKey)
        .one(db)
        .await?;
    Ok(by_slug.map(ProjectSummary::from))
}

/// Projects with a non-blank `repo_url` but no `github_raw` yet.
///
/// A stored JSON `null` counts as missing. It is matched after loading because
/// SQL `IS NULL` does not see it and the JSON comparison differs per backend.
pub async fn find_missing_github_raw(db: &DatabaseConnection) -> Result<Vec<Model>> {
    let rows = PortfolioProject::find()
        .filter(Column::RepoUrl.is_not_null())
        .order_by_asc(Column::ProjectKey)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter(|row| matches!(row.github_raw, None | Some(serde_json::Value::Null)))
        .filter(|row| {
            row.repo_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
        })
        .collect())
}

/// Set `github_raw` on one project. Returns whether the row exists.
pub async fn set_github_raw(
    db: &DatabaseConnection,
    project_key: &str,
    github_raw: serde_json::Value,
) -> Result<bool> {
    let Some(row) = PortfolioProject::find_by_id(project_key.to_string())
        .one(db)
        .await?
    else {
        return Ok(false);
    };

    let mut model = row.into_active_model();
    model.github_raw = Set(Some(github_raw));
    model.update(db).await?;
    Ok(true)
}

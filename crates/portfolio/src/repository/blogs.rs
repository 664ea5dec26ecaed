use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

use crate::entity::blog_post::{Column, Entity as BlogPost, Model};

use super::errors::Result;
use super::json_array_contains;

/// Filters for [`list_blogs`].
#[derive(Debug, Clone)]
pub struct BlogFilter {
    pub include_drafts: bool,
    pub featured_only: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub limit: u64,
}

impl Default for BlogFilter {
    fn default() -> Self {
        Self {
            include_drafts: false,
            featured_only: false,
            category: None,
            tag: None,
            limit: 50,
        }
    }
}

/// Listing projection of a blog post; omits the bodies and captured payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub visibility_private: bool,
    pub featured: bool,
    pub draft: bool,
    pub thumbnail: Option<String>,
    pub categories: serde_json::Value,
    pub tags: serde_json::Value,
    pub published_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl From<Model> for BlogSummary {
    fn from(model: Model) -> Self {
        Self {
            slug: model.slug,
            title: model.title,
            excerpt: model.excerpt,
            author: model.author,
            status: model.status,
            visibility_private: model.visibility_private,
            featured: model.featured,
            draft: model.draft,
            thumbnail: model.thumbnail,
            categories: model.categories,
            tags: model.tags,
            published_at: model.published_at,
        }
    }
}

/// List blog posts, newest first.
///
/// Category and tag matching happens after the query since label arrays are
/// stored as JSON; the limit is applied to the matched rows.
pub async fn list_blogs(db: &DatabaseConnection, filter: &BlogFilter) -> Result<Vec<BlogSummary>> {
    let category = filter.category.as_deref().filter(|s| !s.is_empty());
    let tag = filter.tag.as_deref().filter(|s| !s.is_empty());

    let mut query = BlogPost::find().order_by_desc(Column::PublishedAt);
    if !filter.include_drafts {
        query = query.filter(Column::Draft.eq(false));
    }
    if filter.featured_only {
        query = query.filter(Column::Featured.eq(true));
    }
    if category.is_none() && tag.is_none() {
        query = query.limit(filter.limit);
    }

    let rows = query.all(db).await?;
    Ok(rows
        .into_iter()
        .filter(|row| category.is_none_or(|c| json_array_contains(&row.categories, c)))
        .filter(|row| tag.is_none_or(|t| json_array_contains(&row.tags, t)))
        .take(filter.limit as usize)
        .map(BlogSummary::from)
        .collect())
}

pub async fn find_blog(db: &DatabaseConnection, slug: &str) -> Result<Option<Model>> {
    Ok(BlogPost::find_by_id(slug.to_string()).one(db).await?)
}

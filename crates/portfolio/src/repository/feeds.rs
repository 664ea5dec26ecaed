//! Highlights, notifications and function logs.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::function_log::{self, Entity as FunctionLog};
use crate::entity::highlight::{self, Entity as Highlight};
use crate::entity::notification_item::{self, Entity as NotificationItem};

use super::errors::Result;
use super::json_array_contains;

pub async fn list_highlights(db: &DatabaseConnection) -> Result<Vec<highlight::Model>> {
    Ok(Highlight::find()
        .order_by_asc(highlight::Column::SortOrder)
        .all(db)
        .await?)
}

#[derive(Debug, Clone)]
pub struct NotificationFilter {
    pub tag: Option<String>,
    /// Matches the `type` column.
    pub kind: Option<String>,
    pub limit: u64,
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self {
            tag: None,
            kind: None,
            limit: 100,
        }
    }
}

/// Notifications, most recent first.
pub async fn list_notifications(
    db: &DatabaseConnection,
    filter: &NotificationFilter,
) -> Result<Vec<notification_item::Model>> {
    let tag = filter.tag.as_deref().filter(|s| !s.is_empty());

    let mut query = NotificationItem::find().order_by_desc(notification_item::Column::OccurredAt);
    if let Some(kind) = filter.kind.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(notification_item::Column::Kind.eq(kind));
    }
    if tag.is_none() {
        query = query.limit(filter.limit);
    }

    let rows = query.all(db).await?;
    Ok(rows
        .into_iter()
        .filter(|row| tag.is_none_or(|t| json_array_contains(&row.tags, t)))
        .take(filter.limit as usize)
        .collect())
}

#[derive(Debug, Clone)]
pub struct FunctionLogFilter {
    pub success: Option<bool>,
    pub limit: u64,
}

impl Default for FunctionLogFilter {
    fn default() -> Self {
        Self {
            success: None,
            limit: 50,
        }
    }
}

/// Function logs, most recent first.
pub async fn list_function_logs(
    db: &DatabaseConnection,
    filter: &FunctionLogFilter,
) -> Result<Vec<function_log::Model>> {
    let mut query = FunctionLog::find()
        .order_by_desc(function_log::Column::LoggedAt)
        .limit(filter.limit);
    if let Some(success) = filter.success {
        query = query.filter(function_log::Column::Success.eq(success));
    }
    Ok(query.all(db).await?)
}

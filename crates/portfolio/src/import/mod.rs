//! Load the JSON fixture tree into the database.
//!
//! Layout under the data directory:
//!
//! ```text
//! profile.json  resume.json  test.json  highlights.json  function-logs.json
//! projects.json  personal-projects.json
//! blogs/index.json  blogs/<slug>.json
//! notifications/index.json  notifications/<file>.json
//! ```
//!
//! Every file is read and parsed before the database is touched. The content
//! tables are then cleared and reloaded in a single transaction.

pub mod convert;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, TransactionTrait};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::entity::{
    blog_post, content_document, function_log, highlight, notification_item, portfolio_project,
};
use convert::{ProjectSource, array_items};

/// Data directory used when none is given.
pub const DEFAULT_DATA_DIR: &str = "../old_jsons/data";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid fixture {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Rows written per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub documents: usize,
    pub highlights: usize,
    pub projects: usize,
    pub blog_posts: usize,
    pub notifications: usize,
    pub function_logs: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} highlights, {} projects, {} blog posts, {} notifications, {} function logs",
            self.documents,
            self.highlights,
            self.projects,
            self.blog_posts,
            self.notifications,
            self.function_logs
        )
    }
}

async fn read_json(path: &Path) -> Result<Value, ImportError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// A file name from an index, restricted to a plain name inside its directory.
fn plain_file_name(index_path: &Path, name: &str) -> Result<String, ImportError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(ImportError::Invalid {
            path: index_path.to_path_buf(),
            message: format!("unsafe file name {name:?}"),
        });
    }
    Ok(name.to_string())
}

struct BlogFixture {
    slug: String,
    item: Value,
    detail: Value,
}

struct NotificationBatch {
    file_name: String,
    payload: Value,
}

/// Every fixture file, parsed.
struct FixtureSet {
    profile: Value,
    resume: Value,
    test: Value,
    highlights: Value,
    function_logs: Value,
    legacy_projects: Value,
    personal_projects: Value,
    blogs: Vec<BlogFixture>,
    notifications: Vec<NotificationBatch>,
}

impl FixtureSet {
    async fn load(data_dir: &Path) -> Result<Self, ImportError> {
        let blogs_dir = data_dir.join("blogs");
        let blog_index_path = blogs_dir.join("index.json");
        let blog_index = read_json(&blog_index_path).await?;

        let mut blogs = Vec::new();
        for item in array_items(Some(&blog_index)) {
            let slug = item
                .get("slug")
                .and_then(Value::as_str)
                .ok_or_else(|| ImportError::Invalid {
                    path: blog_index_path.clone(),
                    message: "blog entry without a slug".to_string(),
                })?;
            let file_name = plain_file_name(&blog_index_path, &format!("{slug}.json"))?;
            let detail = read_json(&blogs_dir.join(file_name)).await?;
            blogs.push(BlogFixture {
                slug: slug.to_string(),
                item: item.clone(),
                detail,
            });
        }

        let notifications_dir = data_dir.join("notifications");
        let notification_index_path = notifications_dir.join("index.json");
        let notification_index = read_json(&notification_index_path).await?;

        let mut notifications = Vec::new();
        for name in array_items(notification_index.get("files")) {
            let Some(name) = name.as_str() else {
                continue;
            };
            let file_name = plain_file_name(&notification_index_path, name)?;
            let payload = read_json(&notifications_dir.join(&file_name)).await?;
            notifications.push(NotificationBatch { file_name, payload });
        }

        Ok(Self {
            profile: read_json(&data_dir.join("profile.json")).await?,
            resume: read_json(&data_dir.join("resume.json")).await?,
            test: read_json(&data_dir.join("test.json")).await?,
            highlights: read_json(&data_dir.join("highlights.json")).await?,
            function_logs: read_json(&data_dir.join("function-logs.json")).await?,
            legacy_projects: read_json(&data_dir.join("projects.json")).await?,
            personal_projects: read_json(&data_dir.join("personal-projects.json")).await?,
            blogs,
            notifications,
        })
    }
}

/// Replace the content tables with the fixtures under `data_dir`.
///
/// Notes are left untouched. Any failure rolls the whole import back.
pub async fn import_fixtures(
    db: &DatabaseConnection,
    data_dir: &Path,
) -> Result<ImportReport, ImportError> {
    let fixtures = FixtureSet::load(data_dir).await?;
    tracing::debug!(
        blogs = fixtures.blogs.len(),
        notification_files = fixtures.notifications.len(),
        "Loaded fixtures"
    );

    let txn = db.begin().await?;
    match write_fixtures(&txn, &fixtures, Utc::now().fixed_offset()).await {
        Ok(report) => {
            txn.commit().await?;
            tracing::info!(data_dir = %data_dir.display(), %report, "Imported fixtures");
            Ok(report)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e.into())
        }
    }
}

async fn clear_content_tables(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    content_document::Entity::delete_many().exec(txn).await?;
    portfolio_project::Entity::delete_many().exec(txn).await?;
    blog_post::Entity::delete_many().exec(txn).await?;
    highlight::Entity::delete_many().exec(txn).await?;
    notification_item::Entity::delete_many().exec(txn).await?;
    function_log::Entity::delete_many().exec(txn).await?;
    Ok(())
}

fn notification_upsert() -> OnConflict {
    use notification_item::Column;

    OnConflict::column(Column::Id)
        .update_columns([
            Column::Kind,
            Column::Title,
            Column::Message,
            Column::Persistent,
            Column::Tags,
            Column::OccurredAt,
            Column::BatchDate,
            Column::SourceFile,
            Column::Raw,
        ])
        .to_owned()
}

async fn write_fixtures(
    txn: &DatabaseTransaction,
    fixtures: &FixtureSet,
    now: DateTime<FixedOffset>,
) -> Result<ImportReport, DbErr> {
    clear_content_tables(txn).await?;
    let mut report = ImportReport::default();

    let highlight_notes = json!({ "notes": convert::as_array(fixtures.highlights.get("notes")) });
    let documents = [
        ("profile", &fixtures.profile, "profile.json"),
        ("resume", &fixtures.resume, "resume.json"),
        ("test", &fixtures.test, "test.json"),
        ("highlights_notes", &highlight_notes, "highlights.json"),
    ];
    for (key, payload, source_file) in documents {
        content_document::Entity::insert(convert::content_document(
            key,
            payload.clone(),
            source_file,
            now,
        ))
        .exec_without_returning(txn)
        .await?;
        report.documents += 1;
    }

    for (index, row) in array_items(fixtures.highlights.get("highlights"))
        .iter()
        .enumerate()
    {
        highlight::Entity::insert(convert::highlight(index, row))
            .exec_without_returning(txn)
            .await?;
        report.highlights += 1;
    }

    let project_sources = [
        (ProjectSource::Legacy, &fixtures.legacy_projects),
        (ProjectSource::Personal, &fixtures.personal_projects),
    ];
    for (source, payload) in project_sources {
        for (index, row) in array_items(payload.get("projects")).iter().enumerate() {
            portfolio_project::Entity::insert(convert::project(source, index, row, now))
                .exec_without_returning(txn)
                .await?;
            report.projects += 1;
        }
    }

    for blog in &fixtures.blogs {
        blog_post::Entity::insert(convert::blog_post(&blog.slug, &blog.item, &blog.detail, now))
            .exec_without_returning(txn)
            .await?;
        report.blog_posts += 1;
    }

    for batch in &fixtures.notifications {
        for row in array_items(batch.payload.get("notifications")) {
            notification_item::Entity::insert(convert::notification(&batch.file_name, row))
                .on_conflict(notification_upsert())
                .exec_without_returning(txn)
                .await?;
            report.notifications += 1;
        }
    }

    for row in array_items(fixtures.function_logs.get("logs")) {
        function_log::Entity::insert(convert::function_log(row))
            .exec_without_returning(txn)
            .await?;
        report.function_logs += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_name_rejects_traversal() {
        let index = Path::new("notifications/index.json");
        assert!(plain_file_name(index, "2024-01-01.json").is_ok());
        assert!(plain_file_name(index, "../secrets.json").is_err());
        assert!(plain_file_name(index, "a\\b.json").is_err());
        assert!(plain_file_name(index, "").is_err());
    }

    #[test]
    fn report_display_lists_every_table() {
        let report = ImportReport {
            documents: 4,
            highlights: 2,
            projects: 3,
            blog_posts: 1,
            notifications: 5,
            function_logs: 6,
        };
        assert_eq!(
            report.to_string(),
            "4 documents, 2 highlights, 3 projects, 1 blog posts, 5 notifications, 6 function logs"
        );
    }

    #[tokio::test]
    async fn missing_data_dir_fails_before_touching_database() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureSet::load(&dir.path().join("absent"))
            .await
            .err()
            .expect("missing directory should fail");
        assert!(matches!(err, ImportError::Io { .. }));
    }
}

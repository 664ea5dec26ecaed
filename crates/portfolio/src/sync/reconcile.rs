//! Diff fetched repositories against `portfolio_projects` and apply the result.

use std::fmt;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::Serialize;

use super::error::SyncError;
use super::policy::ReconcilePolicy;
use crate::entity::portfolio_project::{Column, Entity as PortfolioProject};
use crate::github::{RemoteRepository, apply_repo_update, to_new_project};

/// Counts produced by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Synced {} repo(s): {} new, {} updated, {} unchanged",
            self.fetched, self.inserted, self.updated, self.skipped
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Inserted,
    Updated,
    Skipped,
}

/// Applies fetched repositories to the project table under a [`ReconcilePolicy`].
///
/// Repositories are matched on `github_id` only. All writes of one call share a
/// single transaction: either every row lands or none does.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    policy: ReconcilePolicy,
}

impl Reconciler {
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub async fn reconcile(
        &self,
        db: &DatabaseConnection,
        repos: &[RemoteRepository],
    ) -> Result<SyncReport, SyncError> {
        let txn = db.begin().await?;

        match self.apply_all(&txn, repos).await {
            Ok(report) => {
                txn.commit().await?;
                tracing::info!(
                    policy = %self.policy,
                    fetched = report.fetched,
                    inserted = report.inserted,
                    updated = report.updated,
                    skipped = report.skipped,
                    "Reconciled repositories"
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                tracing::error!(error = %e, "Reconciliation rolled back");
                Err(e)
            }
        }
    }

    async fn apply_all(
        &self,
        txn: &DatabaseTransaction,
        repos: &[RemoteRepository],
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            fetched: repos.len(),
            ..SyncReport::default()
        };

        for repo in repos {
            let outcome = self
                .apply_one(txn, repo)
                .await
                .map_err(|source| SyncError::Write {
                    github_id: repo.id,
                    source,
                })?;
            match outcome {
                Outcome::Inserted => report.inserted += 1,
                Outcome::Updated => report.updated += 1,
                Outcome::Skipped => report.skipped += 1,
            }
        }

        Ok(report)
    }

    async fn apply_one(
        &self,
        txn: &DatabaseTransaction,
        repo: &RemoteRepository,
    ) -> Result<Outcome, sea_orm::DbErr> {
        let existing = PortfolioProject::find()
            .filter(Column::GithubId.eq(repo.id))
            .one(txn)
            .await?;

        match (existing, self.policy) {
            (None, _) => {
                let model = to_new_project(repo, Utc::now().fixed_offset());
                PortfolioProject::insert(model)
                    .exec_without_returning(txn)
                    .await?;
                tracing::debug!(github_id = repo.id, "Inserted project");
                Ok(Outcome::Inserted)
            }
            (Some(_), ReconcilePolicy::InsertOnly) => Ok(Outcome::Skipped),
            (Some(row), ReconcilePolicy::Upsert) => {
                let mut model = row.into_active_model();
                apply_repo_update(&mut model, repo);
                model.update(txn).await?;
                tracing::debug!(github_id = repo.id, "Updated project");
                Ok(Outcome::Updated)
            }
        }
    }
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use super::*;
    use crate::connect_and_migrate;
    use crate::entity::portfolio_project::{self, Model};
    use crate::entity::project_status::ProjectStatus;
    use sea_orm::{ActiveValue::Set, PaginatorTrait};
    use serde_json::json;

    async fn setup_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("Failed to create test database")
    }

    fn repo(id: i64, name: &str) -> RemoteRepository {
        RemoteRepository::from_value(json!({
            "id": id,
            "name": name,
            "private": false,
            "html_url": format!("https://github.com/octocat/{name}"),
            "topics": ["cli"]
        }))
        .unwrap()
    }

    async fn find(db: &DatabaseConnection, github_id: i64) -> Option<Model> {
        PortfolioProject::find()
            .filter(Column::GithubId.eq(github_id))
            .one(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn inserts_unseen_repository() {
        let db = setup_db().await;
        let report = Reconciler::default()
            .reconcile(&db, &[repo(42, "demo")])
            .await
            .unwrap();

        assert_eq!(
            report,
            SyncReport {
                fetched: 1,
                inserted: 1,
                updated: 0,
                skipped: 0
            }
        );
        let row = find(&db, 42).await.expect("row inserted");
        assert_eq!(row.project_key, "github:42");
        assert_eq!(row.status, Some(ProjectStatus::Published));
        assert!(!row.visibility_private);
        assert_eq!(row.tech_labels(), vec!["cli"]);
    }

    #[tokio::test]
    async fn second_insert_only_run_skips_everything() {
        let db = setup_db().await;
        let reconciler = Reconciler::new(ReconcilePolicy::InsertOnly);
        let repos = [repo(1, "a"), repo(2, "b")];

        reconciler.reconcile(&db, &repos).await.unwrap();
        let report = reconciler.reconcile(&db, &repos).await.unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn repeated_upsert_leaves_rows_identical() {
        let db = setup_db().await;
        let reconciler = Reconciler::new(ReconcilePolicy::Upsert);
        let repos = [repo(7, "seven")];

        reconciler.reconcile(&db, &repos).await.unwrap();
        let first = find(&db, 7).await.unwrap();
        let report = reconciler.reconcile(&db, &repos).await.unwrap();
        let second = find(&db, 7).await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn rename_updates_title_but_keeps_identity() {
        let db = setup_db().await;
        Reconciler::default()
            .reconcile(&db, &[repo(42, "demo")])
            .await
            .unwrap();

        Reconciler::new(ReconcilePolicy::Upsert)
            .reconcile(&db, &[repo(42, "demo-v2")])
            .await
            .unwrap();

        let row = find(&db, 42).await.unwrap();
        assert_eq!(row.project_key, "github:42");
        assert_eq!(row.slug.as_deref(), Some("demo"));
        assert_eq!(row.title, "demo-v2");
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rename_is_ignored_by_insert_only() {
        let db = setup_db().await;
        Reconciler::default()
            .reconcile(&db, &[repo(42, "demo")])
            .await
            .unwrap();

        let report = Reconciler::new(ReconcilePolicy::InsertOnly)
            .reconcile(&db, &[repo(42, "demo-v2")])
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(find(&db, 42).await.unwrap().title, "demo");
    }

    #[tokio::test]
    async fn upsert_keeps_curated_columns() {
        let db = setup_db().await;
        Reconciler::default()
            .reconcile(&db, &[repo(9, "nine")])
            .await
            .unwrap();

        let mut curated = find(&db, 9).await.unwrap().into_active_model();
        curated.body = Set(Some("Long write-up".to_string()));
        curated.priority_score = Set(Some(10));
        curated.update(&db).await.unwrap();

        Reconciler::default()
            .reconcile(&db, &[repo(9, "nine")])
            .await
            .unwrap();

        let row = find(&db, 9).await.unwrap();
        assert_eq!(row.body.as_deref(), Some("Long write-up"));
        assert_eq!(row.priority_score, Some(10));
    }

    #[tokio::test]
    async fn failed_write_rolls_back_whole_batch() {
        let db = setup_db().await;

        // A fixture row squatting on the key the sync would generate for id 2.
        portfolio_project::ActiveModel {
            project_key: Set("github:2".to_string()),
            source: Set(Some("personal-projects".to_string())),
            external_id: Set(None),
            github_id: Set(None),
            slug: Set(None),
            title: Set("squatter".to_string()),
            description: Set(None),
            body: Set(None),
            thumbnail: Set(None),
            repo_url: Set(None),
            tech: Set(json!([])),
            links: Set(json!([])),
            status: Set(None),
            visibility_private: Set(false),
            priority_score: Set(None),
            updated_at: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
            raw: Set(None),
            github_raw: Set(None),
        }
        .insert(&db)
        .await
        .unwrap();

        let err = Reconciler::default()
            .reconcile(&db, &[repo(1, "one"), repo(2, "two"), repo(3, "three")])
            .await
            .expect_err("key collision should fail");

        assert!(matches!(err, SyncError::Write { github_id: 2, .. }));
        assert!(find(&db, 1).await.is_none());
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_fetch_writes_nothing() {
        let db = setup_db().await;
        let report = Reconciler::default().reconcile(&db, &[]).await.unwrap();
        assert_eq!(report, SyncReport::default());
    }

    #[test]
    fn report_display() {
        let report = SyncReport {
            fetched: 3,
            inserted: 1,
            updated: 1,
            skipped: 1,
        };
        assert_eq!(
            report.to_string(),
            "Synced 3 repo(s): 1 new, 1 updated, 1 unchanged"
        );
    }
}

//! GitHub repository synchronization.
//!
//! - [`policy`] - [`ReconcilePolicy`]
//! - [`reconcile`] - [`Reconciler`] and [`SyncReport`]
//!
//! ```ignore
//! use portfolio::github::{GitHubClient, GitHubOptions};
//! use portfolio::sync::{ReconcilePolicy, sync_user_repos};
//!
//! let client = GitHubClient::new(&GitHubOptions::default())?;
//! let report = sync_user_repos(&client, &db, "octocat", ReconcilePolicy::Upsert).await?;
//! println!("{report}");
//! ```
//!
//! [`sync_user_repos_then_connect`] defers opening the database until the
//! listing has been fetched, and closes the connection afterwards.

mod error;
mod policy;
mod reconcile;

use std::future::Future;

use sea_orm::{DatabaseConnection, DbErr};

pub use error::SyncError;
pub use policy::ReconcilePolicy;
pub use reconcile::{Reconciler, SyncReport};

use crate::github::GitHubClient;

/// Fetch every public repository of `username` and reconcile them in one transaction.
///
/// The listing completes before any write, so a fetch failure leaves the table untouched.
pub async fn sync_user_repos(
    client: &GitHubClient,
    db: &DatabaseConnection,
    username: &str,
    policy: ReconcilePolicy,
) -> Result<SyncReport, SyncError> {
    let repos = client.list_user_repos(username).await?;
    Reconciler::new(policy).reconcile(db, &repos).await
}

/// Like [`sync_user_repos`], but `connect` only runs once the listing succeeded.
///
/// The connection is closed before returning. A close failure is reported only
/// when the reconcile itself succeeded.
pub async fn sync_user_repos_then_connect<F, Fut>(
    client: &GitHubClient,
    username: &str,
    policy: ReconcilePolicy,
    connect: F,
) -> Result<SyncReport, SyncError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<DatabaseConnection, DbErr>>,
{
    let repos = client.list_user_repos(username).await?;
    let db = connect().await?;
    let result = Reconciler::new(policy).reconcile(&db, &repos).await;
    let closed = db.close().await;

    match (result, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "Failed to close database connection");
            }
            Err(e)
        }
    }
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use super::*;
    use std::sync::Arc;

    use std::sync::atomic::{AtomicBool, Ordering};

    use sea_orm::{EntityTrait, PaginatorTrait};
    use tempfile::TempDir;
    use serde_json::json;

    use crate::connect_and_migrate;
    use crate::entity::prelude::PortfolioProject;
    use crate::github::{GitHubError, GitHubOptions};
    use crate::http::{HttpMethod, HttpResponse, MockTransport};

    fn page_url(page: u32) -> String {
        format!("https://api.github.com/users/octocat/repos?type=public&per_page=100&page={page}")
    }

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new_with_transport(&GitHubOptions::default(), Arc::new(transport.clone()))
            .unwrap()
    }

    fn repos(range: std::ops::Range<i64>) -> serde_json::Value {
        json!(
            range
                .map(|id| json!({ "id": id, "name": format!("repo-{id}") }))
                .collect::<Vec<_>>()
        )
    }

    #[tokio::test]
    async fn syncs_all_pages() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let transport = MockTransport::new();
        transport.push_json(page_url(1), 200, &repos(1..101));
        transport.push_json(page_url(2), 200, &repos(101..151));

        let report = sync_user_repos(&client(&transport), &db, "octocat", ReconcilePolicy::Upsert)
            .await
            .unwrap();

        assert_eq!(report.fetched, 150);
        assert_eq!(report.inserted, 150);
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 150);
    }

    #[tokio::test]
    async fn server_error_on_second_page_writes_nothing() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let transport = MockTransport::new();
        transport.push_json(page_url(1), 200, &repos(1..101));
        transport.push_response(
            HttpMethod::Get,
            page_url(2),
            HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: b"Internal Server Error".to_vec(),
            },
        );

        let err = sync_user_repos(&client(&transport), &db, "octocat", ReconcilePolicy::Upsert)
            .await
            .expect_err("page 2 fails");

        assert!(matches!(
            err,
            SyncError::GitHub(GitHubError::Api { status: 500, .. })
        ));
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deferred_connect_is_skipped_when_fetch_fails() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            page_url(1),
            HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: b"Not Found".to_vec(),
            },
        );
        let connected = AtomicBool::new(false);

        let err = sync_user_repos_then_connect(
            &client(&transport),
            "octocat",
            ReconcilePolicy::Upsert,
            || async {
                connected.store(true, Ordering::SeqCst);
                connect_and_migrate("sqlite::memory:").await
            },
        )
        .await
        .expect_err("unknown user");

        assert!(matches!(
            err,
            SyncError::GitHub(GitHubError::Api { status: 404, .. })
        ));
        assert!(!connected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn deferred_connect_reconciles_after_fetch() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("sync.db").display());
        let transport = MockTransport::new();
        transport.push_json(page_url(1), 200, &repos(1..4));

        let report = sync_user_repos_then_connect(
            &client(&transport),
            "octocat",
            ReconcilePolicy::Upsert,
            || connect_and_migrate(&url),
        )
        .await
        .unwrap();
        assert_eq!(report.inserted, 3);

        let db = connect_and_migrate(&url).await.unwrap();
        assert_eq!(PortfolioProject::find().count(&db).await.unwrap(), 3);
        db.close().await.unwrap();
    }
}

//! Sync error types.

use sea_orm::DbErr;
use thiserror::Error;

use crate::github::GitHubError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching from GitHub failed; nothing was written.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// Opening or committing the transaction failed.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Writing one repository failed; the whole batch was rolled back.
    #[error("Failed to write repository {github_id}: {source}")]
    Write {
        github_id: i64,
        #[source]
        source: DbErr,
    },
}

//! Fill `github_raw` for projects that link a GitHub repository but were never synced.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::github::{GitHubClient, GitHubError, curated_github_raw};
use crate::repository::{self, RepositoryError};

/// Delay between consecutive repository lookups.
pub const DEFAULT_PACE: Duration = Duration::from_millis(80);

/// Rows between progress log lines.
pub const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

#[derive(Debug, Clone, Copy)]
pub struct BackfillOptions {
    pub pace: Duration,
    pub progress_every: usize,
}

impl Default for BackfillOptions {
    fn default() -> Self {
        Self {
            pace: DEFAULT_PACE,
            progress_every: PROGRESS_EVERY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    /// Rows with a repository URL and no `github_raw`.
    pub candidates: usize,
    pub updated: usize,
    /// Unparseable URLs, unavailable repositories and empty payloads.
    pub skipped: usize,
}

/// Extract `(owner, repo)` from a `https://github.com/<owner>/<repo>` URL.
///
/// Trailing slashes, extra path segments, query and fragment are ignored.
pub fn parse_github_repo_url(repo_url: &str) -> Option<(String, String)> {
    let trimmed = repo_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str() != Some("github.com") {
        return None;
    }

    let mut segments = url.path_segments()?;
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    Some((owner.to_string(), repo.to_string()))
}

/// Look up each candidate project on GitHub and store the curated payload subset.
///
/// Rows are updated one at a time; an interrupted run keeps the rows already filled
/// and a rerun only visits the rest.
pub async fn backfill_github_raw(
    client: &GitHubClient,
    db: &DatabaseConnection,
    options: BackfillOptions,
) -> Result<BackfillReport, BackfillError> {
    let rows = repository::find_missing_github_raw(db).await?;
    let mut report = BackfillReport {
        candidates: rows.len(),
        ..BackfillReport::default()
    };

    if rows.is_empty() {
        tracing::info!("No rows missing github_raw");
        return Ok(report);
    }

    for (index, row) in rows.iter().enumerate() {
        let Some((owner, repo)) = row.repo_url.as_deref().and_then(parse_github_repo_url) else {
            tracing::debug!(project_key = %row.project_key, "Repository URL is not a GitHub URL");
            report.skipped += 1;
            continue;
        };

        let fetched = client.get_repo(&owner, &repo).await?;
        let github_raw = fetched.as_ref().and_then(curated_github_raw);

        match github_raw {
            Some(value) => {
                repository::set_github_raw(db, &row.project_key, value).await?;
                report.updated += 1;
            }
            None => {
                tracing::debug!(project_key = %row.project_key, owner, repo, "No repository data");
                report.skipped += 1;
            }
        }

        let done = index + 1;
        if options.progress_every > 0 && done % options.progress_every == 0 {
            tracing::info!(done, total = rows.len(), "Backfill progress");
        }

        if !options.pace.is_zero() {
            tokio::time::sleep(options.pace).await;
        }
    }

    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        candidates = report.candidates,
        "Filled github_raw"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_repo_url() {
        assert_eq!(
            parse_github_repo_url("https://github.com/octocat/hello-world"),
            Some(("octocat".to_string(), "hello-world".to_string()))
        );
    }

    #[test]
    fn ignores_trailing_slash_query_and_fragment() {
        let expected = Some(("octocat".to_string(), "demo".to_string()));
        assert_eq!(parse_github_repo_url(" https://github.com/octocat/demo/// "), expected);
        assert_eq!(parse_github_repo_url("https://github.com/octocat/demo?tab=readme"), expected);
        assert_eq!(parse_github_repo_url("http://github.com/octocat/demo#usage"), expected);
        assert_eq!(parse_github_repo_url("https://github.com/octocat/demo/tree/main"), expected);
    }

    #[test]
    fn rejects_non_github_urls() {
        assert_eq!(parse_github_repo_url(""), None);
        assert_eq!(parse_github_repo_url("   "), None);
        assert_eq!(parse_github_repo_url("https://gitlab.com/octocat/demo"), None);
        assert_eq!(parse_github_repo_url("https://github.com/octocat"), None);
        assert_eq!(parse_github_repo_url("github.com/octocat/demo"), None);
        assert_eq!(parse_github_repo_url("ftp://github.com/octocat/demo"), None);
    }
}

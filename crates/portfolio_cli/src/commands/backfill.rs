//! `portfolio backfill`: fill `github_raw` for projects that only carry a repository URL.

use console::style;
use portfolio::backfill::{BackfillOptions, backfill_github_raw};
use portfolio::db;
use portfolio::github::GitHubClient;

use crate::commands::{close_then, ensure_sqlite_parent, report};
use crate::config::Config;

pub(crate) async fn handle_backfill(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config.database_url()?;
    config.require_github_token()?;
    let client = GitHubClient::new(&config.github_options())?;

    ensure_sqlite_parent(&database_url)?;
    let db = db::connect_and_migrate(&database_url).await?;
    let result = backfill_github_raw(&client, &db, BackfillOptions::default()).await;
    let summary = close_then(db, result).await?;
    report(&format!(
        "Backfilled github_raw: {} of {} candidate(s) updated, {} skipped",
        style(summary.updated).green(),
        summary.candidates,
        summary.skipped
    ));
    Ok(())
}

//! `portfolio sync`: mirror a user's public GitHub repositories into the projects table.

use console::style;
use portfolio::db;
use portfolio::github::GitHubClient;
use portfolio::sync::{ReconcilePolicy, sync_user_repos_then_connect};

use crate::commands::{ensure_sqlite_parent, report};
use crate::config::Config;

pub(crate) async fn handle_sync(
    username: Option<&str>,
    policy: Option<ReconcilePolicy>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    // Settings are checked before any network or database activity.
    let database_url = config.database_url()?;
    let username = config.github_username(username)?;
    let policy = match policy {
        Some(policy) => policy,
        None => config.sync_policy()?,
    };
    let client = GitHubClient::new(&config.github_options())?;

    report(&format!(
        "Fetching public repositories for {}...",
        style(&username).bold()
    ));
    ensure_sqlite_parent(&database_url)?;
    let sync_report = sync_user_repos_then_connect(&client, &username, policy, || {
        db::connect_and_migrate(&database_url)
    })
    .await?;
    report(&format!("{} ({policy})", style(sync_report).green()));
    Ok(())
}

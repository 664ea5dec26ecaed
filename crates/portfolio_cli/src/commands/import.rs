//! `portfolio import`: reload the content tables from the JSON fixture tree.

use std::path::Path;

use console::style;
use portfolio::db;
use portfolio::import::import_fixtures;

use crate::commands::{close_then, ensure_sqlite_parent, report};
use crate::config::Config;

pub(crate) async fn handle_import(
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config.database_url()?;
    let data_dir = std::path::absolute(data_dir)?;

    ensure_sqlite_parent(&database_url)?;
    let db = db::connect_and_migrate(&database_url).await?;
    let result = import_fixtures(&db, &data_dir).await;
    let summary = close_then(db, result).await?;
    report(&format!(
        "Imported JSON data from {}: {}",
        data_dir.display(),
        style(summary).green()
    ));
    Ok(())
}

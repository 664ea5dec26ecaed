pub(crate) mod backfill;
pub(crate) mod import;
pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod serve;
pub(crate) mod sync;

use console::Term;
use sea_orm::DatabaseConnection;

/// Print a summary line on a terminal, or log it otherwise.
pub(crate) fn report(message: &str) {
    if Term::stdout().is_term() {
        println!("{message}");
    } else {
        tracing::info!("{message}");
    }
}

/// Close `db` once the command body has run, then hand back its result.
///
/// A close failure is only returned when the command itself succeeded;
/// otherwise it is logged and the command's error wins.
pub(crate) async fn close_then<T, E>(
    db: DatabaseConnection,
    result: Result<T, E>,
) -> Result<T, Box<dyn std::error::Error>>
where
    E: Into<Box<dyn std::error::Error>>,
{
    let closed = db.close().await;
    match result {
        Ok(value) => {
            closed?;
            Ok(value)
        }
        Err(e) => {
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "Failed to close database connection");
            }
            Err(e.into())
        }
    }
}

/// Create the parent directory of a file-backed SQLite database.
pub(crate) fn ensure_sqlite_parent(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn close_failure_does_not_mask_command_error() {
        let result: Result<(), &str> = Err("reconcile failed");
        let err = close_then(DatabaseConnection::Disconnected, result)
            .await
            .expect_err("command error is returned");
        assert_eq!(err.to_string(), "reconcile failed");
    }

    #[tokio::test]
    async fn close_failure_is_reported_after_success() {
        let err = close_then(DatabaseConnection::Disconnected, Ok::<_, &str>(7))
            .await
            .expect_err("close error is returned");
        assert!(err.to_string().contains("Disconnected"));
    }

    #[tokio::test]
    async fn close_then_passes_value_through() {
        let db = portfolio::db::connect("sqlite::memory:").await.unwrap();
        let value = close_then(db, Ok::<_, &str>(7)).await.unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn ensure_sqlite_parent_ignores_other_backends() {
        assert!(ensure_sqlite_parent("postgres://localhost/portfolio").is_ok());
        assert!(ensure_sqlite_parent("sqlite::memory:").is_ok());
    }

    #[test]
    fn ensure_sqlite_parent_creates_directories() {
        let dir = std::env::temp_dir().join(format!("portfolio-cli-test-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/portfolio.db?mode=rwc", dir.display());

        ensure_sqlite_parent(&url).expect("directory creation should succeed");
        assert!(dir.join("nested").is_dir());

        std::fs::remove_dir_all(&dir).expect("test directory should be removable");
    }
}

//! `portfolio serve`: run the HTTP API until Ctrl+C.

use std::sync::Arc;

use portfolio::{api, db};
use tokio::net::TcpListener;

use crate::commands::{close_then, ensure_sqlite_parent, report};
use crate::config::Config;
use crate::shutdown::shutdown_signal;

pub(crate) async fn handle_serve(
    addr: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config.database_url()?;
    let addr = config.server_addr(addr)?;

    ensure_sqlite_parent(&database_url)?;
    let db = db::connect_and_migrate(&database_url).await?;
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            return close_then(db, Err(format!("Failed to bind {addr}: {e}"))).await;
        }
    };

    report(&format!("Serving API on http://{addr}"));
    let db = Arc::new(db);
    let result = api::serve(listener, Arc::clone(&db), shutdown_signal()).await;

    // Every router clone is gone once serve returns.
    match Arc::try_unwrap(db) {
        Ok(db) => close_then(db, result).await?,
        Err(_) => {
            tracing::warn!("Database connection still shared after shutdown; not closing");
            result?
        }
    }
    report("Server stopped.");
    Ok(())
}

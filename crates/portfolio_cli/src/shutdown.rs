use console::Term;

/// Resolve on the first Ctrl+C so the API server can drain in-flight requests.
///
/// A second Ctrl+C exits immediately.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    let is_tty = Term::stdout().is_term();
    if is_tty {
        eprintln!("\nShutdown requested, finishing in-flight requests...");
        eprintln!("Press Ctrl+C again to force quit.");
    } else {
        tracing::warn!("Shutdown requested, finishing in-flight requests");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(130);
        }
    });
}

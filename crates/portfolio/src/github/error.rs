//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-2xx status.
    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration (bad base URL, client build failure).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GitHubError {
    /// Whether the error is a rate-limit response (403 or 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GitHubError::Api { status: 403 | 429, .. })
    }
}

/// First line of an error message, truncated for log output.
pub fn short_error_message(err: &GitHubError) -> String {
    const MAX: usize = 120;
    let msg = err.to_string();
    let first = msg.lines().next().unwrap_or_default();
    if first.chars().count() > MAX {
        let cut: String = first.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}

//! GitHub REST API access.
//!
//! - [`client`] - paginated listing and single-repository lookup
//! - [`types`] - [`RemoteRepository`] and client options
//! - [`convert`] - mapping repositories onto `portfolio_projects` rows
//!
//! ```ignore
//! use portfolio::github::{GitHubClient, GitHubOptions};
//!
//! let client = GitHubClient::new(&GitHubOptions::default().with_token(token))?;
//! let repos = client.list_user_repos("octocat").await?;
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_RETRY_AFTER, GitHubClient, PAGE_SIZE};
pub use convert::{
    GITHUB_RAW_FIELDS, apply_repo_update, curated_github_raw, github_raw_subset, to_new_project,
};
pub use error::{GitHubError, short_error_message};
pub use types::{DEFAULT_API_BASE, DEFAULT_USER_AGENT, GitHubOptions, RemoteRepository};

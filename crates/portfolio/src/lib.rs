//! Portfolio - backend for a personal portfolio site.
//!
//! This library keeps the portfolio tables (projects, blog posts, highlights,
//! notifications, function logs, content documents and notes) and the jobs
//! that fill them: GitHub repository sync, `github_raw` backfill and JSON
//! fixture import. [`api`] serves the tables over HTTP.
//!
//! # Features
//!
//! - `sqlite` / `postgres` - SeaORM database backends.
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//!
//! # Example
//!
//! ```ignore
//! use portfolio::github::{GitHubClient, GitHubOptions};
//! use portfolio::sync::{ReconcilePolicy, sync_user_repos};
//! use portfolio::connect_and_migrate;
//!
//! let db = connect_and_migrate("sqlite://portfolio.db?mode=rwc").await?;
//! let client = GitHubClient::new(&GitHubOptions::default())?;
//!
//! let report = sync_user_repos(&client, &db, "octocat", ReconcilePolicy::Upsert).await?;
//! println!("{report}");
//! ```

pub mod api;
pub mod backfill;
pub mod db;
pub mod entity;
pub mod github;
pub mod http;
pub mod import;
pub mod repository;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use repository::RepositoryError;

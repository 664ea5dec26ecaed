//! SeaORM entity definitions for the portfolio database schema.

pub mod blog_post;
pub mod content_document;
pub mod function_log;
pub mod highlight;
pub mod note;
pub mod notification_item;
pub mod portfolio_project;
pub mod prelude;
pub mod project_status;

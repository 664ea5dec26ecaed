//! Common re-exports for convenient entity usage.

pub use super::blog_post::{
    ActiveModel as BlogPostActiveModel, Column as BlogPostColumn, Entity as BlogPost,
    Model as BlogPostModel,
};
pub use super::content_document::{
    ActiveModel as ContentDocumentActiveModel, Column as ContentDocumentColumn,
    Entity as ContentDocument, Model as ContentDocumentModel,
};
pub use super::function_log::{
    ActiveModel as FunctionLogActiveModel, Column as FunctionLogColumn, Entity as FunctionLog,
    Model as FunctionLogModel,
};
pub use super::highlight::{
    ActiveModel as HighlightActiveModel, Column as HighlightColumn, Entity as Highlight,
    Model as HighlightModel,
};
pub use super::note::{
    ActiveModel as NoteActiveModel, Column as NoteColumn, Entity as Note, Model as NoteModel,
};
pub use super::notification_item::{
    ActiveModel as NotificationItemActiveModel, Column as NotificationItemColumn,
    Entity as NotificationItem, Model as NotificationItemModel,
};
pub use super::portfolio_project::{
    ActiveModel as PortfolioProjectActiveModel, Column as PortfolioProjectColumn,
    Entity as PortfolioProject, Model as PortfolioProjectModel,
};
pub use super::project_status::ProjectStatus;

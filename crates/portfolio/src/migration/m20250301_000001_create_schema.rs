//! Initial migration creating the portfolio schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_portfolio_projects(manager).await?;
        self.create_blog_posts(manager).await?;
        self.create_highlights(manager).await?;
        self.create_notification_items(manager).await?;
        self.create_function_logs(manager).await?;
        self.create_content_documents(manager).await?;
        self.create_notes(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FunctionLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NotificationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Highlights::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioProjects::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_portfolio_projects(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioProjects::ProjectKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    // Provenance
                    .col(ColumnDef::new(PortfolioProjects::Source).string().null())
                    .col(
                        ColumnDef::new(PortfolioProjects::ExternalId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioProjects::GithubId)
                            .big_integer()
                            .null(),
                    )
                    // Content
                    .col(ColumnDef::new(PortfolioProjects::Slug).string().null())
                    .col(ColumnDef::new(PortfolioProjects::Title).string().not_null())
                    .col(ColumnDef::new(PortfolioProjects::Description).text().null())
                    .col(ColumnDef::new(PortfolioProjects::Body).text().null())
                    .col(ColumnDef::new(PortfolioProjects::Thumbnail).string().null())
                    .col(ColumnDef::new(PortfolioProjects::RepoUrl).string().null())
                    .col(
                        ColumnDef::new(PortfolioProjects::Tech)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(PortfolioProjects::Links)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    // Presentation
                    .col(ColumnDef::new(PortfolioProjects::Status).string().null())
                    .col(
                        ColumnDef::new(PortfolioProjects::VisibilityPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PortfolioProjects::PriorityScore)
                            .integer()
                            .null(),
                    )
                    // Timestamps
                    .col(
                        ColumnDef::new(PortfolioProjects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioProjects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Captured payloads
                    .col(ColumnDef::new(PortfolioProjects::Raw).json().null())
                    .col(ColumnDef::new(PortfolioProjects::GithubRaw).json().null())
                    .to_owned(),
            )
            .await?;

        // One row per GitHub repository
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_projects_github_id")
                    .table(PortfolioProjects::Table)
                    .col(PortfolioProjects::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_projects_slug")
                    .table(PortfolioProjects::Table)
                    .col(PortfolioProjects::Slug)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_blog_posts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPosts::Slug)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogPosts::Title).string().not_null())
                    .col(ColumnDef::new(BlogPosts::Excerpt).text().null())
                    .col(ColumnDef::new(BlogPosts::Author).string().null())
                    .col(ColumnDef::new(BlogPosts::Content).text().null())
                    .col(ColumnDef::new(BlogPosts::Body).text().null())
                    .col(ColumnDef::new(BlogPosts::Status).string().null())
                    .col(
                        ColumnDef::new(BlogPosts::VisibilityPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::Draft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BlogPosts::Thumbnail).string().null())
                    .col(
                        ColumnDef::new(BlogPosts::LoadReadmeFromThisRepo)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::Categories)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::Tags)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::Raw)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_published_at")
                    .table(BlogPosts::Table)
                    .col((BlogPosts::PublishedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_highlights(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Highlights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Highlights::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Highlights::Title).string().not_null())
                    .col(ColumnDef::new(Highlights::Tag).string().null())
                    .col(ColumnDef::new(Highlights::Year).integer().null())
                    .col(
                        ColumnDef::new(Highlights::Technologies)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(ColumnDef::new(Highlights::Description).text().null())
                    .col(
                        ColumnDef::new(Highlights::Links)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(Highlights::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Highlights::Raw)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_notification_items(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NotificationItems::Kind).string().null())
                    .col(ColumnDef::new(NotificationItems::Title).string().not_null())
                    .col(ColumnDef::new(NotificationItems::Message).text().not_null())
                    .col(
                        ColumnDef::new(NotificationItems::Persistent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NotificationItems::Tags)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(NotificationItems::OccurredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(NotificationItems::BatchDate).string().null())
                    .col(ColumnDef::new(NotificationItems::SourceFile).string().null())
                    .col(
                        ColumnDef::new(NotificationItems::Raw)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_items_occurred_at")
                    .table(NotificationItems::Table)
                    .col((NotificationItems::OccurredAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_function_logs(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FunctionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FunctionLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FunctionLogs::LoggedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(FunctionLogs::Environment).string().null())
                    .col(ColumnDef::new(FunctionLogs::NodeVersion).string().null())
                    .col(ColumnDef::new(FunctionLogs::Region).string().null())
                    .col(
                        ColumnDef::new(FunctionLogs::FunctionInstanceId)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(FunctionLogs::MemoryLimit).integer().null())
                    .col(ColumnDef::new(FunctionLogs::Success).boolean().null())
                    .col(ColumnDef::new(FunctionLogs::Error).text().null())
                    .col(
                        ColumnDef::new(FunctionLogs::Stats)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(FunctionLogs::Raw)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_function_logs_logged_at")
                    .table(FunctionLogs::Table)
                    .col((FunctionLogs::LoggedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_content_documents(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentDocuments::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentDocuments::Payload)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(ColumnDef::new(ContentDocuments::SourceFile).string().null())
                    .col(
                        ColumnDef::new(ContentDocuments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_notes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notes::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "portfolio_projects")]
enum PortfolioProjects {
    Table,
    ProjectKey,
    Source,
    ExternalId,
    GithubId,
    Slug,
    Title,
    Description,
    Body,
    Thumbnail,
    RepoUrl,
    Tech,
    Links,
    Status,
    VisibilityPrivate,
    PriorityScore,
    UpdatedAt,
    CreatedAt,
    Raw,
    GithubRaw,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "blog_posts")]
enum BlogPosts {
    Table,
    Slug,
    Title,
    Excerpt,
    Author,
    Content,
    Body,
    Status,
    VisibilityPrivate,
    Featured,
    Draft,
    Thumbnail,
    LoadReadmeFromThisRepo,
    Categories,
    Tags,
    PublishedAt,
    Raw,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "highlights")]
enum Highlights {
    Table,
    Id,
    Title,
    Tag,
    Year,
    Technologies,
    Description,
    Links,
    SortOrder,
    Raw,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "notification_items")]
enum NotificationItems {
    Table,
    Id,
    #[sea_orm(iden = "type")]
    Kind,
    Title,
    Message,
    Persistent,
    Tags,
    OccurredAt,
    BatchDate,
    SourceFile,
    Raw,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "function_logs")]
enum FunctionLogs {
    Table,
    Id,
    LoggedAt,
    Environment,
    NodeVersion,
    Region,
    FunctionInstanceId,
    MemoryLimit,
    Success,
    Error,
    Stats,
    Raw,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "content_documents")]
enum ContentDocuments {
    Table,
    Key,
    Payload,
    SourceFile,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "notes")]
enum Notes {
    Table,
    Id,
    Content,
    CreatedAt,
    UpdatedAt,
}

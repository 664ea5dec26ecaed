use portfolio::db;
use portfolio::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;
use crate::commands::{close_then, ensure_sqlite_parent};
use crate::config::Config;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config.database_url()?;
    ensure_sqlite_parent(&database_url)?;
    let db = db::connect(&database_url).await?;

    let result = match action {
        MigrateAction::Up => {
            println!("Applying migrations...");
            Migrator::up(&db, None)
                .await
                .map(|()| println!("Migrations applied successfully."))
        }
        MigrateAction::Down => {
            println!("Rolling back last migration...");
            Migrator::down(&db, Some(1))
                .await
                .map(|()| println!("Rollback complete."))
        }
        MigrateAction::Status => {
            println!("Migration status:");
            Migrator::status(&db).await
        }
        MigrateAction::Fresh => {
            println!("Dropping all tables and reapplying migrations...");
            Migrator::fresh(&db)
                .await
                .map(|()| println!("Fresh migration complete."))
        }
    };

    close_then(db, result).await
}

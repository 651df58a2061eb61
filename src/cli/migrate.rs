use crate::config::ServerSettings;
use crate::config::database::{init_database, migrate_database};

/// Run database migrations
///
/// Connects and applies all pending migrations without initializing
/// AppData, so no secrets are required.
pub async fn run_migrations(settings: &ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}

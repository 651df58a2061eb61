use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connect to the database
///
/// Does NOT run migrations - call `migrate_database()` separately.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url).await.map_err(|source| {
        InternalError::Database(DatabaseError::Connect {
            url: database_url.to_string(),
            source,
        })
    })?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the provided connection
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|source| InternalError::Database(DatabaseError::Migration { source }))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}

/// Begin the transaction that scopes one mutating operation
pub async fn begin_transaction(db: &DatabaseConnection) -> Result<DatabaseTransaction, InternalError> {
    db.begin().await.map_err(InternalError::transaction_begin)
}

pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
    txn.commit().await.map_err(InternalError::transaction_commit)
}

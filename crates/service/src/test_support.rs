#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, DatabaseConfig};

/// Fresh in-memory database per test, schema migrated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::in_memory_sqlite()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

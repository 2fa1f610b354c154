/// CRUD and validation tests for entity helpers
pub mod crud_tests;


use anyhow::Result;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect_with_config;

/// Fresh in-memory database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

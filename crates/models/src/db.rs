use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Open a pooled connection using the `[database]` section.
///
/// An in-memory SQLite database only lives as long as its connection, so the
/// pool is pinned to a single connection that is never recycled.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if is_memory_sqlite(&cfg.url) {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    let db = Database::connect(opt).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

fn is_memory_sqlite(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("sqlite:") && lower.contains(":memory:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_sqlite_urls() {
        assert!(is_memory_sqlite("sqlite::memory:"));
        assert!(is_memory_sqlite("SQLITE::MEMORY:"));
        assert!(!is_memory_sqlite("sqlite://data/app.db?mode=rwc"));
        assert!(!is_memory_sqlite("postgres://u:p@localhost:5432/startup_ocean"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_its_schema() -> anyhow::Result<()> {
        let cfg = DatabaseConfig { url: "sqlite::memory:".into(), max_connections: 8, ..Default::default() };
        let db = connect_with_config(&cfg).await?;
        db.execute_unprepared("CREATE TABLE pool_check (id INTEGER PRIMARY KEY)").await?;
        // a second pooled connection would see an empty database
        db.execute_unprepared("INSERT INTO pool_check (id) VALUES (1)").await?;
        Ok(())
    }
}

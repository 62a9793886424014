//! SQLite storage backing.
//!
//! One `kv_store` row per key. The file outlives the process; change events
//! reach only handles opened in this process.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{EventBus, Origin, StorageError, StorageEvent, StorageEventKind, StoragePort};

/// Open the database file, creating it and its parent directory if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub struct SqliteStorage {
    pool: SqlitePool,
    bus: Arc<EventBus>,
    origin: Origin,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        let bus = Arc::new(EventBus::new());
        let origin = bus.new_origin();
        Self { pool, bus, origin }
    }

    /// Another handle over the same pool, with its own origin.
    #[cfg(test)]
    pub fn open_tab(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            bus: Arc::clone(&self.bus),
            origin: self.bus.new_origin(),
        }
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.bus.broadcast(
            self.origin,
            StorageEvent {
                key: key.to_string(),
                kind: StorageEventKind::Set,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.bus.broadcast(
                self.origin,
                StorageEvent {
                    key: key.to_string(),
                    kind: StorageEventKind::Removed,
                },
            );
        }
        Ok(())
    }

    fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn origin(&self) -> Origin {
        self.origin
    }
}

use anyhow::Result;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use tower_sessions_sqlx_store::SqliteStore;

/// SQLite database holding visitor sessions
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Configure SQLite to create the database file if it doesn't exist
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Session store on this database, with its table created if needed.
    pub async fn session_store(&self) -> Result<SqliteStore> {
        let store = SqliteStore::new(self.pool.clone());
        store.migrate().await?;
        Ok(store)
    }
}

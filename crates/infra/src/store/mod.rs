//! SQLite-backed store for the generated dataset.
//!
//! One `SqliteStore` owns one connection for the whole run. Writes are grouped
//! in one transaction per stage; a failed stage rolls back only itself.

mod customers;
mod products;
mod sales;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::instrument;

use crate::error::{StoreError, sqlx_err};
use crate::schema;

/// Rows per multi-row `INSERT` (keeps bind counts well below SQLite limits).
const INSERT_CHUNK: usize = 500;

#[derive(Debug)]
pub struct SqliteStore {
    pub(crate) conn: SqliteConnection,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` with foreign keys on.
    #[instrument(err)]
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| StoreError::Connect {
                url: url.to_string(),
                source,
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let conn = options.connect().await.map_err(|source| StoreError::Connect {
            url: url.to_string(),
            source,
        })?;

        tracing::info!(url, "database connection established");
        Ok(Self { conn })
    }

    /// Create the four tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn init_schema(&mut self) -> Result<(), StoreError> {
        let mut tx = self.conn.begin().await.map_err(sqlx_err("init_schema"))?;
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(sqlx_err("init_schema"))?;
        }
        tx.commit().await.map_err(sqlx_err("init_schema"))?;

        tracing::info!(tables = schema::TABLES.len(), "schema ready");
        Ok(())
    }

    /// Names of the user tables currently present, sorted.
    pub async fn table_names(&mut self) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(sqlx_err("table_names"))
    }

    /// Release the connection.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await.map_err(sqlx_err("close"))?;
        tracing::debug!("database connection closed");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::memory_store;

    #[tokio::test]
    async fn schema_creates_the_four_tables() {
        let mut store = memory_store().await;
        let tables = store.table_names().await.unwrap();
        for table in schema::TABLES {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let mut store = memory_store().await;
        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.table_names().await.unwrap().len(), schema::TABLES.len());
    }

    #[tokio::test]
    async fn unopenable_path_is_a_connect_error() {
        let err = SqliteStore::connect("sqlite:///nonexistent-dir/tienda.db").await.unwrap_err();
        assert!(matches!(err, StoreError::Connect { .. }));
    }

    #[tokio::test]
    async fn close_releases_the_connection() {
        let store = memory_store().await;
        store.close().await.unwrap();
    }
}

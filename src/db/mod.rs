//! Record storage over the DiVA relational database.
//!
//! Each record type maps to a table of the same name. Rows are read as
//! column-name to text maps and converted per record type.
//!
//! # Architecture
//!
//! - [`Database`] - `SQLite` connection pool wrapper
//! - [`RecordReaderFactory`] / [`RecordReader`] - row access seam
//! - [`SqlxRecordReaderFactory`] - production reader over [`Database`]
//! - [`DbConverterFactory`] / [`DbConverter`] - per-type row conversion
//! - [`DbRecordStorage`] - read/readList orchestration, refuses every other operation

mod converter;
mod organisation;
mod predecessor;
mod reader;
mod storage;

pub use converter::{DbConverter, DbConverterFactory, DefaultDbConverterFactory};
pub use organisation::OrganisationConverter;
pub use predecessor::OrganisationPredecessorConverter;
pub use reader::{Conditions, DbRow, RecordReader, RecordReaderFactory, SqlxRecordReaderFactory};
pub use storage::{DbRecordStorage, RECORD_TYPES};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::error::Result;

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default `SQLite` busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Pool tuning applied when connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Database connection wrapper with connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects to `database_url` (e.g. `sqlite:diva.db`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`](crate::StorageError::Database) if
    /// the connection or pragma setup fails.
    #[instrument(skip(options))]
    pub async fn connect(database_url: &str, options: &DatabaseOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .connect(database_url)
            .await?;

        sqlx::query(&format!("PRAGMA busy_timeout={}", options.busy_timeout_ms))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Creates an in-memory database for testing.
    ///
    /// Limited to one connection: every `SQLite` in-memory connection is its
    /// own database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`](crate::StorageError::Database) if
    /// the connection fails.
    #[instrument]
    pub async fn new_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Gracefully closes all connections in the pool.
    #[instrument(skip(self))]
    pub async fn close(self) {
        self.pool.close().await;
    }
}

//! Row access seam for the relational storage.
//!
//! Readers see the database as untyped rows: every non-null column value is
//! returned as text, null columns are left out of the row map. Interpreting
//! the values is the converters' job.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};
use tracing::{debug, instrument};

use crate::error::{DbErrorKind, Result, StorageError};

use super::Database;

/// One row: column name to text value, in select-list order. Null columns
/// are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbRow {
    columns: Vec<(String, String)>,
}

impl DbRow {
    /// An empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty row with room for `capacity` columns.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Sets `column`. A column already present keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((column, value)),
        }
    }

    /// Returns the value of `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// True if `column` is present, i.e. was selected and not null.
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in select-list order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in select-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<C: Into<String>, V: Into<String>> FromIterator<(C, V)> for DbRow {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Equality conditions: column name to required value. Empty means no restriction.
pub type Conditions = BTreeMap<String, String>;

/// Reads rows from named tables.
#[async_trait]
pub trait RecordReader: Send + Sync {
    /// Reads every row of `table` matching all `conditions`, in backend order.
    async fn read_all_from_table_using_conditions(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<Vec<DbRow>>;

    /// Reads the single row of `table` matching all `conditions`.
    ///
    /// # Errors
    ///
    /// Fails with [`DbErrorKind::RowNotFound`] or [`DbErrorKind::TooManyRows`]
    /// unless exactly one row matches.
    async fn read_one_row_from_db_using_table_and_conditions(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<DbRow>;
}

/// Hands out a [`RecordReader`] per query.
pub trait RecordReaderFactory: Send + Sync {
    /// Returns a fresh reader. Storages call this once per `read` or
    /// `read_list`.
    fn factor(&self) -> Box<dyn RecordReader>;
}

/// Factory for readers over a shared [`Database`] pool.
#[derive(Debug, Clone)]
pub struct SqlxRecordReaderFactory {
    database: Database,
}

impl SqlxRecordReaderFactory {
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl RecordReaderFactory for SqlxRecordReaderFactory {
    fn factor(&self) -> Box<dyn RecordReader> {
        Box::new(SqlxRecordReader {
            database: self.database.clone(),
        })
    }
}

#[derive(Debug)]
struct SqlxRecordReader {
    database: Database,
}

#[async_trait]
impl RecordReader for SqlxRecordReader {
    #[instrument(skip(self))]
    async fn read_all_from_table_using_conditions(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<Vec<DbRow>> {
        let sql = select_statement(table, conditions);
        let mut query = sqlx::query(&sql);
        for value in conditions.values() {
            query = query.bind(value.as_str());
        }
        let rows = query.fetch_all(self.database.pool()).await?;
        debug!(rows = rows.len(), "Read rows");
        rows.iter().map(row_to_map).collect()
    }

    async fn read_one_row_from_db_using_table_and_conditions(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> Result<DbRow> {
        let mut rows = self
            .read_all_from_table_using_conditions(table, conditions)
            .await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(StorageError::database(
                DbErrorKind::RowNotFound,
                format!("no row in {table} matching {}", describe(conditions)),
            )),
            count => Err(StorageError::database(
                DbErrorKind::TooManyRows,
                format!(
                    "found {count} rows in {table} matching {}, expected exactly one",
                    describe(conditions)
                ),
            )),
        }
    }
}

/// Builds `SELECT * FROM "table" [WHERE "col" = ? AND ...]`.
///
/// Identifiers are double-quoted; condition values are bound in
/// [`Conditions`] iteration order.
pub(crate) fn select_statement(table: &str, conditions: &Conditions) -> String {
    let mut sql = format!("SELECT * FROM {}", quote_identifier(table));
    if !conditions.is_empty() {
        let clauses: Vec<String> = conditions
            .keys()
            .map(|column| format!("{} = ?", quote_identifier(column)))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn describe(conditions: &Conditions) -> String {
    if conditions.is_empty() {
        return "no conditions".to_string();
    }
    conditions
        .iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_map(row: &SqliteRow) -> Result<DbRow> {
    let mut map = DbRow::with_capacity(row.columns().len());
    for column in row.columns() {
        if let Some(value) = column_text(row, column.ordinal())? {
            map.insert(column.name(), value);
        }
    }
    Ok(map)
}

fn column_text(row: &SqliteRow, index: usize) -> Result<Option<String>> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(None);
    }
    if let Ok(text) = row.try_get::<String, _>(index) {
        return Ok(Some(text));
    }
    if let Ok(integer) = row.try_get::<i64, _>(index) {
        return Ok(Some(integer.to_string()));
    }
    let real: f64 = row.try_get(index)?;
    Ok(Some(real.to_string()))
}

//! Per-record-type conversion of database rows.

use crate::data::DataGroup;
use crate::error::{Result, StorageError};

use super::organisation::OrganisationConverter;
use super::predecessor::OrganisationPredecessorConverter;
use super::reader::DbRow;

/// Converts one database row into a generic record.
pub trait DbConverter: Send + Sync {
    /// Returns the converter's name (the record type it handles).
    fn name(&self) -> &str;

    /// Converts the row.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conversion`] when mandatory columns are
    /// absent or empty.
    fn from_map(&self, row: &DbRow) -> Result<DataGroup>;
}

/// Selects a [`DbConverter`] by record type.
pub trait DbConverterFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StorageError::NotImplemented`] for unknown record types.
    fn factor(&self, record_type: &str) -> Result<Box<dyn DbConverter>>;
}

/// Converter factory for the record types stored in the database.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDbConverterFactory;

impl DefaultDbConverterFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DbConverterFactory for DefaultDbConverterFactory {
    fn factor(&self, record_type: &str) -> Result<Box<dyn DbConverter>> {
        match record_type {
            "organisation" => Ok(Box::new(OrganisationConverter)),
            "divaOrganisationPredecessor" => Ok(Box::new(OrganisationPredecessorConverter)),
            _ => Err(StorageError::no_converter(record_type)),
        }
    }
}

/// Returns the column value when present and non-empty.
pub(crate) fn non_empty<'a>(row: &'a DbRow, column: &str) -> Option<&'a str> {
    row.get(column).filter(|value| !value.is_empty())
}

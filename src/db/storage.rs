//! [`RecordStorage`] over the relational database.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::data::{DataGroup, ReadResult};
use crate::error::{Result, StorageError};
use crate::storage::{RecordStorage, operation};

use super::converter::DbConverterFactory;
use super::reader::{Conditions, RecordReaderFactory};

/// Record types held in the database. Each is also its table name.
pub const RECORD_TYPES: [&str; 2] = ["organisation", "divaOrganisationPredecessor"];

/// Read-only storage for database-held record types.
pub struct DbRecordStorage {
    record_reader_factory: Arc<dyn RecordReaderFactory>,
    converter_factory: Arc<dyn DbConverterFactory>,
}

impl DbRecordStorage {
    #[must_use]
    pub fn using_record_reader_factory_and_converter_factory(
        record_reader_factory: Arc<dyn RecordReaderFactory>,
        converter_factory: Arc<dyn DbConverterFactory>,
    ) -> Self {
        Self {
            record_reader_factory,
            converter_factory,
        }
    }
}

impl std::fmt::Debug for DbRecordStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbRecordStorage").finish_non_exhaustive()
    }
}

fn is_recognized(record_type: &str) -> bool {
    RECORD_TYPES.contains(&record_type)
}

/// `{ lowercase(type)_id: id }`.
fn read_conditions(record_type: &str, id: &str) -> Conditions {
    let mut conditions = Conditions::new();
    conditions.insert(format!("{}_id", record_type.to_lowercase()), id.to_string());
    conditions
}

#[async_trait]
impl RecordStorage for DbRecordStorage {
    #[instrument(skip(self))]
    async fn read(&self, record_type: &str, id: &str) -> Result<DataGroup> {
        if !is_recognized(record_type) {
            return Err(StorageError::not_implemented_for_type(
                operation::READ,
                record_type,
            ));
        }
        let conditions = read_conditions(record_type, id);
        let reader = self.record_reader_factory.factor();
        let row = reader
            .read_one_row_from_db_using_table_and_conditions(record_type, &conditions)
            .await?;
        let converter = self.converter_factory.factor(record_type)?;
        debug!(converter = converter.name(), "Converting row");
        converter.from_map(&row)
    }

    #[instrument(skip(self, _filter))]
    async fn read_list(&self, record_type: &str, _filter: &DataGroup) -> Result<ReadResult> {
        if !is_recognized(record_type) {
            return Err(StorageError::not_implemented_for_type(
                operation::READ_LIST,
                record_type,
            ));
        }
        let reader = self.record_reader_factory.factor();
        let rows = reader
            .read_all_from_table_using_conditions(record_type, &Conditions::new())
            .await?;
        let converter = self.converter_factory.factor(record_type)?;
        let records = rows
            .iter()
            .map(|row| converter.from_map(row))
            .collect::<Result<Vec<_>>>()?;
        info!(count = records.len(), "Read record list from database");
        Ok(ReadResult::from_data_groups(records))
    }

    async fn read_abstract_list(
        &self,
        _record_type: &str,
        _filter: &DataGroup,
    ) -> Result<ReadResult> {
        Err(StorageError::not_implemented(operation::READ_ABSTRACT_LIST))
    }

    async fn read_link_list(&self, _record_type: &str, _id: &str) -> Result<DataGroup> {
        Err(StorageError::not_implemented(operation::READ_LINK_LIST))
    }

    async fn generate_link_collection_pointing_to_record(
        &self,
        _record_type: &str,
        _id: &str,
    ) -> Result<Vec<DataGroup>> {
        Err(StorageError::not_implemented(
            operation::GENERATE_LINK_COLLECTION_POINTING_TO_RECORD,
        ))
    }

    async fn create(
        &self,
        _record_type: &str,
        _id: &str,
        _record: &DataGroup,
        _collected_terms: &DataGroup,
        _linked_data: &DataGroup,
        _data_divider: &str,
    ) -> Result<()> {
        Err(StorageError::not_implemented(operation::CREATE))
    }

    async fn update(
        &self,
        _record_type: &str,
        _id: &str,
        _record: &DataGroup,
        _collected_terms: &DataGroup,
        _linked_data: &DataGroup,
        _data_divider: &str,
    ) -> Result<()> {
        Err(StorageError::not_implemented(operation::UPDATE))
    }

    async fn delete_by_type_and_id(&self, _record_type: &str, _id: &str) -> Result<()> {
        Err(StorageError::not_implemented(operation::DELETE_BY_TYPE_AND_ID))
    }

    async fn links_exist_for_record(&self, _record_type: &str, _id: &str) -> Result<bool> {
        Err(StorageError::not_implemented(operation::LINKS_EXIST_FOR_RECORD))
    }

    async fn records_exist_for_record_type(&self, _record_type: &str) -> Result<bool> {
        Err(StorageError::not_implemented(
            operation::RECORDS_EXIST_FOR_RECORD_TYPE,
        ))
    }

    async fn record_exists_for_abstract_or_implementing_record_type_and_record_id(
        &self,
        _record_type: &str,
        _id: &str,
    ) -> Result<bool> {
        Err(StorageError::not_implemented(
            operation::RECORD_EXISTS_FOR_ABSTRACT_OR_IMPLEMENTING_RECORD_TYPE_AND_RECORD_ID,
        ))
    }
}

//! Host record storage contract.
//!
//! The host framework talks to every storage through [`RecordStorage`].
//! Storages in this crate implement the read paths for the record types
//! their backend holds and answer every other operation with
//! [`StorageError::NotImplemented`](crate::StorageError::NotImplemented).

use async_trait::async_trait;

use crate::data::{DataGroup, ReadResult};
use crate::error::Result;

/// Operation names as the host framework reports them.
pub mod operation {
    pub const READ: &str = "read";
    pub const READ_LIST: &str = "readList";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE_BY_TYPE_AND_ID: &str = "deleteByTypeAndId";
    pub const LINKS_EXIST_FOR_RECORD: &str = "linksExistForRecord";
    pub const READ_ABSTRACT_LIST: &str = "readAbstractList";
    pub const READ_LINK_LIST: &str = "readLinkList";
    pub const GENERATE_LINK_COLLECTION_POINTING_TO_RECORD: &str =
        "generateLinkCollectionPointingToRecord";
    pub const RECORDS_EXIST_FOR_RECORD_TYPE: &str = "recordsExistForRecordType";
    pub const RECORD_EXISTS_FOR_ABSTRACT_OR_IMPLEMENTING_RECORD_TYPE_AND_RECORD_ID: &str =
        "recordExistsForAbstractOrImplementingRecordTypeAndRecordId";
}

/// Storage contract defined by the host framework.
///
/// # Object Safety
///
/// Uses `async_trait` so storages can be held as `Box<dyn RecordStorage>`.
#[async_trait]
#[allow(clippy::too_many_arguments)]
pub trait RecordStorage: Send + Sync {
    /// Reads one record.
    async fn read(&self, record_type: &str, id: &str) -> Result<DataGroup>;

    /// Reads every record of a type. The filter is the host's filter group.
    async fn read_list(&self, record_type: &str, filter: &DataGroup) -> Result<ReadResult>;

    /// Reads every record of an abstract type and its implementing types.
    async fn read_abstract_list(&self, record_type: &str, filter: &DataGroup)
    -> Result<ReadResult>;

    /// Reads the stored link list for a record.
    async fn read_link_list(&self, record_type: &str, id: &str) -> Result<DataGroup>;

    /// Collects links from other records pointing to this one.
    async fn generate_link_collection_pointing_to_record(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<Vec<DataGroup>>;

    async fn create(
        &self,
        record_type: &str,
        id: &str,
        record: &DataGroup,
        collected_terms: &DataGroup,
        linked_data: &DataGroup,
        data_divider: &str,
    ) -> Result<()>;

    async fn update(
        &self,
        record_type: &str,
        id: &str,
        record: &DataGroup,
        collected_terms: &DataGroup,
        linked_data: &DataGroup,
        data_divider: &str,
    ) -> Result<()>;

    async fn delete_by_type_and_id(&self, record_type: &str, id: &str) -> Result<()>;

    async fn links_exist_for_record(&self, record_type: &str, id: &str) -> Result<bool>;

    async fn records_exist_for_record_type(&self, record_type: &str) -> Result<bool>;

    async fn record_exists_for_abstract_or_implementing_record_type_and_record_id(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<bool>;
}

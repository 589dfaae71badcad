//! [`RecordStorage`] over the Fedora repository REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info, instrument};

use crate::data::{DataGroup, ReadResult};
use crate::error::{Result, StorageError};
use crate::http::HttpHandlerFactory;
use crate::storage::{RecordStorage, operation};

use super::converter::FedoraConverterFactory;
use super::list::FedoraListFetcher;
use super::pid_namespace;

/// Read-only storage for Fedora-held record types.
///
/// Every call is sequential: the pid list is resolved first, then each
/// record is fetched and converted in list order. The first failure aborts
/// the call.
pub struct FedoraRecordStorage {
    http_handler_factory: Arc<dyn HttpHandlerFactory>,
    converter_factory: Arc<dyn FedoraConverterFactory>,
    list_fetcher: FedoraListFetcher,
    base_url: String,
}

impl FedoraRecordStorage {
    /// Creates a storage reading from `base_url` (e.g. `http://host:8088/fedora/`).
    #[must_use]
    pub fn using_http_handler_factory_and_converter_factory_and_base_url(
        http_handler_factory: Arc<dyn HttpHandlerFactory>,
        converter_factory: Arc<dyn FedoraConverterFactory>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            list_fetcher: FedoraListFetcher::new(Arc::clone(&http_handler_factory), &base_url),
            http_handler_factory,
            converter_factory,
            base_url,
        }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the METADATA datastream URL for one object.
    #[must_use]
    pub fn content_url(&self, id: &str) -> String {
        format!("{}objects/{id}/datastreams/METADATA/content", self.base_url)
    }

    async fn fetch_record_xml(&self, record_type: &str, id: &str) -> Result<String> {
        let url = self.content_url(id);
        let mut handler = self.http_handler_factory.factor(&url);
        handler.set_request_method(Method::GET);

        let response_code = handler
            .response_code()
            .await
            .map_err(|error| read_error(record_type, id, &error.to_string()))?;
        if response_code != 200 {
            return Err(read_error(
                record_type,
                id,
                &format!("Fedora responded with status {response_code}"),
            ));
        }
        handler
            .response_text()
            .await
            .map_err(|error| read_error(record_type, id, &error.to_string()))
    }

    async fn read_and_convert(&self, record_type: &str, id: &str) -> Result<DataGroup> {
        let xml = self.fetch_record_xml(record_type, id).await?;
        let converter = self.converter_factory.factor(record_type)?;
        debug!(converter = converter.name(), id, "Converting record");
        converter.from_xml(&xml)
    }
}

impl std::fmt::Debug for FedoraRecordStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedoraRecordStorage")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn read_error(record_type: &str, id: &str, detail: &str) -> StorageError {
    StorageError::read_fedora(format!(
        "Unable to read {record_type} with id {id}: {detail}"
    ))
}

#[async_trait]
impl RecordStorage for FedoraRecordStorage {
    #[instrument(skip(self))]
    async fn read(&self, record_type: &str, id: &str) -> Result<DataGroup> {
        if pid_namespace(record_type).is_none() {
            return Err(StorageError::not_implemented_for_type(
                operation::READ,
                record_type,
            ));
        }
        self.read_and_convert(record_type, id).await
    }

    #[instrument(skip(self, _filter))]
    async fn read_list(&self, record_type: &str, _filter: &DataGroup) -> Result<ReadResult> {
        let Some(namespace) = pid_namespace(record_type) else {
            return Err(StorageError::not_implemented_for_type(
                operation::READ_LIST,
                record_type,
            ));
        };

        let pids = self.list_fetcher.fetch_pids(record_type, namespace).await?;
        let mut records = Vec::with_capacity(pids.len());
        for pid in &pids {
            records.push(self.read_and_convert(record_type, pid).await?);
        }
        info!(count = records.len(), "Read record list from Fedora");
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

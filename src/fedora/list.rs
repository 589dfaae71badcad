//! Resolution of a record type to the ordered list of Fedora pids.

use std::sync::Arc;

use reqwest::Method;
use roxmltree::Document;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::{Result, StorageError};
use crate::http::HttpHandlerFactory;

use super::xml;

/// Maximum number of pids requested in one search.
pub const MAX_RESULTS: usize = 100;

/// Fetches pid lists from the Fedora `objects` search endpoint.
pub struct FedoraListFetcher {
    http_handler_factory: Arc<dyn HttpHandlerFactory>,
    base_url: String,
}

impl FedoraListFetcher {
    #[must_use]
    pub fn new(http_handler_factory: Arc<dyn HttpHandlerFactory>, base_url: impl Into<String>) -> Self {
        Self {
            http_handler_factory,
            base_url: base_url.into(),
        }
    }

    /// Builds the search URL for every object in a pid namespace.
    #[must_use]
    pub fn list_url(&self, pid_namespace: &str) -> String {
        format!(
            "{}objects?pid=true&maxResults={MAX_RESULTS}&resultFormat=xml&query=pid%7E{pid_namespace}:*",
            self.base_url
        )
    }

    /// Returns the pids of every object in `pid_namespace`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadFedora`] when the request fails, the status
    /// is not 200 or the response is not readable XML. No partial list is
    /// returned.
    #[instrument(skip(self))]
    pub async fn fetch_pids(&self, record_type: &str, pid_namespace: &str) -> Result<Vec<String>> {
        let url = self.list_url(pid_namespace);
        let mut handler = self.http_handler_factory.factor(&url);
        handler.set_request_method(Method::GET);

        let response_code = handler
            .response_code()
            .await
            .map_err(|error| list_error(record_type, &error.to_string()))?;
        if response_code != 200 {
            return Err(list_error(
                record_type,
                &format!("Fedora responded with status {response_code}"),
            ));
        }
        let response_text = handler
            .response_text()
            .await
            .map_err(|error| list_error(record_type, &error.to_string()))?;

        let pids = parse_pid_list(&response_text)
            .map_err(|error| list_error(record_type, &error.to_string()))?;
        debug!(count = pids.len(), "Resolved pid list");
        Ok(pids)
    }
}

impl std::fmt::Debug for FedoraListFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedoraListFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Why a search result could not be turned into a pid list.
#[derive(Debug, Error)]
pub enum PidListError {
    /// The document is not well-formed XML.
    #[error("Can not read xml: {0}")]
    Xml(#[from] roxmltree::Error),

    /// An `objectFields` entry has no pid or a blank one (1-based position).
    #[error("Can not read pid of object number {0}")]
    MissingPid(usize),
}

/// Extracts `resultList/objectFields/pid` texts from a search result, one
/// per `objectFields` entry. A result without `resultList` holds no pids.
///
/// # Errors
///
/// Returns [`PidListError::Xml`] when the document is not well-formed and
/// [`PidListError::MissingPid`] when an entry lacks a non-blank pid.
pub fn parse_pid_list(xml_text: &str) -> std::result::Result<Vec<String>, PidListError> {
    let document = Document::parse(xml_text)?;
    let Some(result_list) = xml::child(document.root_element(), "resultList") else {
        return Ok(Vec::new());
    };
    xml::children(result_list, "objectFields")
        .enumerate()
        .map(|(index, object_fields)| {
            xml::child_text(object_fields, "pid")
                .map(str::to_string)
                .ok_or(PidListError::MissingPid(index + 1))
        })
        .collect()
}

fn list_error(record_type: &str, detail: &str) -> StorageError {
    StorageError::read_fedora(format!("Unable to read list of {record_type}s: {detail}"))
}

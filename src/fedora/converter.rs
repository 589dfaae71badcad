//! Per-record-type conversion of Fedora METADATA datastreams.

use roxmltree::{Document, Node};

use crate::data::DataGroup;
use crate::error::{Result, StorageError};

use super::person::PersonConverter;
use super::place::PlaceConverter;
use super::xml;

/// Converts one METADATA datastream into a generic record.
pub trait FedoraConverter: Send + Sync {
    /// Returns the converter's name (the record type it handles).
    fn name(&self) -> &str;

    /// Converts the XML document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conversion`] when the document is unreadable
    /// or lacks mandatory elements.
    fn from_xml(&self, xml: &str) -> Result<DataGroup>;
}

/// Selects a [`FedoraConverter`] by record type.
pub trait FedoraConverterFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StorageError::NotImplemented`] for unknown record types.
    fn factor(&self, record_type: &str) -> Result<Box<dyn FedoraConverter>>;
}

/// Converter factory for the record types stored in Fedora.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFedoraConverterFactory;

impl DefaultFedoraConverterFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FedoraConverterFactory for DefaultFedoraConverterFactory {
    fn factor(&self, record_type: &str) -> Result<Box<dyn FedoraConverter>> {
        match record_type {
            "person" => Ok(Box::new(PersonConverter)),
            "place" => Ok(Box::new(PlaceConverter)),
            _ => Err(StorageError::no_converter(record_type)),
        }
    }
}

/// Parses `xml` and hands the root element and its pid to `build`.
///
/// `entity` names the record in error messages
/// (`"Error converting {entity} to Cora {entity}: ..."`).
pub(crate) fn convert_document<F>(entity: &str, xml: &str, build: F) -> Result<DataGroup>
where
    F: FnOnce(Node<'_, '_>, &str) -> DataGroup,
{
    let document = Document::parse(xml).map_err(|error| {
        conversion_error(entity, &format!("Can not read xml: {error}"))
    })?;
    let root = document.root_element();
    let pid = xml::child_text(root, "pid")
        .ok_or_else(|| conversion_error(entity, "Can not read pid"))?;
    Ok(build(root, pid))
}

fn conversion_error(entity: &str, detail: &str) -> StorageError {
    StorageError::conversion(format!(
        "Error converting {entity} to Cora {entity}: {detail}"
    ))
}

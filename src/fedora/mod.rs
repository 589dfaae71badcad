//! Record storage over a Fedora Commons repository.
//!
//! Records live as Fedora objects whose `METADATA` datastream holds the
//! record XML. Lists are resolved through the repository's `objects` search
//! endpoint, then each object is fetched and converted on its own.
//!
//! # Architecture
//!
//! - [`FedoraRecordStorage`] - read/readList orchestration, refuses every other operation
//! - [`FedoraListFetcher`] - record type to ordered pid list
//! - [`FedoraConverterFactory`] / [`FedoraConverter`] - per-type XML conversion
//! - [`PersonConverter`], [`PlaceConverter`] - converters for the stored types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use diva_storage::RecordStorage;
//! use diva_storage::fedora::{DefaultFedoraConverterFactory, FedoraRecordStorage};
//! use diva_storage::http::ReqwestHttpHandlerFactory;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FedoraRecordStorage::using_http_handler_factory_and_converter_factory_and_base_url(
//!     Arc::new(ReqwestHttpHandlerFactory::new()?),
//!     Arc::new(DefaultFedoraConverterFactory::new()),
//!     "http://localhost:8088/fedora/",
//! );
//! let place = storage.read("place", "alvin-place:22").await?;
//! println!("{}", place.name_in_data);
//! # Ok(())
//! # }
//! ```

mod converter;
mod list;
mod person;
mod place;
mod storage;
mod xml;

pub use converter::{DefaultFedoraConverterFactory, FedoraConverter, FedoraConverterFactory};
pub use list::{FedoraListFetcher, MAX_RESULTS, PidListError, parse_pid_list};
pub use person::PersonConverter;
pub use place::PlaceConverter;
pub use storage::FedoraRecordStorage;

/// Record types held in Fedora and the pid namespace their objects live in.
pub const RECORD_TYPE_PID_NAMESPACES: [(&str, &str); 2] =
    [("place", "alvin-place"), ("person", "authority-person")];

/// Returns the pid namespace for a Fedora-held record type.
#[must_use]
pub fn pid_namespace(record_type: &str) -> Option<&'static str> {
    RECORD_TYPE_PID_NAMESPACES
        .iter()
        .find(|(known, _)| *known == record_type)
        .map(|(_, namespace)| *namespace)
}

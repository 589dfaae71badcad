//! DiVA Storage Library
//!
//! Read-only record storage adapters for the DiVA/Cora platform. Records
//! held in the legacy Fedora repository (places, persons) and in the DiVA
//! relational database (organisations, organisation predecessors) are
//! fetched in their backend-native form and converted into generic
//! [`DataGroup`] trees.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`storage`] - The [`RecordStorage`] contract both adapters implement
//! - [`fedora`] - Fedora HTTP/XML adapter, list fetcher and XML converters
//! - [`db`] - Relational adapter, row reader and row converters
//! - [`http`] - HTTP handler seam and its `reqwest` implementation
//! - [`data`] - Generic record tree
//! - [`error`] - [`StorageError`] and friends

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data;
pub mod db;
pub mod error;
pub mod fedora;
pub mod http;
pub mod storage;
pub mod user_agent;

// Re-export commonly used types
pub use data::{DataAtomic, DataElement, DataGroup, ReadResult};
pub use db::{Database, DatabaseOptions, DbRecordStorage};
pub use error::{DbErrorKind, Result, StorageError};
pub use fedora::FedoraRecordStorage;
pub use storage::RecordStorage;

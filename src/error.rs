//! Error types for storage operations.
//!
//! Every failure surfaces to the host as one [`StorageError`]. Display
//! strings are the bare messages the host framework matches on, so the
//! variants carry their message verbatim rather than wrapping it.

use std::fmt;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Structured classification for relational backend failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// No row matched the requested conditions.
    RowNotFound,
    /// More than one row matched where exactly one was expected.
    TooManyRows,
    /// Connection pool timed out or was closed.
    Pool,
    /// Filesystem or transport IO failure.
    Io,
    /// The backend rejected the statement (unknown table, column, ...).
    Statement,
    /// Column value could not be read as text.
    Decode,
    /// Unclassified database failure.
    Other,
}

impl DbErrorKind {
    /// Classifies a sqlx failure. Anything not matched is [`DbErrorKind::Other`].
    #[must_use]
    pub fn from_sqlx(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::RowNotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Pool,
            sqlx::Error::Io(_) => Self::Io,
            sqlx::Error::Database(_) => Self::Statement,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => Self::Decode,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RowNotFound => "row_not_found",
            Self::TooManyRows => "too_many_rows",
            Self::Pool => "pool",
            Self::Io => "io",
            Self::Statement => "statement",
            Self::Decode => "decode",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// Errors returned by record storages, converters and their collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The operation or record type is intentionally unsupported.
    #[error("{0}")]
    NotImplemented(String),

    /// Reading from the Fedora repository failed (transport or unreadable XML).
    #[error("{0}")]
    ReadFedora(String),

    /// A converter rejected its input.
    #[error("{0}")]
    Conversion(String),

    /// The relational backend reported a failure.
    #[error("database error ({kind}): {message}")]
    Database {
        /// Typed classification of the failure.
        kind: DbErrorKind,
        /// Human-readable backend error text.
        message: String,
    },
}

impl StorageError {
    /// `"{operation} is not implemented"`.
    #[must_use]
    pub fn not_implemented(operation: &str) -> Self {
        Self::NotImplemented(format!("{operation} is not implemented"))
    }

    /// `"{operation} is not implemented for type: {record_type}"`.
    #[must_use]
    pub fn not_implemented_for_type(operation: &str, record_type: &str) -> Self {
        Self::NotImplemented(format!(
            "{operation} is not implemented for type: {record_type}"
        ))
    }

    /// `"No converter implemented for: {record_type}"`, a not-implemented error.
    #[must_use]
    pub fn no_converter(record_type: &str) -> Self {
        Self::NotImplemented(format!("No converter implemented for: {record_type}"))
    }

    /// A Fedora fetch or list failure carrying `message` verbatim.
    #[must_use]
    pub fn read_fedora(message: impl Into<String>) -> Self {
        Self::ReadFedora(message.into())
    }

    /// A converter rejected its input.
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// A reader failure of the given kind.
    #[must_use]
    pub fn database(kind: DbErrorKind, message: impl Into<String>) -> Self {
        Self::Database {
            kind,
            message: message.into(),
        }
    }

    /// Returns true for the not-implemented kind.
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Returns the typed database error kind, when this is a database error.
    #[must_use]
    pub fn database_kind(&self) -> Option<DbErrorKind> {
        match self {
            Self::Database { kind, .. } => Some(*kind),
            Self::NotImplemented(_) | Self::ReadFedora(_) | Self::Conversion(_) => None,
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            kind: DbErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

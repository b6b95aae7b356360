//! Error types for the seat map core.
//!
//! Only two paths can fail: importing a payload ([`ImportError`]) and talking
//! to a persistence adapter ([`PersistenceError`]). Map operations and reducer
//! arms treat bad ids and an absent map as silent no-ops instead.

use thiserror::Error;

/// Errors produced by [`crate::serialization::import_map`].
///
/// Validation always reports the first violation found; an import never
/// partially succeeds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The payload is not parseable JSON at all
    #[error("Invalid JSON format: {0}")]
    Format(String),

    /// The payload parsed but is missing required fields
    #[error("{0}")]
    Validation(String),
}

impl ImportError {
    /// Returns true for [`ImportError::Format`]
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Returns true for [`ImportError::Validation`]
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errors reported by persistence adapters
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the underlying storage failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Stored seat map is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The adapter is unavailable for another reason
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

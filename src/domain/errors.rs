//! Domain error types
//!
//! This module defines the error hierarchy for isalink. Collaborator-specific
//! failures are wrapped so that third-party types never leak through the
//! public API.

use crate::domain::ids::{EntityKind, ObjectId};
use thiserror::Error;

/// Main isalink error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum IsaLinkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A supplied identifier did not resolve
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Repository-related errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Workbook could not be read or a sheet is malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Identifier resolution errors
///
/// Raised before any side effect takes place, so an operation failing with one
/// of these has written nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No target identifiers were supplied
    #[error("No IDs provided.")]
    NoIdentifiers,

    /// Target entity does not exist
    #[error("Invalid {kind} ID: {id}")]
    EntityNotFound { kind: EntityKind, id: ObjectId },

    /// Source file annotation does not exist
    #[error("No FileAnnotation found with ID {0}")]
    FileNotFound(ObjectId),

    /// The entity kind cannot be used for this operation
    #[error("{kind} is not a supported target for {operation}")]
    UnsupportedKind {
        kind: EntityKind,
        operation: &'static str,
    },
}

/// Repository-specific errors
///
/// Errors that occur when talking to the repository service.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Catalog could not be opened
    #[error("Repository catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Catalog content is not valid
    #[error("Repository catalog is corrupt: {0}")]
    CatalogCorrupt(String),

    /// File bytes could not be read
    #[error("Failed to read file: {0}")]
    ReadFailed(String),

    /// Annotation could not be written
    #[error("Failed to write annotation: {0}")]
    WriteFailed(String),

    /// Artifact upload failed
    #[error("Failed to upload artifact: {0}")]
    UploadFailed(String),

    /// Session was already released
    #[error("Repository session is closed")]
    SessionClosed,

    /// Every identifier up to `u64::MAX` is taken
    #[error("Repository has no identifiers left to allocate")]
    IdsExhausted,
}

impl IsaLinkError {
    /// Returns true for errors caused by identifiers that do not resolve
    pub fn is_resolution(&self) -> bool {
        matches!(self, IsaLinkError::Resolution(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for IsaLinkError {
    fn from(err: std::io::Error) -> Self {
        IsaLinkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for IsaLinkError {
    fn from(err: serde_json::Error) -> Self {
        IsaLinkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for IsaLinkError {
    fn from(err: toml::de::Error) -> Self {
        IsaLinkError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for IsaLinkError {
    fn from(err: csv::Error) -> Self {
        IsaLinkError::Serialization(format!("CSV error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for IsaLinkError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        IsaLinkError::Serialization(format!("XLSX error: {err}"))
    }
}

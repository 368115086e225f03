//! # Error Types
//!
//! Structured error types for dof_core. Every failure in this crate is
//! deterministic: the engine performs no I/O, so the same inputs always
//! produce the same error. Nothing here is worth retrying.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::errors::{CalcError, CalcResult};
//!
//! fn validate_focal_length(focal_length_mm: u32) -> CalcResult<()> {
//!     if focal_length_mm == 0 {
//!         return Err(CalcError::invalid_input(
//!             "focal_length_mm",
//!             focal_length_mm.to_string(),
//!             "Focal length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for dof_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and catalog operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Nominal aperture code is not in the aperture table.
    ///
    /// Callers (sliders, catalogs) must only present codes the table knows.
    #[error("Unknown aperture code: {code} (f/{:.1})", nominal_f_number(.code))]
    UnknownApertureCode { code: u32 },

    /// An input value is invalid (non-positive, negative, not finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Named body, lens or range is not in the catalog
    #[error("{kind} not found in catalog: {name}")]
    CatalogEntryNotFound { kind: String, name: String },

    /// Catalog data failed validation at load time
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// File I/O error while reading catalog data
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an UnknownApertureCode error
    pub fn unknown_aperture(code: u32) -> Self {
        CalcError::UnknownApertureCode { code }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a CatalogEntryNotFound error
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::CatalogEntryNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an InvalidCatalog error
    pub fn invalid_catalog(reason: impl Into<String>) -> Self {
        CalcError::InvalidCatalog {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownApertureCode { .. } => "UNKNOWN_APERTURE_CODE",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::CatalogEntryNotFound { .. } => "CATALOG_ENTRY_NOT_FOUND",
            CalcError::InvalidCatalog { .. } => "INVALID_CATALOG",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

fn nominal_f_number(code: &u32) -> f64 {
    f64::from(*code) / 100.0
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

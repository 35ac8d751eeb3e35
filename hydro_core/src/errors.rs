//! # Error Types
//!
//! Structured error types for hydro_core. The calculation engine itself never
//! fails: unparseable input degrades to zero, unknown unit pairs pass through
//! and degenerate denominators yield zero. Errors only come from the layers
//! around it: input validation, settings and history persistence.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::errors::{HydroError, HydroResult};
//!
//! fn check_diameter(diameter_mm: f64) -> HydroResult<()> {
//!     if diameter_mm <= 0.0 {
//!         return Err(HydroError::invalid_input(
//!             "pipeDiameter",
//!             diameter_mm.to_string(),
//!             "Diameter must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hydro_core operations
pub type HydroResult<T> = Result<T, HydroError>;

/// Structured error type for validation and persistence.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum HydroError {
    /// An input value is invalid (not a number, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Calculation id not in the catalog
    #[error("Unknown calculation: {id}")]
    UnknownCalculation { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// History file is being written by another process
    #[error("File locked: '{path}'")]
    FileLocked { path: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl HydroError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        HydroError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownCalculation error
    pub fn unknown_calculation(id: impl Into<String>) -> Self {
        HydroError::UnknownCalculation { id: id.into() }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        HydroError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HydroError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HydroError::InvalidInput { .. } => "INVALID_INPUT",
            HydroError::MissingField { .. } => "MISSING_FIELD",
            HydroError::UnknownCalculation { .. } => "UNKNOWN_CALCULATION",
            HydroError::FileError { .. } => "FILE_ERROR",
            HydroError::FileLocked { .. } => "FILE_LOCKED",
            HydroError::SerializationError { .. } => "SERIALIZATION_ERROR",
            HydroError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = HydroError::invalid_input("pumpEfficiency", "0", "Must be greater than zero");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: HydroError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HydroError::missing_field("flowRate").error_code(), "MISSING_FIELD");
        assert_eq!(
            HydroError::unknown_calculation("foo").error_code(),
            "UNKNOWN_CALCULATION"
        );
        assert!(HydroError::FileLocked { path: "h.json".into() }.is_recoverable());
        assert!(!HydroError::missing_field("x").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = HydroError::missing_field("pipeArea");
        assert_eq!(error.to_string(), "Missing required field: pipeArea");
    }
}

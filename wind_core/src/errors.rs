//! # Error Types
//!
//! Structured error types for wind_core. Every failure carries enough
//! context (field, quantity, offending value) for a front end to either
//! re-prompt the user or report a defect.
//!
//! ## Error Kinds
//!
//! - [`CalcError::InvalidInput`] / [`CalcError::MissingField`] - rejected
//!   before any computation starts. User-correctable.
//! - [`CalcError::DomainError`] - a formula precondition failed mid-calculation
//!   and no floor/clamp policy exists for it.
//! - [`CalcError::UnsupportedConfiguration`] - a terrain category or zone that
//!   the selected lookup table does not contain.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_m: f64) -> CalcResult<()> {
//!     if height_m <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height_m",
//!             height_m.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_height(-2.0).unwrap_err();
//! assert!(err.is_user_correctable());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for wind_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for wind load calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative dimension, pitch outside table, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A formula precondition failed and no clamp policy applies
    #[error("Domain error in {quantity}: {reason}")]
    DomainError { quantity: String, reason: String },

    /// A lookup key is not present in the selected table
    #[error("Unsupported configuration: {what} '{value}'")]
    UnsupportedConfiguration { what: String, value: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch on a stored record
    #[error("Version mismatch: record version {found}, expected {expected}")]
    VersionMismatch { found: String, expected: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a DomainError
    pub fn domain(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DomainError {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedConfiguration error
    pub fn unsupported(what: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::UnsupportedConfiguration {
            what: what.into(),
            value: value.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// True when the caller should re-prompt for input rather than report a defect.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::DomainError { .. } => "DOMAIN_ERROR",
            CalcError::UnsupportedConfiguration { .. } => "UNSUPPORTED_CONFIGURATION",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject negative or non-finite values for a field that must be >= 0.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a finite value >= 0",
        ));
    }
    Ok(())
}

/// Reject zero, negative or non-finite values for a field that must be > 0.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a finite value > 0",
        ));
    }
    Ok(())
}

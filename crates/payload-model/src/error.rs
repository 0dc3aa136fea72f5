//! Error taxonomy shared by decoding and validation.
//!
//! Decoding is strictly fail-fast: the first field-level problem aborts the
//! call. Validation is the one place aggregation happens, and it carries the
//! full grouped report. Nothing is swallowed inside the engine; every error
//! surfaces to the caller, which decides final presentation.

use thiserror::Error;

use crate::report::ErrorReport;
use crate::variants::VariantError;

/// Errors raised while decoding or validating a payload.
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    /// A non-optional field was absent from both the direct and the
    /// XML-attribute lookup locations.
    #[error("Field '{field}' is required.")]
    MissingField { field: String },

    /// A coercion rule or a metadata invariant was violated.
    #[error("{0}")]
    InvalidData(String),

    /// The external validator reported violations for a decoded object.
    #[error("Validation failed.")]
    ValidationFailed(ErrorReport),

    /// An unknown backing value reached a backed-variant decode. The
    /// registry's own error passes through unwrapped.
    #[error(transparent)]
    Variant(#[from] VariantError),
}

impl PayloadError {
    /// Shorthand for a missing-field failure.
    pub fn missing_field(field: impl Into<String>) -> Self {
        PayloadError::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for an invalid-data failure.
    pub fn invalid_data(detail: impl Into<String>) -> Self {
        PayloadError::InvalidData(detail.into())
    }
}

pub type Result<T> = std::result::Result<T, PayloadError>;

//! Payload shape metadata and value models.
//!
//! This crate is the leaf of the workspace. It defines everything the
//! transformation engine and the validation adapter share:
//!
//! - **value**: the closed union of raw input values produced upstream
//! - **decoded**: the decoded object graph and its freeze-on-success builder
//! - **field**: per-field decode metadata (`FieldSpec`) and the closed tag set
//! - **schema**: ordered shape schemas and the immutable registry
//! - **variants**: finite scalar-backed variant sets
//! - **error**: the missing-field / invalid-data / validation-failed taxonomy
//! - **report**: grouped field-error reports

pub mod decoded;
pub mod error;
pub mod field;
pub mod report;
pub mod schema;
pub mod value;
pub mod variants;

// Re-export the common types for external use
pub use decoded::{Decoded, DecodedObject, DecodedVariant, ObjectBuilder};
pub use error::{PayloadError, Result};
pub use field::{FieldSpec, FieldSpecBuilder, TypeTag};
pub use report::{ErrorReport, FieldError};
pub use schema::{ObjectSchema, SchemaRegistry, SchemaRegistryBuilder};
pub use value::{RawMap, RawValue, UploadedFile, XML_ATTRIBUTES_KEY};
pub use variants::{Backing, VariantCase, VariantError, VariantRegistry, VariantSet};

//! External validation boundary and grouped report assembly.
//!
//! Field decoding is strictly fail-fast; this adapter is the one place where
//! errors aggregate. A validator call either passes silently or raises one
//! validation-failed error carrying every violation it found, grouped under
//! a key derived from the shape's type name.

use payload_model::{DecodedObject, ErrorReport, FieldError, PayloadError, Result};

/// A violation reported by the external constraint validator.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Path of the violated property.
    pub property_path: String,
    /// Human-readable constraint message.
    pub message: String,
    /// The offending value, when the validator captured it.
    pub invalid_value: Option<serde_json::Value>,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
            invalid_value: None,
        }
    }

    /// Attach the offending value.
    #[must_use]
    pub fn with_invalid_value(mut self, value: serde_json::Value) -> Self {
        self.invalid_value = Some(value);
        self
    }
}

/// The external constraint validator, invoked synchronously.
///
/// Its algorithm is out of scope here; the adapter only consumes the
/// violations it reports for the given group filter. The call is treated as
/// atomic, and its latency is the caller's concern.
pub trait Validator {
    fn validate(&self, object: &DecodedObject, groups: &[&str]) -> Vec<Violation>;
}

/// Converts validator violations into a grouped error report.
#[derive(Debug)]
pub struct ValidationAdapter<V> {
    validator: V,
}

impl<V: Validator> ValidationAdapter<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Run the validator against a fully decoded object.
    ///
    /// Zero violations return normally. Otherwise every violation of this
    /// one call is reported together under the shape's group key; the report
    /// is never partial and never merged with another call's.
    pub fn validate(&self, object: &DecodedObject, groups: &[&str]) -> Result<()> {
        let violations = self.validator.validate(object, groups);
        if violations.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            shape = object.shape(),
            count = violations.len(),
            "validation failed"
        );

        let key = group_key(object.shape());
        let mut report = ErrorReport::new();
        for violation in violations {
            let mut error = FieldError::new(violation.property_path, violation.message);
            error.value = violation.invalid_value;
            report.push(key.clone(), error);
        }
        Err(PayloadError::ValidationFailed(report))
    }
}

/// Derive the report group key from a shape's type name.
///
/// The literal substring `Exception` is removed, an underscore is inserted
/// before every ASCII uppercase letter not preceded by whitespace, the whole
/// result is upper-cased, and one leading underscore is dropped. The result
/// depends on nothing but the type name.
pub fn group_key(type_name: &str) -> String {
    let stripped = type_name.replace("Exception", "");
    let mut key = String::with_capacity(stripped.len() * 2);
    let mut prev: Option<char> = None;
    for ch in stripped.chars() {
        if ch.is_ascii_uppercase() && prev.is_none_or(|p| !p.is_whitespace()) {
            key.push('_');
        }
        key.push(ch.to_ascii_uppercase());
        prev = Some(ch);
    }
    match key.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => key,
    }
}

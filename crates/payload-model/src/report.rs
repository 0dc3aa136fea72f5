//! Grouped field-error reports.
//!
//! All violations found by one validator call are reported together under a
//! group key mechanically derived from the target shape's type name. A report
//! is built once per call and never mutated or merged afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

/// One reported violation of a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Property path of the offending field.
    pub parameter: String,
    /// Human-readable violation message.
    pub error: String,
    /// Offending raw value, when the producer captured one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(parameter: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            error: error.into(),
            value: None,
        }
    }

    /// Attach the offending raw value.
    #[must_use]
    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Violations keyed by a name derived from the target shape's type name,
/// in reporting order within each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    groups: BTreeMap<String, Vec<FieldError>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error to `group`, preserving insertion order within it.
    pub fn push(&mut self, group: impl Into<String>, error: FieldError) {
        self.groups.entry(group.into()).or_default().push(error);
    }

    /// Errors recorded under `key`, empty when the group does not exist.
    pub fn group(&self, key: &str) -> &[FieldError] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.groups
            .iter()
            .map(|(key, errors)| (key.as_str(), errors.as_slice()))
    }

    /// Total number of recorded errors across all groups.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

//! Finite scalar-backed variant sets.
//!
//! A backed-variant type is a closed set of named cases, each mapped to one
//! scalar backing value. Raw payload scalars decode into cases by backing
//! lookup. An unknown backing is the registry's own error and propagates
//! through the engine unwrapped.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::RawValue;

/// Scalar backing one variant case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backing {
    Int(i64),
    Str(String),
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backing::Int(value) => write!(f, "{value}"),
            Backing::Str(value) => write!(f, "{value}"),
        }
    }
}

/// One named case of a backed-variant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCase {
    pub name: String,
    pub backing: Backing,
}

/// A finite, scalar-backed variant set registered under a type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSet {
    name: String,
    cases: Vec<VariantCase>,
}

impl VariantSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a case mapped to the given backing value.
    #[must_use]
    pub fn with_case(mut self, name: impl Into<String>, backing: Backing) -> Self {
        self.cases.push(VariantCase {
            name: name.into(),
            backing,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[VariantCase] {
        &self.cases
    }

    /// Decode a raw scalar by backing lookup.
    ///
    /// String raw values match string backings exactly and integer backings
    /// numerically; form and query sources always deliver strings.
    pub fn decode(&self, raw: &RawValue) -> Result<&VariantCase, VariantError> {
        self.cases
            .iter()
            .find(|case| backing_matches(&case.backing, raw))
            .ok_or_else(|| VariantError {
                set: self.name.clone(),
                value: render_scalar(raw),
            })
    }
}

fn backing_matches(backing: &Backing, raw: &RawValue) -> bool {
    match (backing, raw) {
        (Backing::Str(backing), RawValue::String(s)) => backing == s,
        (Backing::Int(backing), RawValue::Number(n)) => {
            n.fract() == 0.0 && *backing == *n as i64
        }
        (Backing::Int(backing), RawValue::String(s)) => {
            s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *backing)
        }
        _ => false,
    }
}

fn render_scalar(raw: &RawValue) -> String {
    match raw {
        RawValue::String(s) => s.clone(),
        RawValue::Number(n) => format!("{n}"),
        RawValue::Bool(b) => b.to_string(),
        other => other.kind().to_string(),
    }
}

/// Unknown backing value for a variant set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid backing value for '{set}'.")]
pub struct VariantError {
    pub set: String,
    pub value: String,
}

/// Lookup table of every registered variant set.
#[derive(Debug, Default, Clone)]
pub struct VariantRegistry {
    sets: BTreeMap<String, VariantSet>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set under its type name.
    pub fn register(&mut self, set: VariantSet) {
        self.sets.insert(set.name().to_string(), set);
    }

    pub fn get(&self, name: &str) -> Option<&VariantSet> {
        self.sets.get(name)
    }
}

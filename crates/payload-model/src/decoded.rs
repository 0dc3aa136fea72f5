//! Decoded output values.
//!
//! The engine assembles target-shape instances without running any
//! shape-specific initialization logic: decoded values are assigned into an
//! [`ObjectBuilder`] by field identifier and frozen on full success. A
//! partially built object is never observable; on failure the builder is
//! simply dropped.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::value::{RawValue, UploadedFile};

/// A decoded backed-variant case: the set it belongs to and the case name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedVariant {
    pub set: String,
    pub name: String,
}

/// A fully decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Null,
    String(String),
    /// Locale code (lower-cased) to trimmed string.
    I18nStrings(BTreeMap<String, String>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Seconds past midnight.
    Time(i64),
    Int(i64),
    Float(f64),
    Bool(bool),
    File(UploadedFile),
    Variant(DecodedVariant),
    /// Container accepted as-is, without element validation.
    Untyped(RawValue),
    Strings(Vec<String>),
    Ints(Vec<i64>),
    Files(Vec<UploadedFile>),
    Variants(Vec<DecodedVariant>),
    Object(DecodedObject),
    Objects(Vec<DecodedObject>),
    /// Original locale key to decoded object.
    ObjectMap(BTreeMap<String, DecodedObject>),
}

impl Decoded {
    pub fn is_null(&self) -> bool {
        matches!(self, Decoded::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Decoded::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Decoded::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Decoded::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Decoded::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Decoded::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Decoded::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Decoded::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DecodedObject> {
        match self {
            Decoded::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&[DecodedObject]> {
        match self {
            Decoded::Objects(objects) => Some(objects),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Decoded::Strings(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Decoded::Ints(items) => Some(items),
            _ => None,
        }
    }
}

/// A decoded target-shape instance.
///
/// Only ever constructed through [`ObjectBuilder`]: a caller observes an
/// object only after every required field has been assigned. Skipped
/// optional fields are simply never assigned and [`DecodedObject::get`]
/// returns `None` for them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedObject {
    shape: String,
    fields: BTreeMap<String, Decoded>,
}

impl DecodedObject {
    pub fn builder(shape: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            shape: shape.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Identifier of the shape this object was decoded against.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn get(&self, field: &str) -> Option<&Decoded> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Decoded)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulates decoded fields and freezes them into a [`DecodedObject`].
#[derive(Debug)]
pub struct ObjectBuilder {
    shape: String,
    fields: BTreeMap<String, Decoded>,
}

impl ObjectBuilder {
    /// Assign a decoded value under the structural field identifier.
    pub fn set(&mut self, field: impl Into<String>, value: Decoded) {
        self.fields.insert(field.into(), value);
    }

    /// Freeze the assembled object. Consumes the builder so nothing can be
    /// assigned afterwards.
    pub fn finish(self) -> DecodedObject {
        DecodedObject {
            shape: self.shape,
            fields: self.fields,
        }
    }
}

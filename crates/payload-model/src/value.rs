//! Raw input value model.
//!
//! Upstream request decoding (query strings, form posts, JSON bodies, XML
//! documents converted to maps) produces untyped heterogeneous data. This
//! module models that data as a closed union so every coercion rule is an
//! exhaustive match instead of a chain of runtime type probes.

use std::collections::BTreeMap;

/// Reserved key under which XML-derived maps carry their attribute sub-map.
///
/// Any field may resolve through this sub-map as a fallback lookup location.
pub const XML_ATTRIBUTES_KEY: &str = "@attributes";

/// String-keyed map of raw values, as handed over by a request decoder.
pub type RawMap = BTreeMap<String, RawValue>;

/// A single untyped input value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<RawValue>),
    Map(RawMap),
    File(UploadedFile),
}

impl RawValue {
    /// Stable lowercase name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Number(_) => "number",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
            RawValue::File(_) => "file",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&RawMap> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for RawValue {
    /// Convert a parsed JSON body into the raw union.
    ///
    /// Files never arrive through JSON; they are merged into the input map
    /// by the upstream multipart decoder.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => RawValue::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => RawValue::String(s),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, RawValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// An uploaded file already resolved and fully buffered by the HTTP layer.
///
/// The engine treats the handle as opaque and performs no I/O on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Buffered file contents.
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type,
            data,
        }
    }

    /// Size of the buffered contents in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

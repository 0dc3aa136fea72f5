//! Per-field decode metadata.
//!
//! A [`FieldSpec`] tells the engine how to locate and decode one field of a
//! target shape: the payload key to look under, the logical type tag, the
//! nested item type for object-valued tags, optionality, the date format for
//! temporal tags, and the wrapper key for XML-wrapped collections.
//!
//! The tag set is closed. An unsupported tag string is rejected when parsed,
//! and the nested-object tags require their item type (plus, for
//! `array_object_xml`, the wrapper key) at construction time, so neither
//! problem can surface mid-decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PayloadError, Result};

/// Logical type tag driving how one field is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// Scalar stringification with trimming.
    String,
    /// Locale-keyed map of strings.
    StringI18n,
    /// Calendar date, truncated to midnight.
    Date,
    /// Date and time of day.
    Datetime,
    /// Clock time, decoded to seconds past midnight.
    Time,
    Int,
    Float,
    Bool,
    /// Previously-resolved uploaded file handle.
    File,
    /// Scalar-backed variant lookup via the registered item type.
    Enum,
    /// Nested object decoded against the item type's schema.
    Object,
    /// Container passed through without element validation.
    Array,
    ArrayString,
    ArrayInt,
    ArrayFile,
    ArrayEnum,
    /// Ordered list of nested objects.
    ArrayObject,
    /// XML-wrapped collection with single-child collapse handling.
    ArrayObjectXml,
    /// Locale-keyed map of nested objects.
    ArrayObjectI18n,
}

impl TypeTag {
    /// Canonical metadata spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::StringI18n => "string_i18n",
            TypeTag::Date => "date",
            TypeTag::Datetime => "datetime",
            TypeTag::Time => "time",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::File => "file",
            TypeTag::Enum => "enum",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::ArrayString => "array_string",
            TypeTag::ArrayInt => "array_int",
            TypeTag::ArrayFile => "array_file",
            TypeTag::ArrayEnum => "array_enum",
            TypeTag::ArrayObject => "array_object",
            TypeTag::ArrayObjectXml => "array_object_xml",
            TypeTag::ArrayObjectI18n => "array_object_i18n",
        }
    }

    /// Tags decoded by recursing into a nested shape schema.
    pub fn is_nested_object(&self) -> bool {
        matches!(
            self,
            TypeTag::Object
                | TypeTag::ArrayObject
                | TypeTag::ArrayObjectXml
                | TypeTag::ArrayObjectI18n
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(TypeTag::String),
            "string_i18n" => Ok(TypeTag::StringI18n),
            "date" => Ok(TypeTag::Date),
            "datetime" => Ok(TypeTag::Datetime),
            "time" => Ok(TypeTag::Time),
            "int" => Ok(TypeTag::Int),
            "float" => Ok(TypeTag::Float),
            "bool" => Ok(TypeTag::Bool),
            "file" => Ok(TypeTag::File),
            "enum" => Ok(TypeTag::Enum),
            "object" => Ok(TypeTag::Object),
            "array" => Ok(TypeTag::Array),
            "array_string" => Ok(TypeTag::ArrayString),
            "array_int" => Ok(TypeTag::ArrayInt),
            "array_file" => Ok(TypeTag::ArrayFile),
            "array_enum" => Ok(TypeTag::ArrayEnum),
            "array_object" => Ok(TypeTag::ArrayObject),
            "array_object_xml" => Ok(TypeTag::ArrayObjectXml),
            "array_object_i18n" => Ok(TypeTag::ArrayObjectI18n),
            _ => Err(PayloadError::invalid_data(format!(
                "Type '{s}' is not supported."
            ))),
        }
    }
}

/// Immutable decode metadata for one field of a target shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    field: String,
    name: Option<String>,
    tag: TypeTag,
    item_type: Option<String>,
    optional: bool,
    date_format: Option<String>,
    xml_wrapper: Option<String>,
}

impl FieldSpec {
    /// Start building a spec for `field`, decoded per `tag`.
    pub fn new(field: impl Into<String>, tag: TypeTag) -> FieldSpecBuilder {
        FieldSpecBuilder {
            inner: FieldSpec {
                field: field.into(),
                name: None,
                tag,
                item_type: None,
                optional: false,
                date_format: None,
                xml_wrapper: None,
            },
        }
    }

    /// Structural field name on the target shape.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Key looked up in the input map: the payload name override when set,
    /// otherwise the structural field name.
    pub fn lookup_key(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.field)
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    pub fn xml_wrapper(&self) -> Option<&str> {
        self.xml_wrapper.as_deref()
    }
}

/// Builder enforcing the metadata invariants on [`FieldSpecBuilder::build`].
#[derive(Debug)]
pub struct FieldSpecBuilder {
    inner: FieldSpec,
}

impl FieldSpecBuilder {
    /// Override the payload key this field is looked up under.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    /// Reference the nested shape or backed-variant type this field decodes
    /// through.
    #[must_use]
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.inner.item_type = Some(item_type.into());
        self
    }

    /// Mark the field optional: when absent it is skipped instead of raising
    /// a missing-field error.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.inner.optional = true;
        self
    }

    /// Chrono format string for `date` / `datetime` fields.
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.inner.date_format = Some(format.into());
        self
    }

    /// Wrapper key holding the collection for `array_object_xml` fields.
    #[must_use]
    pub fn xml_wrapper(mut self, key: impl Into<String>) -> Self {
        self.inner.xml_wrapper = Some(key.into());
        self
    }

    /// Validate the metadata invariants and freeze the spec.
    pub fn build(self) -> Result<FieldSpec> {
        let spec = self.inner;
        if spec.tag.is_nested_object() && spec.item_type.is_none() {
            return Err(PayloadError::invalid_data(format!(
                "An 'item_type' parameter is expected for field with type: '{}'.",
                spec.tag
            )));
        }
        if spec.tag == TypeTag::ArrayObjectXml && spec.xml_wrapper.is_none() {
            return Err(PayloadError::invalid_data(
                "An 'xml_wrapper' parameter is expected for field with type: 'array_object_xml'.",
            ));
        }
        Ok(spec)
    }
}

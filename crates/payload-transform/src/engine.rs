//! Recursive, metadata-driven payload decoding.
//!
//! The engine resolves each field of a registered shape from the raw input
//! map (directly, or through the reserved XML attribute sub-map), recurses
//! into nested object shapes, and delegates every leaf tag to the coercion
//! rules. Decoding is strictly fail-fast: the first problem in declared
//! field order aborts the call, and a partially decoded object is never
//! observable.

use std::collections::BTreeMap;

use payload_model::{
    Decoded, DecodedObject, FieldSpec, ObjectSchema, PayloadError, RawMap, RawValue, Result,
    SchemaRegistry, TypeTag, VariantRegistry, XML_ATTRIBUTES_KEY,
};

use crate::DROPPED_LOCALE;
use crate::coerce;

/// Stateless decoding engine over immutable, shared registries.
///
/// Construction is cheap: an engine borrows its registries and retains no
/// per-call state, so one instance may serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TransformEngine<'a> {
    schemas: &'a SchemaRegistry,
    variants: Option<&'a VariantRegistry>,
}

impl<'a> TransformEngine<'a> {
    pub fn new(schemas: &'a SchemaRegistry) -> Self {
        Self {
            schemas,
            variants: None,
        }
    }

    /// Attach the backed-variant registry consulted by `enum` and
    /// `array_enum` fields.
    #[must_use]
    pub fn with_variants(mut self, variants: &'a VariantRegistry) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Decode `input` against the shape registered under `shape`.
    ///
    /// An empty shape name is an explicit no-op and returns `Ok(None)`.
    pub fn transform(&self, shape: &str, input: &RawMap) -> Result<Option<DecodedObject>> {
        if shape.is_empty() {
            return Ok(None);
        }
        self.decode_shape(shape, input).map(Some)
    }

    /// Decode every element of `input` independently against `shape`,
    /// preserving order. Elements must be maps; an empty input decodes to an
    /// empty list. An empty shape name returns `Ok(None)`.
    pub fn transform_list(
        &self,
        shape: &str,
        input: &[RawValue],
    ) -> Result<Option<Vec<DecodedObject>>> {
        if shape.is_empty() {
            return Ok(None);
        }
        let mut objects = Vec::with_capacity(input.len());
        for element in input {
            objects.push(self.decode_shape(shape, require_map(element)?)?);
        }
        Ok(Some(objects))
    }

    fn decode_shape(&self, shape: &str, input: &RawMap) -> Result<DecodedObject> {
        let schema = self
            .schemas
            .get(shape)
            .ok_or_else(|| PayloadError::invalid_data(format!("Unknown payload shape: '{shape}'.")))?;
        self.decode_object(schema, input)
    }

    fn decode_object(&self, schema: &ObjectSchema, input: &RawMap) -> Result<DecodedObject> {
        tracing::debug!(shape = schema.shape(), "decoding payload");
        let mut builder = DecodedObject::builder(schema.shape());

        for spec in schema.fields() {
            let key = spec.lookup_key();
            let Some(value) = resolve_value(input, key) else {
                if spec.is_optional() {
                    continue;
                }
                return Err(PayloadError::missing_field(key));
            };
            builder.set(spec.field(), self.decode_field(spec, value)?);
        }

        Ok(builder.finish())
    }

    fn decode_field(&self, spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
        match spec.tag() {
            TypeTag::Object => self.map_object(spec, value),
            TypeTag::ArrayObject => self.map_object_list(spec, value),
            TypeTag::ArrayObjectXml => self.map_xml_object_list(spec, value),
            TypeTag::ArrayObjectI18n => self.map_localized_objects(spec, value),
            _ => coerce::coerce(spec, value, self.variants),
        }
    }

    fn map_object(&self, spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
        let item_type = item_type(spec)?;
        let Some(map) = value.as_map() else {
            return Err(PayloadError::invalid_data(format!(
                "'{}' must be a map.",
                spec.lookup_key()
            )));
        };
        Ok(Decoded::Object(self.decode_shape(item_type, map)?))
    }

    fn map_object_list(&self, spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
        let item_type = item_type(spec)?;
        let elements: Vec<&RawValue> = match value {
            RawValue::List(items) => items.iter().collect(),
            RawValue::Map(entries) => entries.values().collect(),
            _ => {
                return Err(PayloadError::invalid_data(format!(
                    "'{}' must be a list.",
                    spec.lookup_key()
                )));
            }
        };

        let mut objects = Vec::with_capacity(elements.len());
        for element in elements {
            objects.push(self.decode_shape(item_type, require_map(element)?)?);
        }
        Ok(Decoded::Objects(objects))
    }

    /// Decode an XML-wrapped collection found under the field's wrapper key.
    ///
    /// The source XML format represents a wrapped collection with exactly
    /// one logical child without an enclosing list; the wrapper map then
    /// carries the child's own keys, and the reserved attribute marker
    /// identifies that case. The entire wrapper is decoded once as the
    /// single element and iteration stops.
    fn map_xml_object_list(&self, spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
        let item_type = item_type(spec)?;
        let wrapper_key = spec.xml_wrapper().ok_or_else(|| {
            PayloadError::invalid_data(
                "An 'xml_wrapper' parameter is expected for field with type: 'array_object_xml'.",
            )
        })?;

        let mut objects = Vec::new();
        match value.as_map().and_then(|map| map.get(wrapper_key)) {
            Some(RawValue::List(items)) => {
                for element in items {
                    objects.push(self.decode_shape(item_type, require_map(element)?)?);
                }
            }
            Some(RawValue::Map(entries)) => {
                for (key, element) in entries {
                    if !matches!(element, RawValue::List(_) | RawValue::Map(_)) {
                        return Err(PayloadError::invalid_data(format!(
                            "Invalid type of value. Expected type: 'map', '{}' given.",
                            element.kind()
                        )));
                    }
                    if key == XML_ATTRIBUTES_KEY {
                        objects.push(self.decode_shape(item_type, entries)?);
                        break;
                    }
                    objects.push(self.decode_shape(item_type, require_map(element)?)?);
                }
            }
            // absent or non-container wrapped value: empty collection
            _ => {}
        }
        Ok(Decoded::Objects(objects))
    }

    fn map_localized_objects(&self, spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
        let item_type = item_type(spec)?;
        let Some(entries) = value.as_map() else {
            return Err(PayloadError::invalid_data(format!(
                "'{}' should be a map of locale keys, '{}' given.",
                spec.lookup_key(),
                value.kind()
            )));
        };

        let mut localized = BTreeMap::new();
        for (locale, element) in entries {
            if locale == DROPPED_LOCALE {
                continue;
            }
            localized.insert(
                locale.clone(),
                self.decode_shape(item_type, require_map(element)?)?,
            );
        }
        Ok(Decoded::ObjectMap(localized))
    }
}

/// Nested item type carried by the field metadata. Guaranteed by the spec
/// builder for built specs; re-checked here for metadata that arrived
/// through deserialization.
fn item_type(spec: &FieldSpec) -> Result<&str> {
    spec.item_type().ok_or_else(|| {
        PayloadError::invalid_data(format!(
            "An 'item_type' parameter is expected for field with type: '{}'.",
            spec.tag()
        ))
    })
}

fn require_map(value: &RawValue) -> Result<&RawMap> {
    value.as_map().ok_or_else(|| {
        PayloadError::invalid_data(format!(
            "Invalid type of value. Expected type: 'map', '{}' given.",
            value.kind()
        ))
    })
}

/// Resolve a field's value: directly under `key`, else under the reserved
/// XML attribute sub-map. A `Null` in either location counts as absent.
fn resolve_value<'v>(input: &'v RawMap, key: &str) -> Option<&'v RawValue> {
    input
        .get(key)
        .filter(|value| !value.is_null())
        .or_else(|| {
            input
                .get(XML_ATTRIBUTES_KEY)?
                .as_map()?
                .get(key)
                .filter(|value| !value.is_null())
        })
}

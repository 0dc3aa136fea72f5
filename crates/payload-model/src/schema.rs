//! Shape schemas and the process-wide registry.
//!
//! A schema is the ordered field metadata for one target shape. The registry
//! is a startup-time registration table: built once through the builder,
//! immutable afterwards, and shared read-only across every decode call. No
//! per-call introspection happens anywhere.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::field::FieldSpec;

/// Ordered field metadata bound to one target shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    shape: String,
    fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    pub fn new(shape: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            shape: shape.into(),
            fields,
        }
    }

    /// Identifier of the target shape this schema describes.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// Field specs in declared order. Declaration order is the decode scan
    /// order, which makes the first missing required field deterministic.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Immutable lookup table of every registered shape.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    shapes: BTreeMap<String, ObjectSchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn get(&self, shape: &str) -> Option<&ObjectSchema> {
        self.shapes.get(shape)
    }

    pub fn contains(&self, shape: &str) -> bool {
        self.shapes.contains_key(shape)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Publish this registry as the process-wide instance.
    ///
    /// The first call wins and later calls return the already-installed
    /// registry unchanged, so initialization is one-time and thread-safe.
    pub fn install(self) -> &'static SchemaRegistry {
        GLOBAL.get_or_init(|| self)
    }

    /// The process-wide registry, when one has been installed.
    pub fn installed() -> Option<&'static SchemaRegistry> {
        GLOBAL.get()
    }
}

/// Collects schemas for a one-shot [`SchemaRegistry`] build.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    shapes: BTreeMap<String, ObjectSchema>,
}

impl SchemaRegistryBuilder {
    /// Register a schema under its shape name. Registering the same shape
    /// again replaces the earlier entry.
    #[must_use]
    pub fn register(mut self, schema: ObjectSchema) -> Self {
        self.shapes.insert(schema.shape().to_string(), schema);
        self
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            shapes: self.shapes,
        }
    }
}

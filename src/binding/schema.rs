//! Per-class property schemas and the tag registry.
//!
//! A [`Schema`] collects the [`PropertySpec`]s of one component class and
//! indexes them by property name and by mirrored attribute name. Schemas are
//! built once when a component class is defined, then shared by every
//! instance through the [`SchemaRegistry`].

use std::collections::HashMap;
use std::rc::Rc;

use super::descriptor::PropertySpec;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The complete property declaration of a component class.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Component tag this schema describes (e.g. "Toggle", "Counter").
    tag: String,
    /// Specs in declaration order. Slot indices follow this order.
    specs: Vec<PropertySpec>,
    /// Property name → slot index.
    by_name: HashMap<String, usize>,
    /// Mirrored attribute name → slot index.
    by_attribute: HashMap<String, usize>,
}

impl Schema {
    /// Create an empty schema for the given component tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            specs: Vec::new(),
            by_name: HashMap::new(),
            by_attribute: HashMap::new(),
        }
    }

    /// Add a property spec (builder).
    ///
    /// # Panics
    ///
    /// Panics (debug) if the property name or mirrored attribute name is
    /// already declared on this schema.
    pub fn with(mut self, spec: PropertySpec) -> Self {
        debug_assert!(
            !self.by_name.contains_key(&spec.name),
            "duplicate property name: {}",
            spec.name
        );
        let index = self.specs.len();
        self.by_name.insert(spec.name.clone(), index);
        if let Some(attr) = &spec.attribute {
            debug_assert!(
                !self.by_attribute.contains_key(attr),
                "duplicate mirrored attribute: {attr}"
            );
            self.by_attribute.insert(attr.clone(), index);
        }
        self.specs.push(spec);
        self
    }

    /// The component tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Specs in declaration order.
    pub fn specs(&self) -> &[PropertySpec] {
        &self.specs
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the schema declares no properties.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Slot index for a property name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Slot index for a mirrored attribute name.
    pub fn index_of_attribute(&self, attribute: &str) -> Option<usize> {
        self.by_attribute.get(attribute).copied()
    }

    /// Spec by property name.
    pub fn spec(&self, name: &str) -> Option<&PropertySpec> {
        self.index_of(name).map(|i| &self.specs[i])
    }

    /// Spec bound to a mirrored attribute name.
    pub fn spec_for_attribute(&self, attribute: &str) -> Option<&PropertySpec> {
        self.index_of_attribute(attribute).map(|i| &self.specs[i])
    }

    /// Names of all mirrored attributes, the set the host observes.
    pub fn observed_attributes(&self) -> Vec<&str> {
        self.specs
            .iter()
            .filter_map(|s| s.attribute.as_deref())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// Tag → schema lookup, populated once at startup.
///
/// Schemas are reference-counted so every instance of a class shares the
/// same definition (single-threaded ownership model, hence `Rc`).
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Rc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its tag. Replaces any previous registration.
    pub fn register(&mut self, schema: Schema) -> Rc<Schema> {
        let shared = Rc::new(schema);
        self.schemas
            .insert(shared.tag().to_owned(), Rc::clone(&shared));
        shared
    }

    /// Look up the schema for a tag.
    pub fn get(&self, tag: &str) -> Option<Rc<Schema>> {
        self.schemas.get(tag).cloned()
    }

    /// Whether a tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.schemas.contains_key(tag)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

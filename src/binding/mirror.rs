//! Bidirectional attribute/property synchronization.
//!
//! The [`AttributeMirror`] is the single choke point between an element's raw
//! attribute text and its typed property store. Inbound attribute mutations
//! are decoded and written through the store *without* reflecting back to the
//! attribute; outbound property writes are gated by the store and then
//! encoded onto the element, with a guard so the reflection can never
//! re-enter the inbound path. Either direction reports a [`PropertyChange`]
//! only when the stored value actually changed.

use std::rc::Rc;

use crate::element::ElementData;
use crate::value::{AttrWrite, Value};

use super::store::{PropertyStore, SyncError, WriteOutcome};

// ---------------------------------------------------------------------------
// PropertyChange
// ---------------------------------------------------------------------------

/// Which side initiated a committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// The element's attribute text changed (external DOM mutation).
    Attribute,
    /// Code set the property directly.
    Property,
}

/// A committed property write, as observed by hooks and notices.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Property name.
    pub name: String,
    /// Value before the write (default if never written, `None` for null).
    pub old: Option<Value>,
    /// Value after the write.
    pub new: Option<Value>,
    /// Which direction the write came from.
    pub origin: ChangeOrigin,
    /// Whether the property is declared reactive.
    pub reactive: bool,
}

// ---------------------------------------------------------------------------
// AttributeMirror
// ---------------------------------------------------------------------------

/// Per-instance sync state between one element and its property store.
#[derive(Debug, Default)]
pub struct AttributeMirror {
    /// Set while an outbound property write is being reflected onto the
    /// element, so the resulting attribute mutation is not decoded again.
    reflecting: bool,
}

impl AttributeMirror {
    /// Create a mirror with no reflection in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inbound path: the element's attribute `name` now reads `new_raw`
    /// (`None` means removed).
    ///
    /// Unbound attributes are ignored. The decoded value is written through
    /// the store's access policy; the write never reflects back onto the
    /// attribute (the element already holds the latest text). Returns the
    /// change when the stored value changed, `None` for no-ops, and an error
    /// when the access policy rejects the write.
    pub fn attribute_changed(
        &mut self,
        store: &mut PropertyStore,
        name: &str,
        new_raw: Option<&str>,
    ) -> Result<Option<PropertyChange>, SyncError> {
        if self.reflecting {
            // Echo of our own reflection; the store already holds this value.
            return Ok(None);
        }
        let schema = Rc::clone(store.schema());
        let Some(spec) = schema.spec_for_attribute(name) else {
            return Ok(None);
        };

        let decoded = spec.kind.decode(new_raw);
        let old = store.get(&spec.name);
        let outcome = store.set(&spec.name, decoded.clone())?;
        if !outcome.is_committed() {
            return Ok(None);
        }
        Ok(Some(PropertyChange {
            name: spec.name.clone(),
            old,
            new: decoded,
            origin: ChangeOrigin::Attribute,
            reactive: spec.reactive,
        }))
    }

    /// Outbound path: code sets property `name` to `value`.
    ///
    /// The write is gated by the store first; a committed write on a
    /// mirrored property is then encoded onto the element's attribute map.
    /// The reflection happens under a guard so it cannot re-enter
    /// [`attribute_changed`](Self::attribute_changed). Unchanged and skipped
    /// writes touch neither the store's observers nor the attribute.
    pub fn property_set(
        &mut self,
        store: &mut PropertyStore,
        element: &mut ElementData,
        name: &str,
        value: Option<Value>,
    ) -> Result<Option<PropertyChange>, SyncError> {
        let schema = Rc::clone(store.schema());
        let spec = schema
            .spec(name)
            .ok_or_else(|| SyncError::UnknownProperty(name.to_owned()))?;

        let old = store.get(name);
        let outcome = store.set(name, value.clone())?;
        if !matches!(outcome, WriteOutcome::Committed) {
            return Ok(None);
        }

        if let Some(attribute) = &spec.attribute {
            self.reflecting = true;
            match Value::encode(value.as_ref()) {
                AttrWrite::Set(text) => element.set_attribute(attribute.clone(), text),
                AttrWrite::Remove => {
                    element.remove_attribute(attribute);
                }
            }
            self.reflecting = false;
        }

        Ok(Some(PropertyChange {
            name: spec.name.clone(),
            old,
            new: value,
            origin: ChangeOrigin::Property,
            reactive: spec.reactive,
        }))
    }

    /// Whether an outbound reflection is currently in progress.
    pub fn is_reflecting(&self) -> bool {
        self.reflecting
    }
}

// ===========================================================================
// Tests
// ===========================================================================

//! Host: wires elements, bindings, components, and the scheduler together.
//!
//! The [`Host`] owns the element tree and every per-instance side table:
//! property stores, mirrors, components, and scheduler entries, all keyed by
//! [`ElementId`]. It is the single entry point for attribute and property
//! mutation, so every write flows through the access policy and the mirror.
//!
//! Mounting runs the construction phase: defaults exist implicitly in the
//! store, initial attributes are applied, then the store is sealed.
//! `readonly` properties are immutable from that point on.

use slotmap::SecondaryMap;
use tracing::error;

use crate::binding::{
    AttributeMirror, PropertyChange, PropertyStore, Schema, SchemaRegistry, SyncError,
};
use crate::component::{Component, LifecycleTracker};
use crate::element::{ElementData, ElementId, ElementTree};
use crate::event::{AttributeWritten, Envelope, NoticeBus, PropertyCommitted, UpdateFlushed};
use crate::schedule::{CallbackFailure, FrameSource, UpdateScheduler};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by host operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The element id does not name a mounted element.
    #[error("no such element")]
    NoSuchElement,

    /// The binding layer rejected the write.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Owns the element tree and all per-instance binding state.
pub struct Host {
    tree: ElementTree,
    registry: SchemaRegistry,
    stores: SecondaryMap<ElementId, PropertyStore>,
    mirrors: SecondaryMap<ElementId, AttributeMirror>,
    components: SecondaryMap<ElementId, Box<dyn Component>>,
    scheduler: UpdateScheduler<Value>,
    /// Mount/unmount/update tracking.
    pub lifecycle: LifecycleTracker,
    /// Outbound notices for the embedding application.
    pub notices: NoticeBus,
}

impl Host {
    /// Create an empty host waking frames through the given source.
    pub fn new(frames: Box<dyn FrameSource>) -> Self {
        Self {
            tree: ElementTree::new(),
            registry: SchemaRegistry::new(),
            stores: SecondaryMap::new(),
            mirrors: SecondaryMap::new(),
            components: SecondaryMap::new(),
            scheduler: UpdateScheduler::new(frames),
            lifecycle: LifecycleTracker::new(),
            notices: NoticeBus::new(),
        }
    }

    /// Register a component class's schema ahead of mounting.
    ///
    /// Mounting auto-registers unseen tags, so this is only needed when the
    /// schema must exist before the first instance.
    pub fn register(&mut self, schema: Schema) {
        self.registry.register(schema);
    }

    /// Mount a component with no initial attributes.
    pub fn mount(&mut self, component: Box<dyn Component>, parent: Option<ElementId>) -> ElementId {
        // With no initial attributes the construction phase cannot fail.
        match self.mount_with_attrs(component, parent, &[]) {
            Ok(id) => id,
            Err(_) => unreachable!("empty attribute list cannot be rejected"),
        }
    }

    /// Mount a component and apply initial attributes, then seal the store.
    ///
    /// The attributes run through the same decode-and-gate path as any
    /// external mutation, but while the store is still unsealed, so
    /// `readonly` properties accept their initial values here. On failure
    /// the half-mounted element is torn down again.
    pub fn mount_with_attrs(
        &mut self,
        component: Box<dyn Component>,
        parent: Option<ElementId>,
        attrs: &[(&str, &str)],
    ) -> Result<ElementId, HostError> {
        let tag = component.tag().to_owned();
        let schema = match self.registry.get(&tag) {
            Some(schema) => schema,
            None => self.registry.register(component.schema()),
        };

        let data = ElementData::new(&tag);
        let id = match parent {
            Some(parent) => self.tree.insert_child(parent, data),
            None => self.tree.insert(data),
        };
        self.stores.insert(id, PropertyStore::new(schema));
        self.mirrors.insert(id, AttributeMirror::new());
        self.components.insert(id, component);

        for &(name, text) in attrs {
            if let Err(err) = self.write_attribute(id, name, Some(text.to_owned())) {
                self.unmount(id);
                return Err(err);
            }
        }

        if let Some(store) = self.stores.get_mut(id) {
            store.seal();
        }
        self.lifecycle.mark_mounted(id);
        Ok(id)
    }

    /// Remove an element and its subtree; cancel any pending updates.
    pub fn unmount(&mut self, id: ElementId) {
        for removed in self.tree.remove(id) {
            self.scheduler.cancel(removed);
            self.stores.remove(removed);
            self.mirrors.remove(removed);
            self.components.remove(removed);
            self.lifecycle.mark_unmounted(removed);
        }
    }

    // ── Attribute surface ────────────────────────────────────────────

    /// Set an attribute's raw text (external DOM mutation, inbound path).
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        text: impl Into<String>,
    ) -> Result<(), HostError> {
        self.write_attribute(id, name, Some(text.into()))
    }

    /// Remove an attribute (external DOM mutation, inbound path).
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Result<(), HostError> {
        self.write_attribute(id, name, None)
    }

    /// Current raw text of an attribute, `None` when absent.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.tree.get(id)?.attribute(name)
    }

    fn write_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        text: Option<String>,
    ) -> Result<(), HostError> {
        let element = self.tree.get_mut(id).ok_or(HostError::NoSuchElement)?;
        match &text {
            Some(t) => element.set_attribute(name, t.clone()),
            None => {
                element.remove_attribute(name);
            }
        }
        self.notices.push(Envelope::new(
            AttributeWritten {
                name: name.to_owned(),
                text: text.clone(),
            },
            id,
        ));

        let change = match (self.stores.get_mut(id), self.mirrors.get_mut(id)) {
            (Some(store), Some(mirror)) => mirror.attribute_changed(store, name, text.as_deref())?,
            _ => None,
        };
        if let Some(change) = change {
            self.apply_committed(id, change);
        }
        Ok(())
    }

    // ── Property surface ─────────────────────────────────────────────

    /// Set a property directly (outbound path: gate, store, reflect).
    pub fn set_property(
        &mut self,
        id: ElementId,
        name: &str,
        value: Option<Value>,
    ) -> Result<(), HostError> {
        let change = {
            let element = self.tree.get_mut(id).ok_or(HostError::NoSuchElement)?;
            let store = self.stores.get_mut(id).ok_or(HostError::NoSuchElement)?;
            let mirror = self.mirrors.get_mut(id).ok_or(HostError::NoSuchElement)?;
            mirror.property_set(store, element, name, value)?
        };
        if let Some(change) = change {
            self.apply_committed(id, change);
        }
        Ok(())
    }

    /// Read a property's current value (default before the first write).
    pub fn property(&self, id: ElementId, name: &str) -> Option<Value> {
        self.stores.get(id)?.get(name)
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Fire every due coalesced update.
    ///
    /// Each entry's bookkeeping is cleared before its component's
    /// `on_update` runs, so failures cannot wedge an entry and updates
    /// scheduled from inside a callback request a fresh frame. Failures are
    /// reported through `tracing::error` and returned; they are not retried.
    pub fn run_frame(&mut self) -> Vec<CallbackFailure> {
        let due = self.scheduler.take_due();
        let mut failures = Vec::new();
        for (id, value) in due {
            let Some(component) = self.components.get_mut(id) else {
                continue;
            };
            match component.on_update(value.as_ref()) {
                Ok(()) => {
                    self.lifecycle.mark_updated(id);
                    self.notices.push(Envelope::new(UpdateFlushed { value }, id));
                }
                Err(err) => {
                    error!(element = ?id, %err, "update callback failed");
                    failures.push(CallbackFailure {
                        element: id,
                        error: err,
                    });
                }
            }
        }
        failures
    }

    /// Whether an element has an update frame requested.
    pub fn has_pending_update(&self, id: ElementId) -> bool {
        self.scheduler.is_pending(id)
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The element tree (read-only; mutations go through the host).
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// The schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Downcast an element's component to a concrete type.
    pub fn component_ref<T: Component + 'static>(&self, id: ElementId) -> Option<&T> {
        self.components.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Downcast an element's component to a concrete type, mutably.
    pub fn component_mut<T: Component + 'static>(&mut self, id: ElementId) -> Option<&mut T> {
        self.components.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// A committed write: run the synchronous hook, notify, and (for
    /// reactive properties) schedule the coalesced update.
    fn apply_committed(&mut self, id: ElementId, change: PropertyChange) {
        if change.reactive {
            if let Some(component) = self.components.get_mut(id) {
                component.on_change(&change);
            }
            self.scheduler.schedule(id, change.new.clone());
        }
        self.notices.push(Envelope::new(
            PropertyCommitted {
                name: change.name,
                value: change.new,
                origin: change.origin,
            },
            id,
        ));
    }
}

// ===========================================================================
// Tests
// ===========================================================================

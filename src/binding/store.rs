//! Per-instance property storage and write gating.
//!
//! A [`PropertyStore`] holds one slot per declared property of its schema.
//! Every write passes through the access-mode rules before it touches the
//! slot; a write that would store the value already present reports
//! [`WriteOutcome::Unchanged`] and triggers no notification downstream.
//!
//! The construction phase matters for `readonly` properties: the host writes
//! defaults and initial attribute values, then calls [`PropertyStore::seal`].
//! From that point on, `readonly` slots reject every write.

use std::rc::Rc;

use crate::value::{Value, ValueKind};

use super::descriptor::AccessMode;
use super::schema::Schema;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by property writes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The property's access mode forbids this write.
    #[error("write to {mode} property '{property}' denied")]
    AccessDenied { property: String, mode: &'static str },

    /// The written value's kind differs from the declared kind.
    #[error("property '{property}' expects a {expected} value, got {got}")]
    KindMismatch {
        property: String,
        expected: ValueKind,
        got: ValueKind,
    },

    /// No property with this name is declared on the schema.
    #[error("unknown property: {0}")]
    UnknownProperty(String),
}

// ---------------------------------------------------------------------------
// WriteOutcome
// ---------------------------------------------------------------------------

/// What a successful write did to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The stored value changed. Notifications should fire.
    Committed,
    /// The value equalled the stored one; nothing changed, nothing fires.
    Unchanged,
    /// A null write to an unconsumed init-once slot: ignored, slot not
    /// consumed.
    Skipped,
}

impl WriteOutcome {
    /// Whether this write changed the stored value.
    pub fn is_committed(self) -> bool {
        matches!(self, WriteOutcome::Committed)
    }
}

// ---------------------------------------------------------------------------
// PropertyStore
// ---------------------------------------------------------------------------

/// One slot of storage plus its init-once bookkeeping.
#[derive(Debug, Clone, Default)]
struct Slot {
    value: Option<Value>,
    written: bool,
    init_consumed: bool,
}

/// Per-instance typed storage for one component's properties.
#[derive(Debug)]
pub struct PropertyStore {
    schema: Rc<Schema>,
    slots: Vec<Slot>,
    sealed: bool,
}

impl PropertyStore {
    /// Create a store with every slot unwritten.
    ///
    /// Reads before the first write report the spec's declared default.
    /// The store starts unsealed (construction phase).
    pub fn new(schema: Rc<Schema>) -> Self {
        let slots = vec![Slot::default(); schema.len()];
        Self {
            schema,
            slots,
            sealed: false,
        }
    }

    /// The schema this store was built from.
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// End the construction phase. `readonly` slots become immutable.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the construction phase has ended.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Read a property's current value.
    ///
    /// Returns the declared default before the first write, and `None` (null)
    /// when neither a value nor a default exists. Unknown names read as null.
    pub fn get(&self, name: &str) -> Option<Value> {
        let index = self.schema.index_of(name)?;
        let slot = &self.slots[index];
        if slot.written {
            slot.value.clone()
        } else {
            self.schema.specs()[index].default_or_null()
        }
    }

    /// Write a property, enforcing kind validation and the access mode.
    ///
    /// `value = None` is a null write. For `init_once` slots a null write
    /// before the commit is [`WriteOutcome::Skipped`] and does not consume
    /// the slot; after the commit every write is denied. Storing a value
    /// equal to the current one is [`WriteOutcome::Unchanged`].
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<WriteOutcome, SyncError> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| SyncError::UnknownProperty(name.to_owned()))?;
        let spec = &self.schema.specs()[index];

        if let Some(v) = &value {
            if v.kind() != spec.kind {
                return Err(SyncError::KindMismatch {
                    property: spec.name.clone(),
                    expected: spec.kind,
                    got: v.kind(),
                });
            }
        }

        let slot = &mut self.slots[index];
        match spec.mode {
            AccessMode::ReadWrite => {}
            AccessMode::ReadOnly => {
                if self.sealed {
                    return Err(SyncError::AccessDenied {
                        property: spec.name.clone(),
                        mode: spec.mode.name(),
                    });
                }
            }
            AccessMode::InitOnce => {
                if slot.init_consumed {
                    return Err(SyncError::AccessDenied {
                        property: spec.name.clone(),
                        mode: spec.mode.name(),
                    });
                }
                if value.is_none() {
                    return Ok(WriteOutcome::Skipped);
                }
                slot.init_consumed = true;
            }
        }

        let current = if slot.written {
            slot.value.clone()
        } else {
            spec.default_or_null()
        };
        let changed = current != value;
        slot.written = true;
        slot.value = value;
        if changed {
            Ok(WriteOutcome::Committed)
        } else {
            Ok(WriteOutcome::Unchanged)
        }
    }

    /// Whether the named slot has ever been written.
    pub fn is_written(&self, name: &str) -> bool {
        self.schema
            .index_of(name)
            .map(|i| self.slots[i].written)
            .unwrap_or(false)
    }

    /// Whether an init-once slot has consumed its single committed write.
    pub fn is_consumed(&self, name: &str) -> bool {
        self.schema
            .index_of(name)
            .map(|i| self.slots[i].init_consumed)
            .unwrap_or(false)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::descriptor::PropertySpec;

    fn schema() -> Rc<Schema> {
        Rc::new(
            Schema::new("Field")
                .with(PropertySpec::new("value", ValueKind::Str).reactive())
                .with(PropertySpec::new("count", ValueKind::Num).with_default(1.0))
                .with(PropertySpec::new("kind", ValueKind::Str).read_only())
                .with(PropertySpec::new("owner", ValueKind::Str).init_once()),
        )
    }

    fn store() -> PropertyStore {
        PropertyStore::new(schema())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn read_before_write_is_default() {
        let store = store();
        assert_eq!(store.get("value"), None);
        assert_eq!(store.get("count"), Some(Value::Num(1.0)));
    }

    #[test]
    fn read_unknown_is_null() {
        let store = store();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn read_after_write() {
        let mut store = store();
        store.set("value", Some(Value::from("hi"))).unwrap();
        assert_eq!(store.get("value"), Some(Value::Str("hi".to_owned())));
    }

    #[test]
    fn null_write_overrides_default() {
        let mut store = store();
        store.set("count", None).unwrap();
        assert_eq!(store.get("count"), None);
    }

    // -----------------------------------------------------------------------
    // readwrite
    // -----------------------------------------------------------------------

    #[test]
    fn readwrite_commits() {
        let mut store = store();
        let outcome = store.set("value", Some(Value::from("a"))).unwrap();
        assert_eq!(outcome, WriteOutcome::Committed);
    }

    #[test]
    fn equal_write_is_unchanged() {
        let mut store = store();
        store.set("value", Some(Value::from("a"))).unwrap();
        let outcome = store.set("value", Some(Value::from("a"))).unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged);
    }

    #[test]
    fn different_write_commits_again() {
        let mut store = store();
        store.set("value", Some(Value::from("a"))).unwrap();
        let outcome = store.set("value", Some(Value::from("b"))).unwrap();
        assert_eq!(outcome, WriteOutcome::Committed);
    }

    #[test]
    fn kind_mismatch_rejected() {
        let mut store = store();
        let err = store.set("count", Some(Value::from("three"))).unwrap_err();
        assert_eq!(
            err,
            SyncError::KindMismatch {
                property: "count".to_owned(),
                expected: ValueKind::Num,
                got: ValueKind::Str,
            }
        );
    }

    #[test]
    fn unknown_property_rejected() {
        let mut store = store();
        let err = store.set("ghost", None).unwrap_err();
        assert_eq!(err, SyncError::UnknownProperty("ghost".to_owned()));
    }

    // -----------------------------------------------------------------------
    // readonly
    // -----------------------------------------------------------------------

    #[test]
    fn readonly_writable_during_construction() {
        let mut store = store();
        let outcome = store.set("kind", Some(Value::from("text"))).unwrap();
        assert_eq!(outcome, WriteOutcome::Committed);
    }

    #[test]
    fn readonly_denied_after_seal() {
        let mut store = store();
        store.set("kind", Some(Value::from("text"))).unwrap();
        store.seal();
        let err = store.set("kind", Some(Value::from("other"))).unwrap_err();
        assert!(matches!(err, SyncError::AccessDenied { .. }));
        assert_eq!(store.get("kind"), Some(Value::Str("text".to_owned())));
    }

    #[test]
    fn readonly_denied_regardless_of_value() {
        let mut store = store();
        store.seal();
        // Even a null write is denied once sealed.
        assert!(store.set("kind", None).is_err());
    }

    // -----------------------------------------------------------------------
    // initOnce
    // -----------------------------------------------------------------------

    #[test]
    fn init_once_first_commit_wins() {
        let mut store = store();
        store.seal();
        assert_eq!(
            store.set("owner", Some(Value::from("a"))).unwrap(),
            WriteOutcome::Committed
        );
        let err = store.set("owner", Some(Value::from("b"))).unwrap_err();
        assert!(matches!(err, SyncError::AccessDenied { .. }));
        assert_eq!(store.get("owner"), Some(Value::Str("a".to_owned())));
    }

    #[test]
    fn init_once_null_does_not_consume() {
        let mut store = store();
        assert_eq!(store.set("owner", None).unwrap(), WriteOutcome::Skipped);
        assert!(!store.is_consumed("owner"));
        // A real value still commits afterwards.
        assert_eq!(
            store.set("owner", Some(Value::from("a"))).unwrap(),
            WriteOutcome::Committed
        );
        assert!(store.is_consumed("owner"));
    }

    #[test]
    fn init_once_repeated_nulls_all_skip() {
        let mut store = store();
        assert_eq!(store.set("owner", None).unwrap(), WriteOutcome::Skipped);
        assert_eq!(store.set("owner", None).unwrap(), WriteOutcome::Skipped);
        assert_eq!(store.get("owner"), None);
    }

    #[test]
    fn init_once_same_value_after_commit_denied() {
        let mut store = store();
        store.set("owner", Some(Value::from("a"))).unwrap();
        // Even re-writing the identical value is denied once consumed.
        assert!(store.set("owner", Some(Value::from("a"))).is_err());
    }

    // -----------------------------------------------------------------------
    // Bookkeeping
    // -----------------------------------------------------------------------

    #[test]
    fn seal_state() {
        let mut store = store();
        assert!(!store.is_sealed());
        store.seal();
        assert!(store.is_sealed());
    }

    #[test]
    fn is_written_tracking() {
        let mut store = store();
        assert!(!store.is_written("value"));
        store.set("value", Some(Value::from("x"))).unwrap();
        assert!(store.is_written("value"));
        assert!(!store.is_written("ghost"));
    }

    #[test]
    fn explicit_default_write_is_unchanged() {
        let mut store = store();
        // "count" defaults to 1.0; writing 1.0 explicitly stores it but
        // reports no change.
        let outcome = store.set("count", Some(Value::Num(1.0))).unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert!(store.is_written("count"));
    }
}

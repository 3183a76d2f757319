//! Property descriptors: access mode, kind, mirroring, reactivity.
//!
//! A [`PropertySpec`] is the explicit, per-class declaration of one component
//! property: its declared [`ValueKind`], its [`AccessMode`], whether writes
//! notify the update pipeline, and which element attribute (if any) mirrors
//! it. Specs are composed at class-definition time and collected into a
//! [`Schema`](super::schema::Schema); instances never own specs.

use crate::value::{Value, ValueKind};

// ---------------------------------------------------------------------------
// AccessMode
// ---------------------------------------------------------------------------

/// Write gating for a property, independent of type or mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Writes always succeed (subject to kind validation).
    ReadWrite,
    /// Writes succeed during the instance's construction phase, then fail.
    ReadOnly,
    /// Exactly one non-null write per instance commits; null writes before
    /// the commit are no-ops, anything after the commit fails.
    InitOnce,
}

impl AccessMode {
    /// Human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            AccessMode::ReadWrite => "readwrite",
            AccessMode::ReadOnly => "readonly",
            AccessMode::InitOnce => "init-once",
        }
    }
}

// ---------------------------------------------------------------------------
// PropertySpec
// ---------------------------------------------------------------------------

/// Declaration of a single component property.
///
/// Built at class-definition time with the builder methods:
///
/// ```
/// use weft_tui::binding::PropertySpec;
/// use weft_tui::value::ValueKind;
///
/// let spec = PropertySpec::new("label", ValueKind::Str)
///     .mirrored("label")
///     .reactive();
/// assert_eq!(spec.attribute.as_deref(), Some("label"));
/// ```
#[derive(Debug, Clone)]
pub struct PropertySpec {
    /// Property name, the key used for direct get/set access.
    pub name: String,
    /// Element attribute mirroring this property, if any.
    pub attribute: Option<String>,
    /// Declared value type.
    pub kind: ValueKind,
    /// Write gating mode.
    pub mode: AccessMode,
    /// Whether a committed write notifies the update pipeline.
    pub reactive: bool,
    /// Value reported by reads before any write. `None` means null.
    pub default: Option<Value>,
}

impl PropertySpec {
    /// Create a read-write, non-reactive, unmirrored spec with a null default.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            attribute: None,
            kind,
            mode: AccessMode::ReadWrite,
            reactive: false,
            default: None,
        }
    }

    /// Mirror this property to the given element attribute (builder).
    pub fn mirrored(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Mark writes after construction as forbidden (builder).
    pub fn read_only(mut self) -> Self {
        self.mode = AccessMode::ReadOnly;
        self
    }

    /// Allow exactly one committed write per instance (builder).
    pub fn init_once(mut self) -> Self {
        self.mode = AccessMode::InitOnce;
        self
    }

    /// Notify the update pipeline on committed writes (builder).
    pub fn reactive(mut self) -> Self {
        self.reactive = true;
        self
    }

    /// Set the default value reported before any write (builder).
    ///
    /// # Panics
    ///
    /// Panics (debug) if the default's kind differs from the declared kind.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        debug_assert_eq!(
            value.kind(),
            self.kind,
            "default value kind must match the declared kind"
        );
        self.default = Some(value);
        self
    }

    /// The value a read reports when the slot has never been written.
    pub fn default_or_null(&self) -> Option<Value> {
        self.default.clone()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

//! Notice trait, envelope, and built-in notices.
//!
//! The [`Notice`] trait is object-safe and supports downcasting via `Any`.
//! [`Envelope`] wraps a boxed notice with routing metadata (sender, target).
//! Built-in notices: [`AttributeWritten`], [`PropertyCommitted`],
//! [`UpdateFlushed`], [`Quit`], [`Custom`].

use std::any::Any;

use crate::binding::ChangeOrigin;
use crate::element::ElementId;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Notice trait
// ---------------------------------------------------------------------------

/// Object-safe notification trait.
///
/// All notices must implement `as_any` for downcasting and `notice_name`
/// for debug/logging purposes.
pub trait Notice: 'static {
    /// Upcast to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable name for this notice type.
    fn notice_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wraps a boxed notice with routing metadata.
pub struct Envelope {
    /// The notice payload.
    pub notice: Box<dyn Notice>,
    /// The element this notice concerns.
    pub sender: ElementId,
    /// If `Some`, the notice is addressed to a specific element.
    /// If `None`, the notice bubbles up from the sender.
    pub target: Option<ElementId>,
    /// Whether this notice has been handled (stops propagation).
    pub handled: bool,
}

impl Envelope {
    /// Create an envelope that will bubble from the sender.
    pub fn new(notice: impl Notice, sender: ElementId) -> Self {
        Self {
            notice: Box::new(notice),
            sender,
            target: None,
            handled: false,
        }
    }

    /// Create an envelope addressed to a specific element.
    pub fn targeted(notice: impl Notice, sender: ElementId, target: ElementId) -> Self {
        Self {
            notice: Box::new(notice),
            sender,
            target: Some(target),
            handled: false,
        }
    }

    /// Attempt to downcast the notice to a concrete type.
    pub fn downcast_ref<T: Notice>(&self) -> Option<&T> {
        self.notice.as_any().downcast_ref::<T>()
    }

    /// Mark this envelope as handled, stopping further propagation.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("notice_name", &self.notice.notice_name())
            .field("sender", &self.sender)
            .field("target", &self.target)
            .field("handled", &self.handled)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in notices
// ---------------------------------------------------------------------------

/// An element's attribute text was written (set or removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeWritten {
    /// Attribute name.
    pub name: String,
    /// New raw text, `None` when the attribute was removed.
    pub text: Option<String>,
}

impl Notice for AttributeWritten {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn notice_name(&self) -> &str {
        "AttributeWritten"
    }
}

/// A property write committed (the stored value changed).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCommitted {
    /// Property name.
    pub name: String,
    /// The committed value.
    pub value: Option<Value>,
    /// Which side initiated the write.
    pub origin: ChangeOrigin,
}

impl Notice for PropertyCommitted {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn notice_name(&self) -> &str {
        "PropertyCommitted"
    }
}

/// A coalesced update fired for an element this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFlushed {
    /// The value the update callback received.
    pub value: Option<Value>,
}

impl Notice for UpdateFlushed {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn notice_name(&self) -> &str {
        "UpdateFlushed"
    }
}

/// Request application shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quit;

impl Notice for Quit {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn notice_name(&self) -> &str {
        "Quit"
    }
}

/// An application-defined notice identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custom {
    /// Application-chosen identifier.
    pub name: String,
}

impl Custom {
    /// Create a custom notice with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Notice for Custom {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn notice_name(&self) -> &str {
        "Custom"
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn an_id() -> ElementId {
        let mut arena: SlotMap<ElementId, ()> = SlotMap::with_key();
        arena.insert(())
    }

    #[test]
    fn envelope_bubbles_by_default() {
        let sender = an_id();
        let env = Envelope::new(Quit, sender);
        assert_eq!(env.sender, sender);
        assert!(env.target.is_none());
        assert!(!env.handled);
    }

    #[test]
    fn envelope_targeted() {
        let sender = an_id();
        let target = an_id();
        let env = Envelope::targeted(Quit, sender, target);
        assert_eq!(env.target, Some(target));
    }

    #[test]
    fn downcast_matches_type() {
        let env = Envelope::new(Custom::new("ping"), an_id());
        assert!(env.downcast_ref::<Custom>().is_some());
        assert!(env.downcast_ref::<Quit>().is_none());
        assert_eq!(env.downcast_ref::<Custom>().unwrap().name, "ping");
    }

    #[test]
    fn mark_handled() {
        let mut env = Envelope::new(Quit, an_id());
        env.mark_handled();
        assert!(env.handled);
    }

    #[test]
    fn notice_names() {
        assert_eq!(Quit.notice_name(), "Quit");
        assert_eq!(Custom::new("x").notice_name(), "Custom");
        assert_eq!(
            AttributeWritten {
                name: "a".into(),
                text: None
            }
            .notice_name(),
            "AttributeWritten"
        );
        assert_eq!(
            UpdateFlushed { value: None }.notice_name(),
            "UpdateFlushed"
        );
    }

    #[test]
    fn debug_includes_notice_name() {
        let env = Envelope::new(Quit, an_id());
        let dbg = format!("{env:?}");
        assert!(dbg.contains("Quit"));
    }

    #[test]
    fn property_committed_payload() {
        let notice = PropertyCommitted {
            name: "checked".into(),
            value: Some(Value::Bool(true)),
            origin: ChangeOrigin::Attribute,
        };
        let env = Envelope::new(notice, an_id());
        let seen = env.downcast_ref::<PropertyCommitted>().unwrap();
        assert_eq!(seen.value, Some(Value::Bool(true)));
        assert_eq!(seen.origin, ChangeOrigin::Attribute);
    }
}

//! Component trait: schema declaration, change and update hooks.
//!
//! `Component` is the behavior attached to a host element. A component
//! declares its properties once via [`schema`](Component::schema) (consulted
//! when the class is registered, not per instance) and receives two kinds of
//! hooks: a synchronous [`on_change`](Component::on_change) for every
//! committed reactive write, and a frame-coalesced
//! [`on_update`](Component::on_update) carrying only the latest value.

use std::any::Any;

use crate::binding::{PropertyChange, Schema};
use crate::schedule::CallbackError;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// Core trait implemented by all components.
///
/// Component is object-safe: the host owns instances as `Box<dyn Component>`
/// and dispatches hooks through the vtable. Downcasting goes through
/// `as_any`/`as_any_mut`.
pub trait Component {
    /// The tag name for this component class (e.g. "Toggle", "Counter").
    ///
    /// Tags key the schema registry; every instance of a class shares one
    /// registered schema.
    fn tag(&self) -> &str;

    /// Declare this class's properties.
    ///
    /// Called once when the class is registered. Defaults to an empty
    /// schema (a component with no declared properties).
    fn schema(&self) -> Schema {
        Schema::new(self.tag())
    }

    /// Synchronous hook: a reactive property just committed a write.
    ///
    /// Runs immediately after the value is stored, before control returns
    /// to whoever initiated the write. Use it to react to individual
    /// changes; batched work belongs in [`on_update`](Self::on_update).
    fn on_change(&mut self, change: &PropertyChange) {
        let _ = change;
    }

    /// Deferred hook: the coalesced update for this element's frame.
    ///
    /// Receives the most recently committed reactive value at the time the
    /// frame fires, or `None` when the batch was cleared without one.
    /// Failures are reported to the run loop, never retried.
    fn on_update(&mut self, value: Option<&Value>) -> Result<(), CallbackError> {
        let _ = value;
        Ok(())
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{ChangeOrigin, PropertySpec};
    use crate::value::ValueKind;

    // -----------------------------------------------------------------------
    // Test components
    // -----------------------------------------------------------------------

    #[derive(Debug, Default)]
    struct Toggle {
        changes_seen: usize,
        last_update: Option<Option<Value>>,
    }

    impl Component for Toggle {
        fn tag(&self) -> &str {
            "Toggle"
        }

        fn schema(&self) -> Schema {
            Schema::new(self.tag()).with(
                PropertySpec::new("checked", ValueKind::Bool)
                    .mirrored("checked")
                    .reactive(),
            )
        }

        fn on_change(&mut self, _change: &PropertyChange) {
            self.changes_seen += 1;
        }

        fn on_update(&mut self, value: Option<&Value>) -> Result<(), CallbackError> {
            self.last_update = Some(value.cloned());
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Bare;

    impl Component for Bare {
        fn tag(&self) -> &str {
            "Bare"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    // -----------------------------------------------------------------------
    // Trait behavior
    // -----------------------------------------------------------------------

    #[test]
    fn tag_name() {
        assert_eq!(Toggle::default().tag(), "Toggle");
    }

    #[test]
    fn schema_declares_properties() {
        let schema = Toggle::default().schema();
        assert_eq!(schema.tag(), "Toggle");
        assert!(schema.spec("checked").is_some());
    }

    #[test]
    fn default_schema_is_empty() {
        let schema = Bare.schema();
        assert!(schema.is_empty());
        assert_eq!(schema.tag(), "Bare");
    }

    #[test]
    fn default_hooks_are_noops() {
        let mut bare = Bare;
        let change = PropertyChange {
            name: "x".to_owned(),
            old: None,
            new: Some(Value::Bool(true)),
            origin: ChangeOrigin::Property,
            reactive: true,
        };
        bare.on_change(&change);
        assert!(bare.on_update(Some(&Value::Bool(true))).is_ok());
    }

    #[test]
    fn hooks_observe_values() {
        let mut toggle = Toggle::default();
        let change = PropertyChange {
            name: "checked".to_owned(),
            old: Some(Value::Bool(false)),
            new: Some(Value::Bool(true)),
            origin: ChangeOrigin::Attribute,
            reactive: true,
        };
        toggle.on_change(&change);
        assert_eq!(toggle.changes_seen, 1);

        toggle.on_update(Some(&Value::Bool(true))).unwrap();
        assert_eq!(toggle.last_update, Some(Some(Value::Bool(true))));
    }

    #[test]
    fn update_with_no_value() {
        let mut toggle = Toggle::default();
        toggle.on_update(None).unwrap();
        assert_eq!(toggle.last_update, Some(None));
    }

    #[test]
    fn component_is_object_safe() {
        let boxed: Box<dyn Component> = Box::new(Toggle::default());
        assert_eq!(boxed.tag(), "Toggle");
    }

    #[test]
    fn as_any_downcast() {
        let mut toggle = Toggle::default();
        toggle.changes_seen = 3;
        let boxed: Box<dyn Component> = Box::new(toggle);
        let concrete = boxed.as_any().downcast_ref::<Toggle>().unwrap();
        assert_eq!(concrete.changes_seen, 3);
    }

    #[test]
    fn as_any_mut_downcast() {
        let mut boxed: Box<dyn Component> = Box::new(Toggle::default());
        let concrete = boxed.as_any_mut().downcast_mut::<Toggle>().unwrap();
        concrete.changes_seen = 7;
        assert_eq!(
            boxed.as_any().downcast_ref::<Toggle>().unwrap().changes_seen,
            7
        );
    }
}

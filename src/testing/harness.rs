//! Harness: programmatic interaction with a headless host.
//!
//! The `Harness` wraps a [`Host`] with a manually-pumped frame source and
//! records every notice as a line in a transcript, so tests can drive
//! attribute/property traffic, pump frames at exact points, and snapshot the
//! resulting event order.

use crate::binding::ChangeOrigin;
use crate::component::Component;
use crate::element::ElementId;
use crate::event::{AttributeWritten, PropertyCommitted, UpdateFlushed};
use crate::host::{Host, HostError};
use crate::schedule::{CallbackFailure, FrameProbe, ManualFrames};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A headless host driver for testing.
///
/// Elements are named `#0`, `#1`, … in mount order so transcripts stay
/// stable across runs.
///
/// # Examples
///
/// ```ignore
/// let mut harness = Harness::new();
/// let id = harness.mount(Box::new(Toggle::default()));
/// harness.set_attr(id, "checked", "").unwrap();
/// harness.frame();
/// assert!(harness.transcript().contains("update"));
/// ```
pub struct Harness {
    host: Host,
    probe: FrameProbe,
    names: Vec<ElementId>,
    log: Vec<String>,
}

impl Harness {
    /// Create a harness with a manually-pumped frame source.
    pub fn new() -> Self {
        let frames = ManualFrames::new();
        let probe = frames.probe();
        Self {
            host: Host::new(Box::new(frames)),
            probe,
            names: Vec::new(),
            log: Vec::new(),
        }
    }

    /// The wrapped host.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// The wrapped host, mutably. Notices pushed while holding this borrow
    /// are absorbed into the transcript on the next harness call.
    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Mount a component at the root level.
    pub fn mount(&mut self, component: Box<dyn Component>) -> ElementId {
        let id = self.host.mount(component, None);
        self.names.push(id);
        self.absorb();
        id
    }

    /// Mount a component with initial attributes.
    pub fn mount_with_attrs(
        &mut self,
        component: Box<dyn Component>,
        attrs: &[(&str, &str)],
    ) -> Result<ElementId, HostError> {
        let id = self.host.mount_with_attrs(component, None, attrs)?;
        self.names.push(id);
        self.absorb();
        Ok(id)
    }

    /// Unmount an element (and its subtree).
    pub fn unmount(&mut self, id: ElementId) {
        self.host.unmount(id);
        self.absorb();
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Set an attribute's raw text.
    pub fn set_attr(
        &mut self,
        id: ElementId,
        name: &str,
        text: impl Into<String>,
    ) -> Result<(), HostError> {
        let result = self.host.set_attribute(id, name, text);
        self.absorb();
        result
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> Result<(), HostError> {
        let result = self.host.remove_attribute(id, name);
        self.absorb();
        result
    }

    /// Set a property directly.
    pub fn set_prop(
        &mut self,
        id: ElementId,
        name: &str,
        value: Option<Value>,
    ) -> Result<(), HostError> {
        let result = self.host.set_property(id, name, value);
        self.absorb();
        result
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Read a property's current value.
    pub fn prop(&self, id: ElementId, name: &str) -> Option<Value> {
        self.host.property(id, name)
    }

    /// Read an attribute's raw text.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<String> {
        self.host.attribute(id, name).map(str::to_owned)
    }

    /// Whether a frame is currently requested.
    pub fn frame_requested(&self) -> bool {
        self.probe.is_requested()
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Pump one frame: fire every due coalesced update.
    pub fn frame(&mut self) -> Vec<CallbackFailure> {
        self.probe.clear();
        let failures = self.host.run_frame();
        self.absorb();
        failures
    }

    // ── Transcript ───────────────────────────────────────────────────

    /// Everything observed so far, one notice per line.
    pub fn transcript(&self) -> String {
        self.log.join("\n")
    }

    /// Drop the transcript collected so far.
    pub fn clear_transcript(&mut self) {
        self.log.clear();
    }

    /// Drain host notices into transcript lines.
    fn absorb(&mut self) {
        for envelope in self.host.notices.drain() {
            let who = self.name_of(envelope.sender);
            if let Some(written) = envelope.downcast_ref::<AttributeWritten>() {
                let line = match &written.text {
                    Some(text) => format!("{who} attr {}={:?}", written.name, text),
                    None => format!("{who} attr {} removed", written.name),
                };
                self.log.push(line);
            } else if let Some(committed) = envelope.downcast_ref::<PropertyCommitted>() {
                let origin = match committed.origin {
                    ChangeOrigin::Attribute => "attribute",
                    ChangeOrigin::Property => "property",
                };
                self.log.push(format!(
                    "{who} prop {} = {} ({origin})",
                    committed.name,
                    fmt_value(committed.value.as_ref())
                ));
            } else if let Some(flushed) = envelope.downcast_ref::<UpdateFlushed>() {
                self.log
                    .push(format!("{who} update -> {}", fmt_value(flushed.value.as_ref())));
            } else {
                self.log
                    .push(format!("{who} {}", envelope.notice.notice_name()));
            }
        }
    }

    fn name_of(&self, id: ElementId) -> String {
        match self.names.iter().position(|&n| n == id) {
            Some(index) => format!("#{index}"),
            None => "#?".to_owned(),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript form of a value: `null`, quoted text, `true`, or a number.
fn fmt_value(value: Option<&Value>) -> String {
    match value {
        None => "null".to_owned(),
        Some(Value::Str(s)) => format!("{s:?}"),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Num(n)) => {
            if n.fract() == 0.0 && n.is_finite() {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

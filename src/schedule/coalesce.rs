//! Coalescing of change notifications into one update per frame.
//!
//! A [`Coalescer`] is the bookkeeping for one logical update stream: the
//! latest pending value and whether a frame is already on its way. The
//! [`UpdateScheduler`] keys one coalescer per element and owns the
//! [`FrameSource`] that wakes the run loop.
//!
//! Bookkeeping is cleared *before* the caller invokes any callback: a
//! callback that fails (or schedules again) finds the entry clean, so no
//! failure can wedge an entry in a permanently-requested state, and a
//! schedule issued inside a callback requests a fresh frame.

use slotmap::SecondaryMap;

use crate::element::ElementId;

use super::frame::FrameSource;

// ---------------------------------------------------------------------------
// Coalescer
// ---------------------------------------------------------------------------

/// Latest-value-wins bookkeeping for one update stream.
#[derive(Debug)]
pub struct Coalescer<T> {
    /// The most recently scheduled value. `None` is an explicit "no value".
    pending: Option<T>,
    /// Whether a frame is already requested for this entry.
    frame_requested: bool,
}

impl<T> Default for Coalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            frame_requested: false,
        }
    }
}

impl<T> Coalescer<T> {
    /// Create an idle coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` as the newest pending value.
    ///
    /// Returns `true` when the caller must request a frame (none was
    /// outstanding); repeated schedules within one window only overwrite the
    /// value.
    #[must_use]
    pub fn schedule(&mut self, value: Option<T>) -> bool {
        self.pending = value;
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// Begin firing: if a frame was requested, clear all bookkeeping and
    /// hand out the latest value for the callback.
    ///
    /// Returns `None` when no frame was due. The entry is reset before the
    /// caller runs the callback, which is what allows re-scheduling from
    /// inside the callback and keeps failing callbacks from sticking the
    /// entry.
    pub fn begin_fire(&mut self) -> Option<Option<T>> {
        if !self.frame_requested {
            return None;
        }
        self.frame_requested = false;
        Some(self.pending.take())
    }

    /// Whether a frame is currently requested.
    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure returned by a consumer-supplied update callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("update callback failed: {reason}")]
pub struct CallbackError {
    /// What went wrong, as reported by the component.
    pub reason: String,
}

impl CallbackError {
    /// Create an error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A callback failure attributed to the element whose update raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    pub element: ElementId,
    pub error: CallbackError,
}

// ---------------------------------------------------------------------------
// UpdateScheduler
// ---------------------------------------------------------------------------

/// Per-element coalescers plus the frame source that wakes the run loop.
///
/// Entries live in a `SecondaryMap` side table keyed by element identity;
/// cancelling an element drops its entry so a pending frame can never run a
/// destroyed instance's update.
pub struct UpdateScheduler<T> {
    entries: SecondaryMap<ElementId, Coalescer<T>>,
    frames: Box<dyn FrameSource>,
}

impl<T> UpdateScheduler<T> {
    /// Create a scheduler waking frames through the given source.
    pub fn new(frames: Box<dyn FrameSource>) -> Self {
        Self {
            entries: SecondaryMap::new(),
            frames,
        }
    }

    /// Record `value` for `element`, creating its entry on first use and
    /// requesting a frame if none is outstanding for it.
    pub fn schedule(&mut self, element: ElementId, value: Option<T>) {
        let entry = self.entries.entry(element);
        let Some(entry) = entry else {
            // Stale key for an element already removed from the arena.
            return;
        };
        if entry.or_insert_with(Coalescer::new).schedule(value) {
            self.frames.request();
        }
    }

    /// Take every due entry's latest value, clearing bookkeeping first.
    ///
    /// The caller invokes the callbacks; schedules issued during those
    /// callbacks land in clean entries and request fresh frames.
    pub fn take_due(&mut self) -> Vec<(ElementId, Option<T>)> {
        let mut due = Vec::new();
        for (id, entry) in self.entries.iter_mut() {
            if let Some(value) = entry.begin_fire() {
                due.push((id, value));
            }
        }
        due
    }

    /// Drop `element`'s entry; its pending frame (if any) will not fire.
    pub fn cancel(&mut self, element: ElementId) {
        self.entries.remove(element);
    }

    /// Whether `element` has a frame requested.
    pub fn is_pending(&self, element: ElementId) -> bool {
        self.entries
            .get(element)
            .map(Coalescer::is_frame_requested)
            .unwrap_or(false)
    }

    /// Number of entries with a requested frame.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.is_frame_requested())
            .count()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::frame::ManualFrames;
    use slotmap::SlotMap;

    fn ids(n: usize) -> (SlotMap<ElementId, ()>, Vec<ElementId>) {
        let mut arena = SlotMap::with_key();
        let ids = (0..n).map(|_| arena.insert(())).collect();
        (arena, ids)
    }

    // -----------------------------------------------------------------------
    // Coalescer
    // -----------------------------------------------------------------------

    #[test]
    fn first_schedule_requests_frame() {
        let mut entry = Coalescer::new();
        assert!(entry.schedule(Some(1)));
        assert!(entry.is_frame_requested());
    }

    #[test]
    fn second_schedule_does_not_request_again() {
        let mut entry = Coalescer::new();
        assert!(entry.schedule(Some(1)));
        assert!(!entry.schedule(Some(2)));
    }

    #[test]
    fn fire_carries_latest_value() {
        let mut entry = Coalescer::new();
        let _ = entry.schedule(Some('a'));
        let _ = entry.schedule(Some('b'));
        assert_eq!(entry.begin_fire(), Some(Some('b')));
    }

    #[test]
    fn fire_without_request_is_none() {
        let mut entry: Coalescer<i32> = Coalescer::new();
        assert_eq!(entry.begin_fire(), None);
    }

    #[test]
    fn fire_clears_bookkeeping() {
        let mut entry = Coalescer::new();
        let _ = entry.schedule(Some(1));
        let _ = entry.begin_fire();
        assert!(!entry.is_frame_requested());
        // Next schedule starts a new window.
        assert!(entry.schedule(Some(2)));
        assert_eq!(entry.begin_fire(), Some(Some(2)));
    }

    #[test]
    fn null_value_fires_as_no_value() {
        let mut entry: Coalescer<i32> = Coalescer::new();
        let _ = entry.schedule(None);
        assert_eq!(entry.begin_fire(), Some(None));
    }

    #[test]
    fn schedule_after_begin_fire_requests_again() {
        // Models a schedule issued from inside the firing callback.
        let mut entry = Coalescer::new();
        let _ = entry.schedule(Some(1));
        let fired = entry.begin_fire().unwrap();
        assert_eq!(fired, Some(1));
        assert!(entry.schedule(Some(2)), "callback-time schedule needs a frame");
        assert_eq!(entry.begin_fire(), Some(Some(2)));
    }

    // -----------------------------------------------------------------------
    // UpdateScheduler
    // -----------------------------------------------------------------------

    #[test]
    fn schedule_requests_one_frame_per_window() {
        let frames = ManualFrames::new();
        let probe = frames.probe();
        let (_arena, ids) = ids(1);
        let mut sched = UpdateScheduler::new(Box::new(frames));

        sched.schedule(ids[0], Some(1));
        assert!(probe.clear());
        sched.schedule(ids[0], Some(2));
        // Frame already outstanding for this entry: no second request.
        assert!(!probe.is_requested());
    }

    #[test]
    fn take_due_returns_latest_per_element() {
        let frames = ManualFrames::new();
        let (_arena, ids) = ids(2);
        let mut sched = UpdateScheduler::new(Box::new(frames));

        sched.schedule(ids[0], Some("a"));
        sched.schedule(ids[0], Some("b"));
        sched.schedule(ids[1], Some("x"));

        let mut due = sched.take_due();
        due.sort_by_key(|(id, _)| *id);
        let mut expected = vec![(ids[0], Some("b")), (ids[1], Some("x"))];
        expected.sort_by_key(|(id, _)| *id);
        assert_eq!(due, expected);
    }

    #[test]
    fn take_due_twice_is_empty() {
        let frames = ManualFrames::new();
        let (_arena, ids) = ids(1);
        let mut sched = UpdateScheduler::new(Box::new(frames));
        sched.schedule(ids[0], Some(1));
        assert_eq!(sched.take_due().len(), 1);
        assert!(sched.take_due().is_empty());
    }

    #[test]
    fn cancel_drops_pending_frame() {
        let frames = ManualFrames::new();
        let (_arena, ids) = ids(1);
        let mut sched = UpdateScheduler::new(Box::new(frames));
        sched.schedule(ids[0], Some(1));
        sched.cancel(ids[0]);
        assert!(!sched.is_pending(ids[0]));
        assert!(sched.take_due().is_empty());
    }

    #[test]
    fn schedule_after_take_due_requests_new_frame() {
        let frames = ManualFrames::new();
        let probe = frames.probe();
        let (_arena, ids) = ids(1);
        let mut sched = UpdateScheduler::new(Box::new(frames));

        sched.schedule(ids[0], Some(1));
        probe.clear();
        let _ = sched.take_due();
        sched.schedule(ids[0], Some(2));
        assert!(probe.is_requested());
    }

    #[test]
    fn pending_count() {
        let frames = ManualFrames::new();
        let (_arena, ids) = ids(3);
        let mut sched = UpdateScheduler::new(Box::new(frames));
        sched.schedule(ids[0], Some(1));
        sched.schedule(ids[2], Some(3));
        assert_eq!(sched.pending_count(), 2);
    }

    #[test]
    fn callback_error_display() {
        let err = CallbackError::new("boom");
        assert_eq!(err.to_string(), "update callback failed: boom");
    }
}

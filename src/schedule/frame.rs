//! Single-shot frame deferral sources.
//!
//! The scheduler never sleeps or polls on its own: it asks a [`FrameSource`]
//! for one wake-up at the next frame boundary, and the embedding run loop
//! decides what a "frame" is. [`ManualFrames`] is the headless source used by
//! tests and the harness; [`NotifyFrames`] backs the async app loop.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// FrameSource
// ---------------------------------------------------------------------------

/// A single-shot deferred wake-up: "run once before the next frame".
///
/// The scheduler calls [`request`](Self::request) at most once per
/// coalescing window (it tracks its own outstanding-frame flag), so sources
/// do not need to deduplicate.
pub trait FrameSource {
    /// Arrange one wake-up at the next frame boundary.
    fn request(&mut self);
}

// ---------------------------------------------------------------------------
// ManualFrames
// ---------------------------------------------------------------------------

/// Headless frame source, pumped by hand.
///
/// Requests are recorded in a shared flag that a [`FrameProbe`] can inspect
/// and clear; the harness pumps a frame whenever the probe shows a request.
#[derive(Debug, Default)]
pub struct ManualFrames {
    requested: Rc<Cell<bool>>,
}

impl ManualFrames {
    /// Create a source with no outstanding request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe sharing this source's request flag.
    pub fn probe(&self) -> FrameProbe {
        FrameProbe {
            requested: Rc::clone(&self.requested),
        }
    }
}

impl FrameSource for ManualFrames {
    fn request(&mut self) {
        self.requested.set(true);
    }
}

/// Inspection handle for a [`ManualFrames`] source.
#[derive(Debug, Clone)]
pub struct FrameProbe {
    requested: Rc<Cell<bool>>,
}

impl FrameProbe {
    /// Whether a frame is currently requested.
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Clear the request flag, returning whether one was set.
    pub fn clear(&self) -> bool {
        self.requested.replace(false)
    }
}

// ---------------------------------------------------------------------------
// NotifyFrames
// ---------------------------------------------------------------------------

/// Frame source for the async run loop, backed by `tokio::sync::Notify`.
///
/// `request()` wakes the loop, which then waits for the next interval tick
/// before firing the frame (pacing lives in the loop, not here).
#[derive(Debug, Default)]
pub struct NotifyFrames {
    notify: Arc<Notify>,
}

impl NotifyFrames {
    /// Create a source with no pending notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// The notify handle the run loop awaits on.
    pub fn handle(&self) -> Arc<Notify> {
        Arc::clone(&self.notify)
    }
}

impl FrameSource for NotifyFrames {
    fn request(&mut self) {
        // notify_one stores a permit, so a request made while the loop is
        // mid-frame is not lost.
        self.notify.notify_one();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

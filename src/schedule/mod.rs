//! Frame-coalesced update scheduling.
//!
//! High-frequency "this value changed" notifications collapse into one
//! deferred update per element per frame, carrying only the latest value.
//!
//! - [`FrameSource`] — pluggable single-shot "wake me before the next frame".
//! - [`Coalescer`] — latest-value-wins bookkeeping for one update stream.
//! - [`UpdateScheduler`] — per-element entries plus cancellation.

pub mod coalesce;
pub mod frame;

pub use coalesce::{CallbackError, CallbackFailure, Coalescer, UpdateScheduler};
pub use frame::{FrameProbe, FrameSource, ManualFrames, NotifyFrames};

//! Test utilities: headless harness with transcript recording.

pub mod harness;

pub use harness::Harness;

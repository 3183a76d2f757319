//! # weft-tui
//!
//! The element-state core of a declarative terminal UI framework: typed
//! component properties, bidirectional attribute mirroring, and a
//! frame-coalesced update scheduler. weft-tui is deliberately renderer-free;
//! widget and drawing crates build on top of it.
//!
//! ## Core Systems
//!
//! - **[`value`]** — Typed attribute values: decode raw text, encode it back
//! - **[`binding`]** — Property specs, schemas, access-gated stores, the attribute mirror
//! - **[`element`]** — Slotmap-backed element arena with attribute text storage
//! - **[`component`]** — Component trait, change/update hooks, lifecycle tracking
//! - **[`schedule`]** — Latest-value-wins update coalescing with pluggable frame sources
//! - **[`event`]** — Notice bus for attribute writes, commits, and flushed updates
//! - **[`host`]** — Wiring: every mutation flows through policy, mirror, and scheduler
//! - **[`app`]** — Async frame loop (tokio) plus a headless mode
//! - **[`testing`]** — Harness for driving a headless host with a transcript

// Foundation
pub mod value;

// Core systems
pub mod binding;
pub mod element;
pub mod schedule;

// Component system
pub mod component;

// Events
pub mod event;

// Wiring
pub mod app;
pub mod host;

// Test utilities
pub mod testing;

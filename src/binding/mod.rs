//! Property binding: descriptors, schemas, typed storage, attribute mirror.
//!
//! The typed side of element state. A component class declares its
//! properties once as a [`Schema`] of [`PropertySpec`]s; each instance gets a
//! [`PropertyStore`] enforcing the declared access modes, and an
//! [`AttributeMirror`] keeping the store and the element's attribute text
//! convergent in both directions.
//!
//! - [`PropertySpec`] — one property: kind, access mode, mirroring, reactivity.
//! - [`Schema`] / [`SchemaRegistry`] — class-level declarations, shared per tag.
//! - [`PropertyStore`] — per-instance slots with write gating.
//! - [`AttributeMirror`] — loop-free bidirectional attribute sync.

pub mod descriptor;
pub mod mirror;
pub mod schema;
pub mod store;

pub use descriptor::{AccessMode, PropertySpec};
pub use mirror::{AttributeMirror, ChangeOrigin, PropertyChange};
pub use schema::{Schema, SchemaRegistry};
pub use store::{PropertyStore, SyncError, WriteOutcome};

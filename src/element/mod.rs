//! Host element arena: ids, attribute text storage, tree operations.
//!
//! Elements are the untyped host side of the binding layer: a tag, classes,
//! and an ordered map of raw attribute text. The typed view lives in
//! [`crate::binding`].

pub mod node;
pub mod tree;

pub use node::{ElementData, ElementId};
pub use tree::ElementTree;

//! Tree operations: insert, remove, reparent, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId};

/// Empty slice constant for returning when an element has no children.
const EMPTY_CHILDREN: &[ElementId] = &[];

/// The central element tree, backed by a slotmap arena.
///
/// All elements live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps so that removal is O(subtree size) and lookup is
/// O(1).
pub struct ElementTree {
    pub(crate) elements: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level element (no parent).
    ///
    /// If no root has been set yet, this element becomes the root.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.elements.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert an element as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        debug_assert!(
            self.elements.contains_key(parent),
            "parent element does not exist"
        );
        let id = self.elements.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        id
    }

    /// Remove an element and all its descendants recursively.
    ///
    /// Returns the removed ids in removal (BFS) order, starting with `id`
    /// itself. Returns an empty vec if the element didn't exist. The caller
    /// is responsible for tearing down per-element state keyed by these ids.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.elements.contains_key(id) {
            return Vec::new();
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed = Vec::new();

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            if self.elements.remove(current).is_some() {
                removed.push(current);
            }
        }

        removed
    }

    /// Move `element` to become a child of `new_parent`, subtree intact.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either id does not exist.
    pub fn reparent(&mut self, element: ElementId, new_parent: ElementId) {
        debug_assert!(self.elements.contains_key(element), "element does not exist");
        debug_assert!(
            self.elements.contains_key(new_parent),
            "new_parent does not exist"
        );

        if let Some(old_parent) = self.parent.remove(element) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != element);
            }
        }

        self.parent.insert(element, new_parent);
        if let Some(siblings) = self.children.get_mut(new_parent) {
            siblings.push(element);
        }
    }

    /// Get the parent of an element, if it has one.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Get the children of an element. Empty slice if none or nonexistent.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to an element's data.
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id)
    }

    /// Mutable access to an element's data.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.elements.get_mut(id)
    }

    /// The current root element, if set.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Explicitly set the root element.
    pub fn set_root(&mut self, id: ElementId) {
        self.root = Some(id);
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the tree contains an element with the given id.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.elements.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            let kids = self.children(current);
            for &child in kids.iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

//! Element types: ElementId, ElementData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a host element. Copy, lightweight (u64).
    pub struct ElementId;
}

/// Data associated with a single host element.
///
/// The attribute map is the element-side source of truth for raw attribute
/// text: it always holds the latest text regardless of how fast script
/// mutates it, which is what lets the binding layer cache decoded values
/// without dropping intermediate states.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Component tag name (e.g. "Toggle", "Counter").
    pub tag: String,
    /// Optional unique id.
    pub id: Option<String>,
    /// Style classes.
    pub classes: Vec<String>,
    /// Attribute name → raw text, in insertion order.
    attributes: Vec<(String, String)>,
}

impl ElementData {
    /// Create a new `ElementData` with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Set the element id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.set_attribute(name, text);
        self
    }

    /// Raw text of an attribute, or `None` when absent.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    /// Whether the attribute is present (its text may be empty).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Set an attribute's text, inserting or overwriting.
    pub fn set_attribute(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = text;
        } else {
            self.attributes.push((name, text));
        }
    }

    /// Remove an attribute. Returns its previous text, `None` if absent.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, t)| (n.as_str(), t.as_str()))
    }

    /// Whether this element has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

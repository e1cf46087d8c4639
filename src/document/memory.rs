// SPDX-License-Identifier: GPL-3.0-only

//! In-memory host document.

use std::collections::BTreeSet;

use super::{Content, Cursor, Display, DocumentError, ElementHandle, HostDocument};
use crate::state::{Anchor, Dimension, Position, Viewport};

/// An element of a [`MemoryDocument`] with the style properties the overlay
/// writes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementNode {
    pub id: String,
    pub attached: bool,
    /// Anchor corner the offsets are measured from; `None` until placed.
    pub anchor: Option<Anchor>,
    pub position: Position,
    pub dimension: Dimension,
    pub padding: f32,
    pub display: Display,
    pub cursor: Cursor,
    pub classes: BTreeSet<String>,
    pub children: Vec<Content>,
}

impl ElementNode {
    /// Returns `true` if the element carries the given style class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Concatenated content of the element's text nodes.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Content::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A page held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    location: String,
    viewport: Viewport,
    theme_color: Option<String>,
    has_body: bool,
    scriptable: bool,
    elements: Vec<ElementNode>,
}

impl MemoryDocument {
    /// Creates a scriptable page with a body.
    pub fn new(location: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            location: location.into(),
            viewport,
            theme_color: None,
            has_body: true,
            scriptable: true,
            elements: Vec::new(),
        }
    }

    /// Sets the `theme-color` meta content.
    #[must_use]
    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    /// Creates the page without a body element (still loading).
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.has_body = false;
        self
    }

    /// Marks the page as forbidding script execution.
    #[must_use]
    pub fn deny_scripting(mut self) -> Self {
        self.scriptable = false;
        self
    }

    /// Simulates the body element being parsed.
    pub fn attach_body(&mut self) {
        self.has_body = true;
    }

    /// Simulates a same-page navigation (fragment change).
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Simulates a window resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Returns the element behind a handle, attached or not.
    pub fn element(&self, element: ElementHandle) -> Option<&ElementNode> {
        self.elements.get(element.0)
    }

    /// Counts attached elements carrying the given identifier.
    pub fn count_with_id(&self, id: &str) -> usize {
        self.elements
            .iter()
            .filter(|node| node.attached && node.id == id)
            .count()
    }

    fn node_mut(&mut self, element: ElementHandle) -> Option<&mut ElementNode> {
        self.elements.get_mut(element.0).filter(|node| node.attached)
    }
}

impl HostDocument for MemoryDocument {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn theme_color(&self) -> Option<String> {
        self.theme_color.clone()
    }

    fn is_scriptable(&self) -> bool {
        self.scriptable
    }

    fn find_element(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .iter()
            .position(|node| node.attached && node.id == id)
            .map(ElementHandle)
    }

    fn create_element(&mut self, id: &str) -> Result<ElementHandle, DocumentError> {
        if !self.scriptable {
            return Err(DocumentError::ScriptingDenied);
        }
        if !self.has_body {
            return Err(DocumentError::NoBody);
        }
        self.elements.push(ElementNode {
            id: id.to_string(),
            attached: true,
            ..ElementNode::default()
        });
        Ok(ElementHandle(self.elements.len() - 1))
    }

    fn remove_element(&mut self, element: ElementHandle) -> bool {
        match self.node_mut(element) {
            Some(node) => {
                node.attached = false;
                true
            }
            None => false,
        }
    }

    fn set_offsets(&mut self, element: ElementHandle, anchor: Anchor, position: Position) {
        if let Some(node) = self.node_mut(element) {
            node.anchor = Some(anchor);
            node.position = position;
        }
    }

    fn set_dimension(&mut self, element: ElementHandle, dimension: Dimension, padding: f32) {
        if let Some(node) = self.node_mut(element) {
            node.dimension = dimension;
            node.padding = padding;
        }
    }

    fn display(&self, element: ElementHandle) -> Display {
        self.elements
            .get(element.0)
            .filter(|node| node.attached)
            .map(|node| node.display)
            .unwrap_or_default()
    }

    fn set_display(&mut self, element: ElementHandle, display: Display) {
        if let Some(node) = self.node_mut(element) {
            node.display = display;
        }
    }

    fn set_cursor(&mut self, element: ElementHandle, cursor: Cursor) {
        if let Some(node) = self.node_mut(element) {
            node.cursor = cursor;
        }
    }

    fn replace_children(&mut self, element: ElementHandle, children: Vec<Content>) {
        if let Some(node) = self.node_mut(element) {
            node.children = children;
        }
    }

    fn set_class(&mut self, element: ElementHandle, class: &str, enabled: bool) {
        if let Some(node) = self.node_mut(element) {
            if enabled {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MemoryDocument {
        MemoryDocument::new("https://example.com/", Viewport::new(1280.0, 800.0))
    }

    /// Test: Created elements are found by identifier
    #[test]
    fn test_create_and_find() {
        let mut doc = page();
        assert!(doc.find_element("overlay").is_none());

        let handle = doc.create_element("overlay").unwrap();
        assert_eq!(doc.find_element("overlay"), Some(handle));
        assert_eq!(doc.count_with_id("overlay"), 1);
        assert_eq!(doc.display(handle), Display::None, "New elements start hidden");
    }

    /// Test: Creation fails without a body and succeeds once it appears
    #[test]
    fn test_create_without_body() {
        let mut doc = page().without_body();
        assert_eq!(doc.create_element("overlay"), Err(DocumentError::NoBody));

        doc.attach_body();
        assert!(doc.create_element("overlay").is_ok());
    }

    /// Test: Scripting denial wins over a missing body
    #[test]
    fn test_create_scripting_denied() {
        let mut doc = page().without_body().deny_scripting();
        assert!(!doc.is_scriptable());
        assert_eq!(doc.create_element("overlay"), Err(DocumentError::ScriptingDenied));
    }

    /// Test: Removed elements are no longer found or writable
    #[test]
    fn test_remove_detaches() {
        let mut doc = page();
        let handle = doc.create_element("overlay").unwrap();

        assert!(doc.remove_element(handle));
        assert!(!doc.remove_element(handle), "Second removal is a no-op");
        assert!(doc.find_element("overlay").is_none());

        doc.set_display(handle, Display::Block);
        assert_eq!(doc.display(handle), Display::None);
    }

    /// Test: Classes and text content
    #[test]
    fn test_classes_and_text() {
        let mut doc = page();
        let handle = doc.create_element("overlay").unwrap();

        doc.set_class(handle, "error", true);
        doc.replace_children(handle, vec![Content::Text("oops".to_string())]);
        let node = doc.element(handle).unwrap();
        assert!(node.has_class("error"));
        assert_eq!(node.text_content(), "oops");

        doc.set_class(handle, "error", false);
        assert!(!doc.element(handle).unwrap().has_class("error"));
    }
}

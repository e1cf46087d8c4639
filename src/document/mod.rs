// SPDX-License-Identifier: GPL-3.0-only

//! Host document boundary.
//!
//! The overlay controller never touches a concrete DOM. Everything it needs
//! from the page it is injected into goes through the [`HostDocument`] trait:
//! element lookup and creation, the handful of style properties the overlay
//! owns, child content, and the page facts used at startup (address, viewport,
//! `theme-color` metadata).
//!
//! # Implementations
//!
//! - [`MemoryDocument`]: an in-memory page used by the tests and by the demo
//!   binary. It implements the whole contract, including a page without a
//!   body and a page that forbids scripting.
//!
//! # Ownership of element state
//!
//! Three parts of the crate write to the same element, each through its own
//! setters:
//!
//! - geometry (`set_offsets`, `set_dimension`, `set_cursor`) is written by the
//!   gesture handling and viewport resize paths,
//! - children and the error class are written by the renderer,
//! - `set_display` is written by the print lifecycle.
//!
//! No setter touches state owned by another one.

pub mod memory;

pub use memory::{ElementNode, MemoryDocument};

use std::fmt;

use crate::renderer::CodeGraphic;
use crate::state::{Anchor, Dimension, Position, Viewport};

// ============================================================================
// Element Types
// ============================================================================

/// Opaque handle to an element of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// Display property of the overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Not rendered. New elements start hidden.
    #[default]
    None,
    /// Rendered as a block.
    Block,
}

impl Display {
    /// Returns the CSS value for this display mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
        }
    }
}

/// Cursor shown while the pointer is over the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Shown while dragging.
    Move,
}

/// One child of the overlay element.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// The generated code graphic.
    Graphic(CodeGraphic),
    /// A plain text node.
    Text(String),
    /// The zoom-in/zoom-out buttons. Presses on this sub-region never start a
    /// drag.
    ZoomControls {
        zoom_in_label: String,
        zoom_out_label: String,
    },
}

// ============================================================================
// Errors
// ============================================================================

/// Errors reported by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    /// The document has no body yet; creation can be retried later.
    NoBody,
    /// The page forbids script execution in the overlay's context.
    ScriptingDenied,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::NoBody => write!(f, "document has no body element"),
            DocumentError::ScriptingDenied => write!(f, "document forbids script execution"),
        }
    }
}

impl std::error::Error for DocumentError {}

// ============================================================================
// HostDocument Trait
// ============================================================================

/// The page the overlay lives in.
pub trait HostDocument {
    /// Current address of the page.
    fn location(&self) -> String;

    /// Current visible area of the page.
    fn viewport(&self) -> Viewport;

    /// Content of the page's `theme-color` meta element, if any.
    fn theme_color(&self) -> Option<String>;

    /// Returns `false` if the page forbids script execution.
    fn is_scriptable(&self) -> bool {
        true
    }

    /// Looks up an attached element by identifier.
    fn find_element(&self, id: &str) -> Option<ElementHandle>;

    /// Creates an element with the given identifier and appends it to the body.
    fn create_element(&mut self, id: &str) -> Result<ElementHandle, DocumentError>;

    /// Detaches an element. Returns `false` if it was not attached.
    fn remove_element(&mut self, element: ElementHandle) -> bool;

    /// Places the element at `position` offsets from the `anchor` corner.
    fn set_offsets(&mut self, element: ElementHandle, anchor: Anchor, position: Position);

    /// Sets the outer size of the element and its symmetric padding.
    fn set_dimension(&mut self, element: ElementHandle, dimension: Dimension, padding: f32);

    /// Reads the display property. Detached or unknown elements read as hidden.
    fn display(&self, element: ElementHandle) -> Display;

    fn set_display(&mut self, element: ElementHandle, display: Display);

    fn set_cursor(&mut self, element: ElementHandle, cursor: Cursor);

    /// Replaces every child of the element.
    fn replace_children(&mut self, element: ElementHandle, children: Vec<Content>);

    /// Adds (`enabled`) or removes a style class.
    fn set_class(&mut self, element: ElementHandle, class: &str, enabled: bool);
}

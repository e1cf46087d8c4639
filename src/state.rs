// SPDX-License-Identifier: GPL-3.0-only

//! Overlay geometry state.
//!
//! The overlay is anchored to one corner of the viewport and positioned by
//! offsets measured from that corner, the same way a floating window is placed
//! with margins from its anchor edges. All writes go through
//! [`OverlayGeometry::apply_position`] and [`OverlayGeometry::apply_dimension`],
//! which clamp before storing, so the overlay can never be placed outside the
//! viewport or sized outside its bounds.

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::geometry;

// ============================================================================
// Anchor Types
// ============================================================================

/// Vertical component of the anchor corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    /// Offsets are measured from the top edge.
    #[default]
    Top,
    /// Offsets are measured from the bottom edge.
    Bottom,
}

impl VerticalPosition {
    /// Returns the CSS property name for this edge.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalPosition::Top => "top",
            VerticalPosition::Bottom => "bottom",
        }
    }
}

/// Horizontal component of the anchor corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    /// Offsets are measured from the left edge.
    Left,
    /// Offsets are measured from the right edge.
    #[default]
    Right,
}

impl HorizontalPosition {
    /// Returns the CSS property name for this edge.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalPosition::Left => "left",
            HorizontalPosition::Right => "right",
        }
    }
}

/// The viewport corner from which overlay offsets are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
}

impl Anchor {
    /// Creates an anchor from its two components.
    pub fn new(vertical: VerticalPosition, horizontal: HorizontalPosition) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

// ============================================================================
// Geometry Types
// ============================================================================

/// Offsets from the anchor corner, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Overlay size in pixels, padding included.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
}

impl Dimension {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Creates a square dimension.
    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Returns the area left for the code graphic once padding is removed.
    #[must_use]
    pub fn content(&self, padding: f32) -> Dimension {
        Dimension::new(
            (self.width - 2.0 * padding).max(0.0),
            (self.height - 2.0 * padding).max(0.0),
        )
    }
}

/// Visible area of the host document.
///
/// `client_width` is the document width without the vertical scrollbar
/// gutter; it bounds the horizontal axis so the overlay never sits under the
/// scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub client_width: f32,
}

impl Viewport {
    /// Creates a viewport without a scrollbar gutter.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            client_width: width,
        }
    }

    /// Sets the document client width.
    #[must_use]
    pub fn with_client_width(mut self, client_width: f32) -> Self {
        self.client_width = client_width;
        self
    }

    /// Extent usable on the horizontal axis.
    pub fn horizontal_extent(&self) -> f32 {
        self.client_width.min(self.width)
    }

    /// Extent usable on the vertical axis.
    pub fn vertical_extent(&self) -> f32 {
        self.height
    }
}

// ============================================================================
// Overlay Geometry
// ============================================================================

/// Position and dimension of the overlay, always kept clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    position: Position,
    dimension: Dimension,
}

impl OverlayGeometry {
    /// Creates the initial geometry: anchored at the corner, sized to hold a
    /// graphic of `size` pixels plus padding.
    pub fn initial(size: f32, viewport: Viewport) -> Self {
        let mut geometry = Self {
            position: Position::default(),
            dimension: Dimension::square(size + 2.0 * app_settings::OVERLAY_PADDING),
        };
        geometry.apply_dimension(geometry.dimension, viewport);
        geometry
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Clamps `position` against the viewport and stores it.
    pub fn apply_position(&mut self, position: Position, viewport: Viewport) -> Position {
        self.position = geometry::clamp_position(position, self.dimension, viewport);
        self.position
    }

    /// Clamps `dimension` to the size bounds and the viewport, stores it, and
    /// re-clamps the position so the larger box still fits.
    pub fn apply_dimension(&mut self, dimension: Dimension, viewport: Viewport) -> Dimension {
        self.dimension = geometry::clamp_dimension(
            dimension,
            app_settings::MIN_DIMENSION,
            app_settings::MAX_DIMENSION,
            viewport,
        );
        self.position = geometry::clamp_position(self.position, self.dimension, viewport);
        self.dimension
    }

    /// Keeps the relative placement stable across a viewport change.
    pub fn rescale(&mut self, old: Viewport, new: Viewport) {
        let position = geometry::rescale_on_viewport_change(self.position, old, new);
        self.apply_dimension(self.dimension, new);
        self.apply_position(position, new);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Geometry calculations for the overlay.
//!
//! This module provides the pure functions used to keep the overlay inside the
//! visible area of the page. Nothing here holds state; the controller stores
//! the results in [`OverlayGeometry`](crate::state::OverlayGeometry).
//!
//! # Coordinate System
//!
//! Positions are offsets from the configured anchor corner, so `(0, 0)` is the
//! corner itself whichever corner that is. Clamping is therefore symmetric:
//! an offset must be non-negative, and the offset plus the overlay extent must
//! stay below the viewport extent minus a one pixel safety margin.
//!
//! The horizontal axis is bounded by the document client width rather than
//! the window width, which keeps the overlay out of the scrollbar gutter.

use crate::app_settings::VIEWPORT_SAFETY_MARGIN;
use crate::state::{Anchor, Dimension, HorizontalPosition, Position, VerticalPosition, Viewport};

// ============================================================================
// Public API
// ============================================================================

/// Clamps a position so the overlay box lies within the viewport.
///
/// For each axis, a negative coordinate becomes 0, and a coordinate whose
/// box would cross the far edge is pulled back to `extent - size - margin`.
/// The result is never negative, even for empty or negative viewports.
///
/// # Example
///
/// ```rust,ignore
/// let viewport = Viewport::new(800.0, 600.0);
/// let clamped = clamp_position(Position::new(-20.0, 590.0), Dimension::square(130.0), viewport);
/// assert_eq!(clamped, Position::new(0.0, 469.0));
/// ```
pub fn clamp_position(position: Position, dimension: Dimension, viewport: Viewport) -> Position {
    Position {
        x: clamp_axis(position.x, dimension.width, viewport.horizontal_extent()),
        y: clamp_axis(position.y, dimension.height, viewport.vertical_extent()),
    }
}

/// Clamps a dimension to `[min, max]` per axis, then caps it to the viewport.
///
/// The viewport cap wins over `min`: on a viewport smaller than `min` the
/// overlay shrinks to fit rather than overflow.
pub fn clamp_dimension(dimension: Dimension, min: f32, max: f32, viewport: Viewport) -> Dimension {
    let max_width = (viewport.horizontal_extent() - VIEWPORT_SAFETY_MARGIN).max(0.0);
    let max_height = (viewport.vertical_extent() - VIEWPORT_SAFETY_MARGIN).max(0.0);

    Dimension {
        width: bound(dimension.width, min, max).min(max_width),
        height: bound(dimension.height, min, max).min(max_height),
    }
}

/// Rescales a position proportionally to a viewport size change.
///
/// `x' = x * new_width / old_width`, and likewise for `y`. An axis whose old
/// extent is zero or negative is left unchanged.
pub fn rescale_on_viewport_change(position: Position, old: Viewport, new: Viewport) -> Position {
    Position {
        x: rescale_axis(position.x, old.horizontal_extent(), new.horizontal_extent()),
        y: rescale_axis(position.y, old.vertical_extent(), new.vertical_extent()),
    }
}

/// Moves a position by a raw pointer delta according to the anchor corner.
///
/// Offsets grow away from the anchor edge, so for a right or bottom anchor
/// the pointer delta is subtracted: the overlay edge nearest the cursor
/// follows it whichever corner it is measured from.
pub fn apply_drag(position: Position, anchor: Anchor, delta_x: f32, delta_y: f32) -> Position {
    let x = match anchor.horizontal {
        HorizontalPosition::Left => position.x + delta_x,
        HorizontalPosition::Right => position.x - delta_x,
    };
    let y = match anchor.vertical {
        VerticalPosition::Top => position.y + delta_y,
        VerticalPosition::Bottom => position.y - delta_y,
    };
    Position { x, y }
}

/// Grows (positive step) or shrinks (negative step) both axes.
pub fn resize_by(dimension: Dimension, step: f32) -> Dimension {
    Dimension {
        width: dimension.width + step,
        height: dimension.height + step,
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn clamp_axis(coordinate: f32, size: f32, extent: f32) -> f32 {
    let limit = extent - size - VIEWPORT_SAFETY_MARGIN;
    let coordinate = if coordinate > limit { limit } else { coordinate };
    // NaN collapses to 0 as well
    if coordinate > 0.0 { coordinate } else { 0.0 }
}

fn bound(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

fn rescale_axis(coordinate: f32, old_extent: f32, new_extent: f32) -> f32 {
    if old_extent <= 0.0 {
        return coordinate;
    }
    coordinate * new_extent / old_extent
}

// ============================================================================
// Tests
// ============================================================================

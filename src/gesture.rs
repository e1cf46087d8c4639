// SPDX-License-Identifier: GPL-3.0-only

//! Pointer gestures on the overlay.
//!
//! Three behaviors move or resize the overlay:
//!
//! - **Drag-to-move**: a primary-button press on the overlay starts a drag.
//!   While dragging, document-wide move and release listeners are attached
//!   and each move reports the pointer delta since the previous one. The
//!   primary-button release ends the drag and re-arms the press listener.
//! - **Wheel-to-resize**: a wheel event over the overlay resizes it and arms
//!   wheel mode, in which wheel events anywhere on the document keep
//!   resizing. Any mouse movement disarms wheel mode until the next wheel
//!   over the overlay, so page scrolling after the pointer moved away never
//!   resizes by accident.
//! - **Zoom controls**: presses on the zoom-in/zoom-out buttons resize by a
//!   fixed step and stop propagation, so they never start a drag.
//!
//! Dragging takes precedence over wheel resizing: starting a drag disarms
//! wheel mode, and wheel events are ignored until the drag ends.
//!
//! The [`GestureController`] only tracks gesture state and translates events
//! into [`GestureAction`]s. Applying them (anchor sign convention, clamping)
//! is the job of the overlay controller, which owns the geometry.

use crate::app_settings::{PRIMARY_BUTTON, WHEEL_STEP, ZOOM_STEP};
use crate::document::Cursor;

// ============================================================================
// Event Types
// ============================================================================

/// Where a pointer event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The overlay body (graphic, padding or error text).
    Overlay,
    /// The zoom-in button inside the overlay.
    ZoomIn,
    /// The zoom-out button inside the overlay.
    ZoomOut,
    /// Anywhere else on the page.
    Document,
}

impl PointerTarget {
    /// Returns `true` for targets inside the overlay element.
    pub fn is_overlay(&self) -> bool {
        !matches!(self, PointerTarget::Document)
    }
}

/// Pointer input routed to the overlay controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A mouse button went down at page coordinates `(x, y)`.
    Down {
        target: PointerTarget,
        button: u16,
        x: f32,
        y: f32,
    },
    /// The pointer moved to page coordinates `(x, y)`.
    Move { target: PointerTarget, x: f32, y: f32 },
    /// A mouse button was released.
    Up { target: PointerTarget, button: u16 },
    /// The wheel turned; negative `delta_y` is wheel up.
    Wheel { target: PointerTarget, delta_y: f32 },
}

/// What the overlay controller should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Move the overlay by a raw pointer delta.
    Move { delta_x: f32, delta_y: f32 },
    /// Grow (positive) or shrink (negative) both axes.
    Resize { step: f32 },
}

/// Result of handling one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureResponse {
    pub action: Option<GestureAction>,
    /// New cursor for the overlay, when it changes.
    pub cursor: Option<Cursor>,
    /// The host must prevent the default behavior (page scrolling).
    pub prevent_default: bool,
    /// The host must stop the event from reaching the overlay body.
    pub stop_propagation: bool,
}

impl GestureResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn action(action: GestureAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }
}

/// Listener sets the host must have attached for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listeners {
    /// Press-to-start-drag listener on the overlay.
    pub overlay_press: bool,
    /// Document-wide move and release listeners used while dragging.
    pub document_drag: bool,
    /// Document-wide wheel and mouse-move listeners used while wheel mode is
    /// armed.
    pub document_wheel: bool,
}

// ============================================================================
// Gesture State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging { last_x: f32, last_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum WheelState {
    #[default]
    Idle,
    Armed,
}

/// Drag and wheel gesture state machines.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    drag: DragState,
    wheel: WheelState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Returns `true` while wheel mode is armed.
    pub fn is_wheel_armed(&self) -> bool {
        self.wheel == WheelState::Armed
    }

    /// Returns the listener sets the current state needs.
    pub fn listeners(&self) -> Listeners {
        Listeners {
            overlay_press: !self.is_dragging(),
            document_drag: self.is_dragging(),
            document_wheel: self.is_wheel_armed(),
        }
    }

    /// Drops any gesture in progress, e.g. when the overlay is hidden.
    pub fn reset(&mut self) -> Option<Cursor> {
        self.wheel = WheelState::Idle;
        if self.is_dragging() {
            self.drag = DragState::Idle;
            return Some(Cursor::Default);
        }
        None
    }

    /// Handles one pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> GestureResponse {
        match event {
            PointerEvent::Down {
                target,
                button,
                x,
                y,
            } => self.on_down(target, button, x, y),
            PointerEvent::Move { x, y, .. } => self.on_move(x, y),
            PointerEvent::Up { button, .. } => self.on_up(button),
            PointerEvent::Wheel { target, delta_y } => self.on_wheel(target, delta_y),
        }
    }

    fn on_down(&mut self, target: PointerTarget, button: u16, x: f32, y: f32) -> GestureResponse {
        match target {
            PointerTarget::ZoomIn | PointerTarget::ZoomOut => {
                let mut response = if button == PRIMARY_BUTTON && !self.is_dragging() {
                    let step = if target == PointerTarget::ZoomIn {
                        ZOOM_STEP
                    } else {
                        -ZOOM_STEP
                    };
                    GestureResponse::action(GestureAction::Resize { step })
                } else {
                    GestureResponse::ignored()
                };
                response.stop_propagation = true;
                response
            }
            PointerTarget::Overlay if button == PRIMARY_BUTTON && !self.is_dragging() => {
                tracing::debug!("Drag started at ({}, {})", x, y);
                self.drag = DragState::Dragging {
                    last_x: x,
                    last_y: y,
                };
                self.wheel = WheelState::Idle;
                GestureResponse {
                    cursor: Some(Cursor::Move),
                    ..GestureResponse::default()
                }
            }
            _ => GestureResponse::ignored(),
        }
    }

    fn on_move(&mut self, x: f32, y: f32) -> GestureResponse {
        match self.drag {
            DragState::Dragging { last_x, last_y } => {
                self.drag = DragState::Dragging {
                    last_x: x,
                    last_y: y,
                };
                GestureResponse::action(GestureAction::Move {
                    delta_x: x - last_x,
                    delta_y: y - last_y,
                })
            }
            DragState::Idle => {
                if self.is_wheel_armed() {
                    tracing::debug!("Pointer moved, wheel resize disarmed");
                    self.wheel = WheelState::Idle;
                }
                GestureResponse::ignored()
            }
        }
    }

    fn on_up(&mut self, button: u16) -> GestureResponse {
        if button != PRIMARY_BUTTON || !self.is_dragging() {
            return GestureResponse::ignored();
        }
        tracing::debug!("Drag ended");
        self.drag = DragState::Idle;
        GestureResponse {
            cursor: Some(Cursor::Default),
            ..GestureResponse::default()
        }
    }

    fn on_wheel(&mut self, target: PointerTarget, delta_y: f32) -> GestureResponse {
        if self.is_dragging() {
            return GestureResponse::ignored();
        }
        if target.is_overlay() {
            self.wheel = WheelState::Armed;
        } else if !self.is_wheel_armed() {
            return GestureResponse::ignored();
        }

        let mut response = if delta_y < 0.0 {
            GestureResponse::action(GestureAction::Resize { step: WHEEL_STEP })
        } else if delta_y > 0.0 {
            GestureResponse::action(GestureAction::Resize { step: -WHEEL_STEP })
        } else {
            GestureResponse::ignored()
        };
        response.prevent_default = true;
        response
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Print lifecycle controller.
//!
//! [`OverlayController`] is constructed once per page and owns everything the
//! overlay needs: the host document, the resolved configuration, the overlay
//! geometry, the code renderer, the gesture state and the timers. The host
//! routes page events to it, either through the dedicated methods or through
//! [`OverlayController::dispatch`].
//!
//! # Lifecycle
//!
//! ```text
//!            print-intent / toggle
//!   Hidden ──────────────────────▶ Rendering ──ok──▶ Shown       (auto-display or toggle)
//!     ▲                                │       └────▶ Rendered    (auto-display off)
//!     │                                └──err──┬───▶ ErrorShown  (auto-display or toggle)
//!     │                                        └───▶ Failed      (auto-display off)
//!     │   print-complete / toggle / auto-hide
//!     └──────────────────────────────────── Shown | Rendered | ErrorShown | Failed
//! ```
//!
//! A print-intent received while content already exists for the current print
//! session (`Rendered` or `Shown`) takes the lightweight path: the overlay is
//! displayed if auto-display is on, without generating the code again, so
//! repeated print preview refreshes stay cheap. Print-complete returns to
//! `Hidden`, and the next print-intent generates fresh content.
//!
//! Whenever the overlay size changes while content exists (wheel, zoom
//! controls, viewport settle), the code is generated again for the new
//! content area, keeping the current visibility.
//!
//! # Ownership
//!
//! Gestures and viewport resizes write the geometry, the renderer writes the
//! children, and the lifecycle writes the display property. Hiding never
//! resets position or size.

use std::fmt;
use std::time::{Duration, Instant};

use crate::app_settings::{OVERLAY_PADDING, RESIZE_SETTLE_MS};
use crate::config::{OverlayConfig, Settings};
use crate::document::{Display, ElementHandle, HostDocument};
use crate::geometry;
use crate::gesture::{GestureAction, GestureController, GestureResponse, PointerEvent};
use crate::notify::Notifier;
use crate::overlay;
use crate::renderer::{CodeParams, CodeRenderer, QrCodeGenerator};
use crate::state::{Dimension, OverlayGeometry, Viewport};
use crate::timer::ResizeSettle;

// ============================================================================
// Types
// ============================================================================

/// Lifecycle state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Not displayed; the next entry generates fresh content.
    #[default]
    Hidden,
    /// Code generation in progress.
    Rendering,
    /// Content generated for this print session but not displayed because
    /// auto-display is off.
    Rendered,
    /// Displaying the code.
    Shown,
    /// Displaying the error message until the auto-hide fires.
    ErrorShown,
    /// Generation failed for this print session while auto-display is off.
    /// The error message is held but not displayed and no auto-hide is armed.
    Failed,
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Hidden => "Hidden",
            LifecycleState::Rendering => "Rendering",
            LifecycleState::Rendered => "Rendered",
            LifecycleState::Shown => "Shown",
            LifecycleState::ErrorShown => "ErrorShown",
            LifecycleState::Failed => "Failed",
        }
    }

    /// Returns `true` if content exists for the current session.
    fn has_content(&self) -> bool {
        matches!(
            self,
            LifecycleState::Rendered
                | LifecycleState::Shown
                | LifecycleState::ErrorShown
                | LifecycleState::Failed
        )
    }
}

/// Print signals from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintEvent {
    /// The pre-print hook fired.
    BeforePrint,
    /// The post-print hook fired.
    AfterPrint,
    /// The `print` media query changed.
    MediaChanged { matches: bool },
}

/// Events the host routes to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    Print(PrintEvent),
    /// The toolbar action was clicked.
    Toggle,
    Pointer(PointerEvent),
    /// The window was resized; the new size is read from the document.
    ViewportResized,
    /// The page address changed without a reload (fragment change).
    Navigated,
    /// Timer poll from the host event loop.
    Tick,
}

/// Result of a manual toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The overlay now displays the code.
    Shown,
    /// The overlay was hidden.
    Hidden,
    /// The overlay now displays the error message.
    Error,
    /// The document cannot hold the overlay yet; nothing changed.
    Unavailable,
}

/// Toggle failures that must be reported to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleError {
    /// The page forbids script execution in the overlay's context.
    ScriptInjectionDenied,
}

impl fmt::Display for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleError::ScriptInjectionDenied => {
                write!(f, "script injection denied by the page")
            }
        }
    }
}

impl std::error::Error for ToggleError {}

// ============================================================================
// Overlay Controller
// ============================================================================

/// Owns the overlay of one page.
#[derive(Debug)]
pub struct OverlayController<D: HostDocument> {
    document: D,
    config: OverlayConfig,
    element: Option<ElementHandle>,
    geometry: OverlayGeometry,
    /// Viewport the geometry was last laid out against.
    viewport: Viewport,
    state: LifecycleState,
    renderer: CodeRenderer,
    gestures: GestureController,
    resize_settle: ResizeSettle,
}

impl<D: HostDocument> OverlayController<D> {
    /// Creates a controller for `document` with an already resolved config.
    pub fn new(document: D, config: OverlayConfig, renderer: CodeRenderer) -> Self {
        let viewport = document.viewport();
        let geometry = OverlayGeometry::initial(config.size as f32, viewport);
        Self {
            document,
            config,
            element: None,
            geometry,
            viewport,
            state: LifecycleState::Hidden,
            renderer,
            gestures: GestureController::new(),
            resize_settle: ResizeSettle::new(Duration::from_millis(RESIZE_SETTLE_MS)),
        }
    }

    /// Resolves `settings` against the page and creates a controller using
    /// the QR code generator.
    pub fn from_settings(document: D, settings: &Settings, notifier: Box<dyn Notifier>) -> Self {
        let theme_color = document.theme_color();
        let config = OverlayConfig::resolve(settings, theme_color.as_deref());
        tracing::debug!("Resolved overlay config: {:?}", config);
        let renderer = CodeRenderer::new(Box::new(QrCodeGenerator::new()), notifier);
        Self::new(document, config, renderer)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn geometry(&self) -> &OverlayGeometry {
        &self.geometry
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// The overlay element, once created.
    pub fn element(&self) -> Option<ElementHandle> {
        self.element
    }

    /// Returns `true` if the overlay is displayed, read from the document.
    pub fn is_visible(&self) -> bool {
        self.element
            .is_some_and(|element| self.document.display(element) == Display::Block)
    }

    /// Returns `true` while the error auto-hide is scheduled.
    pub fn auto_hide_pending(&self) -> bool {
        self.renderer.auto_hide_pending()
    }

    /// Earliest pending timer, so the host knows when to call [`Self::poll`].
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.renderer.auto_hide_at(), self.resize_settle.fires_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ========================================================================
    // Event Dispatch
    // ========================================================================

    /// Routes a page event to its handler.
    ///
    /// Only a toggle can fail; every other event is absorbed.
    pub fn dispatch(&mut self, event: PageEvent, now: Instant) -> Result<(), ToggleError> {
        match event {
            PageEvent::Print(print) => self.on_print(print, now),
            PageEvent::Toggle => {
                self.toggle(now)?;
            }
            PageEvent::Pointer(pointer) => {
                self.handle_pointer(pointer, now);
            }
            PageEvent::ViewportResized => self.on_viewport_resize(now),
            PageEvent::Navigated => self.on_navigation(now),
            PageEvent::Tick => self.poll(now),
        }
        Ok(())
    }

    /// Handles a print signal.
    pub fn on_print(&mut self, event: PrintEvent, now: Instant) {
        match event {
            PrintEvent::BeforePrint | PrintEvent::MediaChanged { matches: true } => {
                self.print_intent(now)
            }
            PrintEvent::AfterPrint | PrintEvent::MediaChanged { matches: false } => {
                self.print_complete()
            }
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Entry before printing.
    pub fn print_intent(&mut self, now: Instant) {
        self.enter(now, false);
    }

    /// Exit after printing. The next print-intent regenerates the content.
    pub fn print_complete(&mut self) {
        self.hide();
    }

    /// Manual toggle from the toolbar action.
    pub fn toggle(&mut self, now: Instant) -> Result<ToggleOutcome, ToggleError> {
        if !self.document.is_scriptable() {
            tracing::warn!("Toggle refused: page forbids scripting");
            return Err(ToggleError::ScriptInjectionDenied);
        }

        if self.is_visible() {
            self.hide();
            return Ok(ToggleOutcome::Hidden);
        }

        self.enter(now, true);
        Ok(match self.state {
            LifecycleState::Shown => ToggleOutcome::Shown,
            LifecycleState::ErrorShown => ToggleOutcome::Error,
            _ => ToggleOutcome::Unavailable,
        })
    }

    /// Re-renders after a same-page navigation, keeping geometry and
    /// visibility.
    pub fn on_navigation(&mut self, now: Instant) {
        if !self.state.has_content() {
            return;
        }
        let Some(element) = self.element else {
            return;
        };

        tracing::debug!("Page address changed, regenerating code");
        self.renderer.clear(&mut self.document, element);
        let rendered = self.render(element, now);
        self.settle(rendered);
    }

    /// Fires due timers: the error auto-hide and the resize settle.
    pub fn poll(&mut self, now: Instant) {
        if self.renderer.auto_hide_due(now) {
            tracing::debug!("Error auto-hide fired");
            self.hide();
        }

        if let Some(change) = self.resize_settle.take_due(now) {
            tracing::debug!(
                "Viewport settled from {}x{} to {}x{}",
                change.from.width,
                change.from.height,
                change.to.width,
                change.to.height
            );
            let before = self.geometry.dimension();
            self.geometry.rescale(change.from, change.to);
            self.viewport = change.to;
            self.write_geometry();
            self.rerender_if_resized(before, now);
        }
    }

    /// Records a viewport resize, reading the new size from the document.
    /// The layout is updated once the burst settles.
    pub fn on_viewport_resize(&mut self, now: Instant) {
        let viewport = self.document.viewport();
        self.resize_settle.record(self.viewport, viewport, now);
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// Handles pointer input. Gestures are only active while the overlay
    /// exists.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> GestureResponse {
        let Some(element) = self.element else {
            return GestureResponse::default();
        };

        let response = self.gestures.handle(event);

        if let Some(cursor) = response.cursor {
            self.document.set_cursor(element, cursor);
        }

        match response.action {
            Some(GestureAction::Move { delta_x, delta_y }) => {
                let position = geometry::apply_drag(
                    self.geometry.position(),
                    self.config.anchor,
                    delta_x,
                    delta_y,
                );
                self.geometry.apply_position(position, self.viewport);
                self.write_geometry();
            }
            Some(GestureAction::Resize { step }) => {
                let before = self.geometry.dimension();
                let dimension = geometry::resize_by(before, step);
                self.geometry.apply_dimension(dimension, self.viewport);
                tracing::debug!(
                    "Overlay resized to {}x{}",
                    self.geometry.dimension().width,
                    self.geometry.dimension().height
                );
                self.write_geometry();
                self.rerender_if_resized(before, now);
            }
            None => {}
        }

        response
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Entry path shared by print-intent and toggle, chosen by state.
    fn enter(&mut self, now: Instant, force_visible: bool) {
        let show = force_visible || self.config.auto_display;

        match self.state {
            LifecycleState::Rendered | LifecycleState::Shown => {
                if show {
                    self.show();
                }
            }
            LifecycleState::Failed if !show => {}
            LifecycleState::Hidden
            | LifecycleState::ErrorShown
            | LifecycleState::Failed
            | LifecycleState::Rendering => {
                let Some(element) = self.ensure_element() else {
                    return;
                };

                self.state = LifecycleState::Rendering;
                let rendered = self.render(element, now);
                if show {
                    self.document.set_display(element, Display::Block);
                }
                self.settle(rendered);
                tracing::info!("Overlay {}", self.state.as_str());
            }
        }
    }

    /// Sets the state after a render from its outcome and the current
    /// visibility. A failure that is not displayed keeps no auto-hide.
    fn settle(&mut self, rendered: bool) {
        self.state = match (rendered, self.is_visible()) {
            (true, true) => LifecycleState::Shown,
            (true, false) => LifecycleState::Rendered,
            (false, true) => LifecycleState::ErrorShown,
            (false, false) => {
                self.renderer.cancel_auto_hide();
                LifecycleState::Failed
            }
        };
    }

    /// Generates the code again for the new content area after a resize.
    fn rerender_if_resized(&mut self, before: Dimension, now: Instant) {
        if self.geometry.dimension() == before || !self.state.has_content() {
            return;
        }
        if let Some(element) = self.element {
            let rendered = self.render(element, now);
            self.settle(rendered);
        }
    }

    fn render(&mut self, element: ElementHandle, now: Instant) -> bool {
        let text = self.document.location();
        let content = self.geometry.dimension().content(OVERLAY_PADDING);
        let params = CodeParams::new(
            content.width.min(content.height).max(0.0) as u32,
            self.config.color.clone(),
        );
        self.renderer
            .render(&mut self.document, element, &text, &params, now)
            .is_ok()
    }

    fn show(&mut self) {
        if let Some(element) = self.element {
            if self.document.display(element) != Display::Block {
                self.document.set_display(element, Display::Block);
            }
            self.state = LifecycleState::Shown;
        }
    }

    fn hide(&mut self) {
        self.renderer.cancel_auto_hide();
        if let Some(cursor) = self.gestures.reset() {
            if let Some(element) = self.element {
                self.document.set_cursor(element, cursor);
            }
        }
        if let Some(element) = self.element {
            self.document.set_display(element, Display::None);
        }
        if self.state != LifecycleState::Hidden {
            tracing::info!("Overlay Hidden");
        }
        self.state = LifecycleState::Hidden;
    }

    fn ensure_element(&mut self) -> Option<ElementHandle> {
        let element = overlay::get_or_create(&mut self.document, &self.config, &self.geometry);
        self.element = element;
        element
    }

    fn write_geometry(&mut self) {
        if let Some(element) = self.element {
            overlay::apply_geometry(&mut self.document, element, &self.config, &self.geometry);
        }
    }
}

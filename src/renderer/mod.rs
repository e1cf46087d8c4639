// SPDX-License-Identifier: GPL-3.0-only

//! Code rendering for the overlay.
//!
//! This module wraps the code generation service behind the [`CodeGenerator`]
//! trait and turns its result into overlay content.
//!
//! # Architecture
//!
//! - **qr**: [`QrCodeGenerator`], the `qrcode`-backed generator producing SVG.
//! - [`CodeRenderer`]: the adapter used by the controller. On success it
//!   fills the overlay with the graphic and the zoom controls. On failure it
//!   leaves a single localized text node, tags the element with the error
//!   class, schedules the auto-hide deadline and notifies the coordinator.
//!
//! Failures are recoverable: the page keeps working and only the overlay
//! degrades to its error state.
//!
//! # Usage
//!
//! ```rust,ignore
//! use printqr::renderer::{CodeParams, CodeRenderer, QrCodeGenerator};
//! use printqr::notify::LogNotifier;
//!
//! let mut renderer = CodeRenderer::new(Box::new(QrCodeGenerator::new()), Box::new(LogNotifier));
//! let params = CodeParams::new(120, "#000000");
//! if renderer.render(&mut document, element, "https://example.com/", &params, now).is_err() {
//!     // The overlay now shows the error message and hides itself later
//! }
//! ```

pub mod qr;

pub use qr::QrCodeGenerator;

use std::fmt;
use std::time::{Duration, Instant};

use crate::app_settings::{ERROR_AUTO_HIDE_MS, ERROR_CLASS};
use crate::document::{Content, ElementHandle, HostDocument};
use crate::fl;
use crate::notify::{Notification, Notifier};
use crate::timer::Deadline;

// ============================================================================
// Types
// ============================================================================

/// Parameters for one code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeParams {
    /// Side of the graphic in pixels.
    pub size: u32,
    /// Dark module color.
    pub color: String,
}

impl CodeParams {
    pub fn new(size: u32, color: impl Into<String>) -> Self {
        Self {
            size,
            color: color.into(),
        }
    }
}

/// A generated code, ready to be inserted into the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGraphic {
    /// SVG markup of the code.
    pub svg: String,
    /// Modules per side, quiet zone included.
    pub modules: u32,
    /// Side of the rendered graphic in pixels. A whole number of pixels per
    /// module, so it may be smaller than the requested size.
    pub size: u32,
}

/// Errors raised by code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The text cannot be encoded at the requested size.
    TextTooLarge {
        /// Length of the text in bytes.
        length: usize,
    },
    /// The generator failed for another reason.
    Generation(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TextTooLarge { length } => {
                write!(f, "text of {} bytes is too large to encode", length)
            }
            RenderError::Generation(msg) => write!(f, "code generation failed: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// The code generation service.
pub trait CodeGenerator {
    /// Encodes `text` into a graphic of `params.size` pixels.
    fn generate(&self, text: &str, params: &CodeParams) -> Result<CodeGraphic, RenderError>;
}

// ============================================================================
// Code Renderer
// ============================================================================

/// Adapter between the controller and the code generator.
///
/// Owns the children of the overlay element and the auto-hide deadline that
/// follows a failed render.
pub struct CodeRenderer {
    generator: Box<dyn CodeGenerator>,
    notifier: Box<dyn Notifier>,
    auto_hide: Deadline,
}

impl fmt::Debug for CodeRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeRenderer")
            .field("auto_hide", &self.auto_hide)
            .finish_non_exhaustive()
    }
}

impl CodeRenderer {
    pub fn new(generator: Box<dyn CodeGenerator>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            generator,
            notifier,
            auto_hide: Deadline::new(),
        }
    }

    /// Renders `text` into `element`.
    ///
    /// Any pending auto-hide is cancelled first, so a stale hide from an
    /// earlier failure cannot clobber this render.
    ///
    /// On failure the element is left with exactly one text node holding the
    /// localized error message and carries [`ERROR_CLASS`]; the auto-hide
    /// deadline is scheduled [`ERROR_AUTO_HIDE_MS`] after `now` and an error
    /// notification is emitted.
    pub fn render<D: HostDocument + ?Sized>(
        &mut self,
        document: &mut D,
        element: ElementHandle,
        text: &str,
        params: &CodeParams,
        now: Instant,
    ) -> Result<(), RenderError> {
        self.auto_hide.cancel();

        match self.generator.generate(text, params) {
            Ok(graphic) => {
                tracing::debug!(
                    "Rendered {} bytes as {}x{} modules at {}px",
                    text.len(),
                    graphic.modules,
                    graphic.modules,
                    graphic.size
                );
                document.replace_children(
                    element,
                    vec![
                        Content::Graphic(graphic),
                        Content::ZoomControls {
                            zoom_in_label: fl!("zoom-in"),
                            zoom_out_label: fl!("zoom-out"),
                        },
                    ],
                );
                document.set_class(element, ERROR_CLASS, false);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to render page address: {}", e);
                let message = fl!("too-long-url");
                document.replace_children(element, vec![Content::Text(message.clone())]);
                document.set_class(element, ERROR_CLASS, true);
                self.auto_hide
                    .schedule(now, Duration::from_millis(ERROR_AUTO_HIDE_MS));
                self.notifier.notify(Notification::error(message));
                Err(e)
            }
        }
    }

    /// Clears the rendered content.
    pub fn clear<D: HostDocument + ?Sized>(&mut self, document: &mut D, element: ElementHandle) {
        self.auto_hide.cancel();
        document.replace_children(element, Vec::new());
        document.set_class(element, ERROR_CLASS, false);
    }

    /// Cancels the pending auto-hide. Returns `true` if one was pending.
    pub fn cancel_auto_hide(&mut self) -> bool {
        self.auto_hide.cancel()
    }

    /// Returns `true` while an auto-hide is scheduled.
    pub fn auto_hide_pending(&self) -> bool {
        self.auto_hide.is_pending()
    }

    /// When the pending auto-hide fires.
    pub fn auto_hide_at(&self) -> Option<Instant> {
        self.auto_hide.fires_at()
    }

    /// Returns `true` once, when the auto-hide deadline has passed.
    pub fn auto_hide_due(&mut self, now: Instant) -> bool {
        self.auto_hide.fire_if_due(now)
    }
}

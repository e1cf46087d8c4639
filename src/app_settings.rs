// SPDX-License-Identifier: GPL-3.0-only

//! Centralized overlay settings and constants.

/// Fixed identifier of the overlay element in the host document.
pub const OVERLAY_ID: &str = "extension-qrcodes-qrcode";

/// Style class applied to the overlay while it displays an error message.
pub const ERROR_CLASS: &str = "extension-qrcodes-error";

/// Padding on each side of the code graphic, in pixels.
pub const OVERLAY_PADDING: f32 = 5.0;

/// Minimum overlay width/height (padding included) in pixels.
pub const MIN_DIMENSION: f32 = 100.0;

/// Maximum overlay width/height (padding included) in pixels.
pub const MAX_DIMENSION: f32 = 400.0;

/// Margin kept between the overlay and the viewport edge so the page never
/// grows a scrollbar because of the overlay.
pub const VIEWPORT_SAFETY_MARGIN: f32 = 1.0;

/// Size change applied per wheel notch, in pixels.
pub const WHEEL_STEP: f32 = 10.0;

/// Size change applied per zoom button press, in pixels.
pub const ZOOM_STEP: f32 = 15.0;

/// Delay before an overlay showing an error message hides itself.
pub const ERROR_AUTO_HIDE_MS: u64 = 5000;

/// Settle time for viewport resize bursts.
pub const RESIZE_SETTLE_MS: u64 = 170;

/// Sizes below this value trigger a readability warning in the settings.
pub const MIN_RECOMMENDED_SIZE: u32 = 80;

/// Mean RGB intensity above which a color is considered too light to scan.
pub const MAX_COLOR_LIGHTNESS: f32 = 0.75;

/// Dark module color used when neither the settings nor the page provide one.
pub const FALLBACK_COLOR: &str = "#000000";

/// Light module color of the generated code.
pub const LIGHT_COLOR: &str = "#ffffff";

/// Primary (left) mouse button code.
pub const PRIMARY_BUTTON: u16 = 0;

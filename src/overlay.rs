// SPDX-License-Identifier: GPL-3.0-only

//! Presence of the overlay element in the host document.
//!
//! The overlay is a single element identified by [`OVERLAY_ID`]. Every
//! access looks it up by that identifier before creating anything, so at
//! most one overlay ever exists in the document, even across independent
//! handler invocations.

use crate::app_settings::{OVERLAY_ID, OVERLAY_PADDING};
use crate::config::OverlayConfig;
use crate::document::{DocumentError, ElementHandle, HostDocument};
use crate::state::OverlayGeometry;

/// Returns the overlay element if it exists.
pub fn find<D: HostDocument + ?Sized>(document: &D) -> Option<ElementHandle> {
    document.find_element(OVERLAY_ID)
}

/// Returns the existing overlay, or creates and attaches a new one.
///
/// A new overlay is placed at `geometry` from the configured anchor corner
/// and sized with padding included. It starts hidden.
///
/// Returns `None` when the document cannot hold the overlay yet (no body) or
/// at all (scripting denied). Callers treat `None` as "unavailable" and
/// retry on the next triggering event.
pub fn get_or_create<D: HostDocument + ?Sized>(
    document: &mut D,
    config: &OverlayConfig,
    geometry: &OverlayGeometry,
) -> Option<ElementHandle> {
    if let Some(element) = find(document) {
        return Some(element);
    }

    match document.create_element(OVERLAY_ID) {
        Ok(element) => {
            apply_geometry(document, element, config, geometry);
            tracing::debug!(
                "Created overlay anchored {}-{}",
                config.anchor.vertical.as_str(),
                config.anchor.horizontal.as_str()
            );
            Some(element)
        }
        Err(DocumentError::NoBody) => {
            tracing::debug!("Document has no body yet, overlay unavailable");
            None
        }
        Err(e) => {
            tracing::warn!("Cannot create overlay: {}", e);
            None
        }
    }
}

/// Writes the overlay offsets and size.
pub fn apply_geometry<D: HostDocument + ?Sized>(
    document: &mut D,
    element: ElementHandle,
    config: &OverlayConfig,
    geometry: &OverlayGeometry,
) {
    document.set_offsets(element, config.anchor, geometry.position());
    document.set_dimension(element, geometry.dimension(), OVERLAY_PADDING);
}

/// Detaches the overlay if present. Idempotent.
///
/// Returns `true` if an overlay was removed.
pub fn remove<D: HostDocument + ?Sized>(document: &mut D) -> bool {
    match find(document) {
        Some(element) => document.remove_element(element),
        None => false,
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! QR code generation with the `qrcode` crate.

use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use super::{CodeGenerator, CodeGraphic, CodeParams, RenderError};
use crate::app_settings::LIGHT_COLOR;

/// Modules of quiet zone on each side of the symbol.
const QUIET_ZONE: usize = 4;

/// Generates SVG QR codes.
///
/// Codes use the highest error correction level so they survive smudged or
/// low resolution prints, which also lowers how much text fits in one code.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeGenerator {
    ec_level: EcLevel,
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self { ec_level: EcLevel::H }
    }
}

impl QrCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different error correction level.
    #[must_use]
    pub fn with_ec_level(mut self, ec_level: EcLevel) -> Self {
        self.ec_level = ec_level;
        self
    }
}

impl CodeGenerator for QrCodeGenerator {
    fn generate(&self, text: &str, params: &CodeParams) -> Result<CodeGraphic, RenderError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)
            .map_err(|e| match e {
                QrError::DataTooLong => RenderError::TextTooLarge { length: text.len() },
                other => RenderError::Generation(other.to_string()),
            })?;

        // Below one pixel per module the code cannot be printed legibly
        let modules = code.width() + 2 * QUIET_ZONE;
        let modules = u32::try_from(modules).unwrap_or(u32::MAX);
        if modules > params.size {
            return Err(RenderError::TextTooLarge { length: text.len() });
        }

        // Largest whole module size that still fits the content area
        let size = modules * (params.size / modules);
        let svg = code
            .render::<svg::Color>()
            .max_dimensions(params.size, params.size)
            .dark_color(svg::Color(&params.color))
            .light_color(svg::Color(LIGHT_COLOR))
            .build();

        Ok(CodeGraphic { svg, modules, size })
    }
}

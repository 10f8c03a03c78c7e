//! Logical canvas to backend coordinate mapping.
//!
//! Every element is authored on the 960×540 logical canvas. Backends multiply
//! position, size, font size, stroke width, letter spacing and corner radius
//! by their scale, so geometry survives every output unchanged in proportion.

use deck_core::{Transform, CANVAS_HEIGHT, CANVAS_WIDTH};

/// PPTX slide width in inches (16:9).
pub const PPTX_PAGE_WIDTH_IN: f64 = 10.0;

/// PPTX slide height in inches (16:9).
pub const PPTX_PAGE_HEIGHT_IN: f64 = 5.625;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Default raster output width in pixels.
pub const RASTER_WIDTH: u32 = 1920;

/// Default raster output height in pixels.
pub const RASTER_HEIGHT: u32 = 1080;

/// A scaled element frame in backend units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Rotation in degrees (not scaled).
    pub rotation: f64,
}

/// Uniform logical-to-backend scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    /// Backend units per logical unit, horizontally.
    pub scale_x: f64,
    /// Backend units per logical unit, vertically.
    pub scale_y: f64,
}

impl CoordinateTransform {
    /// Inches per logical unit on a 10in × 5.625in PPTX page.
    #[must_use]
    pub fn pptx() -> Self {
        Self {
            scale_x: PPTX_PAGE_WIDTH_IN / f64::from(CANVAS_WIDTH),
            scale_y: PPTX_PAGE_HEIGHT_IN / f64::from(CANVAS_HEIGHT),
        }
    }

    /// Pixels per logical unit for a raster target of the given size.
    #[must_use]
    pub fn raster(width: u32, height: u32) -> Self {
        Self {
            scale_x: f64::from(width) / f64::from(CANVAS_WIDTH),
            scale_y: f64::from(height) / f64::from(CANVAS_HEIGHT),
        }
    }

    /// Scale a length (font size, stroke width, radius).
    #[must_use]
    pub fn length(&self, value: f32) -> f64 {
        f64::from(value) * self.scale_x
    }

    /// Scale an element's geometry.
    #[must_use]
    pub fn frame(&self, transform: &Transform) -> Frame {
        Frame {
            x: f64::from(transform.x) * self.scale_x,
            y: f64::from(transform.y) * self.scale_y,
            width: f64::from(transform.width) * self.scale_x,
            height: f64::from(transform.height) * self.scale_y,
            rotation: f64::from(transform.rotation),
        }
    }

    /// Font size in points, for backends measured in inches.
    #[must_use]
    pub fn font_points(&self, px: f32) -> f64 {
        self.length(px) * 72.0
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::raster(RASTER_WIDTH, RASTER_HEIGHT)
    }
}

/// Convert inches to whole EMU.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

//! Editing viewport: zoom percentage and pan offset.
//!
//! The viewport is a pure view transform. Nothing here touches element
//! coordinates, which always stay in logical canvas units.

use serde::{Deserialize, Serialize};

use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Minimum zoom percentage.
pub const MIN_ZOOM: u16 = 25;

/// Maximum zoom percentage.
pub const MAX_ZOOM: u16 = 200;

/// Zoom change per mouse-wheel tick.
pub const WHEEL_STEP: i32 = 2;

/// Zoom change per toolbar button press.
pub const BUTTON_STEP: i32 = 10;

/// Default fraction of the container used by "fit to screen".
pub const DEFAULT_FIT_MARGIN: f64 = 0.9;

/// What is holding the pan gesture open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanModifier {
    /// Space bar held.
    Space,
    /// Middle mouse button held.
    MiddleButton,
}

/// Zoom and pan state of one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: u16,
    /// Horizontal pan offset in screen pixels.
    pub pan_x: f32,
    /// Vertical pan offset in screen pixels.
    pub pan_y: f32,
    panning: Option<PanModifier>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 100,
            pan_x: 0.0,
            pan_y: 0.0,
            panning: None,
        }
    }
}

impl Viewport {
    /// Current zoom percentage, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    #[must_use]
    pub fn zoom(&self) -> u16 {
        self.zoom
    }

    /// Viewport-to-logical scale (`zoom / 100`).
    #[must_use]
    pub fn scale(&self) -> f32 {
        f32::from(self.zoom) / 100.0
    }

    /// Set the zoom percentage, clamped to the allowed range.
    pub fn set_zoom(&mut self, level: i32) {
        let clamped = level.clamp(i32::from(MIN_ZOOM), i32::from(MAX_ZOOM));
        self.zoom = u16::try_from(clamped).unwrap_or(MAX_ZOOM);
    }

    /// Adjust zoom by a signed number of wheel ticks.
    pub fn wheel(&mut self, ticks: i32) {
        self.set_zoom(i32::from(self.zoom) + ticks.saturating_mul(WHEEL_STEP));
    }

    /// Toolbar zoom in.
    pub fn zoom_in(&mut self) {
        self.set_zoom(i32::from(self.zoom) + BUTTON_STEP);
    }

    /// Toolbar zoom out.
    pub fn zoom_out(&mut self) {
        self.set_zoom(i32::from(self.zoom) - BUTTON_STEP);
    }

    /// Zoom so the canvas fits the container, never above 100%.
    ///
    /// Computes `min(cw / 960, ch / 540, 1) * margin`, rounds down to a
    /// whole percentage and floors it at [`MIN_ZOOM`]. Pan is reset.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fit_to_screen(&mut self, container_width: f32, container_height: f32, margin: f64) {
        let ratio = (f64::from(container_width) / f64::from(CANVAS_WIDTH))
            .min(f64::from(container_height) / f64::from(CANVAS_HEIGHT))
            .clamp(0.0, 1.0);
        // Epsilon keeps exact percentages from flooring one step low.
        let percent = (ratio * margin.clamp(0.0, 1.0) * 100.0 + 1e-9).floor() as i32;
        self.set_zoom(percent.max(i32::from(MIN_ZOOM)));
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Start a pan gesture.
    pub fn begin_pan(&mut self, modifier: PanModifier) {
        self.panning = Some(modifier);
    }

    /// Accumulate pan offset. Ignored unless a pan gesture is active.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if self.panning.is_none() {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        true
    }

    /// End the pan gesture.
    pub fn end_pan(&mut self) {
        self.panning = None;
    }

    /// Whether a pan gesture is active.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.panning.is_some()
    }

    /// Convert a point in viewport pixels to logical canvas units.
    #[must_use]
    pub fn screen_to_logical(&self, x: f32, y: f32) -> (f32, f32) {
        let scale = self.scale();
        ((x - self.pan_x) / scale, (y - self.pan_y) / scale)
    }

    /// Convert a point in logical canvas units to viewport pixels.
    #[must_use]
    pub fn logical_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        let scale = self.scale();
        (x * scale + self.pan_x, y * scale + self.pan_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps_inclusive() {
        let mut vp = Viewport::default();
        vp.set_zoom(10);
        assert_eq!(vp.zoom(), 25);
        vp.set_zoom(500);
        assert_eq!(vp.zoom(), 200);
        vp.set_zoom(25);
        assert_eq!(vp.zoom(), 25);
        vp.set_zoom(200);
        assert_eq!(vp.zoom(), 200);
    }

    #[test]
    fn test_wheel_and_buttons() {
        let mut vp = Viewport::default();
        vp.wheel(3);
        assert_eq!(vp.zoom(), 106);
        vp.wheel(-1);
        assert_eq!(vp.zoom(), 104);
        vp.zoom_in();
        assert_eq!(vp.zoom(), 114);
        vp.zoom_out();
        vp.zoom_out();
        assert_eq!(vp.zoom(), 94);
    }

    #[test]
    fn test_fit_to_screen() {
        let mut vp = Viewport::default();
        // 480/960 = 0.5 and 540/540 = 1 -> 0.5 * 0.9 = 45%
        vp.fit_to_screen(480.0, 540.0, DEFAULT_FIT_MARGIN);
        assert_eq!(vp.zoom(), 45);

        // Large containers never zoom past 100% * margin.
        vp.fit_to_screen(4000.0, 4000.0, DEFAULT_FIT_MARGIN);
        assert_eq!(vp.zoom(), 90);

        // Tiny containers floor at the minimum.
        vp.fit_to_screen(50.0, 50.0, DEFAULT_FIT_MARGIN);
        assert_eq!(vp.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_fit_to_screen_custom_margin() {
        let mut vp = Viewport::default();
        vp.fit_to_screen(960.0, 540.0, 0.75);
        assert_eq!(vp.zoom(), 75);

        vp.fit_to_screen(960.0, 540.0, 1.0);
        assert_eq!(vp.zoom(), 100);

        // Margins above 1 still never zoom past 100%.
        vp.fit_to_screen(4000.0, 4000.0, 1.5);
        assert_eq!(vp.zoom(), 100);
    }

    #[test]
    fn test_pan_requires_modifier() {
        let mut vp = Viewport::default();
        assert!(!vp.pan_by(10.0, 10.0));
        assert_eq!((vp.pan_x, vp.pan_y), (0.0, 0.0));

        vp.begin_pan(PanModifier::Space);
        assert!(vp.pan_by(10.0, -4.0));
        assert!(vp.pan_by(5.0, 0.0));
        vp.end_pan();
        assert!(!vp.pan_by(100.0, 100.0));
        assert_eq!((vp.pan_x, vp.pan_y), (15.0, -4.0));
    }

    #[test]
    fn test_screen_logical_roundtrip() {
        let mut vp = Viewport::default();
        vp.set_zoom(50);
        vp.begin_pan(PanModifier::MiddleButton);
        vp.pan_by(20.0, 10.0);
        let (lx, ly) = vp.screen_to_logical(120.0, 60.0);
        assert_eq!((lx, ly), (200.0, 100.0));
        assert_eq!(vp.logical_to_screen(lx, ly), (120.0, 60.0));
    }
}

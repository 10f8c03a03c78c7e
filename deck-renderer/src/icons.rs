//! Built-in icon glyphs.
//!
//! Glyphs are 24×24 stroke paths. Raster backends inline them as vector
//! markup; the PPTX backend rasterizes the same markup to PNG.

use std::fmt::Write;

use deck_core::IconContent;

use crate::color::Rgba;
use crate::error::{RenderError, RenderResult};
use crate::svg::escape_xml;

const GLYPH_BOX: f64 = 24.0;

/// Share of the frame the glyph occupies when drawn over a background.
const BACKGROUND_INSET: f64 = 0.6;

const ICONS: &[(&str, &str)] = &[
    ("alert-triangle", "M10.29 3.86 1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0ZM12 9v4M12 17h.01"),
    ("arrow-down", "M12 5v14M19 12l-7 7-7-7"),
    ("arrow-left", "M19 12H5M12 19l-7-7 7-7"),
    ("arrow-right", "M5 12h14M12 5l7 7-7 7"),
    ("arrow-up", "M12 19V5M5 12l7-7 7 7"),
    ("bar-chart", "M12 20V10M18 20V4M6 20v-4"),
    ("check", "M20 6 9 17l-5-5"),
    ("circle", "M12 2a10 10 0 1 0 0 20a10 10 0 1 0 0-20Z"),
    ("clock", "M12 2a10 10 0 1 0 0 20a10 10 0 1 0 0-20ZM12 6v6l4 2"),
    ("heart", "M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z"),
    ("home", "M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2ZM9 22V12h6v10"),
    ("info", "M12 2a10 10 0 1 0 0 20a10 10 0 1 0 0-20ZM12 16v-4M12 8h.01"),
    ("mail", "M4 4h16a2 2 0 0 1 2 2v12a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2ZM22 6l-10 7L2 6"),
    ("minus", "M5 12h14"),
    ("play", "M6 3l14 9-14 9V3Z"),
    ("plus", "M5 12h14M12 5v14"),
    ("square", "M5 3h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2Z"),
    ("star", "M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2Z"),
    ("user", "M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2M12 3a4 4 0 1 0 0 8a4 4 0 1 0 0-8Z"),
    ("x", "M18 6 6 18M6 6l12 12"),
];

/// Path data of a named glyph.
#[must_use]
pub fn icon_path(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    ICONS.iter().find(|(n, _)| *n == name).map(|(_, d)| *d)
}

/// Names of every built-in glyph.
#[must_use]
pub fn icon_names() -> impl Iterator<Item = &'static str> {
    ICONS.iter().map(|(n, _)| *n)
}

/// Icon markup in local coordinates of a `width`×`height` box.
///
/// `scale` converts logical lengths (background radius) to output units.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] for an unknown icon name.
pub fn icon_markup(icon: &IconContent, width: f64, height: f64, scale: f64) -> RenderResult<String> {
    let path = icon_path(&icon.name)
        .ok_or_else(|| RenderError::Resource(format!("unknown icon '{}'", icon.name)))?;
    let mut out = String::new();

    let mut glyph_box = width.min(height);
    if let Some(bg) = &icon.background {
        let fill = Rgba::parse_or(&bg.color, Rgba::rgb(0xe5, 0xe7, 0xeb));
        let radius = f64::from(bg.radius) * scale;
        let _ = write!(
            out,
            "<rect width=\"{width}\" height=\"{height}\" rx=\"{radius}\" fill=\"{}\" fill-opacity=\"{}\"/>",
            fill.svg(),
            fill.alpha(),
        );
        glyph_box *= BACKGROUND_INSET;
    }

    let stroke = Rgba::parse_or(&icon.color, Rgba::BLACK);
    let factor = glyph_box / GLYPH_BOX;
    let ox = (width - glyph_box) / 2.0;
    let oy = (height - glyph_box) / 2.0;
    let _ = write!(
        out,
        "<g transform=\"translate({ox} {oy}) scale({factor})\"><path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/></g>",
        escape_xml(path),
        stroke.svg(),
        stroke.alpha(),
    );
    Ok(out)
}

/// Standalone SVG document for an icon rendered at `width`×`height` pixels.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] for an unknown icon name.
pub fn icon_document(icon: &IconContent, width: u32, height: u32, scale: f64) -> RenderResult<String> {
    let body = icon_markup(icon, f64::from(width), f64::from(height), scale)?;
    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">{body}</svg>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::IconBackground;

    fn icon(name: &str) -> IconContent {
        IconContent {
            name: name.to_string(),
            color: "#111827".to_string(),
            background: None,
        }
    }

    #[test]
    fn test_registry_sorted_and_unique() {
        let names: Vec<_> = icon_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(icon_path("Check").is_some());
    }

    #[test]
    fn test_unknown_icon_is_resource_error() {
        let err = icon_markup(&icon("no-such-glyph"), 48.0, 48.0, 1.0).expect_err("unknown");
        assert!(matches!(err, RenderError::Resource(_)));
    }

    #[test]
    fn test_background_drawn_first() {
        let mut with_bg = icon("star");
        with_bg.background = Some(IconBackground {
            color: "#fde68a".to_string(),
            radius: 8.0,
        });
        let markup = icon_markup(&with_bg, 96.0, 96.0, 2.0).expect("markup");
        assert!(markup.starts_with("<rect"));
        assert!(markup.contains("rx=\"16\""));
        assert!(markup.contains("<path"));
    }
}

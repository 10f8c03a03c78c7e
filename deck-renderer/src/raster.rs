//! Slide capture to PNG through resvg.

use std::sync::Arc;

use async_trait::async_trait;
use deck_core::Slide;

use crate::assets::AssetCache;
use crate::color::Rgba;
use crate::error::{RenderError, RenderResult};
use crate::report::RenderWarning;
use crate::svg::{slide_svg, SlideSvg};
use crate::transform::{RASTER_HEIGHT, RASTER_WIDTH};

/// One captured slide.
#[derive(Debug, Clone)]
pub struct SlideCapture {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Elements skipped while composing the slide.
    pub warnings: Vec<RenderWarning>,
}

/// Captures one slide at a time as a bitmap.
///
/// Raster exports drive a single renderer strictly sequentially; an error
/// fails only the slide being captured.
#[async_trait]
pub trait SlideRenderer: Send + Sync {
    /// Compose and capture `slide`. Its images are already in `assets`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Frame`] if the capture fails.
    async fn capture(
        &self,
        slide: &Slide,
        slide_index: usize,
        assets: &AssetCache,
    ) -> RenderResult<SlideCapture>;
}

/// Default renderer: compose SVG, rasterize with resvg.
pub struct SvgSlideRenderer {
    width: u32,
    height: u32,
    background: Rgba,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgSlideRenderer {
    /// Renderer producing `width`×`height` captures, with system fonts.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "Loaded system fonts");
        Self::with_fontdb(width, height, background, Arc::new(fontdb))
    }

    /// Renderer sharing an existing font database.
    #[must_use]
    pub fn with_fontdb(
        width: u32,
        height: u32,
        background: Rgba,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            background,
            fontdb,
        }
    }

    /// Output size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for SvgSlideRenderer {
    fn default() -> Self {
        Self::new(RASTER_WIDTH, RASTER_HEIGHT, Rgba::WHITE)
    }
}

#[async_trait]
impl SlideRenderer for SvgSlideRenderer {
    async fn capture(
        &self,
        slide: &Slide,
        slide_index: usize,
        assets: &AssetCache,
    ) -> RenderResult<SlideCapture> {
        let SlideSvg { document, warnings } =
            slide_svg(slide, slide_index, self.width, self.height, assets, self.background);
        let fontdb = Arc::clone(&self.fontdb);

        let png = tokio::task::spawn_blocking(move || {
            let options = usvg::Options {
                fontdb,
                ..usvg::Options::default()
            };
            rasterize_svg(&document, &options, 1.0)?
                .encode_png()
                .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
        })
        .await
        .map_err(|e| RenderError::Frame(format!("capture task failed: {e}")))??;

        Ok(SlideCapture {
            png,
            width: self.width,
            height: self.height,
            warnings,
        })
    }
}

/// Rasterize an SVG string at `scale`× its intrinsic size.
///
/// # Errors
///
/// Returns [`RenderError::Frame`] if the SVG cannot be parsed or the pixmap
/// cannot be allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize_svg(
    svg_string: &str,
    options: &usvg::Options<'_>,
    scale: f32,
) -> RenderResult<tiny_skia::Pixmap> {
    let tree = usvg::Tree::from_str(svg_string, options)
        .map_err(|e| RenderError::Frame(format!("SVG parsing failed: {e}")))?;

    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let px_w = (tree.size().width() * scale).ceil() as u32;
    let px_h = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Frame("Failed to create pixmap".to_string()))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    Ok(pixmap)
}

/// Rasterize a self-contained SVG (no text) at `scale`× its intrinsic size.
///
/// # Errors
///
/// See [`rasterize_svg`].
pub fn rasterize_svg_scaled(svg_string: &str, scale: f32) -> RenderResult<tiny_skia::Pixmap> {
    rasterize_svg(svg_string, &usvg::Options::default(), scale)
}

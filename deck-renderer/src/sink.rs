//! Per-kind element dispatch shared by every backend.
//!
//! A backend implements [`ElementSink`] once; [`render_slide`] walks a slide
//! in paint order, dispatches each element by kind and commits the produced
//! fragment only when the element rendered completely. Element errors are
//! logged, recorded and skipped so that one broken element never costs the
//! rest of the slide.

use deck_core::slide::sort_for_render;
use deck_core::{
    ChartContent, CodeContent, Element, ElementKind, IconContent, ImageContent, MediaContent,
    ShapeContent, Slide, TableContent, TextContent,
};

use crate::assets::{AssetCache, LoadedImage};
use crate::error::RenderResult;
use crate::report::RenderWarning;
use crate::transform::{CoordinateTransform, Frame};

/// Which placeholder a media element becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Video clip.
    Video,
    /// Audio clip.
    Audio,
}

impl MediaKind {
    /// Placeholder label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "[VIDEO]",
            Self::Audio => "[AUDIO]",
        }
    }
}

/// A backend's per-kind element renderer.
///
/// Each method receives the element's scaled frame and returns a fragment;
/// nothing reaches the output until [`ElementSink::commit`].
pub trait ElementSink {
    /// Backend-specific rendered element.
    type Fragment;

    /// Render a text box.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn text(&mut self, el: &Element, text: &TextContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render a shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn shape(&mut self, el: &Element, shape: &ShapeContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render an image whose source has already been resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn image(
        &mut self,
        el: &Element,
        image: &ImageContent,
        loaded: &LoadedImage,
        frame: Frame,
    ) -> RenderResult<Self::Fragment>;

    /// Render a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn table(&mut self, el: &Element, table: &TableContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render a code block.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn code(&mut self, el: &Element, code: &CodeContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render an icon.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown icon names.
    fn icon(&mut self, el: &Element, icon: &IconContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn chart(&mut self, el: &Element, chart: &ChartContent, frame: Frame) -> RenderResult<Self::Fragment>;

    /// Render a video or audio placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be rendered.
    fn media(
        &mut self,
        el: &Element,
        media: &MediaContent,
        kind: MediaKind,
        frame: Frame,
    ) -> RenderResult<Self::Fragment>;

    /// Append a fully rendered element to the output.
    fn commit(&mut self, el: &Element, frame: Frame, fragment: Self::Fragment);
}

/// Render one element through `sink`.
///
/// # Errors
///
/// Returns the element's render error; nothing is committed in that case.
pub fn render_element<S: ElementSink>(
    sink: &mut S,
    el: &Element,
    transform: &CoordinateTransform,
    assets: &AssetCache,
) -> RenderResult<()> {
    let frame = transform.frame(&el.transform);
    let fragment = match &el.kind {
        ElementKind::Text(text) => sink.text(el, text, frame)?,
        ElementKind::Shape(shape) => sink.shape(el, shape, frame)?,
        ElementKind::Image(image) => {
            let loaded = assets.get(&image.src)?;
            sink.image(el, image, &loaded, frame)?
        }
        ElementKind::Table(table) => sink.table(el, table, frame)?,
        ElementKind::Code(code) => sink.code(el, code, frame)?,
        ElementKind::Icon(icon) => sink.icon(el, icon, frame)?,
        ElementKind::Chart(chart) => sink.chart(el, chart, frame)?,
        ElementKind::Video(media) => sink.media(el, media, MediaKind::Video, frame)?,
        ElementKind::Audio(media) => sink.media(el, media, MediaKind::Audio, frame)?,
    };
    sink.commit(el, frame, fragment);
    Ok(())
}

/// Render every visible element of `slide` in paint order.
///
/// Empty slides render their layout fallback. Returns one warning per
/// skipped element.
pub fn render_slide<S: ElementSink>(
    sink: &mut S,
    slide: &Slide,
    transform: &CoordinateTransform,
    assets: &AssetCache,
    slide_index: usize,
) -> Vec<RenderWarning> {
    let elements = slide.resolved_elements();
    let mut warnings = Vec::new();

    for el in sort_for_render(&elements) {
        if !el.visible {
            continue;
        }
        if let Err(e) = render_element(sink, el, transform, assets) {
            tracing::warn!(
                slide_index,
                element_id = %el.id,
                kind = el.kind.tag(),
                error = %e,
                "Skipping element that failed to render"
            );
            warnings.push(RenderWarning {
                slide_index,
                element_id: el.id.to_string(),
                reason: e.to_string(),
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use deck_core::{ImageFit, ShapeType, SlideLayout, Transform};

    /// Records which elements were committed.
    #[derive(Default)]
    struct Recorder {
        committed: Vec<String>,
    }

    impl ElementSink for Recorder {
        type Fragment = String;

        fn text(&mut self, _: &Element, text: &TextContent, _: Frame) -> RenderResult<String> {
            Ok(text.content.clone())
        }
        fn shape(&mut self, _: &Element, _: &ShapeContent, _: Frame) -> RenderResult<String> {
            Ok("shape".into())
        }
        fn image(&mut self, _: &Element, _: &ImageContent, _: &LoadedImage, _: Frame) -> RenderResult<String> {
            Ok("image".into())
        }
        fn table(&mut self, _: &Element, _: &TableContent, _: Frame) -> RenderResult<String> {
            Ok("table".into())
        }
        fn code(&mut self, _: &Element, _: &CodeContent, _: Frame) -> RenderResult<String> {
            Ok("code".into())
        }
        fn icon(&mut self, _: &Element, icon: &IconContent, _: Frame) -> RenderResult<String> {
            Err(RenderError::Resource(format!("unknown icon '{}'", icon.name)))
        }
        fn chart(&mut self, _: &Element, _: &ChartContent, _: Frame) -> RenderResult<String> {
            Ok("chart".into())
        }
        fn media(&mut self, _: &Element, _: &MediaContent, kind: MediaKind, _: Frame) -> RenderResult<String> {
            Ok(kind.label().into())
        }
        fn commit(&mut self, el: &Element, _: Frame, fragment: String) {
            self.committed.push(format!("{}={fragment}", el.id));
        }
    }

    fn at(el: Element, x: f32, y: f32, z: i32) -> Element {
        let mut t = Transform::at(x, y, 50.0, 50.0);
        t.z_index = z;
        el.with_transform(t)
    }

    #[test]
    fn test_paint_order_and_skips() {
        let mut hidden = Element::new(ElementKind::Shape(ShapeContent::filled(
            ShapeType::Ellipse,
            "#000",
        )))
        .with_id("hidden");
        hidden.visible = false;

        let slide = Slide::new(SlideLayout::Blank)
            .with_element(at(
                Element::new(ElementKind::Text(TextContent::plain("top", 12.0))).with_id("top"),
                0.0,
                0.0,
                5,
            ))
            .with_element(at(
                Element::new(ElementKind::Icon(IconContent {
                    name: "nope".into(),
                    color: "#000".into(),
                    background: None,
                }))
                .with_id("icon"),
                10.0,
                10.0,
                1,
            ))
            .with_element(at(
                Element::new(ElementKind::Image(ImageContent {
                    src: "missing.png".into(),
                    alt: String::new(),
                    fit: ImageFit::Contain,
                    border_radius: 0.0,
                }))
                .with_id("img"),
                20.0,
                20.0,
                2,
            ))
            .with_element(at(
                Element::new(ElementKind::Audio(MediaContent {
                    src: "a.mp3".into(),
                    poster: None,
                    autoplay: false,
                    looped: false,
                }))
                .with_id("audio"),
                30.0,
                30.0,
                0,
            ))
            .with_element(hidden);

        let mut sink = Recorder::default();
        let warnings = render_slide(
            &mut sink,
            &slide,
            &CoordinateTransform::default(),
            &AssetCache::empty(),
            4,
        );

        assert_eq!(sink.committed, vec!["audio=[AUDIO]", "top=top"]);
        let skipped: Vec<_> = warnings.iter().map(|w| w.element_id.as_str()).collect();
        assert_eq!(skipped, vec!["icon", "img"]);
        assert!(warnings.iter().all(|w| w.slide_index == 4));
    }
}

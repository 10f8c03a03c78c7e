//! SVG composition of one slide.
//!
//! Each element becomes a nested `<svg>` viewport at its scaled frame, so
//! every kind draws in local coordinates and the frame itself is directly
//! visible in the markup. The document is rasterized by [`crate::raster`].

use std::fmt::Write;

use deck_core::{
    ChartContent, CodeContent, CodeTheme, Element, IconContent, ImageContent, ImageFit,
    MediaContent, ShapeContent, ShapeType, Slide, TableContent, TextAlign, TextContent,
};

use crate::assets::{AssetCache, LoadedImage};
use crate::chart::chart_markup;
use crate::color::Rgba;
use crate::error::RenderResult;
use crate::icons::icon_markup;
use crate::report::RenderWarning;
use crate::sink::{render_slide, ElementSink, MediaKind};
use crate::transform::{CoordinateTransform, Frame};

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Paint attributes for a parsed color.
fn paint(attr: &str, color: Rgba) -> String {
    if color.a == 255 {
        format!("{attr}=\"{}\"", color.svg())
    } else {
        format!("{attr}=\"{}\" {attr}-opacity=\"{}\"", color.svg(), color.alpha())
    }
}

/// Baseline of the first line for a font size.
fn first_baseline(font_size: f64) -> f64 {
    font_size * 0.9
}

fn anchor(align: TextAlign, width: f64, inset: f64) -> (f64, &'static str) {
    match align {
        TextAlign::Left | TextAlign::Justify => (inset, "start"),
        TextAlign::Center => (width / 2.0, "middle"),
        TextAlign::Right => (width - inset, "end"),
    }
}

/// Composes slide elements into SVG markup.
pub struct SvgSink {
    transform: CoordinateTransform,
    body: String,
    defs: usize,
}

impl SvgSink {
    /// Sink scaling by `transform`.
    #[must_use]
    pub fn new(transform: CoordinateTransform) -> Self {
        Self {
            transform,
            body: String::new(),
            defs: 0,
        }
    }

    fn next_def(&mut self, prefix: &str) -> String {
        self.defs += 1;
        format!("{prefix}-{}", self.defs)
    }

    fn len(&self, value: f32) -> f64 {
        self.transform.length(value)
    }

    /// Composed element markup.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    fn filter_def(&mut self, el: &Element) -> Option<(String, String)> {
        if el.shadow.is_none() && el.filter.is_none() {
            return None;
        }
        let id = self.next_def("fx");
        let mut def = format!(
            "<filter id=\"{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\" color-interpolation-filters=\"sRGB\">"
        );

        if let Some(filter) = &el.filter {
            if filter.blur > 0.0 {
                let _ = write!(def, "<feGaussianBlur stdDeviation=\"{}\"/>", self.len(filter.blur));
            }
            if filter.grayscale > 0.0 {
                let saturate = 1.0 - f64::from(filter.grayscale.clamp(0.0, 1.0));
                let _ = write!(def, "<feColorMatrix type=\"saturate\" values=\"{saturate}\"/>");
            }
            if filter.brightness > 0.0 && (filter.brightness - 1.0).abs() > f32::EPSILON {
                let slope = filter.brightness;
                let _ = write!(
                    def,
                    "<feComponentTransfer><feFuncR type=\"linear\" slope=\"{slope}\"/><feFuncG type=\"linear\" slope=\"{slope}\"/><feFuncB type=\"linear\" slope=\"{slope}\"/></feComponentTransfer>"
                );
            }
        }

        if let Some(shadow) = &el.shadow {
            let color = Rgba::parse_or(&shadow.color, Rgba { a: 64, ..Rgba::BLACK });
            let _ = write!(
                def,
                "<feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\" flood-color=\"{}\" flood-opacity=\"{}\"/>",
                self.len(shadow.offset_x),
                self.len(shadow.offset_y),
                self.len(shadow.blur) / 2.0,
                color.svg(),
                color.alpha(),
            );
        }
        def.push_str("</filter>");
        Some((id, def))
    }

    fn text_lines(out: &mut String, lines: &[&str], block: &TextBlock) {
        let (x, text_anchor) = anchor(block.align, block.width, block.inset);
        let _ = write!(out, " text-anchor=\"{text_anchor}\">");
        for (i, line) in lines.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = block.top + first_baseline(block.font_size) + block.line_height * i as f64;
            let _ = write!(out, "<tspan x=\"{x}\" y=\"{y}\">{}</tspan>", escape_xml(line));
        }
        out.push_str("</text>");
    }
}

/// Line layout of a multi-line `<text>`.
struct TextBlock {
    width: f64,
    top: f64,
    inset: f64,
    font_size: f64,
    line_height: f64,
    align: TextAlign,
}

impl ElementSink for SvgSink {
    type Fragment = String;

    fn text(&mut self, _el: &Element, text: &TextContent, frame: Frame) -> RenderResult<String> {
        let size = self.len(text.font_size);
        let color = Rgba::parse_or(&text.color, Rgba::BLACK);
        let mut out = format!(
            "<text font-family=\"{}, sans-serif\" font-size=\"{size}\" font-weight=\"{}\" {}",
            escape_xml(&text.font_family),
            text.font_weight,
            paint("fill", color),
        );
        if text.italic {
            out.push_str(" font-style=\"italic\"");
        }
        if text.underline {
            out.push_str(" text-decoration=\"underline\"");
        }
        if text.letter_spacing != 0.0 {
            let _ = write!(out, " letter-spacing=\"{}\"", self.len(text.letter_spacing));
        }
        let lines: Vec<&str> = text.content.split('\n').collect();
        let block = TextBlock {
            width: frame.width,
            top: 0.0,
            inset: 0.0,
            font_size: size,
            line_height: size * f64::from(text.line_height.max(0.1)),
            align: text.align,
        };
        Self::text_lines(&mut out, &lines, &block);
        Ok(out)
    }

    fn shape(&mut self, _el: &Element, shape: &ShapeContent, frame: Frame) -> RenderResult<String> {
        let (w, h) = (frame.width, frame.height);
        let fill = Rgba::parse_or(&shape.fill, Rgba::rgb(0x3b, 0x82, 0xf6));
        let stroke = shape
            .stroke
            .as_ref()
            .map(|s| {
                format!(
                    " {} stroke-width=\"{}\"",
                    paint("stroke", Rgba::parse_or(&s.color, Rgba::BLACK)),
                    self.len(s.width)
                )
            })
            .unwrap_or_default();

        let out = match shape.shape {
            ShapeType::Rectangle => {
                format!("<rect width=\"{w}\" height=\"{h}\" {}{stroke}/>", paint("fill", fill))
            }
            ShapeType::RoundedRectangle => {
                let radius = if shape.border_radius > 0.0 {
                    self.len(shape.border_radius)
                } else {
                    w.min(h) * 0.1
                };
                format!(
                    "<rect width=\"{w}\" height=\"{h}\" rx=\"{radius}\" {}{stroke}/>",
                    paint("fill", fill)
                )
            }
            ShapeType::Ellipse => format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {}{stroke}/>",
                w / 2.0,
                h / 2.0,
                w / 2.0,
                h / 2.0,
                paint("fill", fill)
            ),
            ShapeType::Line => {
                let (color, width) = shape.stroke.as_ref().map_or((fill, self.len(2.0)), |s| {
                    (Rgba::parse_or(&s.color, fill), self.len(s.width))
                });
                format!(
                    "<line x1=\"0\" y1=\"{y}\" x2=\"{w}\" y2=\"{y}\" {} stroke-width=\"{width}\"/>",
                    paint("stroke", color),
                    y = h / 2.0,
                )
            }
            ShapeType::Triangle => format!(
                "<polygon points=\"{},0 {w},{h} 0,{h}\" {}{stroke}/>",
                w / 2.0,
                paint("fill", fill)
            ),
        };
        Ok(out)
    }

    fn image(
        &mut self,
        _el: &Element,
        image: &ImageContent,
        loaded: &LoadedImage,
        frame: Frame,
    ) -> RenderResult<String> {
        let (w, h) = (frame.width, frame.height);
        let aspect = match image.fit {
            ImageFit::Cover => "xMidYMid slice",
            ImageFit::Contain => "xMidYMid meet",
            ImageFit::Fill => "none",
        };
        let mut out = String::new();
        let mut clip = String::new();
        if image.border_radius > 0.0 {
            let id = self.next_def("clip");
            let _ = write!(
                out,
                "<clipPath id=\"{id}\"><rect width=\"{w}\" height=\"{h}\" rx=\"{}\"/></clipPath>",
                self.len(image.border_radius)
            );
            clip = format!(" clip-path=\"url(#{id})\"");
        }
        let _ = write!(
            out,
            "<image width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"{aspect}\" href=\"{}\"{clip}/>",
            loaded.data_uri()
        );
        Ok(out)
    }

    #[allow(clippy::cast_precision_loss)]
    fn table(&mut self, _el: &Element, table: &TableContent, frame: Frame) -> RenderResult<String> {
        let cols = table.column_count();
        let rows = table.rows.len();
        if cols == 0 || rows == 0 {
            return Ok(String::new());
        }
        let col_w = frame.width / cols as f64;
        let row_h = frame.height / rows as f64;
        let size = self.len(table.font_size);
        let inset = self.len(6.0);
        let border = Rgba::parse_or(&table.border.color, Rgba::rgb(0xd1, 0xd5, 0xdb));
        let border_w = self.len(table.border.width);

        let mut out = String::new();
        for (r, row) in table.rows.iter().enumerate() {
            let header = table.header_row && r == 0;
            for c in 0..cols {
                let cell = row.get(c);
                let (x, y) = (col_w * c as f64, row_h * r as f64);
                let fill = cell
                    .and_then(|cell| cell.background.as_deref())
                    .and_then(Rgba::parse)
                    .or(header.then_some(Rgba::rgb(0xf3, 0xf4, 0xf6)));
                let fill = fill.map_or_else(|| "fill=\"none\"".to_string(), |f| paint("fill", f));
                let _ = write!(
                    out,
                    "<rect x=\"{x}\" y=\"{y}\" width=\"{col_w}\" height=\"{row_h}\" {fill} {} stroke-width=\"{border_w}\"/>",
                    paint("stroke", border),
                );

                let Some(cell) = cell.filter(|cell| !cell.text.is_empty()) else {
                    continue;
                };
                let color = cell
                    .color
                    .as_deref()
                    .map_or(Rgba::rgb(0x11, 0x18, 0x27), |c| Rgba::parse_or(c, Rgba::BLACK));
                let weight = if cell.bold || header { 700 } else { 400 };
                let (tx, text_anchor) = anchor(cell.align, col_w, inset);
                let _ = write!(
                    out,
                    "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{size}\" font-weight=\"{weight}\" {} text-anchor=\"{text_anchor}\">{}</text>",
                    x + tx,
                    y + row_h / 2.0 + size * 0.35,
                    paint("fill", color),
                    escape_xml(&cell.text),
                );
            }
        }
        Ok(out)
    }

    fn code(&mut self, _el: &Element, code: &CodeContent, frame: Frame) -> RenderResult<String> {
        let (background, foreground) = match code.theme {
            CodeTheme::Dark => ("#1e1e1e", "#d4d4d4"),
            CodeTheme::Light => ("#f6f8fa", "#24292e"),
        };
        let size = self.len(code.font_size);
        let inset = self.len(12.0);
        let mut out = format!(
            "<rect width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{background}\"/><text xml:space=\"preserve\" font-family=\"'JetBrains Mono', Menlo, Consolas, monospace\" font-size=\"{size}\" fill=\"{foreground}\"",
            frame.width,
            frame.height,
            self.len(6.0),
        );
        let lines: Vec<&str> = code.source.lines().collect();
        let block = TextBlock {
            width: frame.width,
            top: inset,
            inset,
            font_size: size,
            line_height: size * 1.5,
            align: TextAlign::Left,
        };
        Self::text_lines(&mut out, &lines, &block);
        Ok(out)
    }

    fn icon(&mut self, _el: &Element, icon: &IconContent, frame: Frame) -> RenderResult<String> {
        icon_markup(icon, frame.width, frame.height, self.transform.scale_x)
    }

    fn chart(&mut self, _el: &Element, chart: &ChartContent, frame: Frame) -> RenderResult<String> {
        Ok(chart_markup(chart, frame.width, frame.height, self.transform.scale_x))
    }

    fn media(
        &mut self,
        _el: &Element,
        _media: &MediaContent,
        kind: MediaKind,
        frame: Frame,
    ) -> RenderResult<String> {
        Ok(format!(
            "<rect width=\"{w}\" height=\"{h}\" fill=\"#e0e0e0\" stroke=\"#999\" stroke-width=\"{}\"/><text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"#666\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
            self.len(1.0),
            frame.width / 2.0,
            frame.height / 2.0,
            self.len(14.0),
            kind.label(),
            w = frame.width,
            h = frame.height,
        ))
    }

    fn commit(&mut self, el: &Element, frame: Frame, fragment: String) {
        let filter = self.filter_def(el);
        let mut group = format!("<g data-element=\"{}\"", escape_xml(el.id.as_str()));
        let opacity = el.opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            let _ = write!(group, " opacity=\"{opacity}\"");
        }
        if frame.rotation != 0.0 {
            let _ = write!(
                group,
                " transform=\"rotate({} {} {})\"",
                frame.rotation,
                frame.x + frame.width / 2.0,
                frame.y + frame.height / 2.0
            );
        }
        if let Some((id, _)) = &filter {
            let _ = write!(group, " filter=\"url(#{id})\"");
        }
        group.push('>');
        if let Some((_, def)) = filter {
            let _ = write!(group, "<defs>{def}</defs>");
        }

        let _ = write!(
            group,
            "<svg x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" overflow=\"visible\">{fragment}",
            frame.x, frame.y, frame.width, frame.height
        );
        if let Some(border) = &el.border {
            let bw = self.len(border.width);
            let color = Rgba::parse_or(&border.color, Rgba::BLACK);
            let _ = write!(
                group,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"none\" {} stroke-width=\"{bw}\"/>",
                bw / 2.0,
                bw / 2.0,
                (frame.width - bw).max(0.0),
                (frame.height - bw).max(0.0),
                self.len(border.radius),
                paint("stroke", color),
            );
        }
        group.push_str("</svg></g>");
        self.body.push_str(&group);
    }
}

/// A composed slide document.
#[derive(Debug, Clone)]
pub struct SlideSvg {
    /// Complete SVG document.
    pub document: String,
    /// Elements skipped while composing.
    pub warnings: Vec<RenderWarning>,
}

/// Compose `slide` into a standalone `width`×`height` SVG document.
///
/// The slide background is used when it parses to a visible color,
/// `fallback_background` otherwise.
#[must_use]
pub fn slide_svg(
    slide: &Slide,
    slide_index: usize,
    width: u32,
    height: u32,
    assets: &AssetCache,
    fallback_background: Rgba,
) -> SlideSvg {
    let transform = CoordinateTransform::raster(width, height);
    let mut sink = SvgSink::new(transform);
    let warnings = render_slide(&mut sink, slide, &transform, assets, slide_index);

    let background = Rgba::parse(&slide.background)
        .filter(|c| !c.is_transparent())
        .unwrap_or(fallback_background);
    let document = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><rect width=\"{width}\" height=\"{height}\" {}/>{}</svg>",
        paint("fill", background),
        sink.into_body(),
    );
    SlideSvg { document, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Border, ElementKind, Shadow, SlideLayout, TableCell, Transform};

    fn compose(slide: &Slide) -> SlideSvg {
        slide_svg(slide, 0, 1920, 1080, &AssetCache::empty(), Rgba::WHITE)
    }

    #[test]
    fn test_text_lines_and_styles() {
        let mut text = TextContent::plain("Hello\nWorld & co", 24.0);
        text.font_weight = 700;
        text.italic = true;
        text.align = TextAlign::Center;
        let slide = Slide::new(SlideLayout::Blank).with_element(
            Element::new(ElementKind::Text(text))
                .with_id("t")
                .with_transform(Transform::at(10.0, 20.0, 300.0, 80.0)),
        );
        let svg = compose(&slide).document;
        assert!(svg.contains("<svg x=\"20\" y=\"40\" width=\"600\" height=\"160\""));
        assert!(svg.contains("font-size=\"48\""));
        assert!(svg.contains("font-weight=\"700\""));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains("World &amp; co"));
    }

    #[test]
    fn test_background_fallback() {
        let mut slide = Slide::new(SlideLayout::Blank);
        slide.background = "not-a-color".to_string();
        let svg = slide_svg(&slide, 0, 960, 540, &AssetCache::empty(), Rgba::rgb(1, 2, 3)).document;
        assert!(svg.contains("fill=\"#010203\""));

        slide.background = "#0f172a".to_string();
        assert!(compose(&slide).document.contains("fill=\"#0f172a\""));
    }

    #[test]
    fn test_decorations_and_rotation() {
        let mut el = Element::new(ElementKind::Shape(ShapeContent::filled(
            ShapeType::RoundedRectangle,
            "#22c55e",
        )))
        .with_id("s")
        .with_transform(Transform {
            rotation: 45.0,
            ..Transform::at(100.0, 100.0, 100.0, 50.0)
        });
        el.opacity = 0.5;
        el.border = Some(Border {
            color: "#000000".into(),
            width: 2.0,
            radius: 4.0,
        });
        el.shadow = Some(Shadow {
            offset_x: 2.0,
            offset_y: 4.0,
            blur: 8.0,
            color: "rgba(0,0,0,0.25)".into(),
        });
        let svg = compose(&Slide::new(SlideLayout::Blank).with_element(el)).document;
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("rotate(45 300 250)"));
        assert!(svg.contains("<feDropShadow dx=\"4\" dy=\"8\""));
        assert!(svg.contains("stroke-width=\"4\""));
    }

    #[test]
    fn test_table_ragged_rows() {
        let table = TableContent {
            rows: vec![
                vec![TableCell::text("Name"), TableCell::text("Score")],
                vec![TableCell::text("Ada")],
            ],
            header_row: true,
            border: deck_core::Stroke {
                color: "#cccccc".into(),
                width: 1.0,
            },
            font_size: 14.0,
        };
        let slide = Slide::new(SlideLayout::Blank).with_element(
            Element::new(ElementKind::Table(table)).with_transform(Transform::at(0.0, 0.0, 200.0, 100.0)),
        );
        let svg = compose(&slide).document;
        // 4 cells plus the background
        assert_eq!(svg.matches("<rect").count(), 5);
        assert_eq!(svg.matches("font-weight=\"700\"").count(), 2);
    }

    #[test]
    fn test_media_placeholder_and_unknown_icon() {
        let slide = Slide::new(SlideLayout::Blank)
            .with_element(Element::new(ElementKind::Video(MediaContent {
                src: "clip.mp4".into(),
                poster: None,
                autoplay: true,
                looped: false,
            })))
            .with_element(
                Element::new(ElementKind::Icon(IconContent {
                    name: "sparkle-unicorn".into(),
                    color: "#000".into(),
                    background: None,
                }))
                .with_id("bad-icon"),
            );
        let composed = compose(&slide);
        assert!(composed.document.contains("[VIDEO]"));
        assert!(composed.document.contains("#e0e0e0"));
        assert_eq!(composed.warnings.len(), 1);
        assert_eq!(composed.warnings[0].element_id, "bad-icon");
    }

    #[test]
    fn test_cover_fallback_renders_titles() {
        let slide = Slide::new(SlideLayout::Cover).with_titles("Launch Plan", "Q3 review");
        let svg = compose(&slide).document;
        assert!(svg.contains("Launch Plan"));
        assert!(svg.contains("Q3 review"));
    }
}

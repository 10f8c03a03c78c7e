//! `DrawingML` shape markup for each element kind.

use std::fmt::Write;

use deck_core::{
    Border, ChartContent, CodeContent, CodeTheme, Element, ElementKind, IconContent, ImageContent,
    ImageFit, MediaContent, ShapeContent, ShapeType, TableContent, TextAlign, TextContent,
};

use super::media::MediaStore;
use crate::assets::{ImageFormat, LoadedImage};
use crate::chart::chart_table;
use crate::color::Rgba;
use crate::error::{RenderError, RenderResult};
use crate::icons::icon_document;
use crate::raster::rasterize_svg_scaled;
use crate::sink::{ElementSink, MediaKind};
use crate::svg::escape_xml;
use crate::transform::{emu, CoordinateTransform, Frame};

/// Logical units per inch.
const UNITS_PER_INCH: f64 = 96.0;

/// `DrawingML` percentages are in thousandths of a percent.
const PERCENT: f64 = 100_000.0;

/// Escape text for `<a:t>`, dropping characters XML 1.0 cannot carry.
fn xml_text(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    escape_xml(&cleaned)
}

#[allow(clippy::cast_possible_truncation)]
fn percent(fraction: f64) -> i64 {
    (fraction * PERCENT).round() as i64
}

fn align_attr(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "l",
        TextAlign::Center => "ctr",
        TextAlign::Right => "r",
        TextAlign::Justify => "just",
    }
}

/// `<a:solidFill>` with the color's alpha multiplied by `opacity`.
fn solid_fill(color: Rgba, opacity: f32) -> String {
    let alpha = f64::from(color.alpha()) * f64::from(opacity.clamp(0.0, 1.0));
    if alpha >= 1.0 {
        format!("<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>", color.hex6())
    } else {
        format!(
            "<a:solidFill><a:srgbClr val=\"{}\"><a:alpha val=\"{}\"/></a:srgbClr></a:solidFill>",
            color.hex6(),
            percent(alpha)
        )
    }
}

fn fill_or_none(color: Rgba, opacity: f32) -> String {
    if color.is_transparent() {
        "<a:noFill/>".to_string()
    } else {
        solid_fill(color, opacity)
    }
}

/// `<a:xfrm>` for a frame in inches.
#[allow(clippy::cast_possible_truncation)]
fn xfrm(tag: &str, frame: &Frame) -> String {
    let rotation = frame.rotation.rem_euclid(360.0);
    let rot = if rotation == 0.0 {
        String::new()
    } else {
        format!(" rot=\"{}\"", (rotation * 60_000.0).round() as i64)
    };
    format!(
        "<{tag}{rot}><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></{tag}>",
        emu(frame.x),
        emu(frame.y),
        emu(frame.width),
        emu(frame.height)
    )
}

fn preset(prst: &str, adj: Option<i64>) -> String {
    match adj {
        Some(adj) => format!(
            "<a:prstGeom prst=\"{prst}\"><a:avLst><a:gd name=\"adj\" fmla=\"val {adj}\"/></a:avLst></a:prstGeom>"
        ),
        None => format!("<a:prstGeom prst=\"{prst}\"><a:avLst/></a:prstGeom>"),
    }
}

/// Corner adjust for `roundRect`: radius as a share of the shorter side.
fn round_adjust(radius_in: f64, frame: &Frame) -> i64 {
    let short = frame.width.min(frame.height);
    if short <= 0.0 {
        return 0;
    }
    percent((radius_in / short).clamp(0.0, 0.5))
}

/// Per-slide PPTX shape writer.
pub struct PptxSink<'a> {
    transform: CoordinateTransform,
    icon_oversample: f32,
    media: &'a mut MediaStore,
    shapes: String,
    next_id: u32,
    rels: Vec<String>,
}

impl<'a> PptxSink<'a> {
    /// Sink registering pictures in `media`.
    #[must_use]
    pub fn new(media: &'a mut MediaStore, icon_oversample: f32) -> Self {
        Self {
            transform: CoordinateTransform::pptx(),
            icon_oversample: if icon_oversample > 0.0 { icon_oversample } else { 2.0 },
            media,
            shapes: String::new(),
            next_id: 2,
            rels: Vec::new(),
        }
    }

    /// Shape tree markup and the media targets referenced as `rId2..`.
    #[must_use]
    pub fn finish(self) -> (String, Vec<String>) {
        (self.shapes, self.rels)
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Relationship id for a media target, shared within the slide.
    fn relate(&mut self, target: String) -> String {
        let idx = match self.rels.iter().position(|t| *t == target) {
            Some(idx) => idx,
            None => {
                self.rels.push(target);
                self.rels.len() - 1
            }
        };
        // rId1 is the slide layout
        format!("rId{}", idx + 2)
    }

    fn points(&self, px: f32) -> f64 {
        self.transform.font_points(px)
    }

    /// Font size in hundredths of a point.
    #[allow(clippy::cast_possible_truncation)]
    fn sz(&self, px: f32) -> i64 {
        ((self.points(px) * 100.0).round() as i64).clamp(100, 400_000)
    }

    fn line_width(&self, px: f32) -> i64 {
        emu(self.transform.length(px)).max(0)
    }

    fn outline(&self, color: Rgba, width: f32, opacity: f32) -> String {
        format!(
            "<a:ln w=\"{}\">{}</a:ln>",
            self.line_width(width),
            fill_or_none(color, opacity)
        )
    }

    fn border(&self, border: Option<&Border>, opacity: f32) -> String {
        border.map_or_else(
            || "<a:ln><a:noFill/></a:ln>".to_string(),
            |b| self.outline(Rgba::parse_or(&b.color, Rgba::BLACK), b.width, opacity),
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn effects(&self, el: &Element) -> String {
        let Some(shadow) = &el.shadow else {
            return String::new();
        };
        let dx = self.transform.length(shadow.offset_x);
        let dy = self.transform.length(shadow.offset_y);
        let dist = emu(dx.hypot(dy));
        let dir = (dy.atan2(dx).to_degrees().rem_euclid(360.0) * 60_000.0).round() as i64;
        let color = Rgba::parse_or(&shadow.color, Rgba { a: 64, ..Rgba::BLACK });
        let alpha = percent(f64::from(color.alpha()) * f64::from(el.opacity.clamp(0.0, 1.0)));
        format!(
            "<a:effectLst><a:outerShdw blurRad=\"{}\" dist=\"{dist}\" dir=\"{dir}\" algn=\"tl\" rotWithShape=\"0\"><a:srgbClr val=\"{}\"><a:alpha val=\"{alpha}\"/></a:srgbClr></a:outerShdw></a:effectLst>",
            emu(self.transform.length(shadow.blur)),
            color.hex6(),
        )
    }

    fn nv_sp_pr(id: u32, el: &Element, txbox: bool) -> String {
        format!(
            "<p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{}\"/><p:cNvSpPr{}/><p:nvPr/></p:nvSpPr>",
            escape_xml(el.id.as_str()),
            if txbox { " txBox=\"1\"" } else { "" }
        )
    }

    /// `<a:rPr>` for a run.
    #[allow(clippy::cast_possible_truncation)]
    fn run_props(&self, style: &RunStyle<'_>, opacity: f32) -> String {
        let mut props = format!("<a:rPr lang=\"en-US\" sz=\"{}\"", self.sz(style.size_px));
        if style.bold {
            props.push_str(" b=\"1\"");
        }
        if style.italic {
            props.push_str(" i=\"1\"");
        }
        if style.underline {
            props.push_str(" u=\"sng\"");
        }
        if style.letter_spacing != 0.0 {
            let _ = write!(
                props,
                " spc=\"{}\"",
                (self.points(style.letter_spacing) * 100.0).round() as i64
            );
        }
        let _ = write!(
            props,
            " dirty=\"0\">{}<a:latin typeface=\"{}\"/></a:rPr>",
            solid_fill(style.color, opacity),
            escape_xml(style.typeface)
        );
        props
    }

    fn paragraphs(&self, lines: &[&str], style: &RunStyle<'_>, para: &ParaStyle, opacity: f32) -> String {
        let rpr = self.run_props(style, opacity);
        let mut p_pr = format!("<a:pPr algn=\"{}\"", align_attr(para.align));
        match para.line_spacing {
            Some(spacing) => {
                let _ = write!(
                    p_pr,
                    "><a:lnSpc><a:spcPct val=\"{}\"/></a:lnSpc></a:pPr>",
                    percent(f64::from(spacing))
                );
            }
            None => p_pr.push_str("/>"),
        }

        let mut out = String::new();
        for line in lines {
            if line.is_empty() {
                let end = rpr.replacen("<a:rPr", "<a:endParaRPr", 1).replace("</a:rPr>", "</a:endParaRPr>");
                let _ = write!(out, "<a:p>{p_pr}{end}</a:p>");
            } else {
                let _ = write!(out, "<a:p>{p_pr}<a:r>{rpr}<a:t>{}</a:t></a:r></a:p>", xml_text(line));
            }
        }
        if out.is_empty() {
            out.push_str("<a:p/>");
        }
        out
    }

    /// Text body with insets (EMU) and vertical anchor.
    fn text_body(inset: i64, anchor: &str, wrap: bool, paragraphs: &str) -> String {
        format!(
            "<p:txBody><a:bodyPr wrap=\"{}\" lIns=\"{inset}\" tIns=\"{inset}\" rIns=\"{inset}\" bIns=\"{inset}\" anchor=\"{anchor}\" rtlCol=\"0\"><a:noAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody>",
            if wrap { "square" } else { "none" }
        )
    }

    fn picture(&mut self, el: &Element, frame: &Frame, target: String, blip_extra: &str, geometry: &str) -> String {
        let id = self.shape_id();
        let rel = self.relate(target);
        let opacity = el.opacity.clamp(0.0, 1.0);
        let alpha = if opacity < 1.0 {
            format!("<a:alphaModFix amt=\"{}\"/>", percent(f64::from(opacity)))
        } else {
            String::new()
        };
        let descr = match &el.kind {
            ElementKind::Image(image) if !image.alt.is_empty() => {
                format!(" descr=\"{}\"", escape_xml(&image.alt))
            }
            _ => String::new(),
        };
        format!(
            "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"{}\"{descr}/><p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed=\"{rel}\">{alpha}</a:blip>{blip_extra}</p:blipFill><p:spPr>{}{geometry}{}{}</p:spPr></p:pic>",
            escape_xml(el.id.as_str()),
            xfrm("a:xfrm", frame),
            self.border(el.border.as_ref(), opacity),
            self.effects(el),
        )
    }
}

/// Character formatting shared by every run of a text body.
struct RunStyle<'s> {
    size_px: f32,
    bold: bool,
    italic: bool,
    underline: bool,
    letter_spacing: f32,
    color: Rgba,
    typeface: &'s str,
}

struct ParaStyle {
    align: TextAlign,
    line_spacing: Option<f32>,
}

/// `srcRect` crop for cover, `fillRect` insets for contain.
fn fit_markup(fit: ImageFit, image: &LoadedImage, frame: &Frame) -> String {
    let frame_aspect = if frame.height > 0.0 { frame.width / frame.height } else { 1.0 };
    let image_aspect = f64::from(image.width) / f64::from(image.height.max(1));
    let ratio = if image_aspect > frame_aspect {
        frame_aspect / image_aspect
    } else {
        image_aspect / frame_aspect
    };
    let margin = percent((1.0 - ratio) / 2.0);
    let wide = image_aspect > frame_aspect;

    match fit {
        ImageFit::Fill => "<a:stretch><a:fillRect/></a:stretch>".to_string(),
        ImageFit::Cover if margin > 0 => {
            let crop = if wide {
                format!("<a:srcRect l=\"{margin}\" r=\"{margin}\"/>")
            } else {
                format!("<a:srcRect t=\"{margin}\" b=\"{margin}\"/>")
            };
            format!("{crop}<a:stretch><a:fillRect/></a:stretch>")
        }
        ImageFit::Contain if margin > 0 => {
            let inset = if wide {
                format!("t=\"{margin}\" b=\"{margin}\"")
            } else {
                format!("l=\"{margin}\" r=\"{margin}\"")
            };
            format!("<a:stretch><a:fillRect {inset}/></a:stretch>")
        }
        ImageFit::Cover | ImageFit::Contain => "<a:stretch><a:fillRect/></a:stretch>".to_string(),
    }
}

impl ElementSink for PptxSink<'_> {
    type Fragment = String;

    fn text(&mut self, el: &Element, text: &TextContent, frame: Frame) -> RenderResult<String> {
        let id = self.shape_id();
        let style = RunStyle {
            size_px: text.font_size,
            bold: text.is_bold(),
            italic: text.italic,
            underline: text.underline,
            letter_spacing: text.letter_spacing,
            color: Rgba::parse_or(&text.color, Rgba::BLACK),
            typeface: &text.font_family,
        };
        let para = ParaStyle {
            align: text.align,
            line_spacing: Some(text.line_height.max(0.1)),
        };
        let lines: Vec<&str> = text.content.split('\n').collect();
        let body = self.paragraphs(&lines, &style, &para, el.opacity);
        Ok(format!(
            "<p:sp>{}<p:spPr>{}{}<a:noFill/>{}{}</p:spPr>{}</p:sp>",
            Self::nv_sp_pr(id, el, true),
            xfrm("a:xfrm", &frame),
            preset("rect", None),
            self.border(el.border.as_ref(), el.opacity),
            self.effects(el),
            Self::text_body(0, "t", true, &body),
        ))
    }

    fn shape(&mut self, el: &Element, shape: &ShapeContent, frame: Frame) -> RenderResult<String> {
        let id = self.shape_id();
        let fill = Rgba::parse_or(&shape.fill, Rgba::rgb(0x3b, 0x82, 0xf6));
        let stroke = shape
            .stroke
            .as_ref()
            .map(|s| (Rgba::parse_or(&s.color, Rgba::BLACK), s.width));

        let (geometry, fill_xml, line_xml, frame) = match shape.shape {
            ShapeType::Line => {
                let (color, width) = stroke.unwrap_or((fill, 2.0));
                let frame = Frame {
                    y: frame.y + frame.height / 2.0,
                    height: 0.0,
                    ..frame
                };
                (
                    preset("line", None),
                    String::new(),
                    self.outline(color, width, el.opacity),
                    frame,
                )
            }
            kind => {
                let geometry = match kind {
                    ShapeType::RoundedRectangle => {
                        let radius = if shape.border_radius > 0.0 {
                            self.transform.length(shape.border_radius)
                        } else {
                            frame.width.min(frame.height) * 0.1
                        };
                        preset("roundRect", Some(round_adjust(radius, &frame)))
                    }
                    ShapeType::Ellipse => preset("ellipse", None),
                    ShapeType::Triangle => preset("triangle", None),
                    ShapeType::Rectangle | ShapeType::Line => preset("rect", None),
                };
                let line = match stroke {
                    Some((color, width)) => self.outline(color, width, el.opacity),
                    None => self.border(el.border.as_ref(), el.opacity),
                };
                (geometry, fill_or_none(fill, el.opacity), line, frame)
            }
        };

        Ok(format!(
            "<p:sp>{}<p:spPr>{}{geometry}{fill_xml}{line_xml}{}</p:spPr></p:sp>",
            Self::nv_sp_pr(id, el, false),
            xfrm("a:xfrm", &frame),
            self.effects(el),
        ))
    }

    fn image(
        &mut self,
        el: &Element,
        image: &ImageContent,
        loaded: &LoadedImage,
        frame: Frame,
    ) -> RenderResult<String> {
        let (bytes, format) = loaded.to_embeddable(self.icon_oversample)?;
        let target = self.media.insert(&format!("src:{}", image.src), bytes, format);
        let geometry = if image.border_radius > 0.0 {
            let radius = self.transform.length(image.border_radius);
            preset("roundRect", Some(round_adjust(radius, &frame)))
        } else {
            preset("rect", None)
        };
        let fit = fit_markup(image.fit, loaded, &frame);
        Ok(self.picture(el, &frame, target, &fit, &geometry))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn table(&mut self, el: &Element, table: &TableContent, frame: Frame) -> RenderResult<String> {
        let cols = table.column_count();
        let rows = table.rows.len();
        if cols == 0 || rows == 0 {
            return Ok(String::new());
        }
        let id = self.shape_id();
        let col_w = emu(frame.width) / cols as i64;
        let row_h = emu(frame.height) / rows as i64;
        let border = Rgba::parse_or(&table.border.color, Rgba::rgb(0xd1, 0xd5, 0xdb));
        let edge = |tag: &str| {
            format!(
                "<a:{tag} w=\"{}\">{}</a:{tag}>",
                self.line_width(table.border.width),
                solid_fill(border, el.opacity)
            )
        };
        let edges = format!("{}{}{}{}", edge("lnL"), edge("lnR"), edge("lnT"), edge("lnB"));

        let mut grid = String::new();
        for _ in 0..cols {
            let _ = write!(grid, "<a:gridCol w=\"{col_w}\"/>");
        }

        let mut body = String::new();
        for (r, row) in table.rows.iter().enumerate() {
            let header = table.header_row && r == 0;
            let _ = write!(body, "<a:tr h=\"{row_h}\">");
            for c in 0..cols {
                let cell = row.get(c).cloned().unwrap_or_default();
                let style = RunStyle {
                    size_px: table.font_size,
                    bold: cell.bold || header,
                    italic: false,
                    underline: false,
                    letter_spacing: 0.0,
                    color: cell
                        .color
                        .as_deref()
                        .map_or(Rgba::rgb(0x11, 0x18, 0x27), |c| Rgba::parse_or(c, Rgba::BLACK)),
                    typeface: "Inter",
                };
                let para = ParaStyle {
                    align: cell.align,
                    line_spacing: None,
                };
                let paragraphs = self.paragraphs(&[cell.text.as_str()], &style, &para, el.opacity);
                let fill = cell
                    .background
                    .as_deref()
                    .and_then(Rgba::parse)
                    .or(header.then_some(Rgba::rgb(0xf3, 0xf4, 0xf6)))
                    .map_or_else(|| "<a:noFill/>".to_string(), |f| fill_or_none(f, el.opacity));
                let _ = write!(
                    body,
                    "<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</a:txBody><a:tcPr anchor=\"ctr\">{edges}{fill}</a:tcPr></a:tc>"
                );
            }
            body.push_str("</a:tr>");
        }

        Ok(format!(
            "<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id=\"{id}\" name=\"{}\"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp=\"1\"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>{}<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/table\"><a:tbl><a:tblPr firstRow=\"{}\" bandRow=\"0\"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>",
            escape_xml(el.id.as_str()),
            xfrm("p:xfrm", &frame),
            u8::from(table.header_row),
        ))
    }

    fn code(&mut self, el: &Element, code: &CodeContent, frame: Frame) -> RenderResult<String> {
        let id = self.shape_id();
        let (background, foreground) = match code.theme {
            CodeTheme::Dark => (Rgba::rgb(0x1e, 0x1e, 0x1e), Rgba::rgb(0xd4, 0xd4, 0xd4)),
            CodeTheme::Light => (Rgba::rgb(0xf6, 0xf8, 0xfa), Rgba::rgb(0x24, 0x29, 0x2e)),
        };
        let style = RunStyle {
            size_px: code.font_size,
            bold: false,
            italic: false,
            underline: false,
            letter_spacing: 0.0,
            color: foreground,
            typeface: "Consolas",
        };
        let para = ParaStyle {
            align: TextAlign::Left,
            line_spacing: Some(1.5),
        };
        let lines: Vec<&str> = code.source.lines().collect();
        let body = self.paragraphs(&lines, &style, &para, el.opacity);
        let radius = self.transform.length(6.0);
        Ok(format!(
            "<p:sp>{}<p:spPr>{}{}{}{}{}</p:spPr>{}</p:sp>",
            Self::nv_sp_pr(id, el, true),
            xfrm("a:xfrm", &frame),
            preset("roundRect", Some(round_adjust(radius, &frame))),
            solid_fill(background, el.opacity),
            self.border(el.border.as_ref(), el.opacity),
            self.effects(el),
            Self::text_body(emu(self.transform.length(12.0)), "t", false, &body),
        ))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn icon(&mut self, el: &Element, icon: &IconContent, frame: Frame) -> RenderResult<String> {
        let oversample = f64::from(self.icon_oversample);
        let px_w = (frame.width * UNITS_PER_INCH * oversample).ceil().max(1.0) as u32;
        let px_h = (frame.height * UNITS_PER_INCH * oversample).ceil().max(1.0) as u32;
        let document = icon_document(icon, px_w, px_h, oversample)?;
        let png = rasterize_svg_scaled(&document, 1.0)?
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;

        let key = format!(
            "icon:{}:{}:{:?}:{px_w}x{px_h}",
            icon.name,
            icon.color,
            icon.background.as_ref().map(|b| (&b.color, b.radius.to_bits())),
        );
        let target = self.media.insert(&key, png, ImageFormat::Png);
        Ok(self.picture(
            el,
            &frame,
            target,
            "<a:stretch><a:fillRect/></a:stretch>",
            &preset("rect", None),
        ))
    }

    fn chart(&mut self, el: &Element, chart: &ChartContent, frame: Frame) -> RenderResult<String> {
        self.table(el, &chart_table(chart), frame)
    }

    fn media(
        &mut self,
        el: &Element,
        _media: &MediaContent,
        kind: MediaKind,
        frame: Frame,
    ) -> RenderResult<String> {
        let id = self.shape_id();
        let style = RunStyle {
            size_px: 14.0,
            bold: false,
            italic: false,
            underline: false,
            letter_spacing: 0.0,
            color: Rgba::rgb(0x66, 0x66, 0x66),
            typeface: "Inter",
        };
        let para = ParaStyle {
            align: TextAlign::Center,
            line_spacing: None,
        };
        let body = self.paragraphs(&[kind.label()], &style, &para, el.opacity);
        Ok(format!(
            "<p:sp>{}<p:spPr>{}{}{}{}</p:spPr>{}</p:sp>",
            Self::nv_sp_pr(id, el, false),
            xfrm("a:xfrm", &frame),
            preset("rect", None),
            solid_fill(Rgba::rgb(0xe0, 0xe0, 0xe0), el.opacity),
            self.outline(Rgba::rgb(0x99, 0x99, 0x99), 1.0, el.opacity),
            Self::text_body(0, "ctr", true, &body),
        ))
    }

    fn commit(&mut self, _el: &Element, _frame: Frame, fragment: String) {
        self.shapes.push_str(&fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::Transform;

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
        Frame {
            x,
            y,
            width: w,
            height: h,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_xfrm_rotation_normalized() {
        let mut f = frame(1.0, 0.5, 2.0, 1.0);
        f.rotation = -90.0;
        let xml = xfrm("a:xfrm", &f);
        assert!(xml.starts_with("<a:xfrm rot=\"16200000\">"));
        assert!(xml.contains("<a:off x=\"914400\" y=\"457200\"/>"));
        assert!(xml.contains("<a:ext cx=\"1828800\" cy=\"914400\"/>"));
    }

    #[test]
    fn test_solid_fill_alpha() {
        assert_eq!(
            solid_fill(Rgba::rgb(255, 0, 0), 1.0),
            "<a:solidFill><a:srgbClr val=\"FF0000\"/></a:solidFill>"
        );
        assert!(solid_fill(Rgba::rgb(255, 0, 0), 0.5).contains("<a:alpha val=\"50000\"/>"));
    }

    #[test]
    fn test_fit_markup() {
        let wide = LoadedImage {
            bytes: Vec::new(),
            format: ImageFormat::Png,
            width: 200,
            height: 100,
        };
        let square = frame(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            fit_markup(ImageFit::Cover, &wide, &square),
            "<a:srcRect l=\"25000\" r=\"25000\"/><a:stretch><a:fillRect/></a:stretch>"
        );
        assert_eq!(
            fit_markup(ImageFit::Contain, &wide, &square),
            "<a:stretch><a:fillRect t=\"25000\" b=\"25000\"/></a:stretch>"
        );
    }

    #[test]
    fn test_text_runs() {
        let mut media = MediaStore::default();
        let mut sink = PptxSink::new(&mut media, 2.0);
        let mut text = TextContent::plain("Hello\n\nA < B", 24.0);
        text.font_weight = 700;
        text.underline = true;
        let el = Element::new(ElementKind::Text(text.clone()))
            .with_id("title")
            .with_transform(Transform::at(96.0, 48.0, 480.0, 96.0));
        let frame = CoordinateTransform::pptx().frame(&el.transform);
        let xml = sink.text(&el, &text, frame).expect("text");
        assert!(xml.contains("txBox=\"1\""));
        assert!(xml.contains("sz=\"1800\""));
        assert!(xml.contains(" b=\"1\""));
        assert!(xml.contains(" u=\"sng\""));
        assert!(xml.contains("<a:t>A &lt; B</a:t>"));
        assert!(xml.contains("<a:endParaRPr"));
        assert!(xml.contains("<a:off x=\"914400\" y=\"457200\"/>"));
    }

    #[test]
    fn test_relationships_are_shared_per_target() {
        let mut media = MediaStore::default();
        let mut sink = PptxSink::new(&mut media, 2.0);
        assert_eq!(sink.relate("../media/image1.png".into()), "rId2");
        assert_eq!(sink.relate("../media/image2.png".into()), "rId3");
        assert_eq!(sink.relate("../media/image1.png".into()), "rId2");
    }
}

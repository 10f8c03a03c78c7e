//! Fallback layouts for slides without placed elements.
//!
//! Legacy slides carry only a layout archetype plus title, subtitle and
//! content strings. Rather than giving every output backend its own
//! fallback renderer, the archetype is expanded into ordinary text elements
//! here, so editing preview, playback and all exporters share one path.

use crate::element::{Element, ElementKind, TextAlign, TextContent, Transform};
use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::slide::{Slide, SlideLayout};

const MARGIN: f32 = 60.0;

/// Synthesize the elements a fallback layout renders.
#[must_use]
pub fn fallback_elements(slide: &Slide) -> Vec<Element> {
    let full_width = CANVAS_WIDTH - MARGIN * 2.0;
    let mut out = Vec::new();

    match slide.layout {
        SlideLayout::Blank => {}
        SlideLayout::Cover | SlideLayout::Section | SlideLayout::Thankyou => {
            let (title, size, top) = match slide.layout {
                SlideLayout::Cover => (slide.title.clone(), 56.0, 170.0),
                SlideLayout::Section => (slide.title.clone(), 48.0, 200.0),
                _ if slide.title.is_empty() => ("Thank You".to_string(), 64.0, 180.0),
                _ => (slide.title.clone(), 64.0, 180.0),
            };
            push_text(
                &mut out,
                slide,
                "fallback-title",
                &title,
                Transform::at(MARGIN, top, full_width, size * 1.6),
                size,
                700,
                TextAlign::Center,
            );
            push_text(
                &mut out,
                slide,
                "fallback-subtitle",
                &slide.subtitle,
                Transform::at(MARGIN, top + size * 1.8, full_width, 50.0),
                26.0,
                400,
                TextAlign::Center,
            );
        }
        SlideLayout::Quote => {
            let quote = if slide.content.is_empty() {
                &slide.title
            } else {
                &slide.content
            };
            push_text(
                &mut out,
                slide,
                "fallback-content",
                &format!("\u{201c}{quote}\u{201d}"),
                Transform::at(MARGIN * 2.0, 140.0, CANVAS_WIDTH - MARGIN * 4.0, 200.0),
                34.0,
                400,
                TextAlign::Center,
            );
            if !slide.content.is_empty() && !slide.title.is_empty() {
                push_text(
                    &mut out,
                    slide,
                    "fallback-title",
                    &format!("\u{2014} {}", slide.title),
                    Transform::at(MARGIN * 2.0, 370.0, CANVAS_WIDTH - MARGIN * 4.0, 40.0),
                    22.0,
                    600,
                    TextAlign::Center,
                );
            }
        }
        layout => {
            push_text(
                &mut out,
                slide,
                "fallback-title",
                &slide.title,
                Transform::at(MARGIN, 40.0, full_width, 64.0),
                40.0,
                700,
                TextAlign::Left,
            );
            let mut body_top = 120.0;
            if !slide.subtitle.is_empty() {
                push_text(
                    &mut out,
                    slide,
                    "fallback-subtitle",
                    &slide.subtitle,
                    Transform::at(MARGIN, 108.0, full_width, 36.0),
                    22.0,
                    400,
                    TextAlign::Left,
                );
                body_top = 160.0;
            }
            let numbered = matches!(
                layout,
                SlideLayout::Agenda | SlideLayout::Process | SlideLayout::Timeline
            );
            let body = slide
                .content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .enumerate()
                .map(|(idx, line)| {
                    if numbered {
                        format!("{}. {line}", idx + 1)
                    } else {
                        format!("\u{2022} {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            push_text(
                &mut out,
                slide,
                "fallback-content",
                &body,
                Transform::at(MARGIN, body_top, full_width, CANVAS_HEIGHT - body_top - MARGIN),
                22.0,
                400,
                TextAlign::Left,
            );
        }
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    out: &mut Vec<Element>,
    slide: &Slide,
    id: &str,
    text: &str,
    transform: Transform,
    font_size: f32,
    font_weight: u16,
    align: TextAlign,
) {
    if text.trim().is_empty() {
        return;
    }
    let content = TextContent {
        content: text.to_string(),
        font_size,
        font_weight,
        align,
        color: slide.text_color.clone(),
        line_height: 1.4,
        ..TextContent::default()
    };
    out.push(
        Element::new(ElementKind::Text(content))
            .with_id(id)
            .with_transform(transform),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(elements: &[Element]) -> Vec<String> {
        elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Text(t) => Some(t.content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_cover_renders_title_and_subtitle() {
        let slide = Slide::new(SlideLayout::Cover).with_titles("Quarterly Review", "Q3 2026");
        let els = fallback_elements(&slide);
        assert_eq!(texts(&els), vec!["Quarterly Review", "Q3 2026"]);
        assert!(els.iter().all(|e| !e.is_animated()));
    }

    #[test]
    fn test_blank_renders_nothing() {
        let slide = Slide::new(SlideLayout::Blank).with_titles("ignored", "");
        assert!(fallback_elements(&slide).is_empty());
    }

    #[test]
    fn test_agenda_numbers_items() {
        let mut slide = Slide::new(SlideLayout::Agenda).with_titles("Agenda", "");
        slide.content = "Intro\n\nResults\nNext steps".to_string();
        let els = fallback_elements(&slide);
        let body = texts(&els).pop().expect("body");
        assert_eq!(body, "1. Intro\n2. Results\n3. Next steps");
    }

    #[test]
    fn test_thankyou_defaults_title() {
        let slide = Slide::new(SlideLayout::Thankyou);
        assert_eq!(texts(&fallback_elements(&slide)), vec!["Thank You"]);
    }
}

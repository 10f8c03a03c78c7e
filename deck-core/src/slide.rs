//! Slides - ordered compositions of elements.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{Element, ElementId};
use crate::layout;

/// Unique identifier for a slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    /// Create a fresh, unique slide ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("slide-{}", Uuid::new_v4().simple()))
    }

    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Legacy layout archetypes, used only when a slide has no elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum SlideLayout {
    Cover,
    #[default]
    Content,
    Chart,
    Image,
    Thankyou,
    Section,
    Comparison,
    Timeline,
    Quote,
    Team,
    Agenda,
    Blank,
    Features,
    Pricing,
    Stats,
    Process,
    Gallery,
    Contact,
}

/// A slide with its elements and fallback fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique identifier.
    pub id: SlideId,
    /// Fallback layout archetype.
    #[serde(default, rename = "type")]
    pub layout: SlideLayout,
    /// Fallback title.
    #[serde(default)]
    pub title: String,
    /// Fallback subtitle.
    #[serde(default)]
    pub subtitle: String,
    /// Fallback body content; newlines separate items.
    #[serde(default)]
    pub content: String,
    /// Background color as hex.
    #[serde(default = "Slide::default_background")]
    pub background: String,
    /// Default text color as hex.
    #[serde(default = "Slide::default_text_color")]
    pub text_color: String,
    /// Placed elements. When non-empty these are the only visual truth.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Slide {
    fn default_background() -> String {
        "#ffffff".to_string()
    }

    fn default_text_color() -> String {
        "#111827".to_string()
    }

    /// Create an empty slide with the given layout.
    #[must_use]
    pub fn new(layout: SlideLayout) -> Self {
        Self {
            id: SlideId::generate(),
            layout,
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            background: Self::default_background(),
            text_color: Self::default_text_color(),
            elements: Vec::new(),
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = SlideId::new(id);
        self
    }

    /// Set fallback title and subtitle.
    #[must_use]
    pub fn with_titles(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = title.into();
        self.subtitle = subtitle.into();
        self
    }

    /// Append an element.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Check whether an element exists on this slide.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.iter().any(|e| &e.id == id)
    }

    /// Highest z-index on the slide, if any element exists.
    #[must_use]
    pub fn max_z(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.transform.z_index).max()
    }

    /// Lowest z-index on the slide, if any element exists.
    #[must_use]
    pub fn min_z(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.transform.z_index).min()
    }

    /// Elements used for rendering: the placed elements, or the layout
    /// fallback when there are none.
    #[must_use]
    pub fn resolved_elements(&self) -> Cow<'_, [Element]> {
        if self.elements.is_empty() {
            Cow::Owned(layout::fallback_elements(self))
        } else {
            Cow::Borrowed(&self.elements)
        }
    }

    /// Placed elements in paint order.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Element> {
        sort_for_render(&self.elements)
    }
}

/// Sort elements into paint order: ascending z-index, then y, then x, then
/// insertion index. Deterministic for any input.
#[must_use]
pub fn sort_for_render(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<(usize, &Element)> = elements.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| paint_cmp(a, b).then_with(|| ia.cmp(ib)));
    ordered.into_iter().map(|(_, e)| e).collect()
}

/// Compare two elements by paint order, ignoring insertion index.
#[must_use]
pub fn paint_cmp(a: &Element, b: &Element) -> Ordering {
    a.transform
        .z_index
        .cmp(&b.transform.z_index)
        .then_with(|| a.transform.y.total_cmp(&b.transform.y))
        .then_with(|| a.transform.x.total_cmp(&b.transform.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ShapeContent, ShapeType, Transform};

    fn rect(id: &str, x: f32, y: f32, z: i32) -> Element {
        let mut t = Transform::at(x, y, 10.0, 10.0);
        t.z_index = z;
        Element::new(ElementKind::Shape(ShapeContent::filled(
            ShapeType::Rectangle,
            "#000000",
        )))
        .with_id(id)
        .with_transform(t)
    }

    #[test]
    fn test_render_order_by_z_then_y_then_x() {
        let slide = Slide::new(SlideLayout::Blank)
            .with_element(rect("top", 0.0, 0.0, 5))
            .with_element(rect("low-right", 50.0, 10.0, 0))
            .with_element(rect("low-left", 10.0, 10.0, 0))
            .with_element(rect("low-up", 90.0, 0.0, 0));

        let ids: Vec<_> = slide
            .render_order()
            .iter()
            .map(|e| e.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["low-up", "low-left", "low-right", "top"]);
    }

    #[test]
    fn test_render_order_ties_keep_insertion() {
        let slide = Slide::new(SlideLayout::Blank)
            .with_element(rect("first", 0.0, 0.0, 0))
            .with_element(rect("second", 0.0, 0.0, 0));
        let ids: Vec<_> = slide.render_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_resolved_elements_prefers_placed() {
        let empty = Slide::new(SlideLayout::Cover).with_titles("Hello", "World");
        assert!(!empty.resolved_elements().is_empty());

        let placed = empty.clone().with_element(rect("only", 0.0, 0.0, 0));
        let resolved = placed.resolved_elements();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id.as_str(), "only");
    }

    #[test]
    fn test_layout_parses_type_tag() {
        let slide: Slide =
            serde_json::from_str(r#"{"id": "s1", "type": "thankyou", "title": "Thanks"}"#)
                .expect("parse");
        assert_eq!(slide.layout, SlideLayout::Thankyou);
        assert_eq!(slide.background, "#ffffff");
    }
}

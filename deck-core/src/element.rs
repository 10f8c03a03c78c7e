//! Slide elements - the placeable building blocks of a slide.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Rect;

/// Unique identifier for an element, scoped to one slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a fresh, unique element ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("el-{}", Uuid::new_v4().simple()))
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

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Position, size and stacking of an element in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// X position (units from left).
    pub x: f32,
    /// Y position (units from top).
    pub y: f32,
    /// Width in units. Never negative.
    pub width: f32,
    /// Height in units. Never negative.
    pub height: f32,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f32,
    /// Z-index for layering.
    #[serde(default)]
    pub z_index: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            z_index: 0,
        }
    }
}

impl Transform {
    /// Transform at a position with a size.
    #[must_use]
    pub fn at(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// Copy with width and height clamped to be non-negative.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);
        self
    }

    /// Axis-aligned bounds (rotation is ignored, as in hit testing).
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.x, self.y, self.width, self.height)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified (rendered left-aligned where unsupported).
    Justify,
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    /// Text content; newlines separate lines.
    pub content: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in logical units.
    pub font_size: f32,
    /// CSS-style font weight (400 normal, 700 bold).
    pub font_weight: u16,
    /// Italic style.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Text color as hex.
    pub color: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Line height multiplier.
    pub line_height: f32,
    /// Extra spacing between letters in logical units.
    pub letter_spacing: f32,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: "Inter".to_string(),
            font_size: 24.0,
            font_weight: 400,
            italic: false,
            underline: false,
            color: "#1f2937".to_string(),
            align: TextAlign::Left,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

impl TextContent {
    /// Plain text with the given content and size.
    #[must_use]
    pub fn plain(content: impl Into<String>, font_size: f32) -> Self {
        Self {
            content: content.into(),
            font_size,
            ..Self::default()
        }
    }

    /// Whether the weight renders as bold.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// How an image fills its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to cover, cropping overflow.
    #[default]
    Cover,
    /// Scale to fit inside.
    Contain,
    /// Stretch to the frame.
    Fill,
}

/// Image payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Image source: file path, URL or data URI.
    pub src: String,
    /// Alternative text.
    #[serde(default)]
    pub alt: String,
    /// Fit mode.
    #[serde(default)]
    pub fit: ImageFit,
    /// Corner radius in logical units.
    #[serde(default)]
    pub border_radius: f32,
}

/// Shape geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    /// Rectangle.
    #[default]
    Rectangle,
    /// Rectangle with rounded corners.
    RoundedRectangle,
    /// Ellipse inscribed in the frame.
    Ellipse,
    /// Horizontal line through the frame's vertical center.
    Line,
    /// Isosceles triangle pointing up.
    Triangle,
}

/// A stroke (outline) descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke color as hex.
    pub color: String,
    /// Stroke width in logical units.
    pub width: f32,
}

/// Shape payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    /// Geometry.
    #[serde(default)]
    pub shape: ShapeType,
    /// Fill color as hex.
    #[serde(default = "ShapeContent::default_fill")]
    pub fill: String,
    /// Optional outline.
    #[serde(default)]
    pub stroke: Option<Stroke>,
    /// Corner radius for rounded rectangles, in logical units.
    #[serde(default)]
    pub border_radius: f32,
}

impl ShapeContent {
    fn default_fill() -> String {
        "#3b82f6".to_string()
    }

    /// Filled shape without outline.
    #[must_use]
    pub fn filled(shape: ShapeType, fill: impl Into<String>) -> Self {
        Self {
            shape,
            fill: fill.into(),
            stroke: None,
            border_radius: 0.0,
        }
    }
}

/// Chart types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Vertical bar chart.
    #[default]
    Bar,
    /// Line chart.
    Line,
    /// Area chart.
    Area,
    /// Pie chart.
    Pie,
    /// Donut chart.
    Donut,
}

impl ChartType {
    /// Whether the chart is drawn as circular sectors.
    #[must_use]
    pub fn is_radial(self) -> bool {
        matches!(self, Self::Pie | Self::Donut)
    }
}

/// One named value of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category label.
    pub label: String,
    /// Value.
    pub value: f64,
    /// Optional color override.
    #[serde(default)]
    pub color: Option<String>,
}

/// Chart payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    /// Chart type.
    #[serde(default)]
    pub chart_type: ChartType,
    /// Series data.
    #[serde(default)]
    pub series: Vec<ChartPoint>,
    /// Optional title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Video or audio payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    /// Media source URL.
    pub src: String,
    /// Poster frame (video only).
    #[serde(default)]
    pub poster: Option<String>,
    /// Start playing on slide entry.
    #[serde(default)]
    pub autoplay: bool,
    /// Loop playback.
    #[serde(default, rename = "loop")]
    pub looped: bool,
}

/// Rounded background drawn behind an icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconBackground {
    /// Background color as hex.
    pub color: String,
    /// Corner radius in logical units.
    #[serde(default)]
    pub radius: f32,
}

/// Icon payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconContent {
    /// Icon name from the icon registry.
    pub name: String,
    /// Glyph color as hex.
    #[serde(default = "IconContent::default_color")]
    pub color: String,
    /// Optional background.
    #[serde(default)]
    pub background: Option<IconBackground>,
}

impl IconContent {
    fn default_color() -> String {
        "#111827".to_string()
    }
}

/// One cell of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Cell text.
    pub text: String,
    /// Bold text.
    pub bold: bool,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Cell fill color.
    pub background: Option<String>,
    /// Text color override.
    pub color: Option<String>,
}

impl TableCell {
    /// Plain cell with the given text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Table payload: a row-major grid of styled cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    /// Rows of cells. Rows may be ragged; missing cells render empty.
    pub rows: Vec<Vec<TableCell>>,
    /// Whether the first row is a header.
    #[serde(default)]
    pub header_row: bool,
    /// Cell border.
    #[serde(default = "TableContent::default_border")]
    pub border: Stroke,
    /// Font size in logical units.
    #[serde(default = "TableContent::default_font_size")]
    pub font_size: f32,
}

impl TableContent {
    fn default_border() -> Stroke {
        Stroke {
            color: "#d1d5db".to_string(),
            width: 1.0,
        }
    }

    const fn default_font_size() -> f32 {
        14.0
    }

    /// Number of columns (widest row).
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Color theme for code blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeTheme {
    /// Light text on dark background.
    #[default]
    Dark,
    /// Dark text on light background.
    Light,
}

/// Code block payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContent {
    /// Source text.
    pub source: String,
    /// Language tag.
    #[serde(default)]
    pub language: String,
    /// Theme.
    #[serde(default)]
    pub theme: CodeTheme,
    /// Font size in logical units.
    #[serde(default = "CodeContent::default_font_size")]
    pub font_size: f32,
}

impl CodeContent {
    const fn default_font_size() -> f32 {
        14.0
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text box.
    Text(TextContent),
    /// A bitmap or SVG image.
    Image(ImageContent),
    /// A geometric shape.
    Shape(ShapeContent),
    /// A data chart.
    Chart(ChartContent),
    /// A video clip.
    Video(MediaContent),
    /// An audio clip.
    Audio(MediaContent),
    /// A named vector icon.
    Icon(IconContent),
    /// A table of cells.
    Table(TableContent),
    /// A code block.
    Code(CodeContent),
}

impl ElementKind {
    /// Lowercase kind tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Shape(_) => "shape",
            Self::Chart(_) => "chart",
            Self::Video(_) => "video",
            Self::Audio(_) => "audio",
            Self::Icon(_) => "icon",
            Self::Table(_) => "table",
            Self::Code(_) => "code",
        }
    }
}

/// Border descriptor drawn around the element frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Border color as hex.
    pub color: String,
    /// Border width in logical units.
    pub width: f32,
    /// Corner radius in logical units.
    #[serde(default)]
    pub radius: f32,
}

/// Drop shadow descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    /// Horizontal offset in logical units.
    pub offset_x: f32,
    /// Vertical offset in logical units.
    pub offset_y: f32,
    /// Blur radius in logical units.
    pub blur: f32,
    /// Shadow color as hex.
    pub color: String,
}

/// Image-style filter descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Gaussian blur radius in logical units.
    pub blur: f32,
    /// Grayscale amount (0..=1).
    pub grayscale: f32,
    /// Brightness multiplier (1 = unchanged; 0 treated as unchanged).
    pub brightness: f32,
}

/// Reveal animation kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// No animation; the element is static.
    #[default]
    None,
    /// Fade in.
    FadeIn,
    /// Slide in from below.
    SlideUp,
    /// Slide in from above.
    SlideDown,
    /// Slide in from the right.
    SlideLeft,
    /// Slide in from the left.
    SlideRight,
    /// Grow from a smaller scale.
    ZoomIn,
    /// Bounce in.
    Bounce,
}

/// Easing curves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end.
    #[default]
    EaseInOut,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
}

impl Easing {
    /// CSS timing-function keyword.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInOut => "ease-in-out",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
        }
    }
}

/// Per-element reveal animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Animation kind.
    #[serde(rename = "type", default)]
    pub kind: AnimationKind,
    /// Duration in seconds.
    #[serde(default = "Animation::default_duration")]
    pub duration: f32,
    /// Delay in seconds. Visual timing only.
    #[serde(default)]
    pub delay: f32,
    /// Easing curve.
    #[serde(default)]
    pub easing: Easing,
}

impl Animation {
    const fn default_duration() -> f32 {
        0.5
    }

    /// Animation of the given kind with default timing.
    #[must_use]
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            duration: Self::default_duration(),
            delay: 0.0,
            easing: Easing::default(),
        }
    }
}

/// A slide element with content, geometry and presentation attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier within the slide.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Position and size.
    #[serde(default)]
    pub transform: Transform,
    /// Opacity (0..=1).
    #[serde(default = "Element::default_opacity")]
    pub opacity: f32,
    /// Whether the element is rendered at all.
    #[serde(default = "Element::default_visible")]
    pub visible: bool,
    /// Locked elements cannot be moved.
    #[serde(default)]
    pub locked: bool,
    /// Optional group membership.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Optional border.
    #[serde(default)]
    pub border: Option<Border>,
    /// Optional drop shadow.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    /// Optional filter.
    #[serde(default)]
    pub filter: Option<Filter>,
    /// Optional reveal animation.
    #[serde(default)]
    pub animation: Option<Animation>,
    /// Explicit reveal sequence position.
    #[serde(default)]
    pub animation_order: Option<u32>,
}

impl Element {
    const fn default_opacity() -> f32 {
        1.0
    }

    const fn default_visible() -> bool {
        true
    }

    /// Create a new element with the given kind and a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::generate(),
            kind,
            transform: Transform::default(),
            opacity: 1.0,
            visible: true,
            locked: false,
            group_id: None,
            border: None,
            shadow: None,
            filter: None,
            animation: None,
            animation_order: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the transform. Negative sizes are clamped to zero.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform.normalized();
        self
    }

    /// Set a reveal animation and its sequence position.
    #[must_use]
    pub fn with_animation(mut self, animation: Animation, order: Option<u32>) -> Self {
        self.animation = Some(animation);
        self.animation_order = order;
        self
    }

    /// Whether the element takes part in the reveal sequence.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|a| a.kind != AnimationKind::None)
    }

    /// Axis-aligned bounds in logical units.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.transform.bounds()
    }

    /// Check if a point (in logical coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let t = &self.transform;
        x >= t.x && x <= t.x + t.width && y >= t.y && y <= t.y + t.height
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

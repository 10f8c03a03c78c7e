//! Presentations - ordered slides plus per-slide side tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element::Easing;
use crate::slide::{Slide, SlideId};
use crate::{DeckError, DeckResult};

/// Slide transition kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// Cut without animation.
    #[default]
    None,
    /// Cross-fade.
    Fade,
    /// New slide pushes in from the right.
    SlideLeft,
    /// New slide pushes in from the left.
    SlideRight,
    /// New slide pushes in from below.
    SlideUp,
    /// New slide pushes in from above.
    SlideDown,
    /// New slide grows in.
    Zoom,
}

/// Per-slide transition descriptor, applied when entering the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition kind.
    #[serde(rename = "type", default)]
    pub kind: TransitionKind,
    /// Duration in seconds.
    #[serde(default = "Transition::default_duration")]
    pub duration: f32,
    /// Easing curve.
    #[serde(default)]
    pub easing: Easing,
}

impl Transition {
    const fn default_duration() -> f32 {
        0.5
    }

    /// Transition of the given kind with default timing.
    #[must_use]
    pub fn new(kind: TransitionKind) -> Self {
        Self {
            kind,
            duration: Self::default_duration(),
            easing: Easing::default(),
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(TransitionKind::None)
    }
}

/// A review comment attached to a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Author display name.
    pub author: String,
    /// Comment body.
    pub text: String,
    /// Creation time in milliseconds since the epoch.
    #[serde(default)]
    pub created_at: u64,
    /// Whether the thread is resolved.
    #[serde(default)]
    pub resolved: bool,
}

/// A slide deck as exchanged with the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Presentation identifier (owned by storage).
    #[serde(default)]
    pub id: String,
    /// Presentation title.
    #[serde(default)]
    pub title: String,
    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Speaker notes by slide.
    #[serde(default)]
    pub notes: HashMap<SlideId, String>,
    /// Transition used when entering a slide.
    #[serde(default)]
    pub transitions: HashMap<SlideId, Transition>,
    /// Comment threads by slide.
    #[serde(default)]
    pub comments: HashMap<SlideId, Vec<Comment>>,
}

impl Presentation {
    /// Create an empty presentation.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append a slide.
    #[must_use]
    pub fn with_slide(mut self, slide: Slide) -> Self {
        self.slides.push(slide);
        self
    }

    /// Number of slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Index of the slide with the given id.
    #[must_use]
    pub fn slide_index(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }

    /// Transition for entering the slide at `index` (default: none).
    #[must_use]
    pub fn transition_for(&self, index: usize) -> Transition {
        self.slides
            .get(index)
            .and_then(|s| self.transitions.get(&s.id))
            .cloned()
            .unwrap_or_default()
    }

    /// Speaker notes for the slide at `index`.
    #[must_use]
    pub fn notes_for(&self, index: usize) -> Option<&str> {
        self.slides
            .get(index)
            .and_then(|s| self.notes.get(&s.id))
            .map(String::as_str)
    }

    /// Drop side-table entries whose slide no longer exists.
    pub fn prune_side_tables(&mut self) {
        let live: std::collections::HashSet<SlideId> =
            self.slides.iter().map(|s| s.id.clone()).collect();
        self.notes.retain(|id, _| live.contains(id));
        self.transitions.retain(|id, _| live.contains(id));
        self.comments.retain(|id, _| live.contains(id));
    }

    /// Check structural invariants: unique slide ids and unique element ids
    /// within each slide.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::InvalidDocument`] naming the first duplicate.
    pub fn validate(&self) -> DeckResult<()> {
        let mut slide_ids = std::collections::HashSet::new();
        for slide in &self.slides {
            if !slide_ids.insert(&slide.id) {
                return Err(DeckError::InvalidDocument(format!(
                    "duplicate slide id {}",
                    slide.id
                )));
            }
            let mut element_ids = std::collections::HashSet::new();
            for element in &slide.elements {
                if !element_ids.insert(&element.id) {
                    return Err(DeckError::InvalidDocument(format!(
                        "duplicate element id {} on slide {}",
                        element.id, slide.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serialize the presentation to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DeckResult<String> {
        serde_json::to_string(self).map_err(DeckError::Serialization)
    }

    /// Deserialize and validate a presentation from JSON.
    ///
    /// Negative element sizes are clamped to zero on load.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are duplicated.
    pub fn from_json(json: &str) -> DeckResult<Self> {
        let mut presentation: Self = serde_json::from_str(json)?;
        for slide in &mut presentation.slides {
            for element in &mut slide.elements {
                element.transform = element.transform.normalized();
            }
        }
        presentation.validate()?;
        Ok(presentation)
    }
}

//! Presentation playback: slide cursor, staged reveals and transitions.
//!
//! A [`Playback`] owns a private snapshot of the presentation, so edits made
//! after playback starts never show up mid-show. On entering a slide its
//! visible elements are split into static ones (shown at once) and an ordered
//! reveal sequence; `advance` and `retreat` move a cursor through that
//! sequence before moving between slides.

use serde::{Deserialize, Serialize};

use crate::element::{Animation, AnimationKind, Element, ElementId};
use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::presentation::{Presentation, Transition, TransitionKind};
use crate::slide::{sort_for_render, Slide};

/// Distance (logical units) a sliding reveal travels.
const REVEAL_TRAVEL: f32 = 40.0;

/// Result of one navigation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// An element was revealed on the current slide.
    Revealed(ElementId),
    /// The last revealed element was hidden again.
    Hidden(ElementId),
    /// The cursor moved to another slide.
    SlideChanged {
        /// Previous slide index.
        from: usize,
        /// New slide index.
        to: usize,
    },
    /// Already at the end of the last slide.
    End,
    /// Already at the start of the first slide.
    Start,
}

/// Reveal state of one element on the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Not animated; visible from slide entry.
    Static,
    /// Animated and not yet revealed.
    Pending,
    /// Animated and revealed.
    Revealed,
}

/// Visual style of an element or slide at one end of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Opacity (0..=1).
    pub opacity: f32,
    /// Horizontal offset in logical units.
    pub offset_x: f32,
    /// Vertical offset in logical units.
    pub offset_y: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Style {
    /// Fully visible at rest.
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    const fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::SHOWN
        }
    }
}

/// Start and end style of one side of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StylePair {
    /// Style at the start.
    pub from: Style,
    /// Style at the end.
    pub to: Style,
}

impl Animation {
    /// Style of the element before it is revealed.
    #[must_use]
    pub fn hidden_style(&self) -> Style {
        let hidden = Style::hidden();
        match self.kind {
            AnimationKind::None => Style::SHOWN,
            AnimationKind::FadeIn => hidden,
            AnimationKind::SlideUp => Style {
                offset_y: REVEAL_TRAVEL,
                ..hidden
            },
            AnimationKind::SlideDown => Style {
                offset_y: -REVEAL_TRAVEL,
                ..hidden
            },
            AnimationKind::SlideLeft => Style {
                offset_x: REVEAL_TRAVEL,
                ..hidden
            },
            AnimationKind::SlideRight => Style {
                offset_x: -REVEAL_TRAVEL,
                ..hidden
            },
            AnimationKind::ZoomIn => Style {
                scale: 0.8,
                ..hidden
            },
            AnimationKind::Bounce => Style {
                scale: 0.3,
                ..hidden
            },
        }
    }

    /// Style of the element once revealed.
    #[must_use]
    pub fn shown_style(&self) -> Style {
        Style::SHOWN
    }
}

impl Transition {
    /// Styles for the incoming and outgoing slide, or `None` for a cut.
    #[must_use]
    pub fn styles(&self) -> Option<(StylePair, StylePair)> {
        let shown = Style::SHOWN;
        let slide = |dx: f32, dy: f32| {
            (
                StylePair {
                    from: Style {
                        offset_x: dx,
                        offset_y: dy,
                        ..shown
                    },
                    to: shown,
                },
                StylePair {
                    from: shown,
                    to: Style {
                        offset_x: -dx,
                        offset_y: -dy,
                        ..shown
                    },
                },
            )
        };
        let pair = match self.kind {
            TransitionKind::None => return None,
            TransitionKind::Fade => (
                StylePair {
                    from: Style::hidden(),
                    to: shown,
                },
                StylePair {
                    from: shown,
                    to: Style::hidden(),
                },
            ),
            TransitionKind::SlideLeft => slide(CANVAS_WIDTH, 0.0),
            TransitionKind::SlideRight => slide(-CANVAS_WIDTH, 0.0),
            TransitionKind::SlideUp => slide(0.0, CANVAS_HEIGHT),
            TransitionKind::SlideDown => slide(0.0, -CANVAS_HEIGHT),
            TransitionKind::Zoom => (
                StylePair {
                    from: Style {
                        scale: 0.8,
                        ..Style::hidden()
                    },
                    to: shown,
                },
                StylePair {
                    from: shown,
                    to: Style {
                        scale: 1.2,
                        ..Style::hidden()
                    },
                },
            ),
        };
        Some(pair)
    }
}

/// A slide change in progress. Both slides are mounted until
/// [`Playback::finish_transition`] unmounts the outgoing one.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTransition {
    /// Outgoing slide index.
    pub from: usize,
    /// Incoming slide index.
    pub to: usize,
    /// Transition descriptor of the incoming slide.
    pub transition: Transition,
    /// Incoming slide styles.
    pub enter: StylePair,
    /// Outgoing slide styles.
    pub exit: StylePair,
}

/// Playback state over a presentation snapshot.
#[derive(Debug, Clone)]
pub struct Playback {
    presentation: Presentation,
    slide: usize,
    sequence: Vec<ElementId>,
    revealed: usize,
    transition: Option<ActiveTransition>,
}

impl Playback {
    /// Start playback at the first slide.
    #[must_use]
    pub fn new(presentation: Presentation) -> Self {
        let mut playback = Self {
            presentation,
            slide: 0,
            sequence: Vec::new(),
            revealed: 0,
            transition: None,
        };
        playback.enter(0);
        playback
    }

    /// The snapshot being played.
    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Number of slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.presentation.slides.len()
    }

    /// Index of the current slide.
    #[must_use]
    pub fn current_slide_index(&self) -> usize {
        self.slide
    }

    /// The current slide.
    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        self.presentation.slides.get(self.slide)
    }

    /// Ordered reveal sequence of the current slide.
    #[must_use]
    pub fn sequence(&self) -> &[ElementId] {
        &self.sequence
    }

    /// Number of revealed elements on the current slide.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Whether every animated element of the current slide is revealed.
    #[must_use]
    pub fn reveal_complete(&self) -> bool {
        self.revealed >= self.sequence.len()
    }

    /// Whether the cursor is on the last slide.
    #[must_use]
    pub fn is_last_slide(&self) -> bool {
        self.slide + 1 >= self.slide_count()
    }

    /// Speaker notes of the current slide.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.presentation.notes_for(self.slide)
    }

    /// The slide change in progress, if any.
    #[must_use]
    pub fn transition(&self) -> Option<&ActiveTransition> {
        self.transition.as_ref()
    }

    /// Unmount the outgoing slide of the active transition.
    pub fn finish_transition(&mut self) -> Option<ActiveTransition> {
        self.transition.take()
    }

    /// Reveal state of an element on the current slide.
    #[must_use]
    pub fn reveal_state(&self, id: &ElementId) -> Option<RevealState> {
        let slide = self.current_slide()?;
        let elements = slide.resolved_elements();
        if !elements.iter().any(|e| &e.id == id && e.visible) {
            return None;
        }
        Some(match self.sequence.iter().position(|s| s == id) {
            None => RevealState::Static,
            Some(pos) if pos < self.revealed => RevealState::Revealed,
            Some(_) => RevealState::Pending,
        })
    }

    /// Whether an element on the current slide is currently shown.
    #[must_use]
    pub fn is_visible(&self, id: &ElementId) -> bool {
        matches!(
            self.reveal_state(id),
            Some(RevealState::Static | RevealState::Revealed)
        )
    }

    /// Elements currently shown on the current slide, in paint order.
    #[must_use]
    pub fn visible_elements(&self) -> Vec<Element> {
        let Some(slide) = self.current_slide() else {
            return Vec::new();
        };
        let pending = &self.sequence[self.revealed.min(self.sequence.len())..];
        let elements = slide.resolved_elements();
        sort_for_render(&elements)
            .into_iter()
            .filter(|e| e.visible && !pending.contains(&e.id))
            .cloned()
            .collect()
    }

    /// Reveal the next element, or move to the next slide.
    pub fn advance(&mut self) -> Step {
        if let Some(id) = self.reveal_next() {
            return Step::Revealed(id);
        }
        if self.is_last_slide() {
            return Step::End;
        }
        self.change_slide(self.slide + 1)
    }

    /// Reveal the next element without ever leaving the slide.
    pub fn reveal_next(&mut self) -> Option<ElementId> {
        let id = self.sequence.get(self.revealed)?.clone();
        self.revealed += 1;
        tracing::trace!(element_id = %id, revealed = self.revealed, "Revealed element");
        Some(id)
    }

    /// Hide the last revealed element, or move to the previous slide.
    pub fn retreat(&mut self) -> Step {
        if self.revealed > 0 {
            self.revealed -= 1;
            return Step::Hidden(self.sequence[self.revealed].clone());
        }
        if self.slide == 0 {
            return Step::Start;
        }
        self.change_slide(self.slide - 1)
    }

    /// Jump to the next slide, skipping pending reveals.
    pub fn next_slide(&mut self) -> Step {
        if self.is_last_slide() {
            return Step::End;
        }
        self.change_slide(self.slide + 1)
    }

    /// Jump to the previous slide.
    pub fn previous_slide(&mut self) -> Step {
        if self.slide == 0 {
            return Step::Start;
        }
        self.change_slide(self.slide - 1)
    }

    /// Jump to a slide by index. Out-of-range or current indices are ignored.
    pub fn go_to_slide(&mut self, index: usize) -> Option<Step> {
        if index >= self.slide_count() || index == self.slide {
            return None;
        }
        Some(self.change_slide(index))
    }

    fn change_slide(&mut self, to: usize) -> Step {
        let from = self.slide;
        let transition = self.presentation.transition_for(to);
        self.transition = transition.styles().map(|(enter, exit)| ActiveTransition {
            from,
            to,
            transition,
            enter,
            exit,
        });
        self.enter(to);
        tracing::debug!(from, to, "Slide changed");
        Step::SlideChanged { from, to }
    }

    fn enter(&mut self, index: usize) {
        self.slide = index;
        self.revealed = 0;
        self.sequence = self
            .current_slide()
            .map(|slide| reveal_sequence(&slide.resolved_elements()))
            .unwrap_or_default();
    }
}

/// Order the animated, visible elements of a slide for revealing.
///
/// Elements with an explicit `animation_order` come first in that order;
/// the rest follow by animation delay. Insertion index breaks ties.
#[must_use]
pub fn reveal_sequence(elements: &[Element]) -> Vec<ElementId> {
    let mut animated: Vec<(usize, &Element)> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.visible && e.is_animated())
        .collect();
    animated.sort_by(|(ia, a), (ib, b)| {
        let delay = |e: &Element| e.animation.as_ref().map_or(0.0, |a| a.delay);
        match (a.animation_order, b.animation_order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => delay(a).total_cmp(&delay(b)),
        }
        .then_with(|| ia.cmp(ib))
    });
    animated.into_iter().map(|(_, e)| e.id.clone()).collect()
}

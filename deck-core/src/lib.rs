//! # Deck Core
//!
//! Core slide deck logic: the presentation model, the canvas editing
//! session, and presentation playback.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  deck-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Model           │  Editing                 │
//! │  - Presentation  │  - Selection / marquee   │
//! │  - Slides        │  - Drag, z-order         │
//! │  - Elements      │  - Clipboard, undo       │
//! ├─────────────────────────────────────────────┤
//! │  Playback        │  Persistence             │
//! │  - Reveal cursor │  - JSON documents        │
//! │  - Transitions   │  - Debounced autosave    │
//! │  - Auto-play     │                          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All geometry is authored in a 960×540 logical canvas; output backends
//! scale it (see `deck-renderer`).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod autoplay;
pub mod autosave;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod playback;
pub mod presentation;
pub mod slide;
pub mod viewport;

pub use autoplay::{AutoPlayer, PlaybackConfig, RevealInterval};
pub use autosave::{AutosaveConfig, AutosaveStore};
pub use editor::{Alignment, ClipboardEntry, EditorConfig, EditorSession};
pub use element::{
    Animation, AnimationKind, Border, ChartContent, ChartPoint, ChartType, CodeContent, CodeTheme,
    Easing, Element, ElementId, ElementKind, Filter, IconBackground, IconContent, ImageContent,
    ImageFit, MediaContent, Shadow, ShapeContent, ShapeType, Stroke, TableCell, TableContent,
    TextAlign, TextContent, Transform,
};
pub use error::{DeckError, DeckResult};
pub use geometry::{Rect, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use playback::{ActiveTransition, Playback, RevealState, Step, Style, StylePair};
pub use presentation::{Comment, Presentation, Transition, TransitionKind};
pub use slide::{Slide, SlideId, SlideLayout};
pub use viewport::{PanModifier, Viewport};

/// Deck core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

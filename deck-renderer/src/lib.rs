//! # Deck Renderer
//!
//! Exports `deck-core` presentations to PowerPoint packages, PDF documents
//! and PNG images.
//!
//! ## Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        render_element / ElementSink         │
//! ├──────────────────────┬──────────────────────┤
//! │ PptxSink             │ SvgSink              │
//! │ (DrawingML, EMU)     │ (SVG → resvg)        │
//! ├──────────────────────┼──────────────────────┤
//! │ .pptx package        │ PDF pages / PNG      │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Geometry is authored on a 960×540 logical canvas and scaled per backend
//! (see [`transform`]). A failing element is skipped with a warning; a
//! failing slide capture is left out of the output. Both end up in the
//! [`ExportReport`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod chart;
pub mod color;
pub mod error;
pub mod export;
pub mod icons;
pub mod pdf;
pub mod pptx;
pub mod raster;
pub mod report;
pub mod sink;
pub mod svg;
pub mod transform;

#[cfg(feature = "remote-assets")]
pub use assets::HttpAssetLoader;
pub use assets::{AssetCache, AssetLoader, ImageFormat, LoadedImage, LocalAssetLoader};
pub use color::Rgba;
pub use error::{ExportError, ExportResult, RenderError, RenderResult};
pub use export::{
    png_file_name, CancelSignal, DeckExporter, ExportArtifact, ExportConfig, ExportFormat,
    ExportOutput, PngPage,
};
pub use pptx::PptxPackage;
pub use raster::{SlideCapture, SlideRenderer, SvgSlideRenderer};
pub use report::{ExportReport, RenderWarning, SlideFailure};
pub use sink::{render_element, render_slide, ElementSink, MediaKind};
pub use transform::{CoordinateTransform, Frame};

/// Deck renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Renderer and export error types.

use thiserror::Error;

use crate::export::ExportOutput;
use crate::report::ExportReport;

/// Result type for per-element and per-slide rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for whole-presentation exports.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while rendering one element or capturing one slide.
///
/// None of these abort an export: element errors become warnings and capture
/// errors become slide failures in the [`ExportReport`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// Resource loading failed (unreadable image, unknown icon).
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Slide capture failed.
    #[error("Frame render failed: {0}")]
    Frame(String),

    /// Encoding an intermediate image failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Errors that abort a whole export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The caller cancelled the export between slides.
    #[error("Export cancelled after {completed} slide(s)")]
    Cancelled {
        /// Slides fully processed before cancellation.
        completed: usize,
        /// What those slides produced, if any made it into the output.
        partial: Option<Box<ExportOutput>>,
    },

    /// Every slide failed, so there is no artifact.
    #[error("Nothing exported: {}", report.summary())]
    NothingExported {
        /// Report describing each failure.
        report: ExportReport,
    },

    /// Writing the artifact container failed.
    #[error("Package error: {0}")]
    Package(String),

    /// I/O error writing artifact files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Package(err.to_string())
    }
}

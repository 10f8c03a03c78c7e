//! Presentation export orchestration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use deck_core::Presentation;

use crate::assets::{AssetCache, AssetLoader, LocalAssetLoader};
use crate::color::Rgba;
use crate::error::{ExportError, ExportResult};
use crate::pdf::PdfBuilder;
use crate::pptx::PptxPackage;
use crate::raster::{SlideRenderer, SvgSlideRenderer};
use crate::report::ExportReport;
use crate::transform::{RASTER_HEIGHT, RASTER_WIDTH};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Editable PowerPoint package.
    Pptx,
    /// One PDF page per slide.
    Pdf,
    /// One PNG image per slide.
    Png,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pptx" => Ok(Self::Pptx),
            "pdf" => Ok(Self::Pdf),
            "png" | "images" => Ok(Self::Png),
            other => Err(format!("unknown export format '{other}' (expected pptx, pdf or png)")),
        }
    }
}

/// Configuration for presentation export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Background for slides whose own background is missing or transparent.
    pub background: Rgba,
    /// DPI mapping captured pixels to PDF page size (default: 96.0).
    pub pdf_dpi: f32,
    /// Raster capture width in pixels (default: 1920).
    pub raster_width: u32,
    /// Raster capture height in pixels (default: 1080).
    pub raster_height: u32,
    /// Icon rasterization factor for PPTX relative to placed size (default: 2.0).
    pub icon_oversample: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            pdf_dpi: 96.0,
            raster_width: RASTER_WIDTH,
            raster_height: RASTER_HEIGHT,
            icon_oversample: 2.0,
        }
    }
}

/// Cooperative cancellation flag, checked between slides.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    /// A signal that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One exported slide image.
#[derive(Debug, Clone)]
pub struct PngPage {
    /// Zero-based index of the source slide.
    pub slide_index: usize,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

/// File name for a slide image: `<stem>-slide-<n>.png`, `n` one-based.
#[must_use]
pub fn png_file_name(stem: &str, slide_index: usize) -> String {
    format!("{stem}-slide-{}.png", slide_index + 1)
}

/// The exported bytes.
#[derive(Debug, Clone)]
pub enum ExportArtifact {
    /// A `.pptx` package.
    Pptx(Vec<u8>),
    /// A `.pdf` document.
    Pdf {
        /// Document bytes.
        bytes: Vec<u8>,
        /// Page count.
        pages: usize,
    },
    /// Slide images in slide order.
    Png(Vec<PngPage>),
}

impl ExportArtifact {
    /// Write the artifact into `dir`, creating it if needed, and return the
    /// files written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if a file cannot be written.
    pub async fn write_to(&self, dir: &Path, stem: &str) -> ExportResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;
        let mut written = Vec::new();
        match self {
            Self::Pptx(bytes) => {
                let path = dir.join(format!("{stem}.pptx"));
                tokio::fs::write(&path, bytes).await?;
                written.push(path);
            }
            Self::Pdf { bytes, .. } => {
                let path = dir.join(format!("{stem}.pdf"));
                tokio::fs::write(&path, bytes).await?;
                written.push(path);
            }
            Self::Png(pages) => {
                for page in pages {
                    let path = dir.join(png_file_name(stem, page.slide_index));
                    tokio::fs::write(&path, &page.bytes).await?;
                    written.push(path);
                }
            }
        }
        Ok(written)
    }
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Exported bytes.
    pub artifact: ExportArtifact,
    /// What was exported and what was skipped.
    pub report: ExportReport,
}

/// Exports presentations to PPTX, PDF or PNG.
///
/// Every export works on its own snapshot of the presentation and processes
/// slides strictly one at a time, in order.
pub struct DeckExporter {
    config: ExportConfig,
    loader: Arc<dyn AssetLoader>,
    renderer: Arc<dyn SlideRenderer>,
}

impl DeckExporter {
    /// Exporter with local asset loading and the resvg slide renderer.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let renderer =
            SvgSlideRenderer::new(config.raster_width, config.raster_height, config.background);
        Self {
            config,
            loader: Arc::new(LocalAssetLoader::new()),
            renderer: Arc::new(renderer),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Replace the asset loader.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn AssetLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the slide renderer used by raster formats.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn SlideRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `presentation` to `format`.
    ///
    /// Elements that fail to render are skipped and slides that fail to
    /// capture are left out; both are listed in the report.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Cancelled`] if `cancel` fires between slides. The
    ///   slides finished before that come back as a partial output.
    /// - [`ExportError::NothingExported`] if no slide made it into the output.
    /// - [`ExportError::Package`] if the container cannot be assembled.
    pub async fn export(
        &self,
        presentation: &Presentation,
        format: ExportFormat,
        cancel: &CancelSignal,
    ) -> ExportResult<ExportOutput> {
        let snapshot = presentation.clone();
        tracing::info!(
            presentation = %snapshot.id,
            %format,
            slides = snapshot.slides.len(),
            "Export started"
        );

        let pass = match format {
            ExportFormat::Pptx => self.export_pptx(&snapshot, cancel).await?,
            ExportFormat::Pdf | ExportFormat::Png => {
                self.export_raster(&snapshot, format, cancel).await?
            }
        };
        let report = pass.report;

        if let Some(completed) = pass.cancelled_at {
            tracing::info!(completed, summary = %report.summary(), "Export cancelled");
            return Err(ExportError::Cancelled {
                completed,
                partial: pass
                    .artifact
                    .map(|artifact| Box::new(ExportOutput { artifact, report })),
            });
        }

        let Some(artifact) = pass.artifact else {
            tracing::warn!(summary = %report.summary(), "Export produced nothing");
            return Err(ExportError::NothingExported { report });
        };
        tracing::info!(summary = %report.summary(), "Export finished");
        Ok(ExportOutput { artifact, report })
    }

    async fn export_pptx(
        &self,
        presentation: &Presentation,
        cancel: &CancelSignal,
    ) -> ExportResult<Pass> {
        let mut report = ExportReport::new(presentation.slides.len());
        let mut cancelled_at = None;
        let mut package = PptxPackage::new(
            presentation.title.clone(),
            self.config.background,
            self.config.icon_oversample,
        );

        for (idx, slide) in presentation.slides.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled_at = Some(idx);
                break;
            }
            let assets = AssetCache::resolve(self.loader.as_ref(), &slide.resolved_elements()).await;
            let warnings =
                package.add_slide(slide, idx, &presentation.transition_for(idx), &assets);
            report.warnings.extend(warnings);
            report.exported_slides += 1;
        }

        let artifact = if package.slide_count() == 0 {
            None
        } else {
            Some(ExportArtifact::Pptx(package.finish()?))
        };
        Ok(Pass {
            artifact,
            report,
            cancelled_at,
        })
    }

    async fn export_raster(
        &self,
        presentation: &Presentation,
        format: ExportFormat,
        cancel: &CancelSignal,
    ) -> ExportResult<Pass> {
        let mut report = ExportReport::new(presentation.slides.len());
        let mut cancelled_at = None;
        let mut pdf = PdfBuilder::new(presentation.title.clone(), self.config.pdf_dpi);
        let mut images = Vec::new();

        for (idx, slide) in presentation.slides.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled_at = Some(idx);
                break;
            }
            let assets = AssetCache::resolve(self.loader.as_ref(), &slide.resolved_elements()).await;

            let capture = match self.renderer.capture(slide, idx, &assets).await {
                Ok(capture) => capture,
                Err(e) => {
                    tracing::warn!(slide_index = idx, error = %e, "Slide capture failed");
                    report.fail(idx, e.to_string());
                    continue;
                }
            };

            if format == ExportFormat::Pdf {
                if let Err(e) = pdf.add_page(&capture) {
                    tracing::warn!(slide_index = idx, error = %e, "Failed to add PDF page");
                    report.fail(idx, e.to_string());
                    continue;
                }
            } else {
                images.push(PngPage {
                    slide_index: idx,
                    bytes: capture.png,
                });
            }
            report.warnings.extend(capture.warnings);
            report.exported_slides += 1;
        }

        let artifact = if format == ExportFormat::Pdf {
            let pages = pdf.page_count();
            pdf.finish()
                .map_err(|e| ExportError::Package(e.to_string()))?
                .map(|bytes| ExportArtifact::Pdf { bytes, pages })
        } else if images.is_empty() {
            None
        } else {
            Some(ExportArtifact::Png(images))
        };
        Ok(Pass {
            artifact,
            report,
            cancelled_at,
        })
    }
}

/// One walk over the slides, possibly stopped early.
struct Pass {
    artifact: Option<ExportArtifact>,
    report: ExportReport,
    /// Slide index the cancel signal was seen at.
    cancelled_at: Option<usize>,
}

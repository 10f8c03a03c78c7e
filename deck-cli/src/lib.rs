//! # Deck CLI
//!
//! Command-line front end for deck presentations.
//!
//! ## Usage
//!
//! ```bash
//! # Export to PowerPoint next to the input
//! deck export talk.json --format pptx
//!
//! # One PNG per slide into ./out (or $DECK_OUTPUT_DIR)
//! deck export talk.json --format png --out-dir out
//!
//! # Slide and element overview
//! deck inspect talk.json
//!
//! # Walk through the reveal sequence
//! deck play talk.json
//! ```
//!
//! Set `RUST_LOG` to adjust verbosity and `RUST_LOG_FORMAT=json` for
//! structured log lines on stderr.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use deck_core::{Playback, Presentation, Step};
use deck_renderer::{
    AssetLoader, CancelSignal, DeckExporter, ExportConfig, ExportFormat, ExportReport,
    LocalAssetLoader,
};

/// Command-line arguments for `deck`.
#[derive(Debug, Clone, Parser)]
#[command(name = "deck")]
#[command(about = "Export, inspect and play slide decks")]
#[command(version)]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Export a presentation to PPTX, PDF or PNG images.
    Export(ExportArgs),
    /// Print an overview of a presentation.
    Inspect {
        /// Presentation JSON file.
        input: PathBuf,
        /// Print the overview as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Step through a presentation as a presenter would.
    Play {
        /// Presentation JSON file.
        input: PathBuf,
        /// Stop after this many steps.
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,
    },
}

/// Arguments for `deck export`.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Presentation JSON file.
    pub input: PathBuf,

    /// Output format: pptx, pdf or png
    #[arg(short, long, default_value = "pptx")]
    pub format: ExportFormat,

    /// Directory for the exported files
    #[arg(short, long, env = "DECK_OUTPUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output file stem (default: input file stem)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory relative image paths resolve against (default: input directory)
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    /// Raster width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Raster height in pixels
    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    /// PDF page DPI
    #[arg(long, default_value_t = 96.0)]
    pub dpi: f32,

    /// Also write the export report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl ExportArgs {
    /// Export configuration for these arguments.
    #[must_use]
    pub fn config(&self) -> ExportConfig {
        ExportConfig {
            raster_width: self.width,
            raster_height: self.height,
            pdf_dpi: self.dpi,
            ..ExportConfig::default()
        }
    }

    /// Stem used for output file names.
    #[must_use]
    pub fn stem(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map_or_else(|| "presentation".to_string(), |s| s.to_string_lossy().into_owned())
        })
    }

    fn asset_loader(&self) -> Arc<dyn AssetLoader> {
        let base = self.asset_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        });
        let local = LocalAssetLoader::with_base_dir(base);
        #[cfg(feature = "remote-assets")]
        {
            Arc::new(deck_renderer::HttpAssetLoader::new(local))
        }
        #[cfg(not(feature = "remote-assets"))]
        {
            Arc::new(local)
        }
    }
}

/// Files written by an export and its report.
#[derive(Debug)]
pub struct ExportSummary {
    /// Paths written, in slide order.
    pub files: Vec<PathBuf>,
    /// Export report.
    pub report: ExportReport,
}

/// Read and validate a presentation JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid
/// presentation.
pub async fn load_presentation(path: &Path) -> anyhow::Result<Presentation> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Presentation::from_json(&json).with_context(|| format!("Invalid presentation {}", path.display()))
}

/// Run `deck export`.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the export produces
/// nothing, or the output cannot be written.
pub async fn run_export(args: &ExportArgs) -> anyhow::Result<ExportSummary> {
    let presentation = load_presentation(&args.input).await?;
    let exporter = DeckExporter::new(args.config()).with_loader(args.asset_loader());

    let output = exporter
        .export(&presentation, args.format, &CancelSignal::new())
        .await
        .with_context(|| format!("Failed to export {}", args.input.display()))?;
    let files = output
        .artifact
        .write_to(&args.out_dir, &args.stem())
        .await
        .with_context(|| format!("Failed to write into {}", args.out_dir.display()))?;

    if let Some(path) = &args.report {
        let json = output.report.to_json()?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    Ok(ExportSummary {
        files,
        report: output.report,
    })
}

/// Human-readable overview of a presentation.
#[must_use]
pub fn inspect(presentation: &Presentation) -> String {
    let mut out = format!(
        "{} ({} slides)\n",
        if presentation.title.is_empty() {
            "Untitled"
        } else {
            presentation.title.as_str()
        },
        presentation.slide_count()
    );
    for (idx, slide) in presentation.slides.iter().enumerate() {
        let animated = slide.elements.iter().filter(|e| e.is_animated()).count();
        let _ = write!(
            out,
            "{:>3}. {:?} {} element(s), {animated} animated",
            idx + 1,
            slide.layout,
            slide.elements.len(),
        );
        if !slide.title.is_empty() {
            let _ = write!(out, " - {}", slide.title);
        }
        if presentation.notes_for(idx).is_some() {
            out.push_str(" [notes]");
        }
        out.push('\n');
    }
    out
}

/// Overview of a presentation as JSON.
#[must_use]
pub fn inspect_json(presentation: &Presentation) -> serde_json::Value {
    let slides: Vec<serde_json::Value> = presentation
        .slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| {
            serde_json::json!({
                "index": idx,
                "id": slide.id.as_str(),
                "layout": slide.layout,
                "title": slide.title,
                "elements": slide.elements.len(),
                "animated": slide.elements.iter().filter(|e| e.is_animated()).count(),
                "transition": presentation.transition_for(idx).kind,
            })
        })
        .collect();
    serde_json::json!({
        "id": presentation.id,
        "title": presentation.title,
        "slides": slides,
    })
}

/// Advance through the whole presentation, one line per step.
#[must_use]
pub fn play_through(presentation: Presentation, max_steps: usize) -> Vec<String> {
    let mut playback = Playback::new(presentation);
    let mut lines = Vec::new();
    if playback.slide_count() == 0 {
        return lines;
    }
    lines.push(format!(
        "slide 1/{}: {} static, {} to reveal",
        playback.slide_count(),
        playback.visible_elements().len(),
        playback.sequence().len()
    ));
    for _ in 0..max_steps {
        match playback.advance() {
            Step::Revealed(id) => lines.push(format!("  reveal {id}")),
            Step::SlideChanged { to, .. } => lines.push(format!(
                "slide {}/{}: {} static, {} to reveal",
                to + 1,
                playback.slide_count(),
                playback.visible_elements().len(),
                playback.sequence().len()
            )),
            Step::End => {
                lines.push("end".to_string());
                break;
            }
            Step::Hidden(_) | Step::Start => {}
        }
    }
    lines
}

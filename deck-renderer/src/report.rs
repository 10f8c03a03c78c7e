//! Export outcome reporting.

use std::fmt::Write;

use serde::Serialize;

/// An element that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderWarning {
    /// Zero-based slide index.
    pub slide_index: usize,
    /// Id of the skipped element.
    pub element_id: String,
    /// Why it was skipped.
    pub reason: String,
}

/// A slide that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFailure {
    /// Zero-based slide index.
    pub slide_index: usize,
    /// Why the capture failed.
    pub reason: String,
}

/// What an export produced and what it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    /// Slides in the input.
    pub total_slides: usize,
    /// Slides present in the artifact.
    pub exported_slides: usize,
    /// Skipped elements.
    pub warnings: Vec<RenderWarning>,
    /// Skipped slides.
    pub failed_slides: Vec<SlideFailure>,
}

impl ExportReport {
    /// Empty report for a presentation of `total_slides`.
    #[must_use]
    pub fn new(total_slides: usize) -> Self {
        Self {
            total_slides,
            ..Self::default()
        }
    }

    /// Whether everything was exported without warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failed_slides.is_empty()
    }

    /// Record a skipped element.
    pub fn warn(&mut self, slide_index: usize, element_id: impl Into<String>, reason: impl Into<String>) {
        self.warnings.push(RenderWarning {
            slide_index,
            element_id: element_id.into(),
            reason: reason.into(),
        });
    }

    /// Record a failed slide.
    pub fn fail(&mut self, slide_index: usize, reason: impl Into<String>) {
        self.failed_slides.push(SlideFailure {
            slide_index,
            reason: reason.into(),
        });
    }

    /// Pretty-printed JSON with `camelCase` keys.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One-line human summary, e.g. `exported 7/8 slides; slide 3 failed`.
    /// Slide numbers are one-based.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "exported {}/{} slides",
            self.exported_slides, self.total_slides
        );
        if !self.failed_slides.is_empty() {
            let numbers: Vec<String> = self
                .failed_slides
                .iter()
                .map(|f| (f.slide_index + 1).to_string())
                .collect();
            let noun = if numbers.len() == 1 { "slide" } else { "slides" };
            let _ = write!(out, "; {noun} {} failed", numbers.join(", "));
        }
        if !self.warnings.is_empty() {
            let noun = if self.warnings.len() == 1 {
                "element"
            } else {
                "elements"
            };
            let _ = write!(out, "; {} {noun} skipped", self.warnings.len());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut report = ExportReport::new(8);
        report.exported_slides = 7;
        report.fail(2, "capture failed");
        assert_eq!(report.summary(), "exported 7/8 slides; slide 3 failed");

        report.warn(4, "img-1", "unreadable image");
        assert_eq!(
            report.summary(),
            "exported 7/8 slides; slide 3 failed; 1 element skipped"
        );
        assert!(!report.is_clean());

        let json = report.to_json().expect("json");
        assert!(json.contains("\"exportedSlides\": 7"));
        assert!(json.contains("\"elementId\": \"img-1\""));
    }
}

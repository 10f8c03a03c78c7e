//! PDF assembly: one page per captured slide.

use crate::error::{RenderError, RenderResult};
use crate::raster::SlideCapture;

/// Builds a PDF incrementally; the document exists once the first page is
/// added.
pub struct PdfBuilder {
    title: String,
    dpi: f32,
    doc: Option<printpdf::PdfDocumentReference>,
    pages: usize,
}

impl PdfBuilder {
    /// Builder for a document titled `title`, mapping pixels to pages at
    /// `dpi`.
    #[must_use]
    pub fn new(title: impl Into<String>, dpi: f32) -> Self {
        Self {
            title: title.into(),
            dpi: if dpi > 0.0 { dpi } else { 96.0 },
            doc: None,
            pages: 0,
        }
    }

    /// Pages added so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Append a page showing `capture` edge to edge.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the capture cannot be decoded.
    #[allow(clippy::cast_precision_loss)]
    pub fn add_page(&mut self, capture: &SlideCapture) -> RenderResult<()> {
        // One page per capture, sized so the capture fills it at `dpi`.
        let page_width_mm = capture.width as f32 / self.dpi * 25.4;
        let page_height_mm = capture.height as f32 / self.dpi * 25.4;

        let dynamic_image = printpdf::image_crate::load_from_memory(&capture.png)
            .map_err(|e| RenderError::Encode(format!("Failed to decode PNG for PDF: {e}")))?;

        let layer = match &self.doc {
            Some(doc) => {
                let (page, layer) = doc.add_page(
                    printpdf::Mm(page_width_mm),
                    printpdf::Mm(page_height_mm),
                    "Layer 1",
                );
                doc.get_page(page).get_layer(layer)
            }
            None => {
                let (doc, page, layer) = printpdf::PdfDocument::new(
                    &self.title,
                    printpdf::Mm(page_width_mm),
                    printpdf::Mm(page_height_mm),
                    "Layer 1",
                );
                let current = doc.get_page(page).get_layer(layer);
                self.doc = Some(doc);
                current
            }
        };

        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);
        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            dpi: Some(self.dpi),
            ..Default::default()
        };
        pdf_image.add_to_layer(layer, transform);
        self.pages += 1;
        Ok(())
    }

    /// Serialize the document, or `None` if no page was added.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if serialization fails.
    pub fn finish(self) -> RenderResult<Option<Vec<u8>>> {
        self.doc
            .map(|doc| {
                doc.save_to_bytes()
                    .map_err(|e| RenderError::Encode(format!("PDF save failed: {e}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::tiny_png;

    fn capture() -> SlideCapture {
        SlideCapture {
            png: tiny_png(),
            width: 2,
            height: 1,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_empty_builder_has_no_document() {
        let builder = PdfBuilder::new("Deck", 96.0);
        assert!(builder.finish().expect("finish").is_none());
    }

    #[test]
    fn test_pages_are_counted() {
        let mut builder = PdfBuilder::new("Deck", 96.0);
        builder.add_page(&capture()).expect("page 1");
        builder.add_page(&capture()).expect("page 2");
        assert_eq!(builder.page_count(), 2);

        let bytes = builder.finish().expect("finish").expect("document");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_undecodable_capture_is_rejected() {
        let mut builder = PdfBuilder::new("Deck", 96.0);
        let mut bad = capture();
        bad.png = b"nope".to_vec();
        assert!(matches!(builder.add_page(&bad), Err(RenderError::Encode(_))));
        assert_eq!(builder.page_count(), 0);
    }
}

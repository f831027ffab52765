//! Form filling

use crate::date::format_generation_date;
use crate::layout::{FormField, FormLayout};
use crate::record::FormRecord;
use crate::{FillError, Result};
use chrono::NaiveDate;
use pdf_core::{Overlay, PdfDocument, PdfError, TextStyle};
use std::path::Path;

/// Page that receives the overlay (1-indexed)
const FILLED_PAGE: usize = 1;

fn template_error(err: PdfError) -> FillError {
    FillError::TemplateError(err.to_string())
}

fn render_error(err: PdfError) -> FillError {
    FillError::RenderError(err.to_string())
}

/// A filled form, serialised and ready to persist
///
/// Immutable once created; the caller owns the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl FilledDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of pages, always equal to the template's
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Fills a template's first page from a form record
///
/// Stateless between calls: each fill reads the template, builds a fresh
/// overlay and returns a new document.
#[derive(Debug, Clone, Default)]
pub struct FormFiller {
    layout: FormLayout,
}

impl FormFiller {
    /// Create a filler for a layout
    pub fn new(layout: FormLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    /// Build the overlay for a record
    ///
    /// # Arguments
    /// * `width_mm` - Page width in millimetres
    /// * `height_mm` - Page height in millimetres
    /// * `record` - Field values
    /// * `generated_on` - Date written at the generation date placements
    pub fn build_overlay(
        &self,
        width_mm: f64,
        height_mm: f64,
        record: &FormRecord,
        generated_on: NaiveDate,
    ) -> Result<Overlay> {
        let mut overlay = Overlay::new(width_mm, height_mm);
        let date_text = format_generation_date(generated_on);
        let text_style = self.layout.text_style();

        for placement in &self.layout.fields {
            let text = match placement.field {
                FormField::GenerationDate => date_text.as_str(),
                field => record.text_for(field).unwrap_or_default(),
            };
            let style = TextStyle {
                align: placement.align.into(),
                ..text_style
            };
            overlay
                .text(placement.x, placement.y, text, &style)
                .map_err(render_error)?;
        }

        match self.layout.marker_for(record.selector_key()) {
            Some(marker) => {
                overlay
                    .text(
                        marker.x,
                        marker.y,
                        &self.layout.marker_glyph,
                        &self.layout.marker_text_style(),
                    )
                    .map_err(render_error)?;
            }
            None => {
                if let Some(value) = &record.selector_value {
                    tracing::debug!(selector = %value, "selector value matches no marker");
                }
            }
        }

        Ok(overlay)
    }

    /// Fill a template given as bytes
    ///
    /// Only the first page is changed; other pages pass through as-is.
    pub fn fill(
        &self,
        template: &[u8],
        record: &FormRecord,
        generated_on: NaiveDate,
    ) -> Result<FilledDocument> {
        let mut doc = PdfDocument::open_from_bytes(template).map_err(template_error)?;

        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(FillError::TemplateError("template has no pages".to_string()));
        }

        let size = doc.page_size(FILLED_PAGE).map_err(template_error)?;
        self.layout
            .check_page_size(size.width_mm(), size.height_mm())?;

        let overlay = self.build_overlay(size.width_mm(), size.height_mm(), record, generated_on)?;
        doc.merge_overlay(FILLED_PAGE, &overlay)
            .map_err(render_error)?;
        let bytes = doc.to_bytes().map_err(render_error)?;

        tracing::debug!(
            pages = page_count,
            items = overlay.items().len(),
            bytes = bytes.len(),
            "filled form"
        );

        Ok(FilledDocument { bytes, page_count })
    }

    /// Fill a template read from a file
    pub fn fill_file<P: AsRef<Path>>(
        &self,
        path: P,
        record: &FormRecord,
        generated_on: NaiveDate,
    ) -> Result<FilledDocument> {
        let path = path.as_ref();
        let template = std::fs::read(path).map_err(|e| {
            FillError::TemplateError(format!("Failed to read template {}: {}", path.display(), e))
        })?;
        self.fill(&template, record, generated_on)
    }
}

//! PDF Core - Low-level PDF overlay manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Reading page geometry (with inherited MediaBox support)
//! - Encoding text for the standard Courier fonts (WinAnsiEncoding)
//! - Building a page-sized overlay in millimetres
//! - Compositing an overlay on top of an existing page
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Overlay, PdfDocument, TextStyle};
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! let size = doc.page_size(1)?;
//! let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
//! overlay.text(25.0, 202.0, "John Doe", &TextStyle::default())?;
//! doc.merge_overlay(1, &overlay)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod encoding;
mod overlay;
mod text;

pub use document::{PageSize, PdfDocument};
pub use encoding::{encode_win_ansi, to_hex_string};
pub use overlay::{Overlay, OverlayText, StandardFont, TextStyle};
pub use text::{calculate_x_offset, generate_text_operators, Color, TextRenderContext};

use thiserror::Error;

/// Millimetres per PDF point (1/72 inch)
pub const MM_PER_POINT: f64 = 0.352778;

/// Convert a length in points to millimetres
pub fn points_to_mm(points: f64) -> f64 {
    points * MM_PER_POINT
}

/// Convert a length in millimetres to points
pub fn mm_to_points(mm: f64) -> f64 {
    mm / MM_PER_POINT
}

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("Cannot encode {ch:?} at position {position} in {text:?}")]
    EncodingError {
        text: String,
        ch: char,
        position: usize,
    },

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

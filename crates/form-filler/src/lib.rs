//! Form Filler - fixed-layout form filling over PDF templates
//!
//! This crate provides:
//! - Layout configuration (field placements and selector marker positions)
//! - Layout parsing from JSON
//! - The form record consumed by the filler
//! - Overlay construction and merging onto the template's first page
//!
//! # Example
//!
//! ```ignore
//! use form_filler::{FormFiller, FormRecord};
//!
//! let filler = FormFiller::default();
//! let record = FormRecord::new()
//!     .borrower_name("John Doe")
//!     .authorized_signatory("Sagnik Sinha")
//!     .business_day("07Sep2025")
//!     .margin_amount("2,000.00")
//!     .selector(2);
//! let today = chrono::Local::now().date_naive();
//! let filled = filler.fill_file("Form1.pdf", &record, today)?;
//! filled.save("output.pdf")?;
//! ```

mod date;
mod filler;
mod layout;
pub mod parser;
mod record;

pub use date::format_generation_date;
pub use filler::{FilledDocument, FormFiller};
pub use layout::*;
pub use parser::{load_layout, parse_layout};
pub use record::FormRecord;

use thiserror::Error;

/// Errors that can occur while filling a form
#[derive(Debug, Error)]
pub enum FillError {
    /// The template cannot be read, has no pages, or does not match the layout
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Overlay construction, text encoding, or output serialisation failed
    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid layout: {0}")]
    LayoutError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for form filling operations
pub type Result<T> = std::result::Result<T, FillError>;

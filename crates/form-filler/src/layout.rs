//! Form layout configuration types

use crate::{FillError, Result};
use pdf_core::{StandardFont, TextStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowed difference between declared and actual page size, in millimetres
const PAGE_SIZE_TOLERANCE_MM: f64 = 1.0;

/// RGB Color for overlay text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    /// Red component (0.0 - 1.0)
    pub r: f64,
    /// Green component (0.0 - 1.0)
    pub g: f64,
    /// Blue component (0.0 - 1.0)
    pub b: f64,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::red()
    }
}

impl From<Color> for pdf_core::Color {
    fn from(color: Color) -> Self {
        pdf_core::Color::rgb(color.r as f32, color.g as f32, color.b as f32)
    }
}

/// Font style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    #[serde(rename = "bold-italic")]
    BoldItalic,
}

impl FontStyle {
    /// Courier variant for this style
    pub fn to_standard_font(self) -> StandardFont {
        match self {
            FontStyle::Regular => StandardFont::courier(false, false),
            FontStyle::Bold => StandardFont::courier(true, false),
            FontStyle::Italic => StandardFont::courier(false, true),
            FontStyle::BoldItalic => StandardFont::courier(true, true),
        }
    }
}

/// Text alignment relative to the placement point
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for pdf_core::Align {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => pdf_core::Align::Left,
            Align::Center => pdf_core::Align::Center,
            Align::Right => pdf_core::Align::Right,
        }
    }
}

/// Record field rendered at a placement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// Date the form was generated (not supplied by the record)
    GenerationDate,
    BorrowerName,
    AuthorizedSignatory,
    BusinessDay,
    MarginAmount,
}

/// Fixed position of a field value, in millimetres from the top-left corner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldPlacement {
    pub x: f64,
    /// Baseline Y coordinate
    pub y: f64,
    pub field: FormField,
    #[serde(default)]
    pub align: Align,
}

impl FieldPlacement {
    pub fn new(x: f64, y: f64, field: FormField) -> Self {
        Self {
            x,
            y,
            field,
            align: Align::Left,
        }
    }
}

/// Position of the selection marker for one selector option
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
}

/// Selector value -> marker position
pub type SelectorOptions = BTreeMap<u32, MarkerPosition>;

/// Page size the placements were measured against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageSizeMm {
    pub width: f64,
    pub height: f64,
}

/// Font used for field text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FontSpec {
    /// Font size in points
    #[serde(default = "default_font_size")]
    pub size: f32,

    #[serde(default)]
    pub style: FontStyle,
}

fn default_font_size() -> f32 {
    11.0
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: default_font_size(),
            style: FontStyle::Regular,
        }
    }
}

fn default_marker_glyph() -> String {
    "X".to_string()
}

fn default_marker_style() -> FontStyle {
    FontStyle::Bold
}

/// Complete placement configuration for one template layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormLayout {
    /// Page size the coordinates assume (checked against the template when set)
    #[serde(rename = "pageSize")]
    #[serde(default)]
    pub page_size: Option<PageSizeMm>,

    /// Font for field text
    #[serde(default)]
    pub font: FontSpec,

    /// Color for all overlay text
    #[serde(default)]
    pub color: Color,

    /// Field placements
    pub fields: Vec<FieldPlacement>,

    /// Mutually exclusive marker positions keyed by selector value
    #[serde(default)]
    pub markers: SelectorOptions,

    /// Text drawn at the selected marker position
    #[serde(rename = "markerGlyph")]
    #[serde(default = "default_marker_glyph")]
    pub marker_glyph: String,

    /// Font style of the marker glyph
    #[serde(rename = "markerStyle")]
    #[serde(default = "default_marker_style")]
    pub marker_style: FontStyle,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::credit_agreement()
    }
}

impl FormLayout {
    /// Layout of the credit agreement interest-rate request form
    ///
    /// The generation date appears twice, followed by borrower, signatory,
    /// business day and margin. Markers 1-4 select the interest-rate tier.
    pub fn credit_agreement() -> Self {
        let fields = vec![
            FieldPlacement::new(90.0, 65.0, FormField::GenerationDate),
            FieldPlacement::new(140.0, 36.0, FormField::GenerationDate),
            FieldPlacement::new(25.0, 202.0, FormField::BorrowerName),
            FieldPlacement::new(37.0, 215.5, FormField::AuthorizedSignatory),
            FieldPlacement::new(118.0, 118.0, FormField::BusinessDay),
            FieldPlacement::new(111.0, 126.4, FormField::MarginAmount),
        ];

        let markers = SelectorOptions::from([
            (1, MarkerPosition { x: 51.4, y: 144.0 }),
            (2, MarkerPosition { x: 51.4, y: 152.8 }),
            (3, MarkerPosition { x: 51.4, y: 161.38 }),
            (4, MarkerPosition { x: 51.4, y: 170.0 }),
        ]);

        Self {
            page_size: None,
            font: FontSpec::default(),
            color: Color::red(),
            fields,
            markers,
            marker_glyph: default_marker_glyph(),
            marker_style: default_marker_style(),
        }
    }

    /// Check coordinates, font size and marker glyph
    pub fn validate(&self) -> Result<()> {
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(FillError::LayoutError(format!(
                "font size must be positive, got {}",
                self.font.size
            )));
        }

        if self.marker_glyph.is_empty() {
            return Err(FillError::LayoutError(
                "marker glyph must not be empty".to_string(),
            ));
        }

        for placement in &self.fields {
            check_coordinate(placement.x, placement.y)
                .map_err(|msg| FillError::LayoutError(format!("{:?}: {msg}", placement.field)))?;
        }

        for (key, marker) in &self.markers {
            check_coordinate(marker.x, marker.y)
                .map_err(|msg| FillError::LayoutError(format!("marker {key}: {msg}")))?;
        }

        if let Some(size) = &self.page_size {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(FillError::LayoutError(
                    "page size must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Marker position for a selector value, if it is one of the options
    pub fn marker_for(&self, selector: Option<i64>) -> Option<&MarkerPosition> {
        let key = u32::try_from(selector?).ok()?;
        self.markers.get(&key)
    }

    /// Reject templates whose page size differs from the declared one
    pub fn check_page_size(&self, width_mm: f64, height_mm: f64) -> Result<()> {
        let Some(expected) = &self.page_size else {
            return Ok(());
        };

        if (expected.width - width_mm).abs() > PAGE_SIZE_TOLERANCE_MM
            || (expected.height - height_mm).abs() > PAGE_SIZE_TOLERANCE_MM
        {
            return Err(FillError::TemplateError(format!(
                "template page is {width_mm:.1} x {height_mm:.1} mm, layout expects {:.1} x {:.1} mm",
                expected.width, expected.height
            )));
        }

        Ok(())
    }

    /// Style for field text
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: self.font.style.to_standard_font(),
            size: self.font.size,
            color: self.color.into(),
            align: pdf_core::Align::Left,
        }
    }

    /// Style for the marker glyph
    pub fn marker_text_style(&self) -> TextStyle {
        TextStyle {
            font: self.marker_style.to_standard_font(),
            ..self.text_style()
        }
    }
}

fn check_coordinate(x: f64, y: f64) -> std::result::Result<(), String> {
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("coordinates must be finite, got ({x}, {y})"));
    }
    if x < 0.0 || y < 0.0 {
        return Err(format!("coordinates must not be negative, got ({x}, {y})"));
    }
    Ok(())
}

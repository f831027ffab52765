//! Page-sized overlay surfaces
//!
//! An overlay holds only new text content, positioned in millimetres from
//! the top-left corner of the page with `y` at the text baseline. It is turned
//! into content-stream operators when merged onto a page.

use crate::encoding::{encode_win_ansi, to_hex_string};
use crate::text::{generate_text_operators, Color, TextRenderContext};
use crate::{mm_to_points, Align, Result};
use lopdf::{dictionary, Dictionary};
use std::collections::BTreeSet;

/// Glyph advance for every Courier glyph, in 1/1000 em
const COURIER_ADVANCE: f64 = 600.0;

/// Standard Type1 fonts available without embedding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    #[default]
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// PostScript name used as /BaseFont
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Pick the variant for a weight/slant combination
    pub fn courier(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => StandardFont::CourierBoldOblique,
            (true, false) => StandardFont::CourierBold,
            (false, true) => StandardFont::CourierOblique,
            (false, false) => StandardFont::Courier,
        }
    }

    /// Width in points of `glyphs` characters at `size`
    pub fn text_width_points(&self, glyphs: usize, size: f32) -> f64 {
        glyphs as f64 * COURIER_ADVANCE * size as f64 / 1000.0
    }

    /// Font dictionary for page resources
    pub fn to_dictionary(&self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

/// Font, size, color and alignment for one piece of overlay text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    /// Font size in points
    pub size: f32,
    pub color: Color,
    pub align: Align,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: StandardFont::Courier,
            size: 11.0,
            color: Color::black(),
            align: Align::Left,
        }
    }
}

/// A piece of text placed on an overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    /// X coordinate in millimetres from the left edge
    pub x_mm: f64,
    /// Baseline Y coordinate in millimetres from the top edge
    pub y_mm: f64,
    /// Source text
    pub text: String,
    /// WinAnsi-encoded text
    pub encoded: Vec<u8>,
    pub style: TextStyle,
}

/// Transient page-sized surface holding only new content
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    width_mm: f64,
    height_mm: f64,
    items: Vec<OverlayText>,
}

impl Overlay {
    /// Create an empty overlay with the given page dimensions in millimetres
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            items: Vec::new(),
        }
    }

    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    /// Place text at a position
    ///
    /// The text is encoded immediately. If encoding fails the overlay is
    /// left unchanged.
    ///
    /// # Arguments
    /// * `x_mm` - X coordinate in millimetres (from left)
    /// * `y_mm` - Baseline Y coordinate in millimetres (from top)
    /// * `text` - Text to place (may be empty)
    /// * `style` - Font, size, color and alignment
    pub fn text(&mut self, x_mm: f64, y_mm: f64, text: &str, style: &TextStyle) -> Result<()> {
        let encoded = encode_win_ansi(text)?;
        self.items.push(OverlayText {
            x_mm,
            y_mm,
            text: text.to_string(),
            encoded,
            style: *style,
        });
        Ok(())
    }

    /// Placed items in insertion order
    pub fn items(&self) -> &[OverlayText] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fonts referenced by the placed items
    pub fn fonts(&self) -> BTreeSet<StandardFont> {
        self.items.iter().map(|item| item.style.font).collect()
    }

    /// Generate content-stream operators for the overlay
    ///
    /// # Arguments
    /// * `origin_x` - Lower-left X of the target page box in points
    /// * `origin_y` - Lower-left Y of the target page box in points
    /// * `resource_name` - Maps a font to its page resource name
    pub fn to_content<F>(&self, origin_x: f64, origin_y: f64, resource_name: F) -> Vec<u8>
    where
        F: Fn(StandardFont) -> String,
    {
        let mut content = Vec::new();

        for item in &self.items {
            let ctx = TextRenderContext {
                font_name: resource_name(item.style.font),
                font_size: item.style.size,
                text_width: item
                    .style
                    .font
                    .text_width_points(item.encoded.len(), item.style.size),
                color: item.style.color,
            };

            // Top-origin millimetres to bottom-origin points
            let x = origin_x + mm_to_points(item.x_mm);
            let y = origin_y + mm_to_points(self.height_mm - item.y_mm);

            content.extend(generate_text_operators(
                &to_hex_string(&item.encoded),
                x,
                y,
                item.style.align,
                &ctx,
            ));
        }

        content
    }
}

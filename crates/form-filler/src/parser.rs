//! Layout JSON parsing

use crate::{FillError, FormLayout, Result};
use std::path::Path;

/// Parse and validate a layout from JSON string
pub fn parse_layout(json: &str) -> Result<FormLayout> {
    let layout: FormLayout =
        serde_json::from_str(json).map_err(|e| FillError::LayoutError(e.to_string()))?;
    layout.validate()?;
    Ok(layout)
}

/// Read, parse and validate a layout file
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<FormLayout> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        FillError::LayoutError(format!("Failed to read layout {}: {}", path.display(), e))
    })?;
    parse_layout(&json)
}

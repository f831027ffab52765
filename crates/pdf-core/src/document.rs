//! PDF Document wrapper

use crate::overlay::{Overlay, StandardFont};
use crate::{points_to_mm, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::path::Path;

/// Parent levels followed when looking up inherited page attributes
const MAX_INHERITANCE_DEPTH: usize = 10;

/// A4 page size in points
const A4_WIDTH: f64 = 595.28;
const A4_HEIGHT: f64 = 841.89;

/// Page box geometry in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Lower-left X
    pub x: f64,
    /// Lower-left Y
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// A4 portrait page at the origin
    pub fn a4() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: A4_WIDTH,
            height: A4_HEIGHT,
        }
    }

    pub fn width_mm(&self) -> f64 {
        points_to_mm(self.width)
    }

    pub fn height_mm(&self) -> f64 {
        points_to_mm(self.height)
    }
}

/// PDF Document wrapper providing high-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Object ID of a 1-indexed page
    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        if page == 0 {
            return Err(PdfError::InvalidPage(page, pages.len()));
        }
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Follow a reference to its target object
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Look up a page attribute, following the Parent chain if needed
    fn inherited_attribute(&self, page_id: ObjectId, keys: &[&[u8]]) -> Result<Option<Object>> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            for key in keys {
                if let Ok(value) = dict.get(key) {
                    return Ok(Some(self.resolve(value)?.clone()));
                }
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(None)
    }

    /// Get page box geometry in points
    ///
    /// Uses the MediaBox, inherited from parent Pages nodes when the page does
    /// not carry one. The CropBox is used only when no MediaBox exists at any
    /// level, and A4 when neither is present.
    pub fn page_size(&self, page: usize) -> Result<PageSize> {
        let page_id = self.page_id(page)?;

        // An inherited MediaBox takes precedence over a page-level CropBox
        let media_box = match self.inherited_attribute(page_id, &[b"MediaBox".as_slice()])? {
            Some(value) => Some(value),
            None => self.inherited_attribute(page_id, &[b"CropBox".as_slice()])?,
        };
        let media_box = match media_box {
            Some(Object::Array(values)) => values,
            Some(_) => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
            None => return Ok(PageSize::a4()),
        };

        if media_box.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }

        let mut coords = [0.0f64; 4];
        for (slot, value) in coords.iter_mut().zip(&media_box) {
            *slot = number(self.resolve(value)?)
                .ok_or_else(|| PdfError::ParseError("Invalid MediaBox entry".to_string()))?;
        }
        let [x1, y1, x2, y2] = coords;

        Ok(PageSize {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        })
    }

    /// Composite an overlay on top of a page
    ///
    /// Existing content streams are kept as-is and wrapped in a `q`/`Q` pair,
    /// so overlay text is drawn with a clean graphics state. The overlay fonts
    /// go into a page-local copy of the page resources; shared or inherited
    /// resource dictionaries are not modified.
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `overlay` - Overlay to draw
    pub fn merge_overlay(&mut self, page: usize, overlay: &Overlay) -> Result<()> {
        let page_id = self.page_id(page)?;
        if overlay.is_empty() {
            return Ok(());
        }

        let size = self.page_size(page)?;
        let existing_contents = self.content_refs(page_id)?;

        // Resources may be inherited or shared with other pages
        let keys = [b"Resources".as_slice()];
        let mut resources = match self.inherited_attribute(page_id, &keys)? {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        };
        let mut font_dict = match resources.get(b"Font") {
            Ok(fonts) => match self.resolve(fonts)? {
                Object::Dictionary(dict) => dict.clone(),
                _ => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        let mut resource_names: BTreeMap<StandardFont, String> = BTreeMap::new();
        let mut next_resource = 1u32;
        for font in overlay.fonts() {
            let resource_name = loop {
                let candidate = format!("OvF{next_resource}");
                next_resource += 1;
                if !font_dict.has(candidate.as_bytes()) {
                    break candidate;
                }
            };
            let font_id = self.inner.add_object(font.to_dictionary());
            font_dict.set(resource_name.as_bytes(), Object::Reference(font_id));
            resource_names.insert(font, resource_name);
        }
        resources.set("Font", Object::Dictionary(font_dict));

        let overlay_content = overlay.to_content(size.x, size.y, |font| {
            resource_names.get(&font).cloned().unwrap_or_default()
        });

        let mut suffix = b"\nQ\n".to_vec();
        suffix.extend_from_slice(&overlay_content);

        let prefix_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let suffix_id = self.inner.add_object(Stream::new(Dictionary::new(), suffix));

        let mut contents = Vec::with_capacity(existing_contents.len() + 2);
        contents.push(Object::Reference(prefix_id));
        contents.extend(existing_contents.into_iter().map(Object::Reference));
        contents.push(Object::Reference(suffix_id));

        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Contents", Object::Array(contents));
        page_dict.set("Resources", Object::Dictionary(resources));

        // Replace page object
        self.inner.objects.insert(page_id, page_dict.into());

        tracing::debug!(
            page,
            items = overlay.items().len(),
            "merged overlay onto page"
        );

        Ok(())
    }

    /// Collect a page's content streams as object references
    ///
    /// Direct streams are moved into indirect objects so they can be listed
    /// in a Contents array.
    fn content_refs(&mut self, page_id: ObjectId) -> Result<Vec<ObjectId>> {
        let contents = {
            let page_dict = self
                .inner
                .get_object(page_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;
            match page_dict.get(b"Contents") {
                Ok(contents) => contents.clone(),
                Err(_) => return Ok(Vec::new()),
            }
        };

        let entries = match contents {
            Object::Reference(id) => match self.inner.get_object(id)? {
                // Contents may be an indirect array of streams
                Object::Array(items) => items.clone(),
                _ => vec![Object::Reference(id)],
            },
            Object::Array(items) => items,
            Object::Stream(stream) => vec![Object::Stream(stream)],
            _ => Vec::new(),
        };

        let mut refs = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Object::Reference(id) => refs.push(id),
                Object::Stream(stream) => refs.push(self.inner.add_object(stream)),
                _ => {}
            }
        }

        Ok(refs)
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }
}

/// Numeric value of an Integer or Real object
fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

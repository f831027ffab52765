//! Integration tests for pdf-core
//!
//! These tests verify end-to-end functionality with real PDF operations.

use lopdf::content::Content;
use lopdf::{dictionary, Object};
use pdf_core::{Align, Color, Overlay, PdfDocument, PdfError, StandardFont, TextStyle};

/// Create a minimal valid PDF with the given number of A4 pages
///
/// Every page draws a line so the original content is recognisable.
fn create_test_pdf_with_pages(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for index in 0..page_count {
        let contents_id = doc.add_object(lopdf::Stream::new(
            dictionary! {},
            format!("0 0 0 RG 10 {} m 200 {} l S\n", 100 + index, 100 + index).into_bytes(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => page_count as i64,
            "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn create_test_pdf() -> Vec<u8> {
    create_test_pdf_with_pages(1)
}

/// Create a single-page PDF whose MediaBox and Resources live on the Pages node
fn create_test_pdf_with_inherited_attributes() -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.new_object_id();
    let shared_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let shared_resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "OvF1" => shared_font_id },
    });

    let contents_id = doc.add_object(lopdf::Stream::new(
        dictionary! {},
        b"BT /OvF1 12 Tf 72 720 Td (Original) Tj ET\n".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => contents_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => shared_resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Create a single-page PDF with extra entries on the page and its Pages node
fn create_single_page_pdf(
    page_entries: lopdf::Dictionary,
    pages_entries: lopdf::Dictionary,
    content: &[u8],
) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.new_object_id();
    let contents_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content.to_vec()));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => dictionary! {},
        "Contents" => contents_id,
    };
    for (key, value) in page_entries.iter() {
        page.set(key.clone(), value.clone());
    }
    let page_id = doc.add_object(page);

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Count" => 1,
        "Kids" => vec![Object::Reference(page_id)],
    };
    for (key, value) in pages_entries.iter() {
        pages.set(key.clone(), value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn page_content(data: &[u8], page: u32) -> Vec<u8> {
    let doc = lopdf::Document::load_mem(data).unwrap();
    let page_id = doc.get_pages()[&page];
    doc.get_page_content(page_id).unwrap()
}

fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(value) => *value as f64,
        Object::Real(value) => *value as f64,
        other => panic!("not a number: {other:?}"),
    }
}

fn red_style() -> TextStyle {
    TextStyle {
        color: Color::red(),
        ..TextStyle::default()
    }
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = create_test_pdf();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");

    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_open_missing_file() {
    let result = PdfDocument::open("/nonexistent/template.pdf");
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_page_size_a4() {
    let doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    let size = doc.page_size(1).unwrap();

    assert!((size.width - 595.28).abs() < 0.01);
    assert!((size.height - 841.89).abs() < 0.01);
    assert!((size.width_mm() - 210.0).abs() < 0.01);
}

#[test]
fn test_page_size_inherited() {
    let doc = PdfDocument::open_from_bytes(&create_test_pdf_with_inherited_attributes()).unwrap();
    let size = doc.page_size(1).unwrap();

    assert_eq!(size.width, 612.0);
    assert_eq!(size.height, 792.0);
}

#[test]
fn test_page_size_prefers_inherited_media_box_over_crop_box() {
    let pdf_data = create_single_page_pdf(
        dictionary! { "CropBox" => vec![0.into(), 0.into(), 300.into(), 300.into()] },
        dictionary! { "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()] },
        b"0 0 0 RG 10 10 m 100 10 l S\n",
    );
    let doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();

    assert!((size.width - 595.28).abs() < 0.01, "width = {}", size.width);
    assert!((size.height - 841.89).abs() < 0.01, "height = {}", size.height);
}

#[test]
fn test_page_size_falls_back_to_crop_box() {
    let pdf_data = create_single_page_pdf(
        dictionary! { "CropBox" => vec![0.into(), 0.into(), 300.into(), 400.into()] },
        dictionary! {},
        b"0 0 0 RG 10 10 m 100 10 l S\n",
    );
    let doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();

    assert_eq!(size.width, 300.0);
    assert_eq!(size.height, 400.0);
}

#[test]
fn test_page_size_invalid_page() {
    let doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();

    assert!(matches!(doc.page_size(0), Err(PdfError::InvalidPage(0, 1))));
    assert!(matches!(doc.page_size(2), Err(PdfError::InvalidPage(2, 1))));
}

#[test]
fn test_merge_overlay_keeps_original_content() {
    let pdf_data = create_test_pdf();
    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();

    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(25.0, 202.0, "John Doe", &red_style()).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = String::from_utf8_lossy(&page_content(&saved, 1)).to_string();

    let original = content.find("200 100 l S").expect("original content kept");
    let text = content.find("<4A6F686E20446F65> Tj").expect("overlay text");
    assert!(original < text, "overlay must be drawn after the original");
    assert!(content.starts_with("q"), "{content}");
    assert!(content.contains("1 0 0 rg"));
}

#[test]
fn test_merge_overlay_after_unterminated_content() {
    // Last operator of the template is not followed by whitespace
    let pdf_data = create_single_page_pdf(
        dictionary! { "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()] },
        dictionary! {},
        b"0 0 0 RG 10 10 m 100 10 l S",
    );
    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();

    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(10.0, 10.0, "A", &TextStyle::default()).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = Content::decode(&page_content(&saved, 1)).unwrap();
    let operators: Vec<_> = content
        .operations
        .iter()
        .map(|op| op.operator.as_str())
        .collect();

    let stroke = operators.iter().position(|op| *op == "S").expect("S operator");
    assert_eq!(operators[stroke + 1], "Q", "{operators:?}");
    assert!(operators.contains(&"Tj"));
}

#[test]
fn test_merge_overlay_position_in_points() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    let size = doc.page_size(1).unwrap();

    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(25.0, 202.0, "A", &TextStyle::default()).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = Content::decode(&page_content(&saved, 1)).unwrap();
    let td = content
        .operations
        .iter()
        .find(|op| op.operator == "Td")
        .expect("Td operator");

    let x = number(&td.operands[0]);
    let y = number(&td.operands[1]);
    assert!((x - 25.0 / 0.352778).abs() < 0.01, "x = {x}");
    assert!((y - (841.89 - 202.0 / 0.352778)).abs() < 0.01, "y = {y}");
}

#[test]
fn test_merge_overlay_registers_fonts() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    let size = doc.page_size(1).unwrap();

    let bold = TextStyle {
        font: StandardFont::CourierBold,
        ..TextStyle::default()
    };
    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(10.0, 10.0, "a", &TextStyle::default()).unwrap();
    overlay.text(20.0, 20.0, "X", &bold).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let reloaded = lopdf::Document::load_mem(&saved).unwrap();
    let page_id = reloaded.get_pages()[&1];
    let fonts = reloaded.get_page_fonts(page_id);

    let mut base_fonts: Vec<String> = fonts
        .values()
        .map(|font| {
            String::from_utf8_lossy(font.get(b"BaseFont").unwrap().as_name().unwrap()).to_string()
        })
        .collect();
    base_fonts.sort();
    assert_eq!(base_fonts, vec!["Courier", "Courier-Bold"]);
}

#[test]
fn test_merge_overlay_avoids_resource_name_collision() {
    let pdf_data = create_test_pdf_with_inherited_attributes();
    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();

    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(10.0, 10.0, "new", &TextStyle::default()).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let reloaded = lopdf::Document::load_mem(&saved).unwrap();
    let page_id = reloaded.get_pages()[&1];
    let fonts = reloaded.get_page_fonts(page_id);

    // The inherited Helvetica keeps its name, Courier gets the next free one
    assert_eq!(fonts.len(), 2);
    let original = &fonts[b"OvF1".as_slice()];
    assert_eq!(original.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    let added = &fonts[b"OvF2".as_slice()];
    assert_eq!(added.get(b"BaseFont").unwrap().as_name().unwrap(), b"Courier");

    let content = String::from_utf8_lossy(&page_content(&saved, 1)).to_string();
    assert!(content.contains("(Original) Tj"));
    assert!(content.contains("/OvF2 11 Tf"));
}

#[test]
fn test_merge_overlay_leaves_other_pages_untouched() {
    let pdf_data = create_test_pdf_with_pages(3);
    let before_page_2 = page_content(&pdf_data, 2);
    let before_page_3 = page_content(&pdf_data, 3);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let size = doc.page_size(1).unwrap();
    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    overlay.text(10.0, 10.0, "page one", &TextStyle::default()).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    assert_eq!(PdfDocument::open_from_bytes(&saved).unwrap().page_count(), 3);
    assert_eq!(page_content(&saved, 2), before_page_2);
    assert_eq!(page_content(&saved, 3), before_page_3);
}

#[test]
fn test_merge_empty_overlay_is_noop() {
    let pdf_data = create_test_pdf();
    let before = page_content(&pdf_data, 1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.merge_overlay(1, &Overlay::new(210.0, 297.0)).unwrap();

    let saved = doc.to_bytes().unwrap();
    assert_eq!(page_content(&saved, 1), before);
}

#[test]
fn test_merge_overlay_right_aligned() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    let size = doc.page_size(1).unwrap();

    let style = TextStyle {
        size: 10.0,
        align: Align::Right,
        ..TextStyle::default()
    };
    let mut overlay = Overlay::new(size.width_mm(), size.height_mm());
    // 25.4mm = 72pt; "ABCD" is 4 * 6pt wide at 10pt
    overlay.text(25.4, 100.0, "ABCD", &style).unwrap();
    doc.merge_overlay(1, &overlay).unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = Content::decode(&page_content(&saved, 1)).unwrap();
    let td = content
        .operations
        .iter()
        .find(|op| op.operator == "Td")
        .unwrap();
    let x = number(&td.operands[0]);
    assert!((x - 48.0).abs() < 0.01, "x = {x}");
}

#[test]
fn test_save_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");

    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.save(&path).unwrap();

    let reopened = PdfDocument::open(&path).unwrap();
    assert_eq!(reopened.page_count(), 1);
}

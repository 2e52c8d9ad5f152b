//! PDF text extraction and image-to-PDF primitives.

use std::io::Cursor;

use lopdf::{dictionary, Document, Object, Stream};

use super::super::error::ConvertError;
use super::super::progress::ProgressSink;

/// US-Letter page with a 50pt margin on each side.
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 50.0;

/// Extracts the embedded text of a PDF, page by page.
///
/// Pages without extractable text contribute nothing; an entirely
/// image-based PDF yields an empty (but successful) result.
pub fn pdf_to_text(pdf: &[u8], progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let doc = Document::load_mem(pdf)
        .map_err(|e| ConvertError::malformed_input("pdf", e.to_string()))?;

    progress.emit(40);

    let pages = doc.get_pages();
    let page_count = pages.len().max(1);

    let mut text = String::new();
    for (index, (page_num, _)) in pages.iter().enumerate() {
        if let Ok(page_text) = doc.extract_text(&[*page_num]) {
            text.push_str(&page_text);
            text.push('\n');
        }
        let pct = 40 + (50 * (index + 1) / page_count) as u8;
        progress.emit(pct);
    }

    progress.emit(100);
    Ok(text.into_bytes())
}

/// Embeds a JPEG image in a single-page PDF without re-encoding.
///
/// The JPEG bytes go into the page as a DCTDecode XObject; only the
/// dimensions are decoded up front.
pub fn jpeg_to_pdf(jpeg: &[u8], progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let (width, height) = image::ImageReader::new(Cursor::new(jpeg))
        .with_guessed_format()?
        .into_dimensions()?;

    progress.emit(50);

    let image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };

    build_image_pdf(image_dict, jpeg.to_vec(), width, height, progress)
}

/// Decodes a PNG to RGB and embeds it in a single-page PDF as an
/// uncompressed image XObject.
pub fn png_to_pdf(png: &[u8], progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let rgb = image::load_from_memory(png)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    progress.emit(50);

    let image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    build_image_pdf(image_dict, rgb.into_raw(), width, height, progress)
}

fn build_image_pdf(
    image_dict: lopdf::Dictionary,
    image_data: Vec<u8>,
    width: u32,
    height: u32,
    progress: &ProgressSink,
) -> Result<Vec<u8>, ConvertError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(Object::Stream(Stream::new(image_dict, image_data)));

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im0" => image_id,
        },
    });

    // Fit within the margins, preserving aspect ratio, centered.
    let max_w = PAGE_WIDTH - 2.0 * MARGIN;
    let max_h = PAGE_HEIGHT - 2.0 * MARGIN;
    let scale = (max_w / width as f64).min(max_h / height as f64);
    let draw_w = width as f64 * scale;
    let draw_h = height as f64 * scale;
    let x = (PAGE_WIDTH - draw_w) / 2.0;
    let y = (PAGE_HEIGHT - draw_h) / 2.0;

    let content = format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ\n",
        draw_w, draw_h, x, y
    );
    let content_id = doc.add_object(Object::Stream(Stream::new(
        dictionary! {},
        content.into_bytes(),
    )));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => resources_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    progress.emit(80);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ConvertError::render(e.to_string()))?;

    progress.emit(100);
    Ok(buffer)
}

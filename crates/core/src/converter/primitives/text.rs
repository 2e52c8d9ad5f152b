//! Plain-text, HTML, and RTF transformation primitives.

use lopdf::{dictionary, Document, Object, Stream};
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::super::error::ConvertError;
use super::super::progress::ProgressSink;

/// Lines placed on one US-Letter page at the font size used below.
const LINES_PER_PAGE: usize = 50;

/// Renders plain text into a minimal paginated PDF.
pub fn text_to_pdf(text: &str, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.new_object_id();
    let resources_id = doc.new_object_id();

    doc.objects.insert(
        font_id,
        Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        }),
    );

    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        }),
    );

    let lines: Vec<&str> = text.lines().collect();
    let page_count = lines.len().div_ceil(LINES_PER_PAGE).max(1);

    progress.emit(50);

    let mut page_ids = Vec::new();
    for page_num in 0..page_count {
        let start = page_num * LINES_PER_PAGE;
        let end = ((page_num + 1) * LINES_PER_PAGE).min(lines.len());
        let page_lines = if start < lines.len() {
            &lines[start..end]
        } else {
            &[]
        };

        let content_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        let content = page_content_stream(page_lines);
        doc.objects.insert(
            content_id,
            Object::Stream(Stream::new(dictionary! {}, content.into_bytes())),
        );

        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            }),
        );

        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
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

fn page_content_stream(lines: &[&str]) -> String {
    let mut content = String::new();
    content.push_str("BT\n");
    content.push_str("/F1 11 Tf\n");
    content.push_str("50 742 Td\n");
    content.push_str("14 TL\n");

    for line in lines {
        let escaped = escape_pdf_string(line);
        content.push_str(&format!("({}) Tj T*\n", escaped));
    }

    content.push_str("ET\n");
    content
}

fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            c if c.is_ascii() && !c.is_control() => c.to_string(),
            _ => " ".to_string(),
        })
        .collect()
}

/// Wraps plain text in a standalone HTML document.
pub fn text_to_html(text: &str, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(30);

    let escaped = escape_html(text).replace('\n', "<br>\n");

    progress.emit(70);

    let html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>Converted Text</title>\n\
         <style>\n\
         body {{ font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <pre style=\"white-space: pre-wrap; font-family: inherit;\">{}</pre>\n\
         </body>\n\
         </html>\n",
        escaped
    );

    progress.emit(100);
    Ok(html.into_bytes())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wraps plain text in an RTF envelope that word processors open in place
/// of a native OOXML document. Intentionally not a real docx container.
pub fn text_to_docx(text: &str, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(30);

    let body = text.replace('\\', "\\\\").replace('\n', "\\par ");

    progress.emit(70);

    let rtf = format!(
        "{{\\rtf1\\ansi\\deff0 {{\\fonttbl {{\\f0 Times New Roman;}}}}\\f0\\fs24 {}}}",
        body
    );

    progress.emit(100);
    Ok(rtf.into_bytes())
}

static RTF_CONTROL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-z]+-?\d*\s?").expect("valid regex"));

/// Strips RTF control words and group braces, leaving the plain text.
pub fn rtf_to_text(rtf: &str, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(30);

    // Escaped characters are protected before control-word stripping so
    // \\ and \' survive as literals.
    let protected = rtf
        .replace("\\\\", "\u{1}")
        .replace("\\'", "\u{2}")
        .replace("\\pard", "")
        .replace("\\par", "\n");

    progress.emit(60);

    let stripped = RTF_CONTROL_WORD.replace_all(&protected, "");
    let text = stripped
        .replace(['{', '}'], "")
        .replace('\u{1}', "\\")
        .replace('\u{2}', "'")
        .trim()
        .to_string();

    progress.emit(100);
    Ok(text.into_bytes())
}

static HTML_SCRIPT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(script|style)[^>]*>.*?</(script|style)>").expect("valid regex"));
static HTML_BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|tr)>").expect("valid regex"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Extracts the text content of an HTML document.
pub fn html_to_text(html: &str, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(30);

    let without_hidden = HTML_SCRIPT_STYLE.replace_all(html, "");
    let with_breaks = HTML_BLOCK_END.replace_all(&without_hidden, "\n");
    let without_tags = HTML_TAG.replace_all(&with_breaks, "");

    progress.emit(60);

    let text = decode_entities(&without_tags);
    let text = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    progress.emit(100);
    Ok(text.into_bytes())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

//! DOCX and XLSX extraction primitives.
//!
//! Office Open XML files are zip archives; the text lives in well-known
//! XML members which are walked with a streaming parser.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::super::error::ConvertError;
use super::super::progress::ProgressSink;

/// Extracts the paragraph text of a DOCX document.
pub fn docx_to_text(docx: &[u8], progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let mut archive = zip::ZipArchive::new(Cursor::new(docx))
        .map_err(|e| ConvertError::malformed_input("docx", e.to_string()))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| {
            ConvertError::malformed_input("docx", format!("missing word/document.xml: {}", e))
        })?
        .read_to_string(&mut document_xml)?;

    progress.emit(60);

    let text = parse_document_xml(&document_xml)?;

    progress.emit(100);
    Ok(text.into_bytes())
}

fn parse_document_xml(xml: &str) -> Result<String, ConvertError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"br" => text.push('\n'),
                b"tab" => text.push('\t'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let decoded = e.decode().unwrap_or_default();
                    text.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConvertError::malformed_input(
                    "docx",
                    format!("XML parsing error: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Renders each worksheet of an XLSX workbook as comma-separated rows,
/// one titled section per sheet.
pub fn xlsx_to_text(xlsx: &[u8], progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    progress.emit(20);

    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx))
        .map_err(|e| ConvertError::malformed_input("xlsx", e.to_string()))?;

    let shared_strings = read_shared_strings(&mut archive)?;
    let sheet_names = read_sheet_names(&mut archive)?;

    progress.emit(40);

    let mut sheet_files: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/") && n.ends_with(".xml"))
        .map(String::from)
        .collect();
    sheet_files.sort();

    if sheet_files.is_empty() {
        return Err(ConvertError::malformed_input("xlsx", "no worksheets found"));
    }

    let sheet_count = sheet_files.len();
    let mut output = String::new();
    for (index, file_name) in sheet_files.iter().enumerate() {
        let mut sheet_xml = String::new();
        archive.by_name(file_name)?.read_to_string(&mut sheet_xml)?;

        let title = sheet_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Sheet{}", index + 1));

        output.push_str(&format!("Sheet: {}\n", title));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&parse_worksheet_xml(&sheet_xml, &shared_strings)?);
        output.push('\n');

        let pct = 40 + (50 * (index + 1) / sheet_count) as u8;
        progress.emit(pct);
    }

    progress.emit(100);
    Ok(output.into_bytes())
}

fn read_shared_strings(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
) -> Result<Vec<String>, ConvertError> {
    let mut xml = String::new();
    match archive.by_name("xl/sharedStrings.xml") {
        Ok(mut file) => file.read_to_string(&mut xml)?,
        // Workbooks with only inline or numeric cells carry no string table.
        Err(zip::result::ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"si" => strings.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    current.push_str(&e.decode().unwrap_or_default());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConvertError::malformed_input(
                    "xlsx",
                    format!("XML parsing error in sharedStrings: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(strings)
}

fn read_sheet_names(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
) -> Result<Vec<String>, ConvertError> {
    let mut xml = String::new();
    match archive.by_name("xl/workbook.xml") {
        Ok(mut file) => file.read_to_string(&mut xml)?,
        Err(zip::result::ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = Reader::from_str(&xml);
    let mut names = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            names.push(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConvertError::malformed_input(
                    "xlsx",
                    format!("XML parsing error in workbook: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(names)
}

fn parse_worksheet_xml(xml: &str, shared_strings: &[String]) -> Result<String, ConvertError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut output = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell_is_shared = false;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    cell_is_shared = cell_type(e) == Some(b's');
                }
                b"v" | b"t" => in_value = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"c" {
                    row.push(String::new());
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"row" => {
                    output.push_str(&row.join(","));
                    output.push('\n');
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_value {
                    let raw = e.decode().unwrap_or_default().into_owned();
                    let value = if cell_is_shared {
                        raw.parse::<usize>()
                            .ok()
                            .and_then(|i| shared_strings.get(i))
                            .cloned()
                            .unwrap_or(raw)
                    } else {
                        raw
                    };
                    row.push(value);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConvertError::malformed_input(
                    "xlsx",
                    format!("XML parsing error in worksheet: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(output)
}

fn cell_type(e: &quick_xml::events::BytesStart<'_>) -> Option<u8> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"t")
        .and_then(|attr| attr.value.first().copied())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    /// Builds a minimal DOCX archive containing the given paragraphs.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
            .collect();
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );
        zip_single("word/document.xml", document.as_bytes())
    }

    /// Builds a minimal XLSX archive with one sheet of inline-free cells.
    pub fn xlsx_with_rows(sheet_name: &str, rows: &[&[&str]]) -> Vec<u8> {
        let mut strings = Vec::new();
        let rows_xml: String = rows
            .iter()
            .map(|cells| {
                let cells_xml: String = cells
                    .iter()
                    .map(|value| {
                        let index = strings.len();
                        strings.push(value.to_string());
                        format!("<c t=\"s\"><v>{}</v></c>", index)
                    })
                    .collect();
                format!("<row>{}</row>", cells_xml)
            })
            .collect();

        let shared: String = strings
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect();

        let options = zip::write::SimpleFileOptions::default();
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("xl/workbook.xml", options)
            .and_then(|_| {
                writer
                    .write_all(
                        format!(
                            "<workbook><sheets><sheet name=\"{}\" sheetId=\"1\"/></sheets></workbook>",
                            sheet_name
                        )
                        .as_bytes(),
                    )
                    .map_err(Into::into)
            })
            .unwrap();
        writer
            .start_file("xl/sharedStrings.xml", options)
            .and_then(|_| {
                writer
                    .write_all(format!("<sst>{}</sst>", shared).as_bytes())
                    .map_err(Into::into)
            })
            .unwrap();
        writer
            .start_file("xl/worksheets/sheet1.xml", options)
            .and_then(|_| {
                writer
                    .write_all(
                        format!("<worksheet><sheetData>{}</sheetData></worksheet>", rows_xml)
                            .as_bytes(),
                    )
                    .map_err(Into::into)
            })
            .unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn zip_single(name: &str, content: &[u8]) -> Vec<u8> {
        let options = zip::write::SimpleFileOptions::default();
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer.start_file(name, options).unwrap();
        writer.write_all(content).unwrap();
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_to_text_extracts_paragraphs() {
        let docx = fixtures::docx_with_paragraphs(&["Hello World", "Second paragraph"]);
        let text = docx_to_text(&docx, &ProgressSink::discard()).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("Hello World"));
        assert!(text.contains("Second paragraph"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_docx_without_document_xml_is_malformed() {
        let options = zip::write::SimpleFileOptions::default();
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("unrelated.txt", options).unwrap();
        std::io::Write::write_all(&mut writer, b"nope").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = docx_to_text(&bytes, &ProgressSink::discard());
        assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
    }

    #[test]
    fn test_docx_garbage_bytes_are_malformed() {
        let result = docx_to_text(b"definitely not a zip", &ProgressSink::discard());
        assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
    }

    #[test]
    fn test_xlsx_to_text_renders_csv_rows() {
        let xlsx = fixtures::xlsx_with_rows(
            "Budget",
            &[&["Item", "Cost"], &["Rent", "1200"]],
        );
        let text = xlsx_to_text(&xlsx, &ProgressSink::discard()).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("Sheet: Budget"));
        assert!(text.contains("Item,Cost"));
        assert!(text.contains("Rent,1200"));
    }

    #[test]
    fn test_xlsx_without_worksheets_is_malformed() {
        let options = zip::write::SimpleFileOptions::default();
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("xl/workbook.xml", options).unwrap();
        std::io::Write::write_all(&mut writer, b"<workbook/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = xlsx_to_text(&bytes, &ProgressSink::discard());
        assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
    }

    #[test]
    fn test_worksheet_numeric_cells_pass_through() {
        let xml = "<worksheet><sheetData>\
                   <row><c><v>42</v></c><c t=\"s\"><v>0</v></c></row>\
                   </sheetData></worksheet>";
        let parsed = parse_worksheet_xml(xml, &["answer".to_string()]).unwrap();
        assert_eq!(parsed, "42,answer\n");
    }
}

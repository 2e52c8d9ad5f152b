//! Types for the converter module.

use bytes::Bytes;

use crate::catalog::{file_extension, Format};

/// A file submitted for conversion.
///
/// The payload is a [`Bytes`] handle so jobs and snapshots can share it
/// without copying.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Declared filename, extension included.
    pub name: String,
    /// Raw file content.
    pub data: Bytes,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Lowercased extension derived from the filename.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }

    /// Source format derived from the filename, if recognized.
    pub fn format(&self) -> Option<Format> {
        Format::from_filename(&self.name)
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Uniform outcome of any conversion attempt.
///
/// Exactly one of `data` present or `success == false` holds. The error
/// message is human-readable and safe to surface directly.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub success: bool,
    pub data: Option<Bytes>,
    pub error: Option<String>,
    /// Source filename with the extension swapped to the target's.
    pub filename: String,
}

impl ConversionOutcome {
    pub fn succeeded(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            filename: filename.into(),
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            filename: filename.into(),
        }
    }
}

/// Swaps the extension of `source_name` for the target format's extension.
/// Appends the extension when the name has none.
pub fn output_filename(source_name: &str, target: Format) -> String {
    match source_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{}.{}", stem, target.extension())
        }
        _ => format!("{}.{}", source_name, target.extension()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_accessors() {
        let file = SourceFile::new("Report.TXT", &b"hello"[..]);
        assert_eq!(file.extension().as_deref(), Some("txt"));
        assert_eq!(file.format(), Some(Format::Txt));
        assert_eq!(file.size_bytes(), 5);
    }

    #[test]
    fn test_output_filename_swaps_extension() {
        assert_eq!(output_filename("report.txt", Format::Pdf), "report.pdf");
        assert_eq!(output_filename("a.b.docx", Format::Txt), "a.b.txt");
    }

    #[test]
    fn test_output_filename_appends_when_missing() {
        assert_eq!(output_filename("README", Format::Pdf), "README.pdf");
        assert_eq!(output_filename(".hidden", Format::Txt), ".hidden.txt");
    }

    #[test]
    fn test_outcome_contract() {
        let ok = ConversionOutcome::succeeded("a.pdf", &b"%PDF"[..]);
        assert!(ok.success);
        assert!(ok.data.is_some());
        assert!(ok.error.is_none());

        let failed = ConversionOutcome::failed("a.pdf", "boom");
        assert!(!failed.success);
        assert!(failed.data.is_none());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}

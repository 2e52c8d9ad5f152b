//! Types for the format catalog.

use serde::{Deserialize, Serialize};

/// A known document format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Portable Document Format
    Pdf,
    /// Legacy Word document
    Doc,
    /// Office Open XML document
    Docx,
    /// Plain text
    Txt,
    /// Rich Text Format
    Rtf,
    /// HyperText Markup Language
    Html,
    /// Office Open XML spreadsheet
    Xlsx,
    /// Legacy Excel spreadsheet
    Xls,
    /// JPEG image (.jpg)
    Jpg,
    /// JPEG image (.jpeg)
    Jpeg,
    /// Portable Network Graphics
    Png,
    /// Electronic publication
    Epub,
}

impl Format {
    /// Parses a format token, case-insensitively. Unknown tokens yield `None`.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "rtf" => Some(Self::Rtf),
            "html" | "htm" => Some(Self::Html),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "epub" => Some(Self::Epub),
            _ => None,
        }
    }

    /// Derives the format from a filename's extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        file_extension(name).and_then(|ext| Self::parse_token(&ext))
    }

    /// Returns the canonical lowercase token for this format.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Rtf => "rtf",
            Self::Html => "html",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Epub => "epub",
        }
    }

    /// Returns the file extension for this format. Identical to the token.
    pub fn extension(&self) -> &'static str {
        self.token()
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Extracts the lowercased extension from a filename, if it has one.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

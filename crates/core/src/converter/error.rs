//! Error types for the converter module.

use thiserror::Error;

/// Errors that can occur inside a transformation primitive.
///
/// These never cross the dispatcher boundary; the dispatcher folds them
/// into a failed [`ConversionOutcome`](super::ConversionOutcome).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No primitive exists for the requested pair.
    #[error("conversion from {src} to {target} is not supported")]
    UnsupportedPair { src: String, target: String },

    /// The input bytes do not parse as the declared source format.
    #[error("malformed {format} input: {reason}")]
    MalformedInput { format: String, reason: String },

    /// Building the output document failed.
    #[error("failed to render output: {reason}")]
    Render { reason: String },

    /// Error from PDF parsing or writing.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Error reading an Office archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error decoding an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Creates an unsupported-pair error from raw tokens.
    pub fn unsupported_pair(src: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedPair {
            src: src.into(),
            target: target.into(),
        }
    }

    /// Creates a malformed-input error.
    pub fn malformed_input(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Creates a render error.
    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render {
            reason: reason.into(),
        }
    }
}

//! Conversion dispatch.
//!
//! [`ConversionDispatcher`] maps a source file and target format to a
//! [`Route`] and runs the matching primitives. Its `convert` never
//! returns an error: every failure collapses into a
//! [`ConversionOutcome`] with `success == false`.

use std::time::Instant;

use async_trait::async_trait;

use crate::catalog::Format;
use crate::metrics;

use super::error::ConvertError;
use super::primitives;
use super::progress::ProgressSink;
use super::route::Route;
use super::types::{output_filename, ConversionOutcome, SourceFile};

/// Seam between the queue and the actual conversion work.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn convert(
        &self,
        file: &SourceFile,
        target: Format,
        progress: &ProgressSink,
    ) -> ConversionOutcome;
}

/// The production dispatcher backed by the built-in primitives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConversionDispatcher;

impl ConversionDispatcher {
    pub fn new() -> Self {
        Self
    }

    fn run_route(
        &self,
        file: &SourceFile,
        target: Format,
        progress: &ProgressSink,
    ) -> Result<Vec<u8>, ConvertError> {
        let source = match file.format() {
            Some(format) => format,
            None => {
                let token = file.extension().unwrap_or_else(|| "unknown".to_string());
                return Err(ConvertError::unsupported_pair(token, target.token()));
            }
        };

        match Route::resolve(source, target) {
            Route::TxtToPdf => primitives::text_to_pdf(utf8(file, "txt")?, progress),
            Route::TxtToHtml => primitives::text_to_html(utf8(file, "txt")?, progress),
            Route::TxtToDocx => primitives::text_to_docx(utf8(file, "txt")?, progress),
            Route::HtmlToTxt => primitives::html_to_text(utf8(file, "html")?, progress),
            Route::HtmlToPdf => {
                let text = primitives::html_to_text(utf8(file, "html")?, &progress.scaled(0, 50))?;
                text_then_pdf(text, progress)
            }
            Route::RtfToTxt => primitives::rtf_to_text(utf8(file, "rtf")?, progress),
            Route::RtfToPdf => {
                let text = primitives::rtf_to_text(utf8(file, "rtf")?, &progress.scaled(0, 50))?;
                text_then_pdf(text, progress)
            }
            Route::DocxToTxt => primitives::docx_to_text(&file.data, progress),
            Route::DocxToHtml => {
                let text = primitives::docx_to_text(&file.data, &progress.scaled(0, 50))?;
                let text = String::from_utf8_lossy(&text).into_owned();
                primitives::text_to_html(&text, &progress.scaled(50, 100))
            }
            Route::DocxToPdf => {
                let text = primitives::docx_to_text(&file.data, &progress.scaled(0, 50))?;
                text_then_pdf(text, progress)
            }
            Route::XlsxToTxt => primitives::xlsx_to_text(&file.data, progress),
            Route::XlsxToPdf => {
                let text = primitives::xlsx_to_text(&file.data, &progress.scaled(0, 50))?;
                text_then_pdf(text, progress)
            }
            Route::PdfToTxt => primitives::pdf_to_text(&file.data, progress),
            Route::JpegToPdf => primitives::jpeg_to_pdf(&file.data, progress),
            Route::PngToPdf => primitives::png_to_pdf(&file.data, progress),
            Route::Unsupported => Err(ConvertError::unsupported_pair(
                source.token(),
                target.token(),
            )),
        }
    }
}

fn text_then_pdf(text: Vec<u8>, progress: &ProgressSink) -> Result<Vec<u8>, ConvertError> {
    let text = String::from_utf8_lossy(&text).into_owned();
    primitives::text_to_pdf(&text, &progress.scaled(50, 100))
}

fn utf8<'a>(file: &'a SourceFile, format: &str) -> Result<&'a str, ConvertError> {
    std::str::from_utf8(&file.data)
        .map_err(|_| ConvertError::malformed_input(format, "content is not valid UTF-8"))
}

#[async_trait]
impl Dispatch for ConversionDispatcher {
    async fn convert(
        &self,
        file: &SourceFile,
        target: Format,
        progress: &ProgressSink,
    ) -> ConversionOutcome {
        let filename = output_filename(&file.name, target);
        let started = Instant::now();

        let outcome = match self.run_route(file, target, progress) {
            Ok(data) => {
                progress.emit(100);
                ConversionOutcome::succeeded(filename, data)
            }
            Err(e) => {
                tracing::warn!(
                    file = %file.name,
                    target = %target,
                    error = %e,
                    "conversion failed"
                );
                ConversionOutcome::failed(filename, e.to_string())
            }
        };

        let result = if outcome.success { "success" } else { "failure" };
        metrics::CONVERSIONS_TOTAL
            .with_label_values(&[result])
            .inc();
        metrics::CONVERSION_DURATION.observe(started.elapsed().as_secs_f64());

        outcome
    }
}

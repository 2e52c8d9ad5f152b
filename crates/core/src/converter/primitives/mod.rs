//! Format conversion primitives.
//!
//! Each function turns one input format into one output format, reporting
//! progress through a [`ProgressSink`](super::progress::ProgressSink).
//! Routes that chain two primitives scale each half into its own
//! progress sub-range.

mod office;
mod pdf;
mod text;

pub use office::{docx_to_text, xlsx_to_text};
pub use pdf::{jpeg_to_pdf, pdf_to_text, png_to_pdf};
pub use text::{html_to_text, rtf_to_text, text_to_docx, text_to_html, text_to_pdf};

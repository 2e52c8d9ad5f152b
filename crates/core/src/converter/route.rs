//! Closed routing table over (source, target) format pairs.

use crate::catalog::Format;

/// The transformation primitive selected for a (source, target) pair.
///
/// A closed enum: adding a pair means adding a variant and a table entry,
/// checked at compile time. Anything not listed falls through to
/// [`Route::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TxtToPdf,
    TxtToHtml,
    TxtToDocx,
    HtmlToTxt,
    HtmlToPdf,
    RtfToTxt,
    RtfToPdf,
    DocxToTxt,
    DocxToHtml,
    DocxToPdf,
    XlsxToTxt,
    XlsxToPdf,
    PdfToTxt,
    JpegToPdf,
    PngToPdf,
    Unsupported,
}

impl Route {
    /// Resolves the route for a source and target format.
    ///
    /// Legacy aliases collapse onto the primitive that handles them:
    /// doc routes as docx, xls as xlsx, jpg as jpeg.
    pub fn resolve(source: Format, target: Format) -> Self {
        use Format::*;
        match (source, target) {
            (Txt, Pdf) => Self::TxtToPdf,
            (Txt, Html) => Self::TxtToHtml,
            (Txt, Docx) => Self::TxtToDocx,
            (Html, Txt) => Self::HtmlToTxt,
            (Html, Pdf) => Self::HtmlToPdf,
            (Rtf, Txt) => Self::RtfToTxt,
            (Rtf, Pdf) => Self::RtfToPdf,
            (Docx | Doc, Txt) => Self::DocxToTxt,
            (Docx | Doc, Html) => Self::DocxToHtml,
            (Docx | Doc, Pdf) => Self::DocxToPdf,
            (Xlsx | Xls, Txt) => Self::XlsxToTxt,
            (Xlsx | Xls, Pdf) => Self::XlsxToPdf,
            (Pdf, Txt) => Self::PdfToTxt,
            (Jpg | Jpeg, Pdf) => Self::JpegToPdf,
            (Png, Pdf) => Self::PngToPdf,
            _ => Self::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FormatCatalog;

    #[test]
    fn test_resolve_direct_pairs() {
        assert_eq!(Route::resolve(Format::Txt, Format::Pdf), Route::TxtToPdf);
        assert_eq!(Route::resolve(Format::Pdf, Format::Txt), Route::PdfToTxt);
        assert_eq!(Route::resolve(Format::Rtf, Format::Pdf), Route::RtfToPdf);
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(Route::resolve(Format::Doc, Format::Pdf), Route::DocxToPdf);
        assert_eq!(Route::resolve(Format::Xls, Format::Txt), Route::XlsxToTxt);
        assert_eq!(Route::resolve(Format::Jpg, Format::Pdf), Route::JpegToPdf);
        assert_eq!(Route::resolve(Format::Jpeg, Format::Pdf), Route::JpegToPdf);
    }

    #[test]
    fn test_unlisted_pairs_fall_through() {
        assert_eq!(
            Route::resolve(Format::Docx, Format::Epub),
            Route::Unsupported
        );
        assert_eq!(Route::resolve(Format::Pdf, Format::Pdf), Route::Unsupported);
        assert_eq!(Route::resolve(Format::Png, Format::Txt), Route::Unsupported);
    }

    #[test]
    fn test_every_catalog_pair_has_a_route() {
        for source in FormatCatalog::sources() {
            for target in FormatCatalog::targets(source) {
                assert_ne!(
                    Route::resolve(source, *target),
                    Route::Unsupported,
                    "{} -> {} listed in the catalog but unrouted",
                    source,
                    target
                );
            }
        }
    }
}

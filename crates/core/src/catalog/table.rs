//! Static source-to-targets conversion table.

use super::types::Format;

/// The supported (source, targets) pairs. Target order is the order
/// offered to the user.
const CONVERSION_TABLE: &[(Format, &[Format])] = &[
    (Format::Docx, &[Format::Pdf, Format::Txt, Format::Html]),
    (Format::Doc, &[Format::Pdf, Format::Txt, Format::Html]),
    (Format::Txt, &[Format::Pdf, Format::Html, Format::Docx]),
    (Format::Pdf, &[Format::Txt]),
    (Format::Xlsx, &[Format::Pdf, Format::Txt]),
    (Format::Xls, &[Format::Pdf, Format::Txt]),
    (Format::Jpg, &[Format::Pdf]),
    (Format::Jpeg, &[Format::Pdf]),
    (Format::Png, &[Format::Pdf]),
    (Format::Html, &[Format::Pdf, Format::Txt]),
    (Format::Rtf, &[Format::Pdf, Format::Txt]),
];

/// Static lookup over the supported conversion pairs.
pub struct FormatCatalog;

impl FormatCatalog {
    /// Target formats a source format can be converted to.
    pub fn targets(source: Format) -> &'static [Format] {
        CONVERSION_TABLE
            .iter()
            .find(|(src, _)| *src == source)
            .map(|(_, targets)| *targets)
            .unwrap_or(&[])
    }

    /// Target formats for a raw token. Unknown tokens map to an empty set.
    pub fn targets_for_token(token: &str) -> &'static [Format] {
        match Format::parse_token(token) {
            Some(format) => Self::targets(format),
            None => &[],
        }
    }

    /// Every format offered as a target anywhere in the table, deduplicated,
    /// in first-appearance order.
    pub fn all_targets() -> Vec<Format> {
        let mut targets = Vec::new();
        for (_, entry_targets) in CONVERSION_TABLE {
            for target in *entry_targets {
                if !targets.contains(target) {
                    targets.push(*target);
                }
            }
        }
        targets
    }

    /// All source formats present in the table.
    pub fn sources() -> Vec<Format> {
        CONVERSION_TABLE.iter().map(|(src, _)| *src).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_for_known_sources() {
        assert_eq!(
            FormatCatalog::targets(Format::Docx),
            &[Format::Pdf, Format::Txt, Format::Html]
        );
        assert_eq!(FormatCatalog::targets(Format::Pdf), &[Format::Txt]);
        assert_eq!(FormatCatalog::targets(Format::Jpg), &[Format::Pdf]);
    }

    #[test]
    fn test_epub_is_not_a_source() {
        assert!(FormatCatalog::targets(Format::Epub).is_empty());
    }

    #[test]
    fn test_targets_for_token_unknown_is_empty() {
        assert!(FormatCatalog::targets_for_token("exe").is_empty());
        assert!(FormatCatalog::targets_for_token("").is_empty());
    }

    #[test]
    fn test_targets_for_token_case_insensitive() {
        assert_eq!(
            FormatCatalog::targets_for_token("DOCX"),
            FormatCatalog::targets(Format::Docx)
        );
    }

    #[test]
    fn test_all_targets_union() {
        let all = FormatCatalog::all_targets();
        assert_eq!(all, vec![Format::Pdf, Format::Txt, Format::Html, Format::Docx]);
    }

    #[test]
    fn test_legacy_aliases_share_targets() {
        assert_eq!(
            FormatCatalog::targets(Format::Doc),
            FormatCatalog::targets(Format::Docx)
        );
        assert_eq!(
            FormatCatalog::targets(Format::Xls),
            FormatCatalog::targets(Format::Xlsx)
        );
        assert_eq!(
            FormatCatalog::targets(Format::Jpeg),
            FormatCatalog::targets(Format::Jpg)
        );
    }
}

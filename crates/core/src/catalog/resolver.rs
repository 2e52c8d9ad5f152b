//! Compatible-target resolution for a multi-file selection.

use super::table::FormatCatalog;
use super::types::{file_extension, Format};

/// Resolves which target formats are valid for every file in a selection.
///
/// Pure and side-effect free. With an empty selection it returns every
/// format the catalog offers as a target anywhere, as the "nothing picked
/// yet" default.
pub struct CompatibilityResolver;

impl CompatibilityResolver {
    /// Computes the target formats supported by all of the named files.
    ///
    /// A file whose extension is unrecognized contributes an empty target
    /// set and collapses the whole intersection to empty.
    pub fn resolve<'a, I>(file_names: I) -> Vec<Format>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = file_names.into_iter();

        let first = match names.next() {
            Some(name) => name,
            None => return FormatCatalog::all_targets(),
        };

        let mut candidates: Vec<Format> = Self::targets_of(first).to_vec();
        for name in names {
            let targets = Self::targets_of(name);
            candidates.retain(|candidate| targets.contains(candidate));
            if candidates.is_empty() {
                break;
            }
        }
        candidates
    }

    fn targets_of(name: &str) -> &'static [Format] {
        match file_extension(name) {
            Some(ext) => FormatCatalog::targets_for_token(&ext),
            None => &[],
        }
    }
}

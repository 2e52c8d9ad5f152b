//! Format catalog: which source formats convert to which targets.

mod resolver;
mod table;
mod types;

pub use resolver::CompatibilityResolver;
pub use table::FormatCatalog;
pub use types::{file_extension, Format};

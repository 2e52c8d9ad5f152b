//! File conversion: routing, primitives, and the dispatch contract.

mod dispatcher;
mod error;
pub mod primitives;
mod progress;
mod route;
mod types;

pub use dispatcher::{ConversionDispatcher, Dispatch};
pub use error::ConvertError;
pub use progress::ProgressSink;
pub use route::Route;
pub use types::{output_filename, ConversionOutcome, SourceFile};

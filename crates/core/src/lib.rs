pub mod catalog;
pub mod config;
pub mod converter;
pub mod history;
pub mod metrics;
pub mod queue;
pub mod testing;

pub use catalog::{file_extension, CompatibilityResolver, Format, FormatCatalog};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{
    output_filename, ConversionDispatcher, ConversionOutcome, ConvertError, Dispatch,
    ProgressSink, Route, SourceFile,
};
pub use history::{
    HistoryBackend, HistoryEntry, HistoryError, HistoryEvent, HistoryStore, SqliteHistoryBackend,
    HISTORY_CAP,
};
pub use queue::{ConversionQueue, Job, JobStatus, QueueError, QueueEvent, RunSummary};

//! Conversion history: a bounded, observable record of completed
//! conversions with optional SQLite persistence.

mod sqlite;
mod store;
mod types;

pub use sqlite::{HistoryBackend, SqliteHistoryBackend};
pub use store::{HistoryStore, HISTORY_CAP};
pub use types::{HistoryEntry, HistoryError, HistoryEvent};

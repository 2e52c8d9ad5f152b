//! In-memory history window with optional persistence and change
//! notification.

use std::collections::VecDeque;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::metrics;

use super::sqlite::HistoryBackend;
use super::types::{HistoryEntry, HistoryEvent};

/// Maximum number of entries the store retains. Older entries are
/// evicted as new ones arrive.
pub const HISTORY_CAP: usize = 50;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Bounded record of completed conversions, newest first.
///
/// Appending never fails: persistence errors are logged and the
/// in-memory window stays authoritative.
pub struct HistoryStore {
    entries: RwLock<VecDeque<HistoryEntry>>,
    backend: Option<Box<dyn HistoryBackend>>,
    events: broadcast::Sender<HistoryEvent>,
}

impl HistoryStore {
    /// Create a store backed by the given persistence layer, seeded with
    /// whatever it has retained.
    pub fn open(backend: Box<dyn HistoryBackend>) -> Self {
        let mut entries: VecDeque<HistoryEntry> = match backend.load() {
            Ok(loaded) => loaded.into(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load conversion history, starting empty");
                VecDeque::new()
            }
        };
        entries.truncate(HISTORY_CAP);
        metrics::HISTORY_SIZE.set(entries.len() as i64);

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(entries),
            backend: Some(backend),
            events,
        }
    }

    /// Create a store with no persistence.
    pub fn in_memory() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(VecDeque::new()),
            backend: None,
            events,
        }
    }

    /// Record a completed conversion. The newest entry lands at the front
    /// and the oldest is evicted once the cap is reached.
    pub fn append(&self, entry: HistoryEntry) {
        {
            let mut entries = self.entries.write().unwrap();
            entries.push_front(entry.clone());
            entries.truncate(HISTORY_CAP);
            metrics::HISTORY_SIZE.set(entries.len() as i64);
            self.persist(&entries);
        }

        let _ = self.events.send(HistoryEvent::Appended { entry });
    }

    /// Drop all entries.
    pub fn clear(&self) {
        {
            let mut entries = self.entries.write().unwrap();
            entries.clear();
            metrics::HISTORY_SIZE.set(0);
            self.persist(&entries);
        }

        let _ = self.events.send(HistoryEvent::Cleared);
    }

    /// Snapshot of the retained entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Subscribe to change notifications. Polling [`Self::list`] remains
    /// available for consumers that miss events.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.events.subscribe()
    }

    fn persist(&self, entries: &VecDeque<HistoryEntry>) {
        if let Some(backend) = &self.backend {
            let snapshot: Vec<HistoryEntry> = entries.iter().cloned().collect();
            if let Err(e) = backend.save(&snapshot) {
                tracing::warn!(error = %e, "failed to persist conversion history");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::catalog::Format;
    use crate::history::sqlite::SqliteHistoryBackend;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            file_name: name.to_string(),
            source_format: Format::Txt,
            target_format: Format::Pdf,
            size_bytes: 42,
            completed_at: Utc::now(),
            download_path: format!("/downloads/x/{}", name),
            converted_file_name: name.to_string(),
        }
    }

    #[test]
    fn test_append_keeps_newest_first() {
        let store = HistoryStore::in_memory();
        store.append(entry("first.pdf"));
        store.append(entry("second.pdf"));

        let entries = store.list();
        assert_eq!(entries[0].file_name, "second.pdf");
        assert_eq!(entries[1].file_name, "first.pdf");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let store = HistoryStore::in_memory();
        for i in 0..HISTORY_CAP + 5 {
            store.append(entry(&format!("file{}.pdf", i)));
        }

        let entries = store.list();
        assert_eq!(entries.len(), HISTORY_CAP);
        assert_eq!(entries[0].file_name, format!("file{}.pdf", HISTORY_CAP + 4));
        assert_eq!(entries.last().unwrap().file_name, "file5.pdf");
    }

    #[test]
    fn test_clear_empties_store() {
        let store = HistoryStore::in_memory();
        store.append(entry("a.pdf"));
        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let store = HistoryStore::in_memory();
        let mut rx = store.subscribe();

        store.append(entry("a.pdf"));
        store.clear();

        match rx.recv().await.unwrap() {
            HistoryEvent::Appended { entry } => assert_eq!(entry.file_name, "a.pdf"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(rx.recv().await.unwrap(), HistoryEvent::Cleared));
    }

    #[test]
    fn test_open_seeds_from_backend() {
        let backend = SqliteHistoryBackend::in_memory().unwrap();
        use crate::history::sqlite::HistoryBackend as _;
        backend.save(&[entry("persisted.pdf")]).unwrap();

        let store = HistoryStore::open(Box::new(backend));
        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "persisted.pdf");
    }

    #[test]
    fn test_append_persists_through_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let backend = SqliteHistoryBackend::new(&path).unwrap();
            let store = HistoryStore::open(Box::new(backend));
            store.append(entry("kept.pdf"));
        }

        let backend = SqliteHistoryBackend::new(&path).unwrap();
        let store = HistoryStore::open(Box::new(backend));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].file_name, "kept.pdf");
    }
}

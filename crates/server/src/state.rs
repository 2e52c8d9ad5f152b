use std::sync::Arc;

use holliday_core::{Config, ConversionDispatcher, ConversionQueue, HistoryStore};

/// Shared application state
pub struct AppState {
    config: Config,
    queue: Arc<ConversionQueue<ConversionDispatcher>>,
    history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        queue: Arc<ConversionQueue<ConversionDispatcher>>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            config,
            queue,
            history,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queue(&self) -> &Arc<ConversionQueue<ConversionDispatcher>> {
        &self.queue
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }
}

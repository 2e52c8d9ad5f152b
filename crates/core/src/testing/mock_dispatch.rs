//! Mock dispatcher for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::Format;
use crate::converter::{output_filename, ConversionOutcome, Dispatch, ProgressSink, SourceFile};

/// A recorded conversion call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub file_name: String,
    pub target_format: Format,
}

/// Mock implementation of the [`Dispatch`] trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion calls for assertions
/// - Inject failures for the next call
/// - Script the progress milestones reported per conversion
#[derive(Debug, Clone)]
pub struct MockDispatch {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    next_error: Arc<Mutex<Option<String>>>,
    progress_steps: Arc<Mutex<Vec<u8>>>,
}

impl Default for MockDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDispatch {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            next_error: Arc::new(Mutex::new(None)),
            progress_steps: Arc::new(Mutex::new(vec![25, 50, 75, 100])),
        }
    }

    /// Get all recorded conversion calls.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Configure the next conversion to fail with the given error message.
    pub fn set_next_error(&self, error: impl Into<String>) {
        *self.next_error.lock().unwrap() = Some(error.into());
    }

    /// Replace the progress milestones reported per conversion.
    pub fn set_progress_steps(&self, steps: Vec<u8>) {
        *self.progress_steps.lock().unwrap() = steps;
    }

    fn take_error(&self) -> Option<String> {
        self.next_error.lock().unwrap().take()
    }
}

#[async_trait]
impl Dispatch for MockDispatch {
    async fn convert(
        &self,
        file: &SourceFile,
        target: Format,
        progress: &ProgressSink,
    ) -> ConversionOutcome {
        self.calls.lock().unwrap().push(RecordedCall {
            file_name: file.name.clone(),
            target_format: target,
        });

        let filename = output_filename(&file.name, target);

        if let Some(error) = self.take_error() {
            return ConversionOutcome::failed(filename, error);
        }

        for step in self.progress_steps.lock().unwrap().iter() {
            progress.emit(*step);
        }

        let data = format!("converted {} to {}", file.name, target).into_bytes();
        ConversionOutcome::succeeded(filename, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_succeeds() {
        let mock = MockDispatch::new();
        let file = SourceFile::new("a.txt", &b"x"[..]);

        let outcome = mock
            .convert(&file, Format::Pdf, &ProgressSink::discard())
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.filename, "a.pdf");

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].file_name, "a.txt");
        assert_eq!(calls[0].target_format, Format::Pdf);
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let mock = MockDispatch::new();
        mock.set_next_error("boom");
        let file = SourceFile::new("a.txt", &b"x"[..]);

        let outcome = mock
            .convert(&file, Format::Pdf, &ProgressSink::discard())
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("boom"));

        let outcome = mock
            .convert(&file, Format::Pdf, &ProgressSink::discard())
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_scripted_progress_is_reported() {
        let mock = MockDispatch::new();
        mock.set_progress_steps(vec![10, 90, 100]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = ProgressSink::new(move |p| seen_clone.lock().unwrap().push(p));

        let file = SourceFile::new("a.txt", &b"x"[..]);
        mock.convert(&file, Format::Pdf, &sink).await;

        assert_eq!(*seen.lock().unwrap(), vec![10, 90, 100]);
    }
}

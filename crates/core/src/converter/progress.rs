//! Emit-only progress channel for conversions.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

type EmitFn = dyn Fn(u8) + Send + Sync;

/// One-directional progress channel carrying an integer percent in [0, 100].
///
/// The observed sequence is monotonically non-decreasing: a value at or
/// below the last delivered one is dropped. [`ProgressSink::scaled`]
/// derives a sink whose 0..100 input maps into a sub-range, so composed
/// conversions report one continuous signal through the same channel.
#[derive(Clone)]
pub struct ProgressSink {
    emit: Arc<EmitFn>,
    last: Arc<AtomicU8>,
    lo: u8,
    hi: u8,
}

impl ProgressSink {
    /// Creates a sink delivering into the given callback.
    pub fn new(emit: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            emit: Arc::new(emit),
            last: Arc::new(AtomicU8::new(0)),
            lo: 0,
            hi: 100,
        }
    }

    /// A sink that drops every update.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    /// Reports a progress percent. Values above 100 are clamped; values
    /// that would move the channel backwards are dropped.
    pub fn emit(&self, percent: u8) {
        let percent = percent.min(100) as u32;
        let span = (self.hi - self.lo) as u32;
        let mapped = (self.lo as u32 + span * percent / 100) as u8;

        let prev = self.last.fetch_max(mapped, Ordering::SeqCst);
        if mapped > prev {
            (self.emit)(mapped);
        }
    }

    /// Derives a sink whose full 0..100 input range maps into [lo, hi] of
    /// this sink's range. Shares the underlying channel and its
    /// monotonicity watermark.
    pub fn scaled(&self, lo: u8, hi: u8) -> Self {
        debug_assert!(lo <= hi && hi <= 100);
        let span = (self.hi - self.lo) as u32;
        let abs_lo = (self.lo as u32 + span * lo.min(100) as u32 / 100) as u8;
        let abs_hi = (self.lo as u32 + span * hi.min(100) as u32 / 100) as u8;
        Self {
            emit: Arc::clone(&self.emit),
            last: Arc::clone(&self.last),
            lo: abs_lo,
            hi: abs_hi,
        }
    }
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSink")
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .field("last", &self.last.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn capturing_sink() -> (ProgressSink, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = ProgressSink::new(move |p| seen_clone.lock().unwrap().push(p));
        (sink, seen)
    }

    #[test]
    fn test_emit_delivers_increasing_values() {
        let (sink, seen) = capturing_sink();
        sink.emit(10);
        sink.emit(50);
        sink.emit(100);
        assert_eq!(*seen.lock().unwrap(), vec![10, 50, 100]);
    }

    #[test]
    fn test_backwards_and_repeated_values_dropped() {
        let (sink, seen) = capturing_sink();
        sink.emit(50);
        sink.emit(30);
        sink.emit(50);
        sink.emit(60);
        assert_eq!(*seen.lock().unwrap(), vec![50, 60]);
    }

    #[test]
    fn test_values_above_100_clamped() {
        let (sink, seen) = capturing_sink();
        sink.emit(250);
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }

    #[test]
    fn test_scaled_halves() {
        let (sink, seen) = capturing_sink();
        let first = sink.scaled(0, 50);
        let second = sink.scaled(50, 100);

        first.emit(20);
        first.emit(100);
        second.emit(20);
        second.emit(100);

        assert_eq!(*seen.lock().unwrap(), vec![10, 50, 60, 100]);
    }

    #[test]
    fn test_scaled_shares_watermark() {
        let (sink, seen) = capturing_sink();
        let second = sink.scaled(50, 100);
        second.emit(50); // 75 overall
        sink.emit(60); // behind the watermark, dropped
        assert_eq!(*seen.lock().unwrap(), vec![75]);
    }

    #[test]
    fn test_nested_scaling() {
        let (sink, seen) = capturing_sink();
        let half = sink.scaled(0, 50);
        let quarter = half.scaled(50, 100); // 25..50 overall
        quarter.emit(0);
        quarter.emit(100);
        assert_eq!(*seen.lock().unwrap(), vec![25, 50]);
    }
}

//! Progress reporting and cancellation for sampling runs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives one call per completed grid row
pub trait SampleProgress {
    /// `current` is the zero-based row just finished, `total` the row count
    fn on_progress(&mut self, current: usize, total: usize);
}

impl<F: FnMut(usize, usize)> SampleProgress for F {
    fn on_progress(&mut self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Progress sink that ignores every report
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl SampleProgress for NoProgress {
    fn on_progress(&mut self, _current: usize, _total: usize) {}
}

/// Logs whole-percent progress at info level
#[derive(Debug)]
pub struct ProgressLogger {
    label: String,
    last_percent: Option<u32>,
}

impl ProgressLogger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_percent: None,
        }
    }

    /// Last percentage that was logged
    pub fn last_percent(&self) -> Option<u32> {
        self.last_percent
    }

    fn percent(current: usize, total: usize) -> u32 {
        if total == 0 {
            return 100;
        }
        (current as f32 / total as f32 * 100.0).round() as u32
    }
}

impl SampleProgress for ProgressLogger {
    fn on_progress(&mut self, current: usize, total: usize) {
        let percent = Self::percent(current, total);
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            log::info!("{}... {}%", self.label, percent);
        }
    }
}

/// Shared flag used to stop a sampling run at the next row boundary
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_progress() {
        let mut calls = Vec::new();
        {
            let mut sink = |c: usize, t: usize| calls.push((c, t));
            sink.on_progress(0, 2);
            sink.on_progress(1, 2);
        }
        assert_eq!(calls, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_logger_only_tracks_changes() {
        let mut logger = ProgressLogger::new("Creating terrain");
        assert_eq!(logger.last_percent(), None);
        logger.on_progress(0, 1000);
        assert_eq!(logger.last_percent(), Some(0));
        logger.on_progress(4, 1000);
        assert_eq!(logger.last_percent(), Some(0));
        logger.on_progress(500, 1000);
        assert_eq!(logger.last_percent(), Some(50));
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}

// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Progress reporting for batch evaluation.

Observers are advisory: they are called after each candidate completes and
must not block. In parallel mode `on_progress` is called from worker threads,
in completion order, so `completed` is a count and not a candidate index.
*/

use std::time::Duration;
use tracing::info;

/// Receives progress events from the evaluation orchestrator
pub trait ProgressObserver: Sync {
    /// Called once before the first candidate, only for non-empty batches
    fn on_start(&self, _total: usize) {}

    /// Called once per completed candidate; `completed` runs from 1 to `total`
    fn on_progress(&self, completed: usize, total: usize);

    /// Called once after every candidate evaluated successfully
    fn on_finish(&self, _total: usize, _elapsed: Duration) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Observer that logs progress through `tracing` at every 10% step
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn decile(completed: usize, total: usize) -> usize {
        if total == 0 {
            return 10;
        }
        completed * 10 / total
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new("Individuals")
    }
}

impl ProgressObserver for LogProgress {
    fn on_start(&self, total: usize) {
        info!(target: "neatkit-evaluation", "{}: evaluating {} candidates", self.label, total);
    }

    fn on_progress(&self, completed: usize, total: usize) {
        // Each completion count is seen exactly once, so a decile boundary logs once
        if Self::decile(completed, total) != Self::decile(completed.saturating_sub(1), total) {
            info!(target: "neatkit-evaluation", "{}: ({}/{})", self.label, completed, total);
        }
    }

    fn on_finish(&self, total: usize, elapsed: Duration) {
        info!(
            target: "neatkit-evaluation",
            "{}: {} evaluated in {:.3}s",
            self.label,
            total,
            elapsed.as_secs_f64()
        );
    }
}

/// Adapter turning a closure into an observer
pub struct ProgressFn<F>(pub F);

impl<F> ProgressObserver for ProgressFn<F>
where
    F: Fn(usize, usize) + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        (self.0)(completed, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_decile_boundaries() {
        let crossings = (1..=25)
            .filter(|&c| LogProgress::decile(c, 25) != LogProgress::decile(c - 1, 25))
            .count();
        assert_eq!(crossings, 10);
    }

    #[test]
    fn test_progress_fn_adapter() {
        let calls = AtomicUsize::new(0);
        let observer = ProgressFn(|completed: usize, total: usize| {
            assert!(completed <= total);
            calls.fetch_add(1, Ordering::Relaxed);
        });
        observer.on_start(3);
        for completed in 1..=3 {
            observer.on_progress(completed, 3);
        }
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }
}

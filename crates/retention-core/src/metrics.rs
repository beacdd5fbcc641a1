//! Atomic counters for retention evaluations.
//!
//! [`RetentionMetrics`] is an ordinary value owned by the caller and passed to
//! [`crate::engine::evaluate_observed`] as an observer; there is no global
//! instance. Call [`RetentionMetrics::flush`] to emit current values as a
//! single `tracing::info!` event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{RetentionDiagnostics, RetentionRequest, ValidationError};
use crate::obs::RetentionObserver;

/// Lightweight atomic counters with no allocation or locking.
#[derive(Debug)]
pub struct RetentionMetrics {
    evaluations_completed: AtomicU64,
    evaluations_rejected: AtomicU64,
    groups_evaluated: AtomicU64,
    releases_kept: AtomicU64,
    deployments_excluded: AtomicU64,
    total_duration_us: AtomicU64,
}

impl Default for RetentionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RetentionMetrics {
    pub const fn new() -> Self {
        Self {
            evaluations_completed: AtomicU64::new(0),
            evaluations_rejected: AtomicU64::new(0),
            groups_evaluated: AtomicU64::new(0),
            releases_kept: AtomicU64::new(0),
            deployments_excluded: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
        }
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a batch, process exit)
    /// rather than after every evaluation.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            evaluations_completed = self.evaluations_completed(),
            evaluations_rejected = self.evaluations_rejected(),
            groups_evaluated = self.groups_evaluated(),
            releases_kept = self.releases_kept(),
            deployments_excluded = self.deployments_excluded(),
            total_duration_us = self.total_duration_us(),
        );
    }

    pub fn evaluations_completed(&self) -> u64 {
        self.evaluations_completed.load(Ordering::Relaxed)
    }

    pub fn evaluations_rejected(&self) -> u64 {
        self.evaluations_rejected.load(Ordering::Relaxed)
    }

    pub fn groups_evaluated(&self) -> u64 {
        self.groups_evaluated.load(Ordering::Relaxed)
    }

    pub fn releases_kept(&self) -> u64 {
        self.releases_kept.load(Ordering::Relaxed)
    }

    pub fn deployments_excluded(&self) -> u64 {
        self.deployments_excluded.load(Ordering::Relaxed)
    }

    /// Sum of evaluation durations in microseconds, completed and rejected.
    pub fn total_duration_us(&self) -> u64 {
        self.total_duration_us.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.evaluations_completed.store(0, Ordering::Relaxed);
        self.evaluations_rejected.store(0, Ordering::Relaxed);
        self.groups_evaluated.store(0, Ordering::Relaxed);
        self.releases_kept.store(0, Ordering::Relaxed);
        self.deployments_excluded.store(0, Ordering::Relaxed);
        self.total_duration_us.store(0, Ordering::Relaxed);
    }

    fn add_duration(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.total_duration_us.fetch_add(micros, Ordering::Relaxed);
    }
}

impl RetentionObserver for RetentionMetrics {
    fn on_started(&self, _request: &RetentionRequest) {
        tracing::trace!(metric = "evaluations_started", "counter observed");
    }

    fn on_completed(&self, diagnostics: &RetentionDiagnostics, elapsed: Duration) {
        self.evaluations_completed.fetch_add(1, Ordering::Relaxed);
        self.groups_evaluated
            .fetch_add(diagnostics.groups_evaluated as u64, Ordering::Relaxed);
        self.releases_kept
            .fetch_add(diagnostics.total_kept_releases as u64, Ordering::Relaxed);
        self.deployments_excluded.fetch_add(
            diagnostics.invalid_deployments_excluded as u64,
            Ordering::Relaxed,
        );
        self.add_duration(elapsed);
    }

    fn on_rejected(&self, _error: &ValidationError, elapsed: Duration) {
        self.evaluations_rejected.fetch_add(1, Ordering::Relaxed);
        self.add_duration(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = RetentionMetrics::new();
        let diag = RetentionDiagnostics {
            groups_evaluated: 2,
            invalid_deployments_excluded: 1,
            total_kept_releases: 3,
        };
        m.on_completed(&diag, Duration::from_micros(10));
        m.on_completed(&diag, Duration::from_micros(5));
        m.on_rejected(
            &ValidationError::NegativeReleasesToKeep { value: -1 },
            Duration::from_micros(1),
        );

        assert_eq!(m.evaluations_completed(), 2);
        assert_eq!(m.evaluations_rejected(), 1);
        assert_eq!(m.groups_evaluated(), 4);
        assert_eq!(m.releases_kept(), 6);
        assert_eq!(m.deployments_excluded(), 2);
        assert_eq!(m.total_duration_us(), 16);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = RetentionMetrics::new();
        m.on_completed(
            &RetentionDiagnostics {
                groups_evaluated: 1,
                invalid_deployments_excluded: 1,
                total_kept_releases: 1,
            },
            Duration::from_micros(3),
        );
        m.reset();
        assert_eq!(m.evaluations_completed(), 0);
        assert_eq!(m.groups_evaluated(), 0);
        assert_eq!(m.releases_kept(), 0);
        assert_eq!(m.deployments_excluded(), 0);
        assert_eq!(m.total_duration_us(), 0);
    }
}

//! Structured observability hooks for retention evaluations.
//!
//! This module provides:
//! - An evaluation-scoped tracing span via the `EvaluationSpan` RAII guard
//! - Emission functions for the evaluation lifecycle: started, completed, rejected
//! - The [`RetentionObserver`] collaborator consumed by
//!   [`crate::engine::evaluate_observed`]
//!
//! The pure pipeline never logs. Observation happens only around the whole
//! call and cannot change its result.

use std::time::Duration;

use tracing::info;

use crate::domain::{RetentionDiagnostics, RetentionRequest, ValidationError};

/// RAII guard that enters an evaluation-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = EvaluationSpan::enter(Some("req-12345"));
/// // All tracing calls are now associated with correlation_id = "req-12345"
/// ```
pub struct EvaluationSpan {
    _span: tracing::span::EnteredSpan,
}

impl EvaluationSpan {
    /// Create and enter a span tagged with the caller's correlation id, if any.
    pub fn enter(correlation_id: Option<&str>) -> Self {
        let span = tracing::info_span!(
            "retention.evaluate",
            correlation_id = correlation_id.unwrap_or("-")
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: evaluation started with input sizes.
pub fn emit_evaluation_started(request: &RetentionRequest) {
    info!(
        event = "retention.started",
        releases_to_keep = request.releases_to_keep,
        projects = request.projects.len(),
        environments = request.environments.len(),
        releases = request.releases.len(),
        deployments = request.deployments.len(),
    );
}

/// Emit event: evaluation completed with summary counters and duration.
pub fn emit_evaluation_completed(diagnostics: &RetentionDiagnostics, elapsed: Duration) {
    info!(
        event = "retention.completed",
        groups_evaluated = diagnostics.groups_evaluated,
        invalid_deployments_excluded = diagnostics.invalid_deployments_excluded,
        total_kept_releases = diagnostics.total_kept_releases,
        duration_us = duration_us(elapsed),
    );
}

/// Emit event: evaluation rejected by validation (warning level).
pub fn emit_evaluation_rejected(error: &ValidationError, elapsed: Duration) {
    tracing::warn!(
        event = "retention.rejected",
        code = error.code(),
        error = %error,
        duration_us = duration_us(elapsed),
    );
}

fn duration_us(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Observer of whole evaluations.
///
/// Every method has an empty default so implementors pick what they need.
pub trait RetentionObserver: Send + Sync {
    fn on_started(&self, _request: &RetentionRequest) {}

    fn on_completed(&self, _diagnostics: &RetentionDiagnostics, _elapsed: Duration) {}

    fn on_rejected(&self, _error: &ValidationError, _elapsed: Duration) {}
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RetentionObserver for NoopObserver {}

/// Observer that forwards to the `emit_*` functions in this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetentionObserver for TracingObserver {
    fn on_started(&self, request: &RetentionRequest) {
        emit_evaluation_started(request);
    }

    fn on_completed(&self, diagnostics: &RetentionDiagnostics, elapsed: Duration) {
        emit_evaluation_completed(diagnostics, elapsed);
    }

    fn on_rejected(&self, error: &ValidationError, elapsed: Duration) {
        emit_evaluation_rejected(error, elapsed);
    }
}

impl<T: RetentionObserver + ?Sized> RetentionObserver for &T {
    fn on_started(&self, request: &RetentionRequest) {
        (**self).on_started(request);
    }

    fn on_completed(&self, diagnostics: &RetentionDiagnostics, elapsed: Duration) {
        (**self).on_completed(diagnostics, elapsed);
    }

    fn on_rejected(&self, error: &ValidationError, elapsed: Duration) {
        (**self).on_rejected(error, elapsed);
    }
}

/// Fan out to two observers, first `A` then `B`.
impl<A: RetentionObserver, B: RetentionObserver> RetentionObserver for (A, B) {
    fn on_started(&self, request: &RetentionRequest) {
        self.0.on_started(request);
        self.1.on_started(request);
    }

    fn on_completed(&self, diagnostics: &RetentionDiagnostics, elapsed: Duration) {
        self.0.on_completed(diagnostics, elapsed);
        self.1.on_completed(diagnostics, elapsed);
    }

    fn on_rejected(&self, error: &ValidationError, elapsed: Duration) {
        self.0.on_rejected(error, elapsed);
        self.1.on_rejected(error, elapsed);
    }
}

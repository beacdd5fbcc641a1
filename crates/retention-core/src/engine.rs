//! Retention evaluation entry points.
//!
//! [`evaluate`] composes the pipeline stages:
//! validation → reference index → deployment filter → policy → assembly →
//! diagnostics. It performs no I/O, reads no clock and holds no state, so it
//! is safe to call concurrently and returns identical output for identical
//! input sets regardless of element order.

use std::time::Instant;

use crate::assemble::assemble;
use crate::diagnostics::calculate;
use crate::domain::{Result, RetentionRequest, RetentionResult};
use crate::filter::filter_deployments;
use crate::index::ReferenceIndex;
use crate::obs::{EvaluationSpan, RetentionObserver};
use crate::policy::evaluate_policy;
use crate::validation::validate;

/// Decide which releases to keep.
///
/// # Errors
///
/// Returns [`crate::domain::ValidationError`] when the request is structurally
/// invalid (negative `releases_to_keep`, a `null` element, a duplicate id).
/// Dangling references are not errors; they appear as diagnostic entries in
/// [`RetentionResult::decisions`].
pub fn evaluate(request: &RetentionRequest) -> Result<RetentionResult> {
    let input = validate(request)?;

    let index = ReferenceIndex::build(&input.projects, &input.environments, &input.releases);
    let filtered = filter_deployments(&input.deployments, &index, input.correlation_id);
    let policy = evaluate_policy(&filtered.valid, &index, input.keep);

    let (kept_releases, decisions) = assemble(
        &policy.candidates,
        filtered.diagnostics,
        input.releases_to_keep,
        input.correlation_id,
    );
    let diagnostics = calculate(&policy, filtered.excluded_count, &kept_releases);

    Ok(RetentionResult {
        kept_releases,
        decisions,
        diagnostics,
    })
}

/// [`evaluate`] wrapped with timing and an observer.
///
/// The observer sees the request, then either the summary diagnostics or the
/// validation error. The returned value is exactly what [`evaluate`] returns.
pub fn evaluate_observed(
    request: &RetentionRequest,
    observer: &dyn RetentionObserver,
) -> Result<RetentionResult> {
    let _span = EvaluationSpan::enter(request.correlation_id.as_deref());
    observer.on_started(request);

    let started = Instant::now();
    let outcome = evaluate(request);
    let elapsed = started.elapsed();

    match &outcome {
        Ok(result) => observer.on_completed(&result.diagnostics, elapsed),
        Err(error) => observer.on_rejected(error, elapsed),
    }
    outcome
}

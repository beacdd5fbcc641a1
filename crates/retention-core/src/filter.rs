//! Reference-integrity filtering of deployments.
//!
//! Unlike validation, this stage never fails: a deployment that points at a
//! missing release, project or environment is excluded and described by one
//! diagnostic decision-log entry listing every problem found.

use crate::domain::{
    DecisionKind, DecisionLogEntry, Deployment, ReasonCode, UNKNOWN_PROJECT_ID,
};
use crate::index::ReferenceIndex;

/// Deployments split into those safe to rank and those excluded.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome<'a> {
    /// Deployments whose references all resolve, in input order.
    pub valid: Vec<&'a Deployment>,
    /// One entry per excluded deployment, in input order.
    pub diagnostics: Vec<DecisionLogEntry>,
    pub excluded_count: usize,
}

/// Partition `deployments` into valid and diagnosed.
pub fn filter_deployments<'a>(
    deployments: &[&'a Deployment],
    index: &ReferenceIndex<'_>,
    correlation_id: Option<&str>,
) -> FilterOutcome<'a> {
    let mut outcome = FilterOutcome::default();

    for &deployment in deployments {
        let reasons = broken_references(deployment, index);
        if reasons.is_empty() {
            outcome.valid.push(deployment);
            continue;
        }

        let project_id = index
            .release(&deployment.release_id)
            .map(|r| r.project_id.clone())
            .unwrap_or_else(|| UNKNOWN_PROJECT_ID.to_string());

        outcome.diagnostics.push(DecisionLogEntry {
            kind: DecisionKind::Diagnostic,
            deployment_id: Some(deployment.id.clone()),
            project_id,
            environment_id: deployment.environment_id.clone(),
            release_id: deployment.release_id.clone(),
            version: None,
            latest_deployed_at: None,
            rank: 0,
            reason_code: ReasonCode::InvalidReference,
            reason_text: format!(
                "Deployment '{}' excluded: {}",
                deployment.id,
                reasons.join("; ")
            ),
            correlation_id: correlation_id.map(str::to_string),
        });
    }

    outcome.excluded_count = outcome.diagnostics.len();
    outcome
}

/// Every unresolved reference of `deployment`, in check order:
/// release, the release's project, environment.
fn broken_references(deployment: &Deployment, index: &ReferenceIndex<'_>) -> Vec<String> {
    let mut reasons = Vec::new();

    match index.release(&deployment.release_id) {
        Some(release) => {
            if index.project(&release.project_id).is_none() {
                reasons.push(format!("project '{}' not found", release.project_id));
            }
        }
        None => reasons.push(format!("release '{}' not found", deployment.release_id)),
    }

    if index.environment(&deployment.environment_id).is_none() {
        reasons.push(format!(
            "environment '{}' not found",
            deployment.environment_id
        ));
    }

    reasons
}

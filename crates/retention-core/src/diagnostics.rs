//! Summary counters for an evaluation.

use crate::domain::{KeptRelease, RetentionDiagnostics};
use crate::policy::PolicyOutcome;

/// Compute [`RetentionDiagnostics`].
///
/// `groups_evaluated` counts distinct (project, environment) pairs that had at
/// least one eligible release, whether or not anything was kept for them.
/// `evaluated_groups` already holds each such pair exactly once.
pub fn calculate(
    policy: &PolicyOutcome,
    invalid_excluded: usize,
    kept_releases: &[KeptRelease],
) -> RetentionDiagnostics {
    RetentionDiagnostics {
        groups_evaluated: policy.evaluated_groups.len(),
        invalid_deployments_excluded: invalid_excluded,
        total_kept_releases: kept_releases.len(),
    }
}

//! Result assembly: kept-release records and the ordered decision log.

use crate::domain::{DecisionKind, DecisionLogEntry, KeptRelease};
use crate::policy::ReleaseCandidate;

/// Map candidates to output records and build the combined decision log.
///
/// Kept releases are sorted by (project, environment, rank). The log lists
/// one kept entry per kept release in that same order, followed by
/// `diagnostics` unchanged. Kept entries carry `correlation_id` verbatim;
/// diagnostic entries already carry it from [`crate::filter`].
pub fn assemble(
    candidates: &[ReleaseCandidate],
    diagnostics: Vec<DecisionLogEntry>,
    releases_to_keep: i64,
    correlation_id: Option<&str>,
) -> (Vec<KeptRelease>, Vec<DecisionLogEntry>) {
    let mut kept: Vec<KeptRelease> = candidates.iter().map(to_kept_release).collect();
    kept.sort_by(|a, b| {
        a.project_id
            .cmp(&b.project_id)
            .then_with(|| a.environment_id.cmp(&b.environment_id))
            .then_with(|| a.rank.cmp(&b.rank))
    });

    let mut decisions = Vec::with_capacity(kept.len() + diagnostics.len());
    decisions.extend(
        kept.iter()
            .map(|release| kept_entry(release, releases_to_keep, correlation_id)),
    );
    decisions.extend(diagnostics);

    (kept, decisions)
}

fn to_kept_release(candidate: &ReleaseCandidate) -> KeptRelease {
    KeptRelease {
        release_id: candidate.release_id.clone(),
        project_id: candidate.project_id.clone(),
        environment_id: candidate.environment_id.clone(),
        version: candidate.version.clone(),
        created: candidate.created,
        latest_deployed_at: candidate.latest_deployed_at,
        rank: candidate.rank,
        reason_code: candidate.reason_code,
    }
}

/// Explanation recorded for a kept release.
pub fn kept_reason_text(release: &KeptRelease, releases_to_keep: i64) -> String {
    format!(
        "Release '{}' kept: rank {} of {} for project '{}' / environment '{}'",
        release.release_id,
        release.rank,
        releases_to_keep,
        release.project_id,
        release.environment_id
    )
}

fn kept_entry(
    release: &KeptRelease,
    releases_to_keep: i64,
    correlation_id: Option<&str>,
) -> DecisionLogEntry {
    DecisionLogEntry {
        kind: DecisionKind::Kept,
        deployment_id: None,
        project_id: release.project_id.clone(),
        environment_id: release.environment_id.clone(),
        release_id: release.release_id.clone(),
        version: release.version.clone(),
        latest_deployed_at: Some(release.latest_deployed_at),
        rank: release.rank,
        reason_code: release.reason_code,
        reason_text: kept_reason_text(release, releases_to_keep),
        correlation_id: correlation_id.map(str::to_string),
    }
}

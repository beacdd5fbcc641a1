//! Top-N retention policy.
//!
//! Valid deployments are grouped by (project, environment, release) to find
//! each release's latest deployment, then ranked within every
//! (project, environment) group and cut to the first `n`.
//!
//! Ranking is a total order, so the output does not depend on input order:
//! 1. `latest_deployed_at` descending
//! 2. release `created` descending
//! 3. release id ascending, ordinal (`"Release-10"` before `"Release-2"`)

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::{Deployment, ReasonCode};
use crate::index::ReferenceIndex;

/// A (project, environment) pair whose releases are ranked together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub project_id: String,
    pub environment_id: String,
}

/// One release's standing within a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub release_id: String,
    pub version: Option<String>,
    pub created: DateTime<Utc>,
    /// Max `deployed_at` over the release's valid deployments to the environment.
    pub latest_deployed_at: DateTime<Utc>,
}

/// A group entry after sorting, with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub entry: GroupEntry,
    pub rank: usize,
}

/// A selected release, tagged with its group and reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCandidate {
    pub project_id: String,
    pub environment_id: String,
    pub release_id: String,
    pub version: Option<String>,
    pub created: DateTime<Utc>,
    pub latest_deployed_at: DateTime<Utc>,
    pub rank: usize,
    pub reason_code: ReasonCode,
}

impl ReleaseCandidate {
    fn from_ranked(key: &GroupKey, ranked: RankedCandidate) -> Self {
        Self {
            project_id: key.project_id.clone(),
            environment_id: key.environment_id.clone(),
            release_id: ranked.entry.release_id,
            version: ranked.entry.version,
            created: ranked.entry.created,
            latest_deployed_at: ranked.entry.latest_deployed_at,
            rank: ranked.rank,
            reason_code: ReasonCode::KeptTopN,
        }
    }
}

/// Selected candidates plus every group that had an eligible release.
///
/// `evaluated_groups` is reported separately because with `n = 0` a group
/// yields no candidates yet still counts as evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Candidates ordered by group key, then rank.
    pub candidates: Vec<ReleaseCandidate>,
    /// Groups in key order.
    pub evaluated_groups: Vec<GroupKey>,
}

/// Ranking comparator; `Ordering::Less` means `a` is retained first.
pub fn rank_order(a: &GroupEntry, b: &GroupEntry) -> Ordering {
    b.latest_deployed_at
        .cmp(&a.latest_deployed_at)
        .then_with(|| b.created.cmp(&a.created))
        .then_with(|| a.release_id.cmp(&b.release_id))
}

/// Take the first `n` of an already ranked group and number them from 1.
pub fn select_top_n(ranked: Vec<GroupEntry>, n: usize) -> Vec<RankedCandidate> {
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, entry)| RankedCandidate { entry, rank: i + 1 })
        .collect()
}

/// Sort one group with [`rank_order`] and keep the top `n`.
pub fn rank_group(mut entries: Vec<GroupEntry>, n: usize) -> Vec<RankedCandidate> {
    entries.sort_by(rank_order);
    select_top_n(entries, n)
}

/// Apply the top-`n` policy to deployments that passed [`crate::filter`].
///
/// A deployment whose release is absent from `index` is skipped; the filter
/// guarantees this does not happen.
pub fn evaluate_policy(
    valid_deployments: &[&Deployment],
    index: &ReferenceIndex<'_>,
    n: usize,
) -> PolicyOutcome {
    let mut groups: BTreeMap<(&str, &str), HashMap<&str, GroupEntry>> = BTreeMap::new();

    for deployment in valid_deployments {
        let Some(release) = index.release(&deployment.release_id) else {
            continue;
        };

        groups
            .entry((release.project_id.as_str(), deployment.environment_id.as_str()))
            .or_default()
            .entry(release.id.as_str())
            .and_modify(|entry| {
                entry.latest_deployed_at = entry.latest_deployed_at.max(deployment.deployed_at);
            })
            .or_insert_with(|| GroupEntry {
                release_id: release.id.clone(),
                version: release.version.clone(),
                created: release.created,
                latest_deployed_at: deployment.deployed_at,
            });
    }

    let mut outcome = PolicyOutcome::default();
    for ((project_id, environment_id), entries) in groups {
        let key = GroupKey {
            project_id: project_id.to_string(),
            environment_id: environment_id.to_string(),
        };
        let ranked = rank_group(entries.into_values().collect(), n);
        outcome.candidates.extend(
            ranked
                .into_iter()
                .map(|candidate| ReleaseCandidate::from_ranked(&key, candidate)),
        );
        outcome.evaluated_groups.push(key);
    }
    outcome
}

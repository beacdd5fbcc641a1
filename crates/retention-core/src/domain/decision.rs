//! Evaluation outputs: kept releases, the decision log, and summary counters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project id recorded on a diagnostic entry whose release could not be found.
pub const UNKNOWN_PROJECT_ID: &str = "unknown";

/// Machine-readable reason attached to every decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    /// Release ranked within the top `n` of its group.
    #[serde(rename = "kept.top_n")]
    KeptTopN,

    /// Deployment excluded because it references a missing entity.
    #[serde(rename = "diagnostic.invalid_reference")]
    InvalidReference,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::KeptTopN => "kept.top_n",
            ReasonCode::InvalidReference => "diagnostic.invalid_reference",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A release retained for one (project, environment) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeptRelease {
    pub release_id: String,
    pub project_id: String,
    pub environment_id: String,
    pub version: Option<String>,
    pub created: DateTime<Utc>,
    /// Most recent valid deployment of this release to the environment.
    pub latest_deployed_at: DateTime<Utc>,
    /// 1-based position within the group.
    pub rank: usize,
    pub reason_code: ReasonCode,
}

/// Whether a decision-log entry records a keep or an excluded deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Kept,
    Diagnostic,
}

/// One line of the decision log.
///
/// Diagnostic entries carry `rank = 0` and no `latest_deployed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionLogEntry {
    pub kind: DecisionKind,

    /// Set only for diagnostic entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,

    pub project_id: String,
    pub environment_id: String,
    pub release_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub latest_deployed_at: Option<DateTime<Utc>>,
    pub rank: usize,
    pub reason_code: ReasonCode,

    /// Human-readable explanation.
    pub reason_text: String,

    /// Caller-supplied correlation id, copied verbatim.
    pub correlation_id: Option<String>,
}

impl DecisionLogEntry {
    pub fn is_kept(&self) -> bool {
        self.kind == DecisionKind::Kept
    }
}

/// Summary counters for one evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionDiagnostics {
    /// Distinct (project, environment) pairs with at least one eligible release.
    pub groups_evaluated: usize,
    pub invalid_deployments_excluded: usize,
    pub total_kept_releases: usize,
}

/// Complete output of one evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionResult {
    pub kept_releases: Vec<KeptRelease>,
    pub decisions: Vec<DecisionLogEntry>,
    pub diagnostics: RetentionDiagnostics,
}

impl RetentionResult {
    /// Diagnostic (excluded deployment) entries, in processing order.
    pub fn diagnostic_entries(&self) -> impl Iterator<Item = &DecisionLogEntry> {
        self.decisions.iter().filter(|d| !d.is_kept())
    }
}

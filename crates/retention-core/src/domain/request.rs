//! Evaluation input envelope.

use serde::{Deserialize, Serialize};

use super::release::{null_as_empty, Deployment, Environment, Project, Release};

/// Everything one retention evaluation needs.
///
/// Collections hold `Option<T>` because boundary formats can carry `null`
/// elements; those are rejected by validation rather than silently dropped.
/// A `null` or missing collection is treated as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<Option<Project>>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub environments: Vec<Option<Environment>>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub releases: Vec<Option<Release>>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployments: Vec<Option<Deployment>>,

    /// Releases to keep per (project, environment) pair. Signed so that a
    /// negative value reaches validation instead of failing to parse.
    pub releases_to_keep: i64,

    /// Opaque id copied onto every decision-log entry. Never generated.
    #[serde(default)]
    pub correlation_id: Option<String>,
}

impl RetentionRequest {
    /// Build a request from fully-populated collections.
    pub fn new(
        projects: Vec<Project>,
        environments: Vec<Environment>,
        releases: Vec<Release>,
        deployments: Vec<Deployment>,
        releases_to_keep: i64,
    ) -> Self {
        Self {
            projects: projects.into_iter().map(Some).collect(),
            environments: environments.into_iter().map(Some).collect(),
            releases: releases.into_iter().map(Some).collect(),
            deployments: deployments.into_iter().map(Some).collect(),
            releases_to_keep,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_releases_to_keep(mut self, releases_to_keep: i64) -> Self {
        self.releases_to_keep = releases_to_keep;
        self
    }
}

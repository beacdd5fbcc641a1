//! Structural validation of a [`RetentionRequest`].
//!
//! Checks run in a fixed order and stop at the first violation:
//! 1. `releases_to_keep` is not negative.
//! 2. No `null` element in projects, environments, releases, deployments
//!    (in that order).
//! 3. Ids are unique within projects, then environments, then releases.
//!
//! Cross-entity references are not inspected here; dangling references are
//! reported by [`crate::filter`]. Deployment ids may repeat.

use std::collections::HashSet;

use crate::domain::{
    Deployment, EntityKind, Environment, Identified, Project, Release, Result, RetentionRequest,
    ValidationError,
};

pub const PROJECTS: &str = "projects";
pub const ENVIRONMENTS: &str = "environments";
pub const RELEASES: &str = "releases";
pub const DEPLOYMENTS: &str = "deployments";

/// Borrowed view of a request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest<'a> {
    pub projects: Vec<&'a Project>,
    pub environments: Vec<&'a Environment>,
    pub releases: Vec<&'a Release>,
    pub deployments: Vec<&'a Deployment>,
    /// Requested `releases_to_keep`, as supplied.
    pub releases_to_keep: i64,
    /// `releases_to_keep` as a selection bound.
    pub keep: usize,
    pub correlation_id: Option<&'a str>,
}

/// Validate `request`, returning a view with `null` elements ruled out.
///
/// # Errors
///
/// - `ValidationError::NegativeReleasesToKeep`: `releases_to_keep < 0`.
/// - `ValidationError::NullElement`: a collection holds a `null` element.
/// - `ValidationError::DuplicateId`: an id repeats within projects,
///   environments or releases.
pub fn validate(request: &RetentionRequest) -> Result<ValidatedRequest<'_>> {
    if request.releases_to_keep < 0 {
        return Err(ValidationError::NegativeReleasesToKeep {
            value: request.releases_to_keep,
        });
    }

    let projects = non_null(&request.projects, PROJECTS)?;
    let environments = non_null(&request.environments, ENVIRONMENTS)?;
    let releases = non_null(&request.releases, RELEASES)?;
    let deployments = non_null(&request.deployments, DEPLOYMENTS)?;

    ensure_unique(&projects, EntityKind::Project)?;
    ensure_unique(&environments, EntityKind::Environment)?;
    ensure_unique(&releases, EntityKind::Release)?;

    // Non-negative i64 only overflows usize on 32-bit targets; any value that
    // large already exceeds every group size.
    let keep = usize::try_from(request.releases_to_keep).unwrap_or(usize::MAX);

    Ok(ValidatedRequest {
        projects,
        environments,
        releases,
        deployments,
        releases_to_keep: request.releases_to_keep,
        keep,
        correlation_id: request.correlation_id.as_deref(),
    })
}

fn non_null<'a, T>(items: &'a [Option<T>], collection: &'static str) -> Result<Vec<&'a T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_ref()
                .ok_or(ValidationError::NullElement { collection, index })
        })
        .collect()
}

fn ensure_unique<T: Identified>(items: &[&T], kind: EntityKind) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    for item in items {
        let id = item.id();
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

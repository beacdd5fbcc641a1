//! O(1) id lookups over validated input.

use std::collections::HashMap;

use crate::domain::{Environment, Identified, Project, Release};

/// Read-only id → entity maps, built once per evaluation.
///
/// Assumes ids are already unique (see [`crate::validation`]); a later
/// duplicate would silently replace an earlier one. Lookups use exact,
/// case-sensitive equality.
#[derive(Debug, Default)]
pub struct ReferenceIndex<'a> {
    projects: HashMap<&'a str, &'a Project>,
    environments: HashMap<&'a str, &'a Environment>,
    releases: HashMap<&'a str, &'a Release>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(
        projects: &[&'a Project],
        environments: &[&'a Environment],
        releases: &[&'a Release],
    ) -> Self {
        Self {
            projects: by_id(projects),
            environments: by_id(environments),
            releases: by_id(releases),
        }
    }

    pub fn project(&self, id: &str) -> Option<&'a Project> {
        self.projects.get(id).copied()
    }

    pub fn environment(&self, id: &str) -> Option<&'a Environment> {
        self.environments.get(id).copied()
    }

    pub fn release(&self, id: &str) -> Option<&'a Release> {
        self.releases.get(id).copied()
    }
}

fn by_id<'a, T: Identified>(items: &[&'a T]) -> HashMap<&'a str, &'a T> {
    items.iter().map(|&item| (item.id(), item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_lookups_hit_and_miss() {
        let projects = [Project::new("P1", "api")];
        let environments = [Environment::new("E1", "prod")];
        let releases = [Release::new("R1", "P1", Some("1.0.0".into()), Utc::now())];

        let p: Vec<&Project> = projects.iter().collect();
        let e: Vec<&Environment> = environments.iter().collect();
        let r: Vec<&Release> = releases.iter().collect();
        let index = ReferenceIndex::build(&p, &e, &r);

        assert_eq!(index.project("P1").map(|p| p.name.as_str()), Some("api"));
        assert_eq!(index.environment("E1").map(|e| e.name.as_str()), Some("prod"));
        assert_eq!(
            index.release("R1").and_then(|r| r.version.as_deref()),
            Some("1.0.0")
        );
        assert!(index.project("P2").is_none());
        assert!(index.environment("e1").is_none());
        assert!(index.release("").is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = ReferenceIndex::build(&[], &[], &[]);
        assert!(index.project("P1").is_none());
        assert!(index.environment("E1").is_none());
        assert!(index.release("R1").is_none());
    }
}

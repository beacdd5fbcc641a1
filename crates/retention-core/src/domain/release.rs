//! Input entities: projects, environments, releases and deployments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A deployable application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Unique identifier within one evaluation input.
    pub id: String,

    /// Display name.
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A deployment target such as staging or production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    /// Unique identifier within one evaluation input.
    pub id: String,

    /// Display name.
    pub name: String,
}

impl Environment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An immutable, versioned snapshot of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Unique identifier within one evaluation input.
    pub id: String,

    /// Owning project. May point at a project that is not in the input.
    pub project_id: String,

    /// Optional version label.
    #[serde(default)]
    pub version: Option<String>,

    /// When the release was created.
    pub created: DateTime<Utc>,
}

impl Release {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        version: Option<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            version,
            created,
        }
    }
}

/// A record that a release was deployed to an environment.
///
/// Ids are not required to be unique: the same release may be deployed to the
/// same environment many times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub id: String,
    pub release_id: String,
    pub environment_id: String,
    pub deployed_at: DateTime<Utc>,
}

impl Deployment {
    pub fn new(
        id: impl Into<String>,
        release_id: impl Into<String>,
        environment_id: impl Into<String>,
        deployed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            release_id: release_id.into(),
            environment_id: environment_id.into(),
            deployed_at,
        }
    }
}

/// Entities addressed by a string id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Environment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Release {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Deserialize a collection where `null` means "no elements".
///
/// `null` entries inside the array are preserved as `None` so that validation
/// can reject them with a coded error.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default())
}

//! Error taxonomy for retention evaluation.
//!
//! Only structural problems with the input are errors. Dangling references
//! between entities are reported as diagnostic decision-log entries instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity collections whose ids must be unique.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Environment,
    Release,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Environment => "environment",
            EntityKind::Release => "release",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal input validation failures. Evaluation is aborted on the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("releases to keep must be zero or greater, got {value}")]
    NegativeReleasesToKeep { value: i64 },

    #[error("{collection} contains a null element at index {index}")]
    NullElement {
        collection: &'static str,
        index: usize,
    },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntityKind, id: String },
}

impl ValidationError {
    /// Stable machine-readable code for boundary layers.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NegativeReleasesToKeep { .. } => "validation.n_negative",
            ValidationError::NullElement { .. } => "validation.null_element",
            ValidationError::DuplicateId { kind, .. } => match kind {
                EntityKind::Project => "validation.duplicate_id.project",
                EntityKind::Environment => "validation.duplicate_id.environment",
                EntityKind::Release => "validation.duplicate_id.release",
            },
        }
    }
}

/// Result type for retention evaluation.
pub type Result<T> = std::result::Result<T, ValidationError>;

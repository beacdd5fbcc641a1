//! Domain models for release retention.
//!
//! Canonical definitions for the core entities:
//! - `Project`, `Environment`, `Release`, `Deployment`: evaluation inputs
//! - `KeptRelease`, `DecisionLogEntry`, `RetentionDiagnostics`: evaluation outputs
//! - `RetentionRequest`: the input envelope
//! - `ValidationError`: fatal input errors with stable codes

pub mod decision;
pub mod error;
pub mod release;
pub mod request;

pub use decision::{
    DecisionKind, DecisionLogEntry, KeptRelease, ReasonCode, RetentionDiagnostics,
    RetentionResult, UNKNOWN_PROJECT_ID,
};
pub use error::{EntityKind, Result, ValidationError};
pub use release::{Deployment, Environment, Identified, Project, Release};
pub use request::RetentionRequest;

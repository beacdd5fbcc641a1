//! Release retention core library.
//!
//! Decides, per (project, environment) pair, which `n` releases were most
//! recently deployed and must be kept, and explains every decision.
//!
//! ```ignore
//! let result = retention_core::evaluate(&request)?;
//! for kept in &result.kept_releases { /* ... */ }
//! ```

pub mod assemble;
pub mod diagnostics;
pub mod digest;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod index;
pub mod metrics;
pub mod obs;
pub mod policy;
pub mod reporting;
pub mod telemetry;
pub mod validation;

pub use domain::{
    DecisionKind, DecisionLogEntry, Deployment, EntityKind, Environment, KeptRelease, Project,
    ReasonCode, Release, Result, RetentionDiagnostics, RetentionRequest, RetentionResult,
    ValidationError,
};

pub use engine::{evaluate, evaluate_observed};

pub use digest::{result_digest, DigestError};
pub use filter::{filter_deployments, FilterOutcome};
pub use index::ReferenceIndex;
pub use policy::{
    evaluate_policy, rank_order, select_top_n, GroupEntry, GroupKey, PolicyOutcome,
    RankedCandidate, ReleaseCandidate,
};
pub use validation::{validate, ValidatedRequest};

pub use metrics::RetentionMetrics;
pub use obs::{
    emit_evaluation_completed, emit_evaluation_rejected, emit_evaluation_started,
    EvaluationSpan, NoopObserver, RetentionObserver, TracingObserver,
};
pub use reporting::{render_result_md, write_result_json, write_result_md};
pub use telemetry::init_tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

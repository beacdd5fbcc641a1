//! Golden digests of evaluation results.
//!
//! A result is serialized to JSON, object keys are sorted recursively, and the
//! compact form is hashed with SHA-256. Two evaluations of the same input set
//! must produce the same digest; tests and the CLI use this to check
//! idempotence and permutation invariance.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::RetentionResult;

/// Errors produced while computing a digest.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Recursively sort JSON object keys.
fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    sorted.insert(key.clone(), sort_keys(v));
                }
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Serialize `value` to compact JSON with sorted object keys.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, DigestError> {
    let raw = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&sort_keys(&raw))?)
}

/// SHA-256 hex digest of the canonical JSON form of `value`.
pub fn compute_digest<T: Serialize>(value: &T) -> Result<String, DigestError> {
    let canonical = canonical_json(value)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Golden digest of an evaluation result.
pub fn result_digest(result: &RetentionResult) -> Result<String, DigestError> {
    compute_digest(result)
}

//! Error types used by the sendvisor runtime.
//!
//! This module defines:
//!
//! - [`ConfigViolation`] — one invalid entry in a target batch; validation
//!   collects every violation before the run is rejected.
//! - [`RuntimeError`] — errors raised by the dispatch runtime itself.
//! - [`ManifestError`] — failures while loading a TOML run manifest.
//!
//! Per-attempt delivery failures are **not** errors at this level: the target
//! loop swallows them, publishes a `DeliveryFailed` event, and keeps running.

use std::time::Duration;
use thiserror::Error;

/// # A single configuration violation found while validating a target batch.
///
/// Validation never stops at the first problem: the whole batch is checked
/// and every violation is reported together inside
/// [`RuntimeError::ConfigRejected`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigViolation {
    /// The target batch was empty; there is nothing to dispatch to.
    #[error("target batch is empty")]
    EmptyBatch,

    /// A target identifier was empty.
    #[error("target at index {index} has an empty identifier")]
    EmptyTargetId {
        /// Position of the offending spec within the batch.
        index: usize,
    },

    /// The same target identifier appeared more than once in the batch.
    #[error("duplicate target identifier {target:?}")]
    DuplicateTargetId {
        /// The repeated identifier.
        target: String,
    },

    /// A target's send interval was zero.
    #[error("target {target:?} has a non-positive interval")]
    NonPositiveInterval {
        /// The offending identifier.
        target: String,
    },
}

impl ConfigViolation {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigViolation::EmptyBatch => "config_empty_batch",
            ConfigViolation::EmptyTargetId { .. } => "config_empty_target_id",
            ConfigViolation::DuplicateTargetId { .. } => "config_duplicate_target_id",
            ConfigViolation::NonPositiveInterval { .. } => "config_non_positive_interval",
        }
    }
}

/// # Errors produced by the dispatch runtime.
///
/// These represent failures of the orchestration itself, not of individual
/// send attempts. A rejected configuration is raised before any loop starts;
/// an exceeded grace period is raised after a stop-all request when some
/// loops failed to reach a terminal phase in time.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The target batch failed validation; no loop was started.
    #[error("configuration rejected: {}", format_violations(.violations))]
    ConfigRejected {
        /// Every violation found in the batch, in discovery order.
        violations: Vec<ConfigViolation>,
    },

    /// Shutdown grace period was exceeded; some loops were still running.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Identifiers of targets whose loops did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::ConfigRejected { .. } => "runtime_config_rejected",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

fn format_violations(violations: &[ConfigViolation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    parts.join("; ")
}

/// # Errors produced while loading a run manifest.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path:?}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest was not valid TOML or did not match the expected shape.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejected_lists_every_violation() {
        let err = RuntimeError::ConfigRejected {
            violations: vec![
                ConfigViolation::EmptyTargetId { index: 0 },
                ConfigViolation::NonPositiveInterval {
                    target: "@group".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("empty identifier"), "missing first violation: {msg}");
        assert!(msg.contains("non-positive interval"), "missing second violation: {msg}");
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ConfigViolation::EmptyBatch.as_label(), "config_empty_batch");
        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(5),
            stuck: vec![],
        };
        assert_eq!(err.as_label(), "runtime_grace_exceeded");
    }
}

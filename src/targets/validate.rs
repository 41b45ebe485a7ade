//! # Whole-batch validation of target specs.
//!
//! Validation runs once, before any loop is spawned, and checks the entire
//! batch rather than stopping at the first problem. The caller receives every
//! violation found, in discovery order.
//!
//! ## Rules
//! - Empty batch → [`ConfigViolation::EmptyBatch`]
//! - Empty identifier → [`ConfigViolation::EmptyTargetId`]
//! - Duplicate identifier → [`ConfigViolation::DuplicateTargetId`] (reported
//!   once per repeated identifier)
//! - Zero interval → [`ConfigViolation::NonPositiveInterval`]
//!
//! A negative `max_messages` is unrepresentable (`u64`); `Some(0)` is valid
//! and means "terminate immediately as exhausted".

use std::collections::HashSet;
use std::time::Duration;

use crate::error::ConfigViolation;
use crate::targets::TargetSpec;

/// Validates a batch of target specs, collecting every violation.
pub(crate) fn validate(specs: &[TargetSpec]) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if specs.is_empty() {
        violations.push(ConfigViolation::EmptyBatch);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported_dup: HashSet<&str> = HashSet::new();

    for (index, spec) in specs.iter().enumerate() {
        let id: &str = spec.target_id();

        if id.is_empty() {
            violations.push(ConfigViolation::EmptyTargetId { index });
        } else if !seen.insert(id) && reported_dup.insert(id) {
            violations.push(ConfigViolation::DuplicateTargetId { target: id.to_string() });
        }

        if spec.interval() == Duration::ZERO {
            violations.push(ConfigViolation::NonPositiveInterval {
                target: id.to_string(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, interval_ms: u64) -> TargetSpec {
        TargetSpec::new(id, Duration::from_millis(interval_ms))
    }

    #[test]
    fn test_valid_batch_passes() {
        let specs = vec![spec("@a", 100), spec("@b", 250).with_max_messages(3)];
        assert!(validate(&specs).is_ok());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let violations = validate(&[]).unwrap_err();
        assert_eq!(violations, vec![ConfigViolation::EmptyBatch]);
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        let violations = validate(&[spec("", 100)]).unwrap_err();
        assert_eq!(violations, vec![ConfigViolation::EmptyTargetId { index: 0 }]);
    }

    #[test]
    fn test_duplicate_identifier_is_rejected_once() {
        let specs = vec![spec("@a", 100), spec("@a", 100), spec("@a", 100)];
        let violations = validate(&specs).unwrap_err();
        assert_eq!(
            violations,
            vec![ConfigViolation::DuplicateTargetId { target: "@a".into() }]
        );
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let violations = validate(&[spec("@a", 0)]).unwrap_err();
        assert_eq!(
            violations,
            vec![ConfigViolation::NonPositiveInterval { target: "@a".into() }]
        );
    }

    #[test]
    fn test_all_violations_are_aggregated() {
        let specs = vec![spec("", 0), spec("@b", 100), spec("@b", 0)];
        let violations = validate(&specs).unwrap_err();
        assert_eq!(
            violations,
            vec![
                ConfigViolation::EmptyTargetId { index: 0 },
                ConfigViolation::NonPositiveInterval { target: "".into() },
                ConfigViolation::DuplicateTargetId { target: "@b".into() },
                ConfigViolation::NonPositiveInterval { target: "@b".into() },
            ]
        );
    }

    #[test]
    fn test_zero_max_messages_is_valid() {
        let specs = vec![spec("@a", 100).with_max_messages(0)];
        assert!(validate(&specs).is_ok());
    }
}

//! # Target specification for periodic dispatch.
//!
//! Defines [`TargetSpec`] a configuration bundle that describes one dispatch
//! target: where to send, how often, and for how long.
//!
//! ## Rules
//! - Specs are supplied once at startup and are immutable for the run.
//! - A batch of specs is passed to
//!   [`Dispatcher::run`](crate::Dispatcher::run), which validates the whole
//!   batch before starting any loop.

use std::sync::Arc;
use std::time::Duration;

/// Specification for one dispatch target.
///
/// Bundles together:
/// - The opaque target identifier (group/channel id on the remote platform)
/// - The interval between send attempts
/// - An optional upper bound on successful sends (`None` = unbounded)
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use sendvisor::TargetSpec;
///
/// let bounded = TargetSpec::new("@group1", Duration::from_secs(60)).with_max_messages(100);
/// let unbounded = TargetSpec::new("-1001234567890", Duration::from_secs(300));
///
/// assert_eq!(bounded.max_messages(), Some(100));
/// assert!(unbounded.max_messages().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct TargetSpec {
    target_id: Arc<str>,
    interval: Duration,
    max_messages: Option<u64>,
}

impl TargetSpec {
    /// Creates a spec with an unbounded send count.
    ///
    /// ### Parameters
    /// - `target_id`: opaque remote destination identifier; must be non-empty
    ///   (enforced by batch validation, not here)
    /// - `interval`: duration between send attempts; must be positive
    ///   (enforced by batch validation, not here)
    pub fn new(target_id: impl Into<Arc<str>>, interval: Duration) -> Self {
        Self {
            target_id: target_id.into(),
            interval,
            max_messages: None,
        }
    }

    /// Returns a new spec with an upper bound on successful sends.
    ///
    /// A bound of `0` is valid: the loop terminates as exhausted without ever
    /// attempting a send.
    pub fn with_max_messages(mut self, max: u64) -> Self {
        self.max_messages = Some(max);
        self
    }

    /// Returns the target identifier.
    pub fn target_id(&self) -> &Arc<str> {
        &self.target_id
    }

    /// Returns the interval between send attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the send bound, if configured.
    pub fn max_messages(&self) -> Option<u64> {
        self.max_messages
    }
}

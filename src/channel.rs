//! # Delivery channel abstraction.
//!
//! This module defines the [`Channel`] trait — the seam between the dispatch
//! core and whatever actually moves a message over the wire — and
//! [`SendOutcome`], the three-way result of a delivery attempt.
//!
//! The common handle type is [`ChannelRef`], an `Arc<dyn Channel>` shared by
//! reference across all target loops. Implementations must therefore be safe
//! for concurrent invocation; if the underlying transport serializes sends,
//! that serialization lives inside the implementation, never in the
//! scheduler.
//!
//! ## Outcome semantics
//! ```text
//! Delivered          → the message reached the target; counts toward the
//!                      target's send bound
//! RateLimited(wait)  → flow control, not an error; the loop sleeps `wait`
//!                      and retries the same cycle
//! Failed(reason)     → transient error; logged, not counted, loop continues
//!                      with its normal interval
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Shared handle to a delivery channel.
pub type ChannelRef = Arc<dyn Channel>;

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was accepted by the remote.
    Delivered,
    /// The remote asked the sender to back off for the given duration.
    ///
    /// A zero duration means "retry immediately". The wait substitutes for
    /// the loop's normal interval; it never consumes the send bound.
    RateLimited(Duration),
    /// The attempt failed with a transient error.
    Failed(String),
}

/// # Asynchronous delivery channel.
///
/// Accepts a target identifier and a message, attempts delivery, and reports
/// the outcome. Errors are reported as [`SendOutcome::Failed`] values, not
/// `Err` returns: from the scheduler's point of view a failed attempt is a
/// normal, recoverable outcome.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use sendvisor::{Channel, SendOutcome};
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Channel for Stdout {
///     async fn send(&self, target: &str, text: &str) -> SendOutcome {
///         println!("-> {target}: {text}");
///         SendOutcome::Delivered
///     }
/// }
/// ```
#[async_trait]
pub trait Channel: Send + Sync + 'static {
    /// Attempts to deliver `text` to `target`.
    ///
    /// Implementations should return within bounded time; the calling loop
    /// does not interrupt an in-flight send, it observes cancellation only
    /// at the next check point.
    async fn send(&self, target: &str, text: &str) -> SendOutcome;
}

//! # Runtime events emitted by the dispatcher and target actors.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Attempt events**: per-send outcomes (delivered, failed, rate-limited)
//! - **Terminal events**: a target loop's final state, carrying the total
//!   sent count (these double as the per-target summary)
//! - **Shutdown events**: stop-all progress and grace accounting
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! target identifier, failure reasons, sent counters and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `target` (subscriber name), `reason`, `at`, `seq`.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `target` (subscriber name), `reason`, `at`, `seq`.
    SubscriberOverflow,

    // === Shutdown events ===
    /// Stop-all requested (OS signal observed or `Dispatcher::stop` called).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All target loops stopped within the configured grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Grace period exceeded; some loops did not stop in time.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,

    // === Target lifecycle events ===
    /// A target loop has started.
    ///
    /// Sets: `target`, `at`, `seq`.
    TargetStarted,

    /// A message was delivered to the target.
    ///
    /// Sets: `target`, `sent` (running total), `at`, `seq`.
    Delivered,

    /// A delivery attempt failed with a transient error; the loop keeps
    /// running and waits its normal interval.
    ///
    /// Sets: `target`, `reason`, `at`, `seq`.
    DeliveryFailed,

    /// The remote signalled rate-limiting; the loop backs off for the given
    /// delay and then retries the same generate-and-send step.
    ///
    /// Sets: `target`, `delay_ms`, `at`, `seq`.
    RateLimited,

    // === Target terminal states (each doubles as the per-target summary) ===
    /// The loop hit its configured send-count bound.
    ///
    /// Sets: `target`, `sent` (final total), `at`, `seq`.
    TargetExhausted,

    /// The loop observed cancellation and stopped.
    ///
    /// Sets: `target`, `sent` (final total), `at`, `seq`.
    TargetStopped,

    /// The loop terminated with an unrecoverable error.
    ///
    /// Sets: `target`, `reason`, `sent` (final total), `at`, `seq`.
    TargetFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Target identifier (or subscriber name for subscriber events).
    pub target: Option<Arc<str>>,
    /// Human-readable reason (failure message, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Messages delivered so far for the target (running or final total).
    pub sent: Option<u64>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            target: None,
            reason: None,
            sent: None,
            delay_ms: None,
        }
    }

    /// Attaches a target identifier.
    #[inline]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a sent counter (running or final total).
    #[inline]
    pub fn with_sent(mut self, sent: u64) -> Self {
        self.sent = Some(sent);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_target(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_target(subscriber)
            .with_reason(info)
    }

    /// True for events emitted by the subscriber machinery itself; these are
    /// never re-queued when a subscriber queue is full.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

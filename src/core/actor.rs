//! # TargetActor: the timed send loop for one target.
//!
//! Runs the dispatch cycle for exactly one [`TargetSpec`] until the send
//! bound is hit, cancellation is observed, or the loop dies.
//!
//! ## Cycle
//! ```text
//! loop {
//!   ├─► cancellation observed?            → Stopped
//!   ├─► sent == max_messages?             → Exhausted
//!   ├─► source.generate()                 (None → fixed fallback text)
//!   ├─► channel.send(target, text)
//!   │     ├─ Delivered         → sent += 1, publish Delivered
//!   │     ├─ RateLimited(wait) → publish RateLimited, sleep wait
//!   │     │                      (cancellable), retry from generate —
//!   │     │                      the wait replaces the interval sleep
//!   │     └─ Failed(reason)    → publish DeliveryFailed, fall through
//!   └─► sleep(interval)                   (cancellable)
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** within one actor (never parallel)
//! - `sent` is incremented **only** on a `Delivered` outcome
//! - A rate-limit wait never consumes the send bound
//! - Cancellation is observed at **check points** only: the top of each
//!   cycle and during either sleep — never mid-delivery
//! - The terminal event carries the final `sent` total (per-target summary)

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::channel::{ChannelRef, SendOutcome};
use crate::content::SourceRef;
use crate::core::report::{TargetPhase, TargetReport};
use crate::events::{Bus, Event, EventKind};
use crate::targets::TargetSpec;

/// Substituted when the content source yields no content. Content absence is
/// never fatal to the loop.
pub(crate) const NO_CONTENT_FALLBACK: &str = "no content available";

/// Drives the periodic send cycle for a single target.
pub(crate) struct TargetActor {
    spec: TargetSpec,
    source: SourceRef,
    channel: ChannelRef,
    bus: Bus,
}

impl TargetActor {
    /// Creates a new target actor.
    pub(crate) fn new(spec: TargetSpec, source: SourceRef, channel: ChannelRef, bus: Bus) -> Self {
        Self {
            spec,
            source,
            channel,
            bus,
        }
    }

    /// Runs the actor until exhaustion or cancellation.
    ///
    /// ### Exit conditions
    /// - `max_messages` reached → [`TargetPhase::Exhausted`]
    /// - cancellation observed → [`TargetPhase::Stopped`]
    ///
    /// A `max_messages` of zero exits as exhausted before the first delivery
    /// attempt. Transient delivery failures never exit the loop.
    ///
    /// ### Cancellation semantics
    /// `token` is checked at the top of each cycle and aborts either sleep
    /// immediately. An in-flight `channel.send` is awaited to completion;
    /// its outcome is still accounted before cancellation is observed at the
    /// next check point.
    pub(crate) async fn run(self, token: CancellationToken) -> TargetReport {
        let target = Arc::clone(self.spec.target_id());
        self.bus
            .publish(Event::now(EventKind::TargetStarted).with_target(Arc::clone(&target)));

        let mut sent: u64 = 0;
        let phase = loop {
            if token.is_cancelled() {
                break TargetPhase::Stopped;
            }
            if self.spec.max_messages().is_some_and(|max| sent >= max) {
                break TargetPhase::Exhausted;
            }

            let text = self
                .source
                .generate()
                .unwrap_or_else(|| NO_CONTENT_FALLBACK.to_string());

            match self.channel.send(&target, &text).await {
                SendOutcome::Delivered => {
                    sent += 1;
                    self.bus.publish(
                        Event::now(EventKind::Delivered)
                            .with_target(Arc::clone(&target))
                            .with_sent(sent),
                    );
                }
                SendOutcome::RateLimited(wait) => {
                    self.bus.publish(
                        Event::now(EventKind::RateLimited)
                            .with_target(Arc::clone(&target))
                            .with_delay(wait),
                    );
                    if !wait.is_zero() && !sleep_cancellable(wait, &token).await {
                        break TargetPhase::Stopped;
                    }
                    // Retry the generate-and-send step; the rate-limit wait
                    // substitutes for the interval sleep.
                    continue;
                }
                SendOutcome::Failed(reason) => {
                    self.bus.publish(
                        Event::now(EventKind::DeliveryFailed)
                            .with_target(Arc::clone(&target))
                            .with_reason(reason),
                    );
                }
            }

            if !sleep_cancellable(self.spec.interval(), &token).await {
                break TargetPhase::Stopped;
            }
        };

        let terminal = match phase {
            TargetPhase::Exhausted => EventKind::TargetExhausted,
            _ => EventKind::TargetStopped,
        };
        self.bus.publish(
            Event::now(terminal)
                .with_target(Arc::clone(&target))
                .with_sent(sent),
        );

        TargetReport::new(target, phase, sent)
    }
}

/// Sleeps for `dur`, aborting early on cancellation.
///
/// Returns `true` if the sleep completed, `false` if it was cancelled.
async fn sleep_cancellable(dur: std::time::Duration, token: &CancellationToken) -> bool {
    let sleep = time::sleep(dur);
    tokio::pin!(sleep);
    select! {
        _ = &mut sleep => true,
        _ = token.cancelled() => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::channel::Channel;

    /// Scripted channel: replays a fixed sequence of outcomes, then repeats
    /// the last one. Records every message it was handed.
    struct ScriptedChannel {
        script: Vec<SendOutcome>,
        calls: AtomicU64,
        messages: Mutex<Vec<String>>,
    }

    impl ScriptedChannel {
        fn new(script: Vec<SendOutcome>) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicU64::new(0),
                messages: Mutex::new(Vec::new()),
            })
        }

        fn always(outcome: SendOutcome) -> Arc<Self> {
            Self::new(vec![outcome])
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Channel for ScriptedChannel {
        async fn send(&self, _target: &str, text: &str) -> SendOutcome {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            self.messages.lock().unwrap().push(text.to_string());
            self.script[n.min(self.script.len() - 1)].clone()
        }
    }

    fn fixed_source(text: &'static str) -> SourceRef {
        Arc::new(move || Some(text.to_string()))
    }

    fn empty_source() -> SourceRef {
        Arc::new(|| None::<String>)
    }

    fn actor(spec: TargetSpec, source: SourceRef, channel: Arc<ScriptedChannel>) -> TargetActor {
        TargetActor::new(spec, source, channel, Bus::new(64))
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_at_send_bound() {
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_millis(100)).with_max_messages(3);
        let report = actor(spec, fixed_source("hi"), channel.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.phase, TargetPhase::Exhausted);
        assert_eq!(report.sent, 3);
        assert_eq!(channel.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_bound_exhausts_without_any_attempt() {
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_millis(100)).with_max_messages(0);
        let report = actor(spec, fixed_source("hi"), channel.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.phase, TargetPhase::Exhausted);
        assert_eq!(report.sent, 0);
        assert_eq!(channel.calls(), 0, "channel must never be called");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_never_increments_and_retries_same_step() {
        // Two rate-limit hints, then a delivery.
        let channel = ScriptedChannel::new(vec![
            SendOutcome::RateLimited(Duration::from_secs(5)),
            SendOutcome::RateLimited(Duration::from_secs(5)),
            SendOutcome::Delivered,
        ]);
        let spec = TargetSpec::new("@a", Duration::from_secs(60)).with_max_messages(1);
        let start = time::Instant::now();
        let report = actor(spec, fixed_source("hi"), channel.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.phase, TargetPhase::Exhausted);
        assert_eq!(report.sent, 1);
        assert_eq!(channel.calls(), 3);
        // Two 5s backoff waits plus one 60s interval after the delivery.
        assert_eq!(start.elapsed(), Duration::from_secs(70));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_rate_limit_wait_retries_immediately() {
        let channel = ScriptedChannel::new(vec![
            SendOutcome::RateLimited(Duration::ZERO),
            SendOutcome::RateLimited(Duration::ZERO),
            SendOutcome::RateLimited(Duration::ZERO),
            SendOutcome::Delivered,
        ]);
        let spec = TargetSpec::new("@a", Duration::from_secs(60)).with_max_messages(1);
        let start = time::Instant::now();
        let report = actor(spec, fixed_source("hi"), channel.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.sent, 1);
        assert_eq!(channel.calls(), 4);
        // The three zero-wait retries consume no time; only the final
        // interval sleep advances the clock.
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_keeps_loop_running() {
        let channel = ScriptedChannel::new(vec![
            SendOutcome::Failed("connection reset".into()),
            SendOutcome::Delivered,
            SendOutcome::Failed("connection reset".into()),
            SendOutcome::Delivered,
        ]);
        let spec = TargetSpec::new("@a", Duration::from_millis(10)).with_max_messages(2);
        let report = actor(spec, fixed_source("hi"), channel.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.phase, TargetPhase::Exhausted);
        assert_eq!(report.sent, 2);
        assert_eq!(channel.calls(), 4, "failed attempts do not consume the bound");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_interval_sleep_stops_loop() {
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_secs(3600));
        let token = CancellationToken::new();

        let handle = tokio::spawn(
            actor(spec, fixed_source("hi"), channel.clone()).run(token.clone()),
        );
        // Let the first send happen, then cancel mid-sleep.
        time::sleep(Duration::from_secs(1)).await;
        token.cancel();
        let report = handle.await.unwrap();

        assert_eq!(report.phase, TargetPhase::Stopped);
        assert_eq!(report.sent, 1);
        assert_eq!(channel.calls(), 1, "no further attempts after cancellation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_backoff_sleep_stops_loop() {
        let channel = ScriptedChannel::always(SendOutcome::RateLimited(Duration::from_secs(600)));
        let spec = TargetSpec::new("@a", Duration::from_millis(10));
        let token = CancellationToken::new();

        let handle = tokio::spawn(
            actor(spec, fixed_source("hi"), channel.clone()).run(token.clone()),
        );
        time::sleep(Duration::from_secs(1)).await;
        token.cancel();
        let report = handle.await.unwrap();

        assert_eq!(report.phase, TargetPhase::Stopped);
        assert_eq!(report.sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_token_stops_before_any_attempt() {
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_millis(10));
        let token = CancellationToken::new();
        token.cancel();

        let report = actor(spec, fixed_source("hi"), channel.clone()).run(token).await;
        assert_eq!(report.phase, TargetPhase::Stopped);
        assert_eq!(channel.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_source_substitutes_fallback_text() {
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_millis(10)).with_max_messages(1);
        actor(spec, empty_source(), channel.clone())
            .run(CancellationToken::new())
            .await;

        let messages = channel.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), [NO_CONTENT_FALLBACK]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_event_carries_final_count() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let channel = ScriptedChannel::always(SendOutcome::Delivered);
        let spec = TargetSpec::new("@a", Duration::from_millis(10)).with_max_messages(2);
        TargetActor::new(spec, fixed_source("hi"), channel, bus)
            .run(CancellationToken::new())
            .await;

        let mut terminal = None;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::TargetExhausted {
                terminal = Some(ev);
            }
        }
        let ev = terminal.expect("terminal event published");
        assert_eq!(ev.sent, Some(2));
        assert_eq!(ev.target.as_deref(), Some("@a"));
    }
}

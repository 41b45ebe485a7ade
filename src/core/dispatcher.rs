//! # Dispatcher: orchestrates target loops, fan-out delivery, and graceful shutdown.
//!
//! The [`Dispatcher`] owns the event bus, a [`SubscriberSet`], the phase
//! tracker and the root cancellation token. It validates the target batch,
//! spawns one loop per target, mirrors OS termination signals onto the
//! stop-all trigger, and collects the final per-target summary.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<TargetSpec> + SourceRef + ChannelRef
//!
//! Preparation:
//!   - validate the whole batch (aggregated violations; nothing spawns on error)
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - PhaseTracker listener: Bus.subscribe() ─► latest phase per target
//!
//! Spawn loops:
//!   TargetSpec[0]  TargetSpec[1]  ...  TargetSpec[N-1]
//!       │              │                    │
//!       └──► TargetActor::new(spec, source, channel, bus)   (one per spec)
//!                    └──► child CancellationToken = stop.child_token()
//!                         tokio::spawn(actor.run(child))
//!
//! Shutdown path:
//!   OS signal ──┐
//!   stop()    ──┴─► Bus.publish(ShutdownRequested)
//!                   stop.cancel()   → propagates to child tokens
//!                   join_with_grace(cfg.grace):
//!                     ├─ all terminal  → Bus.publish(AllStoppedWithin), Ok(summary)
//!                     └─ grace elapsed → Bus.publish(GraceExceeded),
//!                                        Err(GraceExceeded{stuck})
//! ```
//!
//! ## Rules
//! - Loops are isolated: one loop's failure or exhaustion never cancels or
//!   blocks a sibling.
//! - `run` returns only when every loop is terminal (or grace elapsed).
//! - A second `run` on the same dispatcher reuses the already-cancelled stop
//!   token; construct a fresh dispatcher per run.

use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::channel::ChannelRef;
use crate::content::SourceRef;
use crate::core::config::DispatchConfig;
use crate::core::report::RunSummary;
use crate::core::set::DispatchSet;
use crate::core::shutdown;
use crate::core::tracker::PhaseTracker;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::targets::{validate, TargetSpec};

/// Builder for constructing a [`Dispatcher`] with optional subscribers.
pub struct DispatcherBuilder {
    cfg: DispatchConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DispatchConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (attempt outcomes, terminal
    /// summaries, shutdown progress) through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the dispatcher and initializes the bus, subscriber workers and
    /// phase tracker.
    pub fn build(self) -> Dispatcher {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let tracker = PhaseTracker::new();
        tracker.spawn_listener(bus.subscribe());

        Dispatcher {
            cfg: self.cfg,
            bus,
            subs,
            tracker,
            stop: CancellationToken::new(),
        }
    }
}

/// Coordinates target loops, event delivery, and graceful shutdown.
pub struct Dispatcher {
    cfg: DispatchConfig,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    tracker: PhaseTracker,
    stop: CancellationToken,
}

impl Dispatcher {
    /// Creates a dispatcher with the given config and no subscribers.
    pub fn new(cfg: DispatchConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Returns a builder for a dispatcher with subscribers attached.
    pub fn builder(cfg: DispatchConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(cfg)
    }

    /// Returns the event bus, e.g. to attach ad-hoc listeners in tests.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns the phase tracker holding the latest observed phase per
    /// target.
    pub fn tracker(&self) -> &PhaseTracker {
        &self.tracker
    }

    /// The stop-all trigger: cancels every running loop's token.
    ///
    /// `run` then waits (bounded by [`DispatchConfig::grace`]) for all loops
    /// to reach a terminal phase. Safe to call from any task, more than
    /// once.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Runs one dispatch batch until every loop is terminal.
    ///
    /// ### Flow
    /// 1. Validate the whole batch; on any violation return
    ///    [`RuntimeError::ConfigRejected`] without spawning a single loop.
    /// 2. Spawn one actor per target, each with a child cancellation token.
    /// 3. Wait until either all loops finish on their own (every target
    ///    exhausted its bound), or a stop trigger fires — an OS termination
    ///    signal or [`Dispatcher::stop`] — after which every loop is
    ///    cancelled and joined within the grace period.
    ///
    /// ### Returns
    /// - `Ok(RunSummary)` — terminal phase and sent count per target.
    /// - `Err(ConfigRejected)` — invalid batch, nothing was started.
    /// - `Err(GraceExceeded)` — some loops outlived the grace period.
    pub async fn run(
        &self,
        specs: Vec<TargetSpec>,
        source: SourceRef,
        channel: ChannelRef,
    ) -> Result<RunSummary, RuntimeError> {
        validate(&specs).map_err(|violations| RuntimeError::ConfigRejected { violations })?;

        self.subscriber_listener();
        let mut set = DispatchSet::spawn(specs, &source, &channel, &self.bus, &self.stop);

        tokio::select! {
            _ = shutdown::wait_for_stop(&self.stop) => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                self.stop.cancel();
                self.join_with_grace(&mut set).await
            }
            summary = set.join_all(&self.bus) => {
                Ok(summary)
            }
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                subs.emit(&ev);
            }
        });
    }

    /// Waits for all loops to finish within the configured grace period.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout together with
    /// [`RuntimeError::GraceExceeded`] naming the stuck targets.
    async fn join_with_grace(&self, set: &mut DispatchSet) -> Result<RunSummary, RuntimeError> {
        match time::timeout(self.cfg.grace, set.join_all(&self.bus)).await {
            Ok(summary) => {
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(summary)
            }
            Err(_elapsed) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded {
                    grace: self.cfg.grace,
                    stuck: self.tracker.stuck().await,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use crate::channel::{Channel, SendOutcome};
    use crate::core::report::TargetPhase;
    use crate::error::ConfigViolation;

    /// Counts calls per target; outcome decided by a closure.
    struct FnChannel<F> {
        calls: AtomicU64,
        f: F,
    }

    impl<F> FnChannel<F>
    where
        F: Fn(&str) -> SendOutcome + Send + Sync + 'static,
    {
        fn new(f: F) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU64::new(0),
                f,
            })
        }
    }

    #[async_trait]
    impl<F> Channel for FnChannel<F>
    where
        F: Fn(&str) -> SendOutcome + Send + Sync + 'static,
    {
        async fn send(&self, target: &str, _text: &str) -> SendOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.f)(target)
        }
    }

    fn source() -> SourceRef {
        Arc::new(|| Some("ping".to_string()))
    }

    fn delivered_channel() -> Arc<FnChannel<impl Fn(&str) -> SendOutcome + Send + Sync + 'static>>
    {
        FnChannel::new(|_: &str| SendOutcome::Delivered)
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_batch_is_rejected_before_any_spawn() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let channel = delivered_channel();
        let specs = vec![
            TargetSpec::new("", Duration::from_secs(1)),
            TargetSpec::new("@b", Duration::ZERO),
        ];

        let err = dispatcher
            .run(specs, source(), channel.clone())
            .await
            .unwrap_err();

        match err {
            RuntimeError::ConfigRejected { violations } => {
                assert_eq!(
                    violations,
                    vec![
                        ConfigViolation::EmptyTargetId { index: 0 },
                        ConfigViolation::NonPositiveInterval { target: "@b".into() },
                    ]
                );
            }
            other => panic!("expected ConfigRejected, got {other:?}"),
        }
        assert_eq!(channel.calls.load(Ordering::SeqCst), 0, "no loop may start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_is_rejected() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let err = dispatcher
            .run(Vec::new(), source(), delivered_channel())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ConfigRejected { ref violations }
                if violations == &[ConfigViolation::EmptyBatch]
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_bounded_targets_run_to_exhaustion() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let specs = vec![
            TargetSpec::new("@a", Duration::from_millis(100)).with_max_messages(2),
            TargetSpec::new("@b", Duration::from_millis(50)).with_max_messages(5),
        ];

        let summary = dispatcher
            .run(specs, source(), delivered_channel())
            .await
            .unwrap();

        let a = summary.get("@a").unwrap();
        let b = summary.get("@b").unwrap();
        assert_eq!((a.phase, a.sent), (TargetPhase::Exhausted, 2));
        assert_eq!((b.phase, b.sent), (TargetPhase::Exhausted, 5));
        assert_eq!(summary.total_sent(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_two_targets_end_to_end() {
        // Target A: 1s interval, bounded at 2. Target B: 1s interval,
        // unbounded. Stop after 2.5s: A exhausted with 2, B stopped with
        // 2 or 3 sends.
        let dispatcher = Arc::new(Dispatcher::new(DispatchConfig::default()));
        let specs = vec![
            TargetSpec::new("@a", Duration::from_secs(1)).with_max_messages(2),
            TargetSpec::new("@b", Duration::from_secs(1)),
        ];

        let stopper = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(2500)).await;
            stopper.stop();
        });

        let summary = dispatcher
            .run(specs, source(), delivered_channel())
            .await
            .unwrap();

        let a = summary.get("@a").unwrap();
        assert_eq!((a.phase, a.sent), (TargetPhase::Exhausted, 2));

        let b = summary.get("@b").unwrap();
        assert_eq!(b.phase, TargetPhase::Stopped);
        assert!(
            b.sent == 2 || b.sent == 3,
            "expected 2 or 3 sends for @b, got {}",
            b.sent
        );
    }

    /// A channel that always reports a zero-wait rate limit. Yields on every
    /// call so the hot retry loop cannot starve the scheduler; real time is
    /// used here because the loop never touches a timer.
    struct AlwaysLimited {
        calls: AtomicU64,
    }

    #[async_trait]
    impl Channel for AlwaysLimited {
        async fn send(&self, _target: &str, _text: &str) -> SendOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            SendOutcome::RateLimited(Duration::ZERO)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_permanent_rate_limit_holds_count_at_zero_until_stop() {
        let dispatcher = Arc::new(Dispatcher::new(DispatchConfig::default()));
        let channel = Arc::new(AlwaysLimited {
            calls: AtomicU64::new(0),
        });
        let specs = vec![TargetSpec::new("@c", Duration::from_secs(3600))];

        let stopper = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(100)).await;
            stopper.stop();
        });

        let summary = dispatcher
            .run(specs, source(), channel.clone())
            .await
            .unwrap();

        let c = summary.get("@c").unwrap();
        assert_eq!(c.phase, TargetPhase::Stopped);
        assert_eq!(c.sent, 0);
        assert!(
            channel.calls.load(Ordering::SeqCst) > 1,
            "zero-wait rate limit must retry without sleeping the interval"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_target_never_disturbs_siblings() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let channel = FnChannel::new(|target: &str| {
            if target == "@broken" {
                SendOutcome::Failed("permission denied".into())
            } else {
                SendOutcome::Delivered
            }
        });
        let specs = vec![
            TargetSpec::new("@broken", Duration::from_millis(10)).with_max_messages(3),
            TargetSpec::new("@healthy", Duration::from_millis(10)).with_max_messages(3),
        ];

        let dispatcher = Arc::new(dispatcher);
        let stopper = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(1)).await;
            stopper.stop();
        });

        let summary = dispatcher
            .run(specs, source(), channel.clone())
            .await
            .unwrap();

        let healthy = summary.get("@healthy").unwrap();
        assert_eq!((healthy.phase, healthy.sent), (TargetPhase::Exhausted, 3));

        // The broken target keeps cycling on transient failures and is
        // eventually stopped with nothing delivered.
        let broken = summary.get("@broken").unwrap();
        assert_eq!(broken.phase, TargetPhase::Stopped);
        assert_eq!(broken.sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_channel_is_recorded_as_failed_and_isolated() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let channel = FnChannel::new(|target: &str| {
            if target == "@doomed" {
                panic!("channel blew up");
            }
            SendOutcome::Delivered
        });
        let specs = vec![
            TargetSpec::new("@doomed", Duration::from_millis(10)).with_max_messages(1),
            TargetSpec::new("@fine", Duration::from_millis(10)).with_max_messages(2),
        ];

        let summary = dispatcher.run(specs, source(), channel).await.unwrap();

        let doomed = summary.get("@doomed").unwrap();
        assert_eq!(doomed.phase, TargetPhase::Failed);
        assert!(doomed.error.as_deref().unwrap().contains("panicked"));

        let fine = summary.get("@fine").unwrap();
        assert_eq!((fine.phase, fine.sent), (TargetPhase::Exhausted, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracker_reports_terminal_phases_after_run() {
        let dispatcher = Dispatcher::new(DispatchConfig::default());
        let specs = vec![TargetSpec::new("@a", Duration::from_millis(10)).with_max_messages(1)];
        dispatcher
            .run(specs, source(), delivered_channel())
            .await
            .unwrap();

        // The tracker consumes bus events asynchronously; yield so its
        // listener drains before asserting.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(
            dispatcher.tracker().phase("@a").await,
            Some(TargetPhase::Exhausted)
        );
    }
}

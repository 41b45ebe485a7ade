//! # DispatchSet: handles of the spawned target loops.
//!
//! Owns one entry per configured target: the loop's `JoinHandle` plus the
//! report it returned once joined. Exactly one loop exists per validated
//! target; no target is spawned twice (enforced upstream by batch
//! validation).
//!
//! ## Rules
//! - Spawning happens once, after validation, with one child token per loop
//! - `join_all` is resumable: entries joined before an interruption keep
//!   their reports and are not joined again
//! - A panicked loop is recorded as a [`TargetPhase::Failed`] report; its
//!   siblings are untouched

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channel::ChannelRef;
use crate::content::SourceRef;
use crate::core::actor::TargetActor;
use crate::core::report::{RunSummary, TargetReport};
use crate::events::{Bus, Event, EventKind};
use crate::targets::TargetSpec;

/// One spawned target loop.
struct Entry {
    target: Arc<str>,
    join: JoinHandle<TargetReport>,
    report: Option<TargetReport>,
}

/// The set of running target loops, in spawn order.
pub(crate) struct DispatchSet {
    entries: Vec<Entry>,
}

impl DispatchSet {
    /// Spawns one actor per spec, each on a child of `runtime_token`.
    pub(crate) fn spawn(
        specs: Vec<TargetSpec>,
        source: &SourceRef,
        channel: &ChannelRef,
        bus: &Bus,
        runtime_token: &CancellationToken,
    ) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| {
                let target = Arc::clone(spec.target_id());
                let actor = TargetActor::new(
                    spec,
                    Arc::clone(source),
                    Arc::clone(channel),
                    bus.clone(),
                );
                let child = runtime_token.child_token();
                Entry {
                    target,
                    join: tokio::spawn(actor.run(child)),
                    report: None,
                }
            })
            .collect();
        Self { entries }
    }

    /// Waits for every loop to reach a terminal phase and returns the
    /// summary.
    ///
    /// Safe to interrupt and call again: already-joined entries are skipped.
    /// A `JoinError` (panicked loop) becomes a `Failed` report; the panic is
    /// also published as a [`EventKind::TargetFailed`] event.
    pub(crate) async fn join_all(&mut self, bus: &Bus) -> RunSummary {
        for entry in &mut self.entries {
            if entry.report.is_some() {
                continue;
            }
            let report = match (&mut entry.join).await {
                Ok(report) => report,
                Err(join_err) => {
                    let reason = format!("target loop panicked: {join_err}");
                    bus.publish(
                        Event::now(EventKind::TargetFailed)
                            .with_target(Arc::clone(&entry.target))
                            .with_reason(reason.as_str())
                            .with_sent(0),
                    );
                    TargetReport::failed(Arc::clone(&entry.target), 0, reason)
                }
            };
            entry.report = Some(report);
        }

        RunSummary::new(
            self.entries
                .iter()
                .map(|e| e.report.clone().expect("all entries joined"))
                .collect(),
        )
    }

    /// Number of spawned loops.
    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

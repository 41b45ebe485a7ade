//! # Target phase tracker with sequence-based ordering.
//!
//! Maintains the latest observed [`TargetPhase`] per target by listening to
//! bus events, using event sequence numbers to handle out-of-order delivery.
//!
//! The dispatcher uses it two ways:
//! - during shutdown, to name the targets that did not stop within the grace
//!   period;
//! - as the queryable "latest observed phase" map over the running dispatch
//!   set.
//!
//! ## Architecture
//! ```text
//! TargetActor ──► Bus ──► PhaseTracker listener ──► HashMap<String, {seq, phase}>
//! ```
//!
//! ## Rules
//! - Events with `seq <= last_seq` for a target are **rejected** (stale)
//! - Read operations are **eventually consistent** with the loops
//! - Phase mapping: `TargetStarted`/`Delivered`/`DeliveryFailed` → Running,
//!   `RateLimited` → Backoff, terminal events → their terminal phase

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::report::TargetPhase;
use crate::events::{Event, EventKind};

/// Per-target state for ordering validation.
#[derive(Debug, Clone)]
struct Observed {
    /// Last seen sequence number for this target.
    last_seq: u64,
    /// Latest observed phase.
    phase: TargetPhase,
}

/// Thread-safe tracker of observed target phases.
///
/// Cloneable — clones share the same internal state.
#[derive(Clone, Default)]
pub struct PhaseTracker {
    state: Arc<RwLock<HashMap<String, Observed>>>,
}

impl PhaseTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a background task that subscribes to events and updates the
    /// tracker. Exits when the bus is dropped.
    pub fn spawn_listener(&self, mut rx: tokio::sync::broadcast::Receiver<Event>) {
        let tracker = self.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => tracker.update(&ev).await,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Applies one event if it is newer than the last seen for its target.
    pub async fn update(&self, ev: &Event) {
        let Some(phase) = phase_for(ev.kind) else {
            return;
        };
        let Some(target) = ev.target.as_deref() else {
            return;
        };

        let mut state = self.state.write().await;
        let entry = state.entry(target.to_string()).or_insert(Observed {
            last_seq: 0,
            phase: TargetPhase::Pending,
        });
        if ev.seq >= entry.last_seq {
            entry.last_seq = ev.seq;
            entry.phase = phase;
        }
    }

    /// Returns the latest observed phase for one target.
    pub async fn phase(&self, target: &str) -> Option<TargetPhase> {
        self.state.read().await.get(target).map(|o| o.phase)
    }

    /// Returns a sorted snapshot of `(target, phase)` pairs.
    pub async fn snapshot(&self) -> Vec<(String, TargetPhase)> {
        let state = self.state.read().await;
        let mut phases: Vec<(String, TargetPhase)> = state
            .iter()
            .map(|(target, o)| (target.clone(), o.phase))
            .collect();
        phases.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        phases
    }

    /// Returns sorted identifiers of targets whose loops have not reached a
    /// terminal phase. Used for stuck-target reporting when the shutdown
    /// grace period is exceeded.
    pub async fn stuck(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut stuck: Vec<String> = state
            .iter()
            .filter(|(_, o)| !o.phase.is_terminal())
            .map(|(target, _)| target.clone())
            .collect();
        stuck.sort_unstable();
        stuck
    }
}

/// Maps an event kind to the phase it evidences, if any.
fn phase_for(kind: EventKind) -> Option<TargetPhase> {
    match kind {
        EventKind::TargetStarted | EventKind::Delivered | EventKind::DeliveryFailed => {
            Some(TargetPhase::Running)
        }
        EventKind::RateLimited => Some(TargetPhase::Backoff),
        EventKind::TargetExhausted => Some(TargetPhase::Exhausted),
        EventKind::TargetStopped => Some(TargetPhase::Stopped),
        EventKind::TargetFailed => Some(TargetPhase::Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_phase_transitions_follow_events() {
        let tracker = PhaseTracker::new();

        tracker
            .update(&Event::now(EventKind::TargetStarted).with_target("@a"))
            .await;
        assert_eq!(tracker.phase("@a").await, Some(TargetPhase::Running));

        tracker
            .update(&Event::now(EventKind::RateLimited).with_target("@a"))
            .await;
        assert_eq!(tracker.phase("@a").await, Some(TargetPhase::Backoff));

        tracker
            .update(&Event::now(EventKind::Delivered).with_target("@a"))
            .await;
        assert_eq!(tracker.phase("@a").await, Some(TargetPhase::Running));

        tracker
            .update(&Event::now(EventKind::TargetExhausted).with_target("@a"))
            .await;
        assert_eq!(tracker.phase("@a").await, Some(TargetPhase::Exhausted));
    }

    #[tokio::test]
    async fn test_stale_events_are_rejected() {
        let tracker = PhaseTracker::new();
        let stale = Event::now(EventKind::TargetStarted).with_target("@a");
        let stopped = Event::now(EventKind::TargetStopped).with_target("@a");

        // Apply the newer event first, then the stale one out of order.
        tracker.update(&stopped).await;
        tracker.update(&stale).await;
        assert_eq!(tracker.phase("@a").await, Some(TargetPhase::Stopped));
    }

    #[tokio::test]
    async fn test_stuck_lists_only_non_terminal_targets() {
        let tracker = PhaseTracker::new();
        tracker
            .update(&Event::now(EventKind::TargetStarted).with_target("@b"))
            .await;
        tracker
            .update(&Event::now(EventKind::TargetStarted).with_target("@a"))
            .await;
        tracker
            .update(&Event::now(EventKind::TargetStopped).with_target("@b"))
            .await;
        assert_eq!(tracker.stuck().await, vec!["@a".to_string()]);
    }
}

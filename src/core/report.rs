//! # Target phases and run summaries.
//!
//! [`TargetPhase`] is the per-loop state machine as observed from outside:
//!
//! ```text
//! Pending → Running → {Backoff ⇄ Running} → {Exhausted | Stopped | Failed}
//! ```
//!
//! `Backoff` is re-entrant; the three right-hand states are terminal and
//! mutually exclusive. Each terminated loop yields a [`TargetReport`]; the
//! dispatcher collects them into a [`RunSummary`] once every loop is
//! terminal.

use std::sync::Arc;

/// Externally observable state of one target loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPhase {
    /// Validated but not yet started.
    Pending,
    /// The loop is cycling: generating, sending, sleeping its interval.
    Running,
    /// The loop is waiting out a rate-limit hint before retrying.
    Backoff,
    /// Terminal: the send-count bound was reached (normal termination).
    Exhausted,
    /// Terminal: cancellation was observed (normal termination).
    Stopped,
    /// Terminal: the loop died from an unrecoverable error.
    Failed,
}

impl TargetPhase {
    /// True for `Exhausted`, `Stopped` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TargetPhase::Exhausted | TargetPhase::Stopped | TargetPhase::Failed
        )
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TargetPhase::Pending => "pending",
            TargetPhase::Running => "running",
            TargetPhase::Backoff => "backoff",
            TargetPhase::Exhausted => "exhausted",
            TargetPhase::Stopped => "stopped",
            TargetPhase::Failed => "failed",
        }
    }
}

/// Final account of one target loop.
#[derive(Debug, Clone)]
pub struct TargetReport {
    /// The target this report belongs to.
    pub target: Arc<str>,
    /// Terminal phase the loop reached.
    pub phase: TargetPhase,
    /// Messages successfully delivered over the loop's lifetime.
    pub sent: u64,
    /// Failure reason, set only when `phase` is [`TargetPhase::Failed`].
    pub error: Option<Arc<str>>,
}

impl TargetReport {
    pub(crate) fn new(target: Arc<str>, phase: TargetPhase, sent: u64) -> Self {
        Self {
            target,
            phase,
            sent,
            error: None,
        }
    }

    pub(crate) fn failed(target: Arc<str>, sent: u64, error: impl Into<Arc<str>>) -> Self {
        Self {
            target,
            phase: TargetPhase::Failed,
            sent,
            error: Some(error.into()),
        }
    }
}

/// Final account of a whole dispatch run: one report per configured target.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    reports: Vec<TargetReport>,
}

impl RunSummary {
    pub(crate) fn new(reports: Vec<TargetReport>) -> Self {
        Self { reports }
    }

    /// Reports in target-spawn order.
    pub fn reports(&self) -> &[TargetReport] {
        &self.reports
    }

    /// Looks up the report for one target.
    pub fn get(&self, target_id: &str) -> Option<&TargetReport> {
        self.reports.iter().find(|r| &*r.target == target_id)
    }

    /// Total messages delivered across all targets.
    pub fn total_sent(&self) -> u64 {
        self.reports.iter().map(|r| r.sent).sum()
    }
}

//! # LogWriter — simple event printer.
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] target="@group1"
//! [delivered] target="@group1" sent=1
//! [rate-limited] target="@group1" wait=30000ms
//! [send-failed] target="@group1" err="connection reset"
//! [exhausted] target="@group1" sent=100
//! [stopped] target="@group2" sent=42
//! [shutdown-requested]
//! [all-stopped-within-grace]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
            EventKind::TargetStarted => {
                println!("[started] target={:?}", e.target.as_deref().unwrap_or("?"));
            }
            EventKind::Delivered => {
                println!(
                    "[delivered] target={:?} sent={}",
                    e.target.as_deref().unwrap_or("?"),
                    e.sent.unwrap_or(0),
                );
            }
            EventKind::DeliveryFailed => {
                println!(
                    "[send-failed] target={:?} err={:?}",
                    e.target.as_deref().unwrap_or("?"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
            EventKind::RateLimited => {
                println!(
                    "[rate-limited] target={:?} wait={}ms",
                    e.target.as_deref().unwrap_or("?"),
                    e.delay_ms.unwrap_or(0),
                );
            }
            EventKind::TargetExhausted => {
                println!(
                    "[exhausted] target={:?} sent={}",
                    e.target.as_deref().unwrap_or("?"),
                    e.sent.unwrap_or(0),
                );
            }
            EventKind::TargetStopped => {
                println!(
                    "[stopped] target={:?} sent={}",
                    e.target.as_deref().unwrap_or("?"),
                    e.sent.unwrap_or(0),
                );
            }
            EventKind::TargetFailed => {
                println!(
                    "[target-failed] target={:?} err={:?} sent={}",
                    e.target.as_deref().unwrap_or("?"),
                    e.reason.as_deref().unwrap_or("unknown"),
                    e.sent.unwrap_or(0),
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.target.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={:?} info={:?}",
                    e.target.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

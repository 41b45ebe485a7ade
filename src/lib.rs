//! # sendvisor
//!
//! **Sendvisor** is a lightweight multi-target periodic message dispatcher
//! for Rust.
//!
//! Given a set of target schedules and a content source, it runs one
//! independent timed-send loop per target, applies backoff when the remote
//! signals rate-limiting, enforces per-target send-count bounds, and
//! coordinates cooperative shutdown of all loops together. What actually
//! moves a message over the wire is behind the [`Channel`] trait; sendvisor
//! supervises the schedule, never the transport.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  TargetSpec  │   │  TargetSpec  │   │  TargetSpec  │
//!     │  (target #1) │   │  (target #2) │   │  (target #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (runtime orchestrator)                                │
//! │  - validates the whole batch (aggregated violations)              │
//! │  - Bus (broadcast events)                                         │
//! │  - PhaseTracker (latest observed phase per target)                │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │ TargetActor  │   │ TargetActor  │   │ TargetActor  │   │
//!     │ (send loop)  │   │ (send loop)  │   │ (send loop)  │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │                  │                  │                 │
//!      │ ContentSource ──► Channel::send     │                 │
//!      │                  │                  │                 │
//!      │ Publishes:       │ Publishes:       │ Publishes:      │
//!      │ - Delivered      │ - RateLimited    │ - TargetStopped │
//!      │ - DeliveryFailed │ - TargetExhausted│ - ...           │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                   SubscriberSet + PhaseTracker listeners
//! ```
//!
//! ### Lifecycle
//! ```text
//! TargetSpec ──► Dispatcher::run ──► DispatchSet ──► TargetActor::run()
//!
//! loop {
//!   ├─► cancellation observed?  → Stopped
//!   ├─► sent == max_messages?   → Exhausted
//!   ├─► source.generate()       (None → "no content available")
//!   ├─► channel.send(target, text)
//!   │       ├─ Delivered         → sent += 1
//!   │       ├─ RateLimited(wait) → sleep(wait), retry same step
//!   │       └─ Failed(reason)    → log, keep going
//!   └─► sleep(interval)
//! }
//!
//! Shutdown: OS signal or Dispatcher::stop()
//!   └─► cancel all loop tokens → join all within grace
//!         ├─ Ok      → RunSummary (terminal phase + sent per target)
//!         └─ Timeout → RuntimeError::GraceExceeded { stuck }
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                    |
//! |-------------------|----------------------------------------------------------------------|---------------------------------------|
//! | **Scheduling**    | One independent timed loop per target, bounded or unbounded.         | [`TargetSpec`], [`Dispatcher`]        |
//! | **Backoff**       | Remote rate-limit hints pause only the affected loop.                | [`SendOutcome::RateLimited`]          |
//! | **Content**       | Template-based or custom content generation.                         | [`ContentSource`], [`TemplateSource`] |
//! | **Delivery**      | Transport-agnostic delivery seam.                                    | [`Channel`], [`SendOutcome`]          |
//! | **Observability** | Broadcast events with pluggable subscribers.                         | [`Event`], [`Subscribe`]              |
//! | **Errors**        | Aggregated config validation, typed runtime errors.                  | [`ConfigViolation`], [`RuntimeError`] |
//! | **Configuration** | Optional TOML run manifest.                                          | [`Manifest`], [`DispatchConfig`]      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use sendvisor::{
//!     Channel, DispatchConfig, Dispatcher, SendOutcome, TargetSpec, TemplateSource,
//! };
//!
//! struct StdoutChannel;
//!
//! #[async_trait]
//! impl Channel for StdoutChannel {
//!     async fn send(&self, target: &str, text: &str) -> SendOutcome {
//!         println!("-> {target}: {text}");
//!         SendOutcome::Delivered
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let specs = vec![
//!         TargetSpec::new("@group1", Duration::from_millis(50)).with_max_messages(2),
//!         TargetSpec::new("@group2", Duration::from_millis(80)).with_max_messages(1),
//!     ];
//!     let source = Arc::new(TemplateSource::with_templates(["current time: {time}"]));
//!
//!     let dispatcher = Dispatcher::new(DispatchConfig::default());
//!     let summary = dispatcher.run(specs, source, Arc::new(StdoutChannel)).await?;
//!
//!     assert_eq!(summary.total_sent(), 3);
//!     Ok(())
//! }
//! ```

mod channel;
mod content;
mod core;
mod error;
mod events;
mod manifest;
mod subscribers;
mod targets;

// ---- Public re-exports ----

pub use channel::{Channel, ChannelRef, SendOutcome};
pub use content::{ContentSource, GeneratorFn, SourceRef, TemplateSource};
pub use core::{
    DispatchConfig, Dispatcher, DispatcherBuilder, PhaseTracker, RunSummary, TargetPhase,
    TargetReport,
};
pub use error::{ConfigViolation, ManifestError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use manifest::{Manifest, TargetEntry};
pub use subscribers::{Subscribe, SubscriberSet};
pub use targets::TargetSpec;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

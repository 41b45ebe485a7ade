//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the dispatcher, target
//! actors and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Dispatcher`, `TargetActor`, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: `Dispatcher::subscriber_listener()` (fans out to
//!   `SubscriberSet`) and `PhaseTracker` (its own listener).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

//! Runtime core: orchestration and lifecycle.
//!
//! This module contains the embedded implementation of the sendvisor
//! runtime. The public API from this module is [`Dispatcher`] (plus its
//! builder, config, reports and the [`PhaseTracker`]).
//!
//! Internal modules:
//! - [`actor`]: runs the timed send loop for one target;
//! - [`set`]: owns the spawned loop handles and joins them into a summary;
//! - [`dispatcher`]: validates, spawns, handles shutdown and grace;
//! - [`shutdown`]: cross-platform stop triggers (signals + stop token);
//! - [`tracker`]: latest observed phase per target;
//! - [`report`]: phases, per-target reports, run summary;
//! - [`config`]: global runtime settings.

mod actor;
mod config;
mod dispatcher;
mod report;
mod set;
mod shutdown;
mod tracker;

pub use config::DispatchConfig;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use report::{RunSummary, TargetPhase, TargetReport};
pub use tracker::PhaseTracker;

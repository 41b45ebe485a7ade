//! # Global runtime configuration.
//!
//! Provides [`DispatchConfig`] centralized settings for the dispatch runtime.
//! Per-target schedule settings live in
//! [`TargetSpec`](crate::TargetSpec), not here.

use std::time::Duration;

/// Global configuration for the dispatch runtime.
///
/// ## Field semantics
/// - `grace`: maximum wait for loops to stop after a stop-all request
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Maximum time to wait for loops to reach a terminal phase after a
    /// stop-all request.
    ///
    /// When the grace period elapses with loops still running, the run
    /// returns [`RuntimeError::GraceExceeded`](crate::RuntimeError) listing
    /// the stuck targets.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl DispatchConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for DispatchConfig {
    /// Default configuration:
    ///
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
        }
    }
}

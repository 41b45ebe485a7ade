//! Event subscribers: the extension point for runtime observability.
//!
//! ## Contents
//! - [`Subscribe`] — trait implemented by event consumers
//! - [`SubscriberSet`] — non-blocking fan-out with per-subscriber queues
//! - `LogWriter` — simple stdout printer (feature `logging`)

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

//! # Content source contract.
//!
//! A [`ContentSource`] produces a message string on demand. The target loops
//! consume it through [`SourceRef`], an `Arc<dyn ContentSource>` shared by
//! reference across loops, so implementations must be safe for concurrent
//! calls.

use std::sync::Arc;

/// Shared handle to a content source.
pub type SourceRef = Arc<dyn ContentSource>;

/// # Produces message text on demand.
///
/// `generate` must return within bounded time and be side-effect-free apart
/// from internal randomness state. `None` is a valid, non-error response
/// meaning "no content available now" — the calling loop substitutes a fixed
/// fallback string and keeps running.
pub trait ContentSource: Send + Sync + 'static {
    /// Returns the next message, or `None` when no content is available.
    fn generate(&self) -> Option<String>;
}

impl<F> ContentSource for F
where
    F: Fn() -> Option<String> + Send + Sync + 'static,
{
    fn generate(&self) -> Option<String> {
        (self)()
    }
}

//! Message content: the source contract and the default template engine.
//!
//! ## Contents
//! - [`ContentSource`], [`SourceRef`] — the narrow capability interface the
//!   target loops consume
//! - [`TemplateSource`] — default implementation: random template pick with
//!   time placeholder substitution, or custom generator functions

mod source;
mod templates;

pub use source::{ContentSource, SourceRef};
pub use templates::{GeneratorFn, TemplateSource};

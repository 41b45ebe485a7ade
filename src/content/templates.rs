//! # TemplateSource — the default content source.
//!
//! Maintains an ordered collection of template strings with time
//! placeholders. On each call one template is picked uniformly at random and
//! the placeholders are substituted from the wall clock:
//!
//! ```text
//! {time}      → HH:MM:SS
//! {date}      → YYYY-MM-DD
//! {datetime}  → YYYY-MM-DD HH:MM:SS
//! ```
//!
//! Unrecognized placeholders are left untouched. An alternate mode holds
//! zero-argument generator functions, one chosen at random per call; it is
//! used only while no templates exist.
//!
//! ## Example
//! ```
//! use sendvisor::{ContentSource, TemplateSource};
//!
//! let source = TemplateSource::with_templates(["current time: {time}"]);
//! let msg = source.generate().expect("one template is registered");
//! assert!(msg.starts_with("current time: "));
//! ```

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rand::Rng;

use super::source::ContentSource;

/// A zero-argument content generator function.
pub type GeneratorFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Template-backed content source with an optional generator-function mode.
#[derive(Default, Clone)]
pub struct TemplateSource {
    templates: Vec<String>,
    generators: Vec<GeneratorFn>,
}

impl TemplateSource {
    /// Creates an empty source. `generate` returns `None` until a template
    /// or a generator function is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source pre-populated with the given templates.
    pub fn with_templates<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut source = Self::new();
        source.add_templates(templates);
        source
    }

    /// Adds a single template string.
    pub fn add_template(&mut self, template: impl Into<String>) {
        self.templates.push(template.into());
    }

    /// Adds a batch of template strings.
    pub fn add_templates<I, S>(&mut self, templates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates.extend(templates.into_iter().map(Into::into));
    }

    /// Registers a custom generator function.
    ///
    /// Generators are consulted only while no templates are registered.
    pub fn add_generator(&mut self, generator: impl Fn() -> String + Send + Sync + 'static) {
        self.generators.push(Arc::new(generator));
    }

    /// True if neither templates nor generators are registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.generators.is_empty()
    }

    /// Substitutes the time placeholders in `template` for the given clock
    /// reading. Unrecognized placeholders survive unchanged.
    fn render(template: &str, at: NaiveDateTime) -> String {
        template
            .replace("{time}", &at.format("%H:%M:%S").to_string())
            .replace("{date}", &at.format("%Y-%m-%d").to_string())
            .replace("{datetime}", &at.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

impl ContentSource for TemplateSource {
    fn generate(&self) -> Option<String> {
        if !self.templates.is_empty() {
            let idx = rand::rng().random_range(0..self.templates.len());
            return Some(Self::render(
                &self.templates[idx],
                Local::now().naive_local(),
            ));
        }
        if !self.generators.is_empty() {
            let idx = rand::rng().random_range(0..self.generators.len());
            return Some((self.generators[idx])());
        }
        None
    }
}

//! # Run manifest: targets, templates and runtime knobs from a TOML file.
//!
//! [`Manifest`] is the typed, validated replacement for an ad-hoc
//! configuration dictionary: a mapping from target identifier to its
//! schedule, a template list for the default content source, and optional
//! runtime settings. It is parsed once and converted into the immutable
//! inputs of [`Dispatcher::run`](crate::Dispatcher::run).
//!
//! Platform credentials and session handling belong to the delivery-channel
//! implementation and have no place here.
//!
//! ## Example
//! ```
//! use sendvisor::Manifest;
//!
//! let manifest = Manifest::from_toml_str(r#"
//!     grace_secs = 10
//!     templates = ["current time: {time}", "today is {date}"]
//!
//!     [targets."@group1"]
//!     interval_seconds = 60.0
//!     max_messages = 100
//!
//!     [targets."-1001234567890"]
//!     interval_seconds = 300.0
//! "#).unwrap();
//!
//! let specs = manifest.target_specs();
//! assert_eq!(specs.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::content::TemplateSource;
use crate::core::DispatchConfig;
use crate::error::ManifestError;
use crate::targets::TargetSpec;

/// One target's schedule as written in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Seconds between send attempts. Fractional values are allowed.
    pub interval_seconds: f64,
    /// Optional upper bound on successful sends.
    #[serde(default)]
    pub max_messages: Option<u64>,
}

/// A parsed run manifest.
///
/// Targets are kept in a `BTreeMap` so spec order — and therefore loop
/// spawn order — is stable across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Target identifier → schedule.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetEntry>,

    /// Templates for the default content source.
    #[serde(default)]
    pub templates: Vec<String>,

    /// Grace period for shutdown, in seconds.
    #[serde(default)]
    pub grace_secs: Option<u64>,

    /// Event bus ring buffer capacity.
    #[serde(default)]
    pub bus_capacity: Option<usize>,
}

impl Manifest {
    /// Parses a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Converts the target table into specs, in identifier order.
    ///
    /// No validation happens here; the dispatcher validates the whole batch
    /// (and aggregates violations) before starting any loop.
    pub fn target_specs(&self) -> Vec<TargetSpec> {
        self.targets
            .iter()
            .map(|(id, entry)| {
                let interval = Duration::try_from_secs_f64(entry.interval_seconds)
                    .unwrap_or(Duration::ZERO);
                let spec = TargetSpec::new(id.as_str(), interval);
                match entry.max_messages {
                    Some(max) => spec.with_max_messages(max),
                    None => spec,
                }
            })
            .collect()
    }

    /// Builds the default content source from the template list.
    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::with_templates(self.templates.iter().cloned())
    }

    /// Builds the runtime config, falling back to defaults for absent knobs.
    pub fn dispatch_config(&self) -> DispatchConfig {
        let mut cfg = DispatchConfig::default();
        if let Some(grace) = self.grace_secs {
            cfg.grace = Duration::from_secs(grace);
        }
        if let Some(capacity) = self.bus_capacity {
            cfg.bus_capacity = capacity;
        }
        cfg
    }
}

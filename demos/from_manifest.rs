//! # Demo: from_manifest
//!
//! Builds a whole run — targets, templates, runtime knobs — from a TOML
//! manifest instead of code.
//!
//! ## Run
//! ```bash
//! cargo run --example from_manifest --features logging
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use sendvisor::{Channel, Dispatcher, LogWriter, Manifest, SendOutcome};

const MANIFEST: &str = r#"
    grace_secs = 5
    templates = [
        "current time: {time}",
        "today is {date}",
    ]

    [targets."@group1"]
    interval_seconds = 1.0
    max_messages = 2

    [targets."@group2"]
    interval_seconds = 1.5
    max_messages = 2
"#;

/// Prints messages instead of delivering them anywhere.
struct StdoutChannel;

#[async_trait]
impl Channel for StdoutChannel {
    async fn send(&self, target: &str, text: &str) -> SendOutcome {
        println!("-> {target}: {text}");
        SendOutcome::Delivered
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::from_toml_str(MANIFEST)?;

    let dispatcher = Dispatcher::builder(manifest.dispatch_config())
        .with_subscribers(vec![Arc::new(LogWriter::new()) as _])
        .build();

    let summary = dispatcher
        .run(
            manifest.target_specs(),
            Arc::new(manifest.template_source()),
            Arc::new(StdoutChannel),
        )
        .await?;

    println!("\ntotal sent: {}", summary.total_sent());
    Ok(())
}

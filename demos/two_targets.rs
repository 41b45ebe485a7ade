//! # Demo: two_targets
//!
//! Runs two independent target loops against a stdout-backed channel:
//! one bounded (3 messages, 1s apart), one unbounded (every 2s).
//!
//! The bounded target exhausts on its own; press Ctrl-C to stop the
//! unbounded one. The final summary prints the terminal phase and sent
//! count per target.
//!
//! ## Run
//! ```bash
//! cargo run --example two_targets --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sendvisor::{
    Channel, DispatchConfig, Dispatcher, LogWriter, SendOutcome, TargetSpec, TemplateSource,
};

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
    let mut cfg = DispatchConfig::default();
    cfg.grace = Duration::from_secs(5);

    let dispatcher = Dispatcher::builder(cfg)
        .with_subscribers(vec![Arc::new(LogWriter::new()) as _])
        .build();

    let source = Arc::new(TemplateSource::with_templates([
        "current time: {time}",
        "today is {date}",
        "automated message - {datetime}",
    ]));

    let specs = vec![
        TargetSpec::new("@bounded", Duration::from_secs(1)).with_max_messages(3),
        TargetSpec::new("@unbounded", Duration::from_secs(2)),
    ];

    println!("dispatching; press Ctrl-C to stop\n");
    let summary = dispatcher.run(specs, source, Arc::new(StdoutChannel)).await?;

    println!("\nfinal summary:");
    for report in summary.reports() {
        println!(
            "  {} -> {} (sent {})",
            report.target,
            report.phase.as_label(),
            report.sent
        );
    }
    Ok(())
}

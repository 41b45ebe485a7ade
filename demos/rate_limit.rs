//! # Demo: rate_limit
//!
//! Shows backoff behavior: the channel accepts every third attempt and
//! answers the rest with a 2s rate-limit hint. Watch the `[rate-limited]`
//! events — the loop waits out the hint and retries the same step instead
//! of skipping to the next interval, and the hint never consumes the send
//! bound.
//!
//! ## Run
//! ```bash
//! cargo run --example rate_limit --features logging
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sendvisor::{
    Channel, DispatchConfig, Dispatcher, LogWriter, SendOutcome, TargetSpec, TemplateSource,
};

/// Accepts every third send; rate-limits the rest.
struct FlakyRemote {
    attempts: AtomicU64,
}

#[async_trait]
impl Channel for FlakyRemote {
    async fn send(&self, target: &str, text: &str) -> SendOutcome {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if n % 3 == 2 {
            println!("-> {target}: {text}");
            SendOutcome::Delivered
        } else {
            SendOutcome::RateLimited(Duration::from_secs(2))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = Dispatcher::builder(DispatchConfig::default())
        .with_subscribers(vec![Arc::new(LogWriter::new()) as _])
        .build();

    let source = Arc::new(TemplateSource::with_templates(["ping at {time}"]));
    let specs = vec![TargetSpec::new("@throttled", Duration::from_secs(1)).with_max_messages(3)];

    let channel = Arc::new(FlakyRemote {
        attempts: AtomicU64::new(0),
    });

    let summary = dispatcher.run(specs, source, channel).await?;
    let report = summary.get("@throttled").expect("configured target");
    println!(
        "\n{} after {} deliveries",
        report.phase.as_label(),
        report.sent
    );
    Ok(())
}

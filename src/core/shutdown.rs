//! # Cross-platform stop-all triggers.
//!
//! Provides [`wait_for_stop`], an async helper that completes when either the
//! process receives a termination signal or the dispatcher's stop token is
//! cancelled. Both paths are treated identically: the dispatcher cancels the
//! root token and waits out the grace period.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tokio_util::sync::CancellationToken;

/// Completes when a termination signal arrives or `stop` is cancelled.
///
/// Signal registration failures are swallowed: the stop token remains a
/// working trigger even when signal listeners cannot be installed.
pub(crate) async fn wait_for_stop(stop: &CancellationToken) {
    tokio::select! {
        _ = signal_or_pending() => {}
        _ = stop.cancelled() => {}
    }
}

/// Resolves on a termination signal; never resolves if listeners could not
/// be installed.
async fn signal_or_pending() {
    if wait_for_shutdown_signal().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

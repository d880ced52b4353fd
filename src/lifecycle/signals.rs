//! OS signal handling.
//!
//! - SIGINT / SIGTERM trigger shutdown
//! - SIGHUP requests a configuration reload and never shuts down
//!
//! On non-unix targets only Ctrl+C is observed.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Spawn the signal listener. Reload requests go to `reload_tx`.
pub fn spawn_signal_handler(
    shutdown: Shutdown,
    reload_tx: mpsc::UnboundedSender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signals(reload_tx).await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn wait_for_signals(reload_tx: mpsc::UnboundedSender<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut terminate, mut hangup) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(term), Ok(hup)) => (term, hup),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Unix signal handlers unavailable, only Ctrl+C is observed");
            ctrl_c().await;
            return;
        }
    };

    loop {
        tokio::select! {
            _ = ctrl_c() => return,
            _ = terminate.recv() => return,
            _ = hangup.recv() => {
                tracing::info!("SIGHUP received, requesting reload");
                if reload_tx.send(()).is_err() {
                    tracing::debug!("Reload receiver gone");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signals(_reload_tx: mpsc::UnboundedSender<()>) {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `cancelation` once the process is asked to stop. Ctrl-C works everywhere, on unix the
/// daemon also listens for SIGTERM which is what `habitual stop` sends.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received ctrl-c"),
                    _ = terminate.recv() => info!("Received SIGTERM"),
                    _ = cancelation.cancelled() => return,
                };
            }
            Err(e) => {
                warn!("Can't listen for SIGTERM, only ctrl-c will stop the daemon {e}");
                wait_ctrl_c(&cancelation).await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        wait_ctrl_c(&cancelation).await;
    }
    cancelation.cancel();
}

async fn wait_ctrl_c(cancelation: &CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received ctrl-c"),
        _ = cancelation.cancelled() => (),
    };
}

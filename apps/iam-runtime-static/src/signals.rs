use anyhow::Result;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Cancel `cancel` on Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn cancel_on_shutdown(cancel: CancellationToken) -> Result<()> {
    let result = tokio::select! {
        result = wait_ctrl_c() => result,
        result = wait_sigterm() => result,
        () = cancel.cancelled() => return Ok(()),
    };

    if result.is_ok() {
        tracing::info!("shutdown signal received, stopping");
    }
    cancel.cancel();
    result
}

async fn wait_ctrl_c() -> Result<()> {
    signal::ctrl_c().await?;
    tracing::debug!("received Ctrl+C");
    Ok(())
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    tracing::debug!("received SIGTERM");
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<()> {
    std::future::pending().await
}

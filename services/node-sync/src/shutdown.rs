use tokio::sync::watch;

/// Resolves once shutdown is requested or the sender is gone.
pub async fn signaled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

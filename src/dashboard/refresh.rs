//! Periodic refresh task

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Fires a refresh on a fixed wall-clock interval until cancelled.
///
/// Each tick spawns its refresh instead of awaiting it, so a slow backend
/// never delays the next tick and refreshes may overlap. Dropping the task
/// stops the timer as well.
pub struct RefreshTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Start ticking; the first tick happens one `period` from now.
    pub fn spawn<F, Fut>(period: Duration, mut refresh: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stop) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    _ = interval.tick() => {
                        tracing::debug!("Dashboard refresh tick");
                        tokio::spawn(refresh());
                    }
                }
            }
            tracing::debug!("Dashboard refresh task stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop the timer and wait until it has stopped. Refreshes already in
    /// flight are left to finish.
    pub async fn cancel(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!("Refresh task ended abnormally: {}", e);
        }
    }
}

//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries. The task
//! stops cooperatively when its handle is shut down.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ReadThroughCache;

// == Cleanup Handle ==
/// Owns a running cleanup task.
#[derive(Debug)]
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Cleanup task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that periodically removes expired entries.
///
/// Lazy expiration already hides stale entries from `get`; the sweep only
/// releases their memory. The first sweep runs one `interval` after spawn.
///
/// # Example
/// ```ignore
/// let cleanup = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup.shutdown().await;
/// ```
pub fn spawn_cleanup_task<V>(cache: ReadThroughCache<V>, interval: Duration) -> CleanupHandle
where
    V: Clone + Send + Sync + 'static,
{
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task for cache '{}' with interval of {:?}",
            cache.name(),
            interval
        );

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.cleanup_expired();
                    if removed > 0 {
                        info!("TTL cleanup: removed {} expired entries", removed);
                    } else {
                        debug!("TTL cleanup: no expired entries found");
                    }
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("TTL cleanup task for cache '{}' stopped", cache.name());
    });

    CleanupHandle { shutdown, task }
}

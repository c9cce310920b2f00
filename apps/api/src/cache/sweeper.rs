use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::SimilarityCache;

/// Runs `sweep_expired` every `interval` until the returned handle is aborted.
/// The first sweep happens one full interval after start.
pub fn spawn_sweeper(cache: Arc<SimilarityCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = cache.sweep_expired();
            debug!("Scheduled cache sweep removed {removed} entries");
        }
    })
}

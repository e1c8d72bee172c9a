use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::session::SessionStore;
use crate::config::SessionConfig;

/// Spawns the recurring eviction task on the current tokio runtime.
///
/// The first sweep runs one full interval after spawning. The task never
/// finishes on its own; abort the handle to stop it.
pub fn spawn_session_sweeper(store: Arc<SessionStore>, config: SessionConfig) -> JoinHandle<()> {
    info!(
        ttl_secs = config.ttl.as_secs(),
        interval_secs = config.sweep_interval.as_secs(),
        "session sweeper started"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() yields immediately on the first tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = store.sweep(config.ttl);
            debug!(evicted, remaining = store.len(), "session sweep finished");
        }
    })
}

//! Background expiry of idle sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::store::SessionStore;

/// Spawn a task that removes sessions idle for longer than `ttl`,
/// checking every `interval`.
///
/// The task runs until the returned handle is aborted.
pub fn spawn_sweeper(store: Arc<SessionStore>, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let expired = store.expire_idle(ttl);
            if expired > 0 {
                info!(expired, remaining = store.count(), "expired idle sessions");
            } else {
                debug!("no idle sessions to expire");
            }
        }
    })
}

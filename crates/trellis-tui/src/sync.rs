use crate::state::DomainStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Refreshes the name cache in the background at a fixed interval.
///
/// The first sync happens one interval after start. Ticks that arrive while
/// the store is busy are skipped. Dropping the scheduler stops it.
pub struct SyncScheduler {
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    /// Returns `None` when `interval` is zero, which disables syncing.
    pub fn start(store: DomainStore, interval: Duration) -> Option<Self> {
        if interval.is_zero() {
            tracing::debug!("Periodic sync disabled");
            return None;
        }

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if store.is_loading() {
                    tracing::debug!("Skipping sync, store is busy");
                    continue;
                }
                if let Some(report) = store.sync_cache().await {
                    tracing::debug!(
                        "Background sync: {} boards, {} lists",
                        report.boards,
                        report.lists
                    );
                }
            }
        });

        Some(Self { handle })
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

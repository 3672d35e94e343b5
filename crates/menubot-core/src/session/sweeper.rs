//! Background task that periodically drops expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use super::store::{SharedTable, write_table};
use crate::clock::Clock;

/// Handle to a running sweep task.
///
/// Owned by the `SessionStore` that started it. Cancelling the token makes
/// the task exit at its next select point; [`stop`](Self::stop) additionally
/// waits for it.
#[derive(Debug)]
pub struct EvictionSweeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl EvictionSweeper {
    pub(crate) fn spawn(
        table: SharedTable,
        clock: Arc<dyn Clock>,
        interval: Duration,
        span: Span,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        _ = ticker.tick() => {
                            let (removed, remaining) = {
                                let mut table = write_table(&table);
                                let removed = table.sweep(clock.now());
                                (removed, table.len())
                            };
                            if removed > 0 {
                                tracing::info!(removed, remaining, "expired sessions evicted");
                            } else {
                                tracing::debug!(remaining, "sweep found no expired sessions");
                            }
                        }
                    }
                }

                tracing::debug!("eviction sweeper exited");
            }
            .instrument(span),
        );

        Self { cancel, handle }
    }

    /// Signal the task to exit without waiting for it.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel the task and wait until it has exited.
    pub(crate) async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "eviction sweeper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use menubot_types::session::Session;

    use super::*;
    use crate::clock::ManualClock;
    use crate::session::SessionStore;

    #[tokio::test(start_paused = true)]
    async fn test_first_sweep_waits_one_interval() {
        let clock = Arc::new(ManualClock::default());
        let store = SessionStore::new(Duration::from_secs(3600)).with_clock(clock.clone());
        store.put("idle", Session::new("idle", clock.now() - TimeDelta::hours(2)));

        store.start_eviction(Duration::from_secs(3600), Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(store.contains_entry("idle"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!store.contains_entry("idle"));
        store.stop_eviction().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_waits_for_task_exit() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let store = SessionStore::new(Duration::from_secs(60));
        let sweeper = EvictionSweeper::spawn(
            store_table(&store),
            clock,
            Duration::from_secs(1),
            Span::none(),
        );
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!sweeper.is_finished());

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_task() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let store = SessionStore::new(Duration::from_secs(60));
        let sweeper = EvictionSweeper::spawn(
            store_table(&store),
            clock,
            Duration::from_secs(1),
            Span::none(),
        );
        sweeper.cancel();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(sweeper.is_finished());
    }

    fn store_table(store: &SessionStore) -> SharedTable {
        store.shared_table()
    }
}

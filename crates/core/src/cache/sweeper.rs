//! Background sweeping of expired cache entries.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::ttl::TtlCache;

/// Owns the periodic sweep task of one [`TtlCache`].
///
/// The task runs until [`CacheSweeper::stop`] is awaited or the sweeper is
/// dropped, so its lifetime is tied to whoever holds it.
#[derive(Debug)]
pub struct CacheSweeper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl CacheSweeper {
    /// Starts sweeping `cache` every `interval` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn start<V>(cache: TtlCache<V>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self::start_on(&Handle::current(), cache, interval)
    }

    /// Starts sweeping `cache` every `interval` on the given runtime.
    ///
    /// A zero interval yields an idle sweeper; entries then expire lazily only.
    #[must_use]
    pub fn start_on<V>(runtime: &Handle, cache: TtlCache<V>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let token = CancellationToken::new();

        if interval.is_zero() {
            debug!("cache sweeper disabled (zero interval)");
            return Self {
                token,
                handle: None,
                interval,
            };
        }

        let cancelled = token.clone();
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        cache.sweep();
                        trace!(entries = cache.entry_count(), "cache sweep complete");
                    }
                }
            }

            debug!("cache sweeper stopped");
        });

        debug!(interval_ms = interval.as_millis(), "cache sweeper started");

        Self {
            token,
            handle: Some(handle),
            interval,
        }
    }

    /// Returns the sweep interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true while the sweep task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the sweep task and waits for it to exit.
    pub async fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            // The task only ends by cancellation; a join error means it panicked.
            if let Err(err) = handle.await {
                debug!(error = %err, "cache sweeper ended abnormally");
            }
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_reclaims_expired_entries() {
        let cache = TtlCache::new();
        cache.set_with_ttl("short", 1, Duration::from_millis(20));
        cache.set_with_ttl("long", 2, Duration::from_secs(60));

        let mut sweeper = CacheSweeper::start(cache.clone(), Duration::from_millis(25));
        assert!(sweeper.is_running());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get("long"), Some(2));

        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_stop_ends_task() {
        let cache: TtlCache<u8> = TtlCache::new();
        let mut sweeper = CacheSweeper::start(cache, Duration::from_millis(10));
        assert_eq!(sweeper.interval(), Duration::from_millis(10));
        assert!(sweeper.is_running());

        sweeper.stop().await;

        assert!(!sweeper.is_running());
        assert!(sweeper.token.is_cancelled());
        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_drop_cancels_task() {
        let cache: TtlCache<u8> = TtlCache::new();
        let sweeper = CacheSweeper::start(cache, Duration::from_millis(10));
        let token = sweeper.token.clone();

        drop(sweeper);

        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_zero_interval_is_idle() {
        let cache: TtlCache<u8> = TtlCache::new();
        let mut sweeper = CacheSweeper::start(cache, Duration::ZERO);
        assert!(!sweeper.is_running());
        sweeper.stop().await;
    }
}

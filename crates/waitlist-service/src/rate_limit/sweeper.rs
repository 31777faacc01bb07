//! Background task that keeps limiter memory bounded.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::RateLimiters;

/// Spawn the periodic sweep over both limiters.
///
/// Runs until `shutdown` flips to `true` or its sender is dropped.
pub fn spawn_sweeper(
    limiters: RateLimiters,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(interval_seconds = every.as_secs(), "Rate limit sweeper started");

        let mut ticker = time::interval_at(time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    for limiter in limiters.all() {
                        let stats = limiter.sweep().await;
                        if stats.removed_empty > 0 || stats.evicted > 0 {
                            tracing::debug!(
                                limiter = limiter.name(),
                                removed_empty = stats.removed_empty,
                                evicted = stats.evicted,
                                "Rate limit sweep"
                            );
                        }
                    }
                }
            }
        }

        tracing::info!("Rate limit sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use waitlist_core::config::RateLimitConfig;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_prunes_and_stops() {
        let limiters = RateLimiters::from_config(&RateLimitConfig::default());
        limiters.signup.is_allowed("10.0.0.1").await;
        limiters.status.is_allowed("10.0.0.2").await;

        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweeper(limiters.clone(), Duration::from_secs(300), rx);

        // Past the 60 s windows and the first tick.
        time::sleep(Duration::from_secs(301)).await;
        assert_eq!(limiters.signup.tracked_keys().await, 0);
        assert_eq!(limiters.status.tracked_keys().await, 0);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}

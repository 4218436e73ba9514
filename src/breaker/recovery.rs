//! Recovery ticker.
//!
//! # Responsibilities
//! - Periodically scan every tracked resource
//! - Move Open records whose timeout has elapsed to Half-Open
//!
//! The scan is O(tracked resources) per tick, which is bounded by the number of
//! distinct remote resources rather than by call volume.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::breaker::registry::Breaker;

/// Interval between recovery passes.
pub const RECOVERY_INTERVAL: Duration = Duration::from_secs(5);

pub struct RecoveryTicker {
    breaker: Arc<Breaker>,
    interval: Duration,
}

impl RecoveryTicker {
    pub fn new(breaker: Arc<Breaker>) -> Self {
        Self::with_interval(breaker, RECOVERY_INTERVAL)
    }

    pub fn with_interval(breaker: Arc<Breaker>, interval: Duration) -> Self {
        Self { breaker, interval }
    }

    /// Tick until a shutdown signal arrives.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            open_timeout = self.breaker.config().open_timeout,
            "Recovery ticker starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let recovered = self.breaker.recover_expired();
                    if recovered > 0 {
                        tracing::debug!(recovered, "Recovery pass complete");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Recovery ticker received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::clock::ManualClock;
    use crate::breaker::state::BreakerStatus;
    use crate::config::BreakerConfig;
    use crate::lifecycle::Shutdown;

    fn setup(timeout: u64) -> (Arc<Breaker>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(500));
        let breaker = Breaker::with_clock(BreakerConfig::new(1, 1, timeout), clock.clone()).unwrap();
        (Arc::new(breaker), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_demotes_expired_records() {
        let (breaker, clock) = setup(10);
        breaker.record_failure("svc-a");

        let shutdown = Shutdown::new();
        let task = tokio::spawn(RecoveryTicker::new(breaker.clone()).run(shutdown.subscribe()));

        // First tick fires immediately, before the timeout has elapsed.
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(breaker.status("svc-a"), BreakerStatus::Open);

        clock.advance(11);
        time::sleep(RECOVERY_INTERVAL).await;
        assert_eq!(breaker.status("svc-a"), BreakerStatus::HalfOpen);

        shutdown.trigger();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_leaves_unexpired_records() {
        let (breaker, clock) = setup(60);
        breaker.record_failure("svc-a");

        let shutdown = Shutdown::new();
        let task = tokio::spawn(
            RecoveryTicker::with_interval(breaker.clone(), Duration::from_secs(1)).run(shutdown.subscribe()),
        );

        clock.advance(30);
        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(breaker.status("svc-a"), BreakerStatus::Open);

        shutdown.trigger();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_ticker_stops_on_shutdown() {
        let (breaker, _) = setup(10);
        let shutdown = Shutdown::new();
        let task = tokio::spawn(RecoveryTicker::new(breaker).run(shutdown.subscribe()));

        shutdown.trigger();
        time::timeout(Duration::from_secs(1), task)
            .await
            .expect("ticker did not stop")
            .unwrap();
    }
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate the breaker configuration
//! - Build the Breaker
//! - Start the recovery ticker and tie its lifetime to a handle

use std::ops::Deref;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

use crate::breaker::{Breaker, Clock, RecoveryTicker, SystemClock};
use crate::config::{BreakerConfig, ConfigError};
use crate::lifecycle::shutdown::Shutdown;

/// Errors raised while starting a breaker.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no tokio runtime to run the recovery ticker: {0}")]
    NoRuntime(#[from] TryCurrentError),
}

/// A running breaker together with its recovery ticker.
///
/// Dropping the handle signals the ticker to stop; [`BreakerHandle::shutdown`]
/// additionally waits for it to exit.
#[derive(Debug)]
pub struct BreakerHandle {
    breaker: Arc<Breaker>,
    shutdown: Shutdown,
    ticker: Option<JoinHandle<()>>,
}

impl BreakerHandle {
    /// Shared reference for injecting into call sites.
    pub fn breaker(&self) -> Arc<Breaker> {
        self.breaker.clone()
    }

    /// Whether the recovery ticker is still running.
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the recovery ticker and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.trigger();
        if let Some(ticker) = self.ticker.take() {
            if let Err(e) = ticker.await {
                tracing::error!(error = %e, "Recovery ticker terminated abnormally");
            }
        }
        tracing::info!("Breaker shut down");
    }
}

impl Deref for BreakerHandle {
    type Target = Breaker;

    fn deref(&self) -> &Self::Target {
        &self.breaker
    }
}

impl Drop for BreakerHandle {
    fn drop(&mut self) {
        if self.ticker.is_some() {
            self.shutdown.trigger();
        }
    }
}

/// Build a breaker on the system clock and spawn its recovery ticker.
///
/// Must be called from within a tokio runtime.
pub fn start(config: BreakerConfig) -> Result<BreakerHandle, StartupError> {
    start_with_clock(config, Arc::new(SystemClock))
}

/// Like [`start`], reading time from `clock`.
pub fn start_with_clock(config: BreakerConfig, clock: Arc<dyn Clock>) -> Result<BreakerHandle, StartupError> {
    let runtime = Handle::try_current()?;
    let breaker = Arc::new(Breaker::with_clock(config, clock)?);

    let shutdown = Shutdown::new();
    let ticker = RecoveryTicker::new(breaker.clone());
    let ticker = runtime.spawn(ticker.run(shutdown.subscribe()));

    tracing::info!(
        fail_threshold = breaker.config().fail_threshold,
        succ_threshold = breaker.config().succ_threshold,
        open_timeout = breaker.config().open_timeout,
        "Breaker started"
    );

    Ok(BreakerHandle {
        breaker,
        shutdown,
        ticker: Some(ticker),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::{BreakerStatus, ManualClock, RECOVERY_INTERVAL};

    #[test]
    fn test_start_requires_runtime() {
        let err = start(BreakerConfig::default()).unwrap_err();
        assert!(matches!(err, StartupError::NoRuntime(_)));
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let err = start(BreakerConfig::new(3, 0, 10)).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_shutdown_stops_ticker() {
        let handle = start(BreakerConfig::default()).unwrap();
        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_recovers_open_resources() {
        let clock = Arc::new(ManualClock::new(0));
        let handle = start_with_clock(BreakerConfig::new(1, 1, 10), clock.clone()).unwrap();

        handle.record_failure("svc-a");
        assert_eq!(handle.status("svc-a"), BreakerStatus::Open);

        clock.advance(10);
        tokio::time::sleep(RECOVERY_INTERVAL + std::time::Duration::from_secs(1)).await;
        assert_eq!(handle.status("svc-a"), BreakerStatus::HalfOpen);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_drop_signals_ticker() {
        let handle = start(BreakerConfig::default()).unwrap();
        let breaker = handle.breaker();
        drop(handle);

        // The ticker holds the other reference; it is released once the task exits.
        for _ in 0..100 {
            if Arc::strong_count(&breaker) == 1 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("recovery ticker still holds the breaker after drop");
    }
}
